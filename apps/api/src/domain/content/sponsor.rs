use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::ContentItem;
use crate::domain::errors::{optional_text, required_text, DomainResult};
use crate::domain::user::value_objects::validate_url;

/// Sponsorship level; declaration order is display order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "sponsor_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SponsorTier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Partner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub tier: SponsorTier,
    pub display_order: i32,
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorDraft {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub tier: SponsorTier,
    #[serde(default)]
    pub display_order: i32,
}

impl ContentItem for Sponsor {
    type Draft = SponsorDraft;

    const KIND: &'static str = "Sponsor";

    fn validate(draft: SponsorDraft) -> DomainResult<SponsorDraft> {
        Ok(SponsorDraft {
            name: required_text("name", draft.name, 120)?,
            description: optional_text("description", draft.description, 2000)?,
            logo_url: validate_url("logoUrl", draft.logo_url)?,
            website_url: validate_url("websiteUrl", draft.website_url)?,
            tier: draft.tier,
            display_order: draft.display_order,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: SponsorDraft, author_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            logo_url: draft.logo_url,
            website_url: draft.website_url,
            tier: draft.tier,
            display_order: draft.display_order,
            created_by_id: author_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: SponsorDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.description = draft.description;
        self.logo_url = draft.logo_url;
        self.website_url = draft.website_url;
        self.tier = draft.tier;
        self.display_order = draft.display_order;
        self.updated_at = now;
    }

    /// By tier, then by the admin-chosen position, then by name
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.tier
            .cmp(&b.tier)
            .then(a.display_order.cmp(&b.display_order))
            .then_with(|| a.name.cmp(&b.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sponsor(id: i64, tier: SponsorTier, order: i32) -> Sponsor {
        let draft = SponsorDraft {
            name: format!("Sponsor {}", id),
            description: None,
            logo_url: None,
            website_url: None,
            tier,
            display_order: order,
        };
        Sponsor::from_draft(id, draft, 1, Utc::now())
    }

    #[test]
    fn tier_ordering() {
        let mut items = vec![
            sponsor(1, SponsorTier::Bronze, 0),
            sponsor(2, SponsorTier::Platinum, 5),
            sponsor(3, SponsorTier::Platinum, 1),
        ];
        items.sort_by(Sponsor::listing_order);
        let ids: Vec<i64> = items.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn invalid_logo_url_rejected() {
        let draft = SponsorDraft {
            name: "Acme".into(),
            description: None,
            logo_url: Some("logo.png".into()),
            website_url: None,
            tier: SponsorTier::Gold,
            display_order: 0,
        };
        assert!(Sponsor::validate(draft).is_err());
    }
}
