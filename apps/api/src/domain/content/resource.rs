use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::ContentItem;
use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};
use crate::domain::user::value_objects::validate_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Documentation,
    Tool,
    Api,
    Dataset,
    Tutorial,
    Other,
}

/// Link shared with participants (docs, APIs, datasets, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub category: ResourceCategory,
    pub uploaded_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub category: ResourceCategory,
}

impl ContentItem for Resource {
    type Draft = ResourceDraft;

    const KIND: &'static str = "Resource";

    fn validate(draft: ResourceDraft) -> DomainResult<ResourceDraft> {
        let url = validate_url("url", Some(draft.url))?
            .ok_or_else(|| DomainError::validation("url cannot be empty"))?;
        Ok(ResourceDraft {
            title: required_text("title", draft.title, 200)?,
            description: optional_text("description", draft.description, 2000)?,
            url,
            category: draft.category,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: ResourceDraft, author_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            url: draft.url,
            category: draft.category,
            uploaded_by_id: author_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: ResourceDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.description = draft.description;
        self.url = draft.url;
        self.category = draft.category;
        self.updated_at = now;
    }

    fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(url: &str) -> ResourceDraft {
        ResourceDraft {
            title: " Rust Book ".into(),
            description: None,
            url: url.into(),
            category: ResourceCategory::Documentation,
        }
    }

    #[test]
    fn valid_resource_is_trimmed() {
        let draft = Resource::validate(draft("https://doc.rust-lang.org/book/")).unwrap();
        assert_eq!(draft.title, "Rust Book");
    }

    #[test]
    fn resource_needs_http_url() {
        assert!(Resource::validate(draft("")).is_err());
        assert!(Resource::validate(draft("ftp://example.com")).is_err());
    }

    #[test]
    fn category_wire_name() {
        let c: ResourceCategory = serde_json::from_str("\"api\"").unwrap();
        assert_eq!(c, ResourceCategory::Api);
    }
}
