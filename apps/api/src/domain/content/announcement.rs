use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::ContentItem;
use crate::domain::errors::{required_text, DomainResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "announcement_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub priority: AnnouncementPriority,
    pub pinned: bool,
    /// Shown on the public landing page as well as the portal
    pub is_public: bool,
    pub posted_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: AnnouncementPriority,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub is_public: bool,
}

impl ContentItem for Announcement {
    type Draft = AnnouncementDraft;

    const KIND: &'static str = "Announcement";

    fn validate(draft: AnnouncementDraft) -> DomainResult<AnnouncementDraft> {
        Ok(AnnouncementDraft {
            title: required_text("title", draft.title, 200)?,
            content: required_text("content", draft.content, 10_000)?,
            ..draft
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: AnnouncementDraft, author_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            priority: draft.priority,
            pinned: draft.pinned,
            is_public: draft.is_public,
            posted_by_id: author_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: AnnouncementDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.priority = draft.priority;
        self.pinned = draft.pinned;
        self.is_public = draft.is_public;
        self.updated_at = now;
    }

    /// Pinned first, then newest first
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.pinned
            .cmp(&a.pinned)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.id.cmp(&a.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults() {
        let draft: AnnouncementDraft =
            serde_json::from_str(r#"{"title":"Kickoff","content":"9am in Hall A"}"#).unwrap();
        assert_eq!(draft.priority, AnnouncementPriority::Normal);
        assert!(!draft.pinned);
        assert!(!draft.is_public);
    }

    #[test]
    fn empty_content_rejected() {
        let draft = AnnouncementDraft {
            title: "Kickoff".into(),
            content: " ".into(),
            priority: AnnouncementPriority::High,
            pinned: false,
            is_public: true,
        };
        assert!(Announcement::validate(draft).is_err());
    }

    #[test]
    fn pinned_sorts_first() {
        let now = Utc::now();
        let base = AnnouncementDraft {
            title: "t".into(),
            content: "c".into(),
            priority: AnnouncementPriority::Low,
            pinned: false,
            is_public: false,
        };
        let older_pinned = Announcement::from_draft(
            1,
            AnnouncementDraft {
                pinned: true,
                ..base.clone()
            },
            1,
            now - chrono::Duration::hours(1),
        );
        let newer = Announcement::from_draft(2, base, 1, now);

        let mut items = vec![newer.clone(), older_pinned.clone()];
        items.sort_by(Announcement::listing_order);
        assert_eq!(items[0].id, older_pinned.id);
    }
}
