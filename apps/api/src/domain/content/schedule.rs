use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::ContentItem;
use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Ceremony,
    Workshop,
    Meal,
    Deadline,
    Activity,
    Other,
}

/// Entry in the event agenda
///
/// # Invariants
/// - `end_time` is after `start_time`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_type: EventType,
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_type: EventType,
}

impl ContentItem for ScheduleEvent {
    type Draft = ScheduleDraft;

    const KIND: &'static str = "Schedule event";

    fn validate(draft: ScheduleDraft) -> DomainResult<ScheduleDraft> {
        if draft.end_time <= draft.start_time {
            return Err(DomainError::validation("endTime must be after startTime"));
        }
        Ok(ScheduleDraft {
            title: required_text("title", draft.title, 200)?,
            description: optional_text("description", draft.description, 2000)?,
            location: optional_text("location", draft.location, 200)?,
            ..draft
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: ScheduleDraft, author_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            start_time: draft.start_time,
            end_time: draft.end_time,
            event_type: draft.event_type,
            created_by_id: author_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: ScheduleDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.description = draft.description;
        self.location = draft.location;
        self.start_time = draft.start_time;
        self.end_time = draft.end_time;
        self.event_type = draft.event_type;
        self.updated_at = now;
    }

    /// Chronological
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(hours: i64) -> ScheduleDraft {
        let start = Utc::now();
        ScheduleDraft {
            title: "Opening ceremony".into(),
            description: None,
            location: Some(" Main stage ".into()),
            start_time: start,
            end_time: start + Duration::hours(hours),
            event_type: EventType::Ceremony,
        }
    }

    #[test]
    fn end_must_follow_start() {
        assert!(ScheduleEvent::validate(draft(0)).is_err());
        assert!(ScheduleEvent::validate(draft(-1)).is_err());
        let ok = ScheduleEvent::validate(draft(1)).unwrap();
        assert_eq!(ok.location.as_deref(), Some("Main stage"));
    }

    #[test]
    fn parses_rfc3339_times() {
        let draft: ScheduleDraft = serde_json::from_str(
            r#"{"title":"Lunch","startTime":"2026-03-01T12:00:00Z","endTime":"2026-03-01T13:00:00Z","eventType":"meal"}"#,
        )
        .unwrap();
        assert_eq!(draft.event_type, EventType::Meal);
        assert!(ScheduleEvent::validate(draft).is_ok());
    }
}
