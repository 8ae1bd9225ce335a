// Admin-authored content collections
// Each collection shares the same list/get/create/update/delete shape

pub mod announcement;
pub mod resource;
pub mod schedule;
pub mod sponsor;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;

use crate::domain::errors::DomainResult;

pub use announcement::{Announcement, AnnouncementDraft, AnnouncementPriority};
pub use resource::{Resource, ResourceCategory, ResourceDraft};
pub use schedule::{EventType, ScheduleDraft, ScheduleEvent};
pub use sponsor::{Sponsor, SponsorDraft, SponsorTier};

/// A record in one of the content collections
///
/// `Draft` is the client-editable part of the record; the id, author and
/// timestamps are owned by the store.
pub trait ContentItem: Clone + Serialize + Send + Sync + 'static {
    type Draft: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Human-readable name used in error messages
    const KIND: &'static str;

    /// Normalizes and checks a client draft
    fn validate(draft: Self::Draft) -> DomainResult<Self::Draft>;

    fn id(&self) -> i64;

    /// Builds a stored record from a validated draft
    fn from_draft(id: i64, draft: Self::Draft, author_id: i64, now: DateTime<Utc>) -> Self;

    /// Overwrites the editable fields with a validated draft
    fn apply(&mut self, draft: Self::Draft, now: DateTime<Utc>);

    /// Order in which the collection is listed
    fn listing_order(a: &Self, b: &Self) -> Ordering;
}
