use chrono::{DateTime, Utc};

use crate::domain::errors::{optional_text, DomainError, DomainResult};
use crate::domain::request::{Decision, RequestStatus};

pub const MAX_MESSAGE_LEN: usize = 500;

pub const PENDING_EXISTS: &str = "A pending request already exists between you";
pub const ALREADY_CONNECTED: &str = "You are already connected";

/// Request from one participant to connect with another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl ConnectionRequest {
    /// Checks the sender/receiver pair and normalizes the note
    pub fn validate_new(
        sender_id: i64,
        receiver_id: i64,
        message: Option<String>,
    ) -> DomainResult<Option<String>> {
        if sender_id == receiver_id {
            return Err(DomainError::rule("You cannot connect with yourself"));
        }
        optional_text("message", message, MAX_MESSAGE_LEN)
    }

    pub fn respond(&mut self, decision: Decision) -> DomainResult<()> {
        let next = decision.status();
        if !self.status.can_transition_to(next) {
            return Err(DomainError::rule("Request has already been answered"));
        }
        self.status = next;
        self.responded_at = Some(Utc::now());
        Ok(())
    }

    /// The other participant, seen from `user_id`
    pub fn peer_of(&self, user_id: i64) -> i64 {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    /// Why this request stops a new one between the same pair, if it does
    ///
    /// A pair has at most one pending or accepted request; declined ones
    /// leave room for a fresh attempt.
    pub fn blocks_new_request(&self) -> Option<&'static str> {
        match self.status {
            RequestStatus::Pending => Some(PENDING_EXISTS),
            RequestStatus::Accepted => Some(ALREADY_CONNECTED),
            RequestStatus::Declined => None,
        }
    }

    pub fn involves(&self, a: i64, b: i64) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}
