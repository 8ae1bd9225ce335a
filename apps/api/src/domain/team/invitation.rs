use chrono::{DateTime, Utc};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::request::{Decision, RequestStatus};

/// Invitation from a team leader to another participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamInvitation {
    pub id: i64,
    pub team_id: i64,
    pub inviter_id: i64,
    pub invitee_id: i64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl TeamInvitation {
    /// Records the invitee's answer
    ///
    /// An invitation can be answered only once.
    pub fn respond(&mut self, decision: Decision) -> DomainResult<()> {
        let next = decision.status();
        if !self.status.can_transition_to(next) {
            return Err(DomainError::rule("Invitation has already been answered"));
        }
        self.status = next;
        self.responded_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation() -> TeamInvitation {
        TeamInvitation {
            id: 1,
            team_id: 2,
            inviter_id: 3,
            invitee_id: 4,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    #[test]
    fn accept_once() {
        let mut inv = invitation();
        inv.respond(Decision::Accept).unwrap();
        assert_eq!(inv.status, RequestStatus::Accepted);
        assert!(inv.responded_at.is_some());

        let err = inv.respond(Decision::Accept).unwrap_err();
        assert_eq!(err.to_string(), "Invitation has already been answered");
    }

    #[test]
    fn declined_cannot_be_accepted() {
        let mut inv = invitation();
        inv.respond(Decision::Decline).unwrap();
        assert!(inv.respond(Decision::Accept).is_err());
        assert_eq!(inv.status, RequestStatus::Declined);
    }
}
