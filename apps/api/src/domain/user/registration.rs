use serde::{Deserialize, Serialize};
use std::fmt;

/// Onboarding stage of a participant
///
/// Single stored source for both the numeric registration step and the
/// portal-access flag exposed to clients.
///
/// # Stage Transitions
/// ```text
/// Registered -> DevpostSubmitted -> DevpostConfirmed <-> Approved
///      \_______________\__________________________________/^
/// ```
/// Any stage may be approved by an admin; revoking returns an approved
/// participant to `DevpostConfirmed`, so the step never goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStage {
    /// Signed in with the identity provider
    Registered,
    /// Devpost username and profile submitted
    DevpostSubmitted,
    /// Participant confirmed their Devpost registration, awaiting approval
    DevpostConfirmed,
    /// Admin granted portal access
    Approved,
}

impl RegistrationStage {
    /// Numeric step shown to clients (1-3)
    ///
    /// # Example
    /// ```
    /// use hackathon_portal_api::domain::user::RegistrationStage;
    ///
    /// assert_eq!(RegistrationStage::Registered.step(), 1);
    /// assert_eq!(RegistrationStage::Approved.step(), 3);
    /// ```
    pub fn step(&self) -> i16 {
        match self {
            RegistrationStage::Registered => 1,
            RegistrationStage::DevpostSubmitted => 2,
            RegistrationStage::DevpostConfirmed | RegistrationStage::Approved => 3,
        }
    }

    pub fn portal_access_granted(&self) -> bool {
        matches!(self, RegistrationStage::Approved)
    }

    /// Checks if moving from the current stage to `next` is allowed
    ///
    /// # Valid Transitions
    /// - Registered -> DevpostSubmitted
    /// - DevpostSubmitted -> DevpostConfirmed
    /// - any non-approved stage -> Approved
    /// - Approved -> DevpostConfirmed
    pub fn can_transition_to(&self, next: RegistrationStage) -> bool {
        use RegistrationStage::*;
        matches!(
            (self, next),
            (Registered, DevpostSubmitted)
                | (DevpostSubmitted, DevpostConfirmed)
                | (Registered, Approved)
                | (DevpostSubmitted, Approved)
                | (DevpostConfirmed, Approved)
                | (Approved, DevpostConfirmed)
        )
    }

    /// Label of what the participant has to do next
    pub fn next_action(&self) -> &'static str {
        match self {
            RegistrationStage::Registered => "complete_registration",
            RegistrationStage::DevpostSubmitted => "confirm_devpost",
            RegistrationStage::DevpostConfirmed => "await_approval",
            RegistrationStage::Approved => "none",
        }
    }
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationStage::Registered => write!(f, "registered"),
            RegistrationStage::DevpostSubmitted => write!(f, "devpost_submitted"),
            RegistrationStage::DevpostConfirmed => write!(f, "devpost_confirmed"),
            RegistrationStage::Approved => write!(f, "approved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RegistrationStage::*;

    const ALL: [RegistrationStage; 4] = [Registered, DevpostSubmitted, DevpostConfirmed, Approved];

    #[test]
    fn steps_follow_stage_order() {
        assert_eq!(Registered.step(), 1);
        assert_eq!(DevpostSubmitted.step(), 2);
        assert_eq!(DevpostConfirmed.step(), 3);
        assert_eq!(Approved.step(), 3);
    }

    #[test]
    fn only_approved_has_portal_access() {
        for stage in ALL {
            assert_eq!(stage.portal_access_granted(), stage == Approved);
        }
    }

    #[test]
    fn portal_access_implies_step_three() {
        for stage in ALL.into_iter().filter(|s| s.portal_access_granted()) {
            assert!(stage.step() >= 3);
        }
    }

    #[test]
    fn no_allowed_transition_lowers_the_step() {
        for from in ALL {
            for to in ALL {
                if from.can_transition_to(to) {
                    assert!(to.step() >= from.step(), "{} -> {}", from, to);
                }
            }
        }
    }

    #[test]
    fn self_service_path() {
        assert!(Registered.can_transition_to(DevpostSubmitted));
        assert!(DevpostSubmitted.can_transition_to(DevpostConfirmed));
        assert!(!Registered.can_transition_to(DevpostConfirmed));
        assert!(!DevpostConfirmed.can_transition_to(DevpostSubmitted));
    }

    #[test]
    fn approval_from_any_pending_stage() {
        assert!(Registered.can_transition_to(Approved));
        assert!(DevpostSubmitted.can_transition_to(Approved));
        assert!(DevpostConfirmed.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Approved));
    }

    #[test]
    fn revoke_returns_to_confirmed() {
        assert!(Approved.can_transition_to(DevpostConfirmed));
        assert!(!Approved.can_transition_to(Registered));
    }

    #[test]
    fn stage_display_matches_storage_name() {
        assert_eq!(Registered.to_string(), "registered");
        assert_eq!(DevpostSubmitted.to_string(), "devpost_submitted");
        assert_eq!(DevpostConfirmed.to_string(), "devpost_confirmed");
        assert_eq!(Approved.to_string(), "approved");
    }
}
