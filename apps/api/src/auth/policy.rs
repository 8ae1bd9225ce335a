//! Authorization policy
//!
//! Every guarded operation is an [`Action`], and every action maps to exactly
//! one [`Requirement`]. The mapping is an exhaustive match, so adding an
//! action without deciding its requirement does not compile.

use thiserror::Error;

use crate::domain::user::User;

/// What a caller must satisfy before an action runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any verified identity
    Authenticated,
    /// Approved participants and admins
    PortalAccess,
    Admin,
}

/// Operations that need a verified caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewOwnProfile,
    UpdateOwnProfile,
    ViewProfile,
    ViewRegistration,
    CompleteRegistration,
    ConfirmDevpost,
    BrowseTeammates,
    SendConnection,
    ViewConnections,
    RespondConnection,
    ViewTeams,
    ManageTeam,
    InviteToTeam,
    RespondInvitation,
    ViewResources,
    ManageResources,
    ViewAnnouncements,
    ManageAnnouncements,
    ManageSchedule,
    ManageSponsors,
    ViewOwnSubmission,
    SubmitProject,
    ViewSubmissions,
    ViewUsers,
    ApproveAccess,
    RevokeAccess,
    SetRole,
    ViewStats,
}

impl Action {
    pub fn requirement(self) -> Requirement {
        use Action::*;
        match self {
            ViewOwnProfile | UpdateOwnProfile | ViewRegistration | CompleteRegistration
            | ConfirmDevpost => Requirement::Authenticated,

            ViewProfile | BrowseTeammates | SendConnection | ViewConnections
            | RespondConnection | ViewTeams | ManageTeam | InviteToTeam | RespondInvitation
            | ViewResources | ViewAnnouncements | ViewOwnSubmission | SubmitProject => {
                Requirement::PortalAccess
            }

            ManageResources | ManageAnnouncements | ManageSchedule | ManageSponsors
            | ViewSubmissions | ViewUsers | ApproveAccess | RevokeAccess | SetRole
            | ViewStats => Requirement::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Portal access not granted yet")]
    PortalAccessRequired,

    #[error("Admin access required")]
    AdminRequired,
}

/// Checks `user` against the requirement of `action`
pub fn authorize(user: &User, action: Action) -> Result<(), PolicyViolation> {
    match action.requirement() {
        Requirement::Authenticated => Ok(()),
        Requirement::PortalAccess if user.is_admin() || user.has_portal_access() => Ok(()),
        Requirement::PortalAccess => Err(PolicyViolation::PortalAccessRequired),
        Requirement::Admin if user.is_admin() => Ok(()),
        Requirement::Admin => Err(PolicyViolation::AdminRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::user::tests::user_at;
    use crate::domain::user::{RegistrationStage, Role};

    #[test]
    fn self_service_needs_only_identity() {
        let user = user_at(RegistrationStage::Registered);
        assert!(authorize(&user, Action::CompleteRegistration).is_ok());
        assert!(authorize(&user, Action::UpdateOwnProfile).is_ok());
    }

    #[test]
    fn portal_actions_need_approval() {
        let confirmed = user_at(RegistrationStage::DevpostConfirmed);
        assert_eq!(
            authorize(&confirmed, Action::BrowseTeammates),
            Err(PolicyViolation::PortalAccessRequired)
        );

        let approved = user_at(RegistrationStage::Approved);
        assert!(authorize(&approved, Action::BrowseTeammates).is_ok());
    }

    #[test]
    fn admins_pass_portal_gate() {
        let mut admin = user_at(RegistrationStage::Registered);
        admin.role = Role::Admin;
        assert!(authorize(&admin, Action::ViewResources).is_ok());
        assert!(authorize(&admin, Action::ApproveAccess).is_ok());
    }

    #[test]
    fn approved_participant_is_not_admin() {
        let user = user_at(RegistrationStage::Approved);
        let err = authorize(&user, Action::SetRole).unwrap_err();
        assert_eq!(err.to_string(), "Admin access required");
    }
}
