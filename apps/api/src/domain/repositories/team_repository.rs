use async_trait::async_trait;

use crate::domain::repositories::RepoResult;
use crate::domain::team::{Team, TeamDraft, TeamInvitation, TeamMember, TeamSummary};

/// Repository trait for the Team aggregate, its members and invitations
///
/// Multi-row writes (`create_with_leader`, `accept_invitation`) are atomic.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert a team and its leader membership in one unit
    ///
    /// Fails with `Conflict` if the leader already belongs to a team.
    async fn create_with_leader(&self, draft: TeamDraft, leader_id: i64) -> RepoResult<Team>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Team>>;

    /// The team `user_id` belongs to, if any
    async fn find_by_member(&self, user_id: i64) -> RepoResult<Option<Team>>;

    /// All teams with head counts, newest first
    async fn list(&self) -> RepoResult<Vec<TeamSummary>>;

    /// Members of a team, leader first
    async fn members(&self, team_id: i64) -> RepoResult<Vec<TeamMember>>;

    async fn update(&self, team: &Team) -> RepoResult<Team>;

    /// Delete a team together with its members, invitations and submission
    async fn delete(&self, id: i64) -> RepoResult<bool>;

    async fn remove_member(&self, team_id: i64, user_id: i64) -> RepoResult<bool>;

    async fn create_invitation(
        &self,
        team_id: i64,
        inviter_id: i64,
        invitee_id: i64,
    ) -> RepoResult<TeamInvitation>;

    async fn find_invitation(&self, id: i64) -> RepoResult<Option<TeamInvitation>>;

    async fn find_pending_invitation(
        &self,
        team_id: i64,
        invitee_id: i64,
    ) -> RepoResult<Option<TeamInvitation>>;

    /// Pending invitations addressed to a user, newest first
    async fn pending_invitations_for(&self, invitee_id: i64) -> RepoResult<Vec<TeamInvitation>>;

    /// Mark a pending invitation accepted and add the invitee as a member
    ///
    /// Fails with `Conflict` when the invitation was already answered, the
    /// team is full, or the invitee is already in a team.
    async fn accept_invitation(&self, id: i64) -> RepoResult<TeamInvitation>;

    /// Mark a pending invitation declined
    async fn decline_invitation(&self, id: i64) -> RepoResult<TeamInvitation>;
}
