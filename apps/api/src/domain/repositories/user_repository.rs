use async_trait::async_trait;

use crate::domain::repositories::RepoResult;
use crate::domain::user::{NewUser, Profile, RegistrationStage, Role, User};

/// Optional narrowing of a user listing
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter {
    pub stage: Option<RegistrationStage>,
    pub looking_for_team: Option<bool>,
}

/// Repository trait for the User record store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates the user for an identity, or returns the existing one
    async fn provision(&self, user: NewUser) -> RepoResult<User>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// Find a user by the identity provider's subject
    async fn find_by_identity(&self, identity_ref: &str) -> RepoResult<Option<User>>;

    /// List users ordered by id
    async fn list(&self, filter: UserFilter) -> RepoResult<Vec<User>>;

    /// Writes the name and profile fields; stage and role are untouched
    async fn update_profile(&self, id: i64, name: &str, profile: &Profile) -> RepoResult<User>;

    /// Writes the registration form and promotes a step 1 user to step 2
    ///
    /// Users past step 1 keep their stage.
    async fn save_registration(
        &self,
        id: i64,
        name: &str,
        profile: &Profile,
        devpost_username: &str,
    ) -> RepoResult<User>;

    /// Moves the user from `from` to `to`
    ///
    /// Fails with `Conflict` when the stored stage is no longer `from`, so a
    /// stale read never overwrites a newer stage.
    async fn transition_stage(
        &self,
        id: i64,
        from: RegistrationStage,
        to: RegistrationStage,
    ) -> RepoResult<User>;

    async fn set_role(&self, id: i64, role: Role) -> RepoResult<User>;
}

/// Message for a stage transition that lost a race
pub const STAGE_CHANGED: &str = "Registration state changed, reload and try again";
