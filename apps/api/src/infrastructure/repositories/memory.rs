//! In-memory repository implementations.
//!
//! Back the API when `PORTAL_STORAGE=memory` and drive the integration tests.
//! Every operation runs under one lock, so multi-row writes are atomic just
//! like their Postgres transactions.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::domain::connection::ConnectionRequest;
use crate::domain::content::ContentItem;
use crate::domain::repositories::{
    ConnectionRepository, ContentRepository, RepoError, RepoResult, SubmissionRepository,
    TeamRepository, UserFilter, UserRepository, STAGE_CHANGED,
};
use crate::domain::request::{Decision, RequestStatus};
use crate::domain::submission::{Submission, SubmissionDraft};
use crate::domain::team::{
    Team, TeamDraft, TeamInvitation, TeamMember, TeamRole, TeamSummary,
};
use crate::domain::user::{NewUser, Profile, RegistrationStage, Role, User};

const ALREADY_IN_TEAM: &str = "You are already in a team";

#[derive(Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    teams: BTreeMap<i64, Team>,
    members: Vec<TeamMember>,
    invitations: BTreeMap<i64, TeamInvitation>,
    connections: BTreeMap<i64, ConnectionRequest>,
    submissions: BTreeMap<i64, Submission>,
    user_ids: Sequence,
    team_ids: Sequence,
    invitation_ids: Sequence,
    connection_ids: Sequence,
    submission_ids: Sequence,
}

impl Tables {
    fn team_of(&self, user_id: i64) -> Option<i64> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.team_id)
    }

    fn user_mut(&mut self, id: i64) -> RepoResult<&mut User> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(format!("User not found: {}", id)))
    }

    fn member_count(&self, team_id: i64) -> i64 {
        self.members.iter().filter(|m| m.team_id == team_id).count() as i64
    }
}

/// Users, teams, connections and submissions held in process memory
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn provision(&self, user: NewUser) -> RepoResult<User> {
        let mut t = self.tables.lock().await;
        if let Some(existing) = t.users.values().find(|u| u.identity_ref == user.identity_ref) {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let id = t.user_ids.next();
        let created = User {
            id,
            identity_ref: user.identity_ref,
            email: user.email,
            name: user.name,
            role: user.role,
            stage: RegistrationStage::Registered,
            devpost_username: None,
            devpost_verified: false,
            profile: Profile::default(),
            created_at: now,
            updated_at: now,
        };
        t.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_by_identity(&self, identity_ref: &str) -> RepoResult<Option<User>> {
        let t = self.tables.lock().await;
        Ok(t.users
            .values()
            .find(|u| u.identity_ref == identity_ref)
            .cloned())
    }

    async fn list(&self, filter: UserFilter) -> RepoResult<Vec<User>> {
        let t = self.tables.lock().await;
        Ok(t.users
            .values()
            .filter(|u| filter.stage.map_or(true, |s| u.stage == s))
            .filter(|u| {
                filter
                    .looking_for_team
                    .map_or(true, |l| u.profile.looking_for_team == l)
            })
            .cloned()
            .collect())
    }

    async fn update_profile(&self, id: i64, name: &str, profile: &Profile) -> RepoResult<User> {
        let mut t = self.tables.lock().await;
        let stored = t.user_mut(id)?;
        stored.name = name.to_string();
        stored.profile = profile.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn save_registration(
        &self,
        id: i64,
        name: &str,
        profile: &Profile,
        devpost_username: &str,
    ) -> RepoResult<User> {
        let mut t = self.tables.lock().await;
        let stored = t.user_mut(id)?;
        stored.name = name.to_string();
        stored.profile = profile.clone();
        stored.devpost_username = Some(devpost_username.to_string());
        if stored.stage == RegistrationStage::Registered {
            stored.stage = RegistrationStage::DevpostSubmitted;
        }
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn transition_stage(
        &self,
        id: i64,
        from: RegistrationStage,
        to: RegistrationStage,
    ) -> RepoResult<User> {
        let mut t = self.tables.lock().await;
        let stored = t.user_mut(id)?;
        if stored.stage != from {
            return Err(RepoError::conflict(STAGE_CHANGED));
        }
        stored.stage = to;
        stored.devpost_verified |= to == RegistrationStage::DevpostConfirmed;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn set_role(&self, id: i64, role: Role) -> RepoResult<User> {
        let mut t = self.tables.lock().await;
        let stored = t.user_mut(id)?;
        stored.role = role;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn create_with_leader(&self, draft: TeamDraft, leader_id: i64) -> RepoResult<Team> {
        let mut t = self.tables.lock().await;
        if t.team_of(leader_id).is_some() {
            return Err(RepoError::conflict(ALREADY_IN_TEAM));
        }

        let now = Utc::now();
        let id = t.team_ids.next();
        let team = Team::from_persistence(
            id,
            draft.name,
            draft.description,
            draft.project_idea,
            draft.max_members,
            leader_id,
            now,
            now,
        );
        t.teams.insert(id, team.clone());
        t.members.push(TeamMember {
            team_id: id,
            user_id: leader_id,
            role: TeamRole::Leader,
            joined_at: now,
        });
        Ok(team)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Team>> {
        Ok(self.tables.lock().await.teams.get(&id).cloned())
    }

    async fn find_by_member(&self, user_id: i64) -> RepoResult<Option<Team>> {
        let t = self.tables.lock().await;
        Ok(t.team_of(user_id).and_then(|id| t.teams.get(&id).cloned()))
    }

    async fn list(&self) -> RepoResult<Vec<TeamSummary>> {
        let t = self.tables.lock().await;
        let mut summaries: Vec<TeamSummary> = t
            .teams
            .values()
            .map(|team| TeamSummary {
                team: team.clone(),
                member_count: t.member_count(team.id()),
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.team
                .created_at()
                .cmp(&a.team.created_at())
                .then(b.team.id().cmp(&a.team.id()))
        });
        Ok(summaries)
    }

    async fn members(&self, team_id: i64) -> RepoResult<Vec<TeamMember>> {
        let t = self.tables.lock().await;
        let mut members: Vec<TeamMember> = t
            .members
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| (!m.is_leader(), m.joined_at));
        Ok(members)
    }

    async fn update(&self, team: &Team) -> RepoResult<Team> {
        let mut t = self.tables.lock().await;
        let stored = t
            .teams
            .get_mut(&team.id())
            .ok_or_else(|| RepoError::not_found(format!("Team not found: {}", team.id())))?;
        *stored = team.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut t = self.tables.lock().await;
        if t.teams.remove(&id).is_none() {
            return Ok(false);
        }
        t.members.retain(|m| m.team_id != id);
        t.invitations.retain(|_, inv| inv.team_id != id);
        t.submissions.remove(&id);
        Ok(true)
    }

    async fn remove_member(&self, team_id: i64, user_id: i64) -> RepoResult<bool> {
        let mut t = self.tables.lock().await;
        let before = t.members.len();
        t.members
            .retain(|m| !(m.team_id == team_id && m.user_id == user_id));
        Ok(t.members.len() < before)
    }

    async fn create_invitation(
        &self,
        team_id: i64,
        inviter_id: i64,
        invitee_id: i64,
    ) -> RepoResult<TeamInvitation> {
        let mut t = self.tables.lock().await;
        let duplicate = t.invitations.values().any(|inv| {
            inv.team_id == team_id
                && inv.invitee_id == invitee_id
                && inv.status == RequestStatus::Pending
        });
        if duplicate {
            return Err(RepoError::conflict(
                "This user already has a pending invitation from your team",
            ));
        }

        let id = t.invitation_ids.next();
        let invitation = TeamInvitation {
            id,
            team_id,
            inviter_id,
            invitee_id,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        t.invitations.insert(id, invitation.clone());
        Ok(invitation)
    }

    async fn find_invitation(&self, id: i64) -> RepoResult<Option<TeamInvitation>> {
        Ok(self.tables.lock().await.invitations.get(&id).cloned())
    }

    async fn find_pending_invitation(
        &self,
        team_id: i64,
        invitee_id: i64,
    ) -> RepoResult<Option<TeamInvitation>> {
        let t = self.tables.lock().await;
        Ok(t.invitations
            .values()
            .find(|inv| {
                inv.team_id == team_id
                    && inv.invitee_id == invitee_id
                    && inv.status == RequestStatus::Pending
            })
            .cloned())
    }

    async fn pending_invitations_for(&self, invitee_id: i64) -> RepoResult<Vec<TeamInvitation>> {
        let t = self.tables.lock().await;
        Ok(t.invitations
            .values()
            .rev()
            .filter(|inv| inv.invitee_id == invitee_id && inv.status == RequestStatus::Pending)
            .cloned()
            .collect())
    }

    async fn accept_invitation(&self, id: i64) -> RepoResult<TeamInvitation> {
        let mut t = self.tables.lock().await;
        let mut invitation = t
            .invitations
            .get(&id)
            .cloned()
            .ok_or_else(|| RepoError::not_found(format!("Invitation not found: {}", id)))?;
        invitation
            .respond(Decision::Accept)
            .map_err(|e| RepoError::conflict(e.to_string()))?;

        let team = t
            .teams
            .get(&invitation.team_id)
            .ok_or_else(|| RepoError::not_found(format!("Team not found: {}", invitation.team_id)))?;
        if team.is_full(t.member_count(invitation.team_id)) {
            return Err(RepoError::conflict("Team is full"));
        }
        if t.team_of(invitation.invitee_id).is_some() {
            return Err(RepoError::conflict(ALREADY_IN_TEAM));
        }

        t.members.push(TeamMember {
            team_id: invitation.team_id,
            user_id: invitation.invitee_id,
            role: TeamRole::Member,
            joined_at: Utc::now(),
        });
        t.invitations.insert(id, invitation.clone());
        Ok(invitation)
    }

    async fn decline_invitation(&self, id: i64) -> RepoResult<TeamInvitation> {
        let mut t = self.tables.lock().await;
        let invitation = t
            .invitations
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(format!("Invitation not found: {}", id)))?;
        invitation
            .respond(Decision::Decline)
            .map_err(|e| RepoError::conflict(e.to_string()))?;
        Ok(invitation.clone())
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryStore {
    async fn create(
        &self,
        sender_id: i64,
        receiver_id: i64,
        message: Option<String>,
    ) -> RepoResult<ConnectionRequest> {
        let mut t = self.tables.lock().await;
        let blocked = t
            .connections
            .values()
            .filter(|r| r.involves(sender_id, receiver_id))
            .find_map(ConnectionRequest::blocks_new_request);
        if let Some(message) = blocked {
            return Err(RepoError::conflict(message));
        }

        let id = t.connection_ids.next();
        let request = ConnectionRequest {
            id,
            sender_id,
            receiver_id,
            message,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        t.connections.insert(id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ConnectionRequest>> {
        Ok(self.tables.lock().await.connections.get(&id).cloned())
    }

    async fn list_incoming(
        &self,
        receiver_id: i64,
        status: Option<RequestStatus>,
    ) -> RepoResult<Vec<ConnectionRequest>> {
        let t = self.tables.lock().await;
        Ok(t.connections
            .values()
            .rev()
            .filter(|r| r.receiver_id == receiver_id)
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }

    async fn list_outgoing(
        &self,
        sender_id: i64,
        status: Option<RequestStatus>,
    ) -> RepoResult<Vec<ConnectionRequest>> {
        let t = self.tables.lock().await;
        Ok(t.connections
            .values()
            .rev()
            .filter(|r| r.sender_id == sender_id)
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }

    async fn list_accepted(&self, user_id: i64) -> RepoResult<Vec<ConnectionRequest>> {
        let t = self.tables.lock().await;
        Ok(t.connections
            .values()
            .rev()
            .filter(|r| r.status == RequestStatus::Accepted)
            .filter(|r| r.sender_id == user_id || r.receiver_id == user_id)
            .cloned()
            .collect())
    }

    async fn respond(&self, id: i64, status: RequestStatus) -> RepoResult<ConnectionRequest> {
        let decision = match status {
            RequestStatus::Accepted => Decision::Accept,
            RequestStatus::Declined => Decision::Decline,
            RequestStatus::Pending => {
                return Err(RepoError::conflict("A request cannot be reset to pending"))
            }
        };
        let mut t = self.tables.lock().await;
        let request = t
            .connections
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(format!("Connection request not found: {}", id)))?;
        request
            .respond(decision)
            .map_err(|e| RepoError::conflict(e.to_string()))?;
        Ok(request.clone())
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryStore {
    async fn find_by_team(&self, team_id: i64) -> RepoResult<Option<Submission>> {
        Ok(self.tables.lock().await.submissions.get(&team_id).cloned())
    }

    async fn upsert(
        &self,
        team_id: i64,
        draft: SubmissionDraft,
        submitted_by_id: i64,
    ) -> RepoResult<Submission> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let (id, created_at) = match t.submissions.get(&team_id) {
            Some(existing) => (existing.id, existing.created_at),
            None => (t.submission_ids.next(), now),
        };
        let submission = Submission {
            id,
            team_id,
            project_name: draft.project_name,
            description: draft.description,
            devpost_url: draft.devpost_url,
            repository_url: draft.repository_url,
            demo_url: draft.demo_url,
            submitted_by_id,
            created_at,
            updated_at: now,
        };
        t.submissions.insert(team_id, submission.clone());
        Ok(submission)
    }

    async fn list(&self) -> RepoResult<Vec<Submission>> {
        let t = self.tables.lock().await;
        let mut all: Vec<Submission> = t.submissions.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }
}

/// One content collection held in process memory
pub struct InMemoryContent<T: ContentItem> {
    items: Mutex<(Sequence, Vec<T>)>,
}

impl<T: ContentItem> Default for InMemoryContent<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new((Sequence::default(), Vec::new())),
        }
    }
}

impl<T: ContentItem> InMemoryContent<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T: ContentItem> ContentRepository<T> for InMemoryContent<T> {
    async fn list(&self) -> RepoResult<Vec<T>> {
        let guard = self.items.lock().await;
        let mut items = guard.1.clone();
        items.sort_by(T::listing_order);
        Ok(items)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<T>> {
        let guard = self.items.lock().await;
        Ok(guard.1.iter().find(|item| item.id() == id).cloned())
    }

    async fn create(&self, draft: T::Draft, author_id: i64) -> RepoResult<T> {
        let mut guard = self.items.lock().await;
        let id = guard.0.next();
        let item = T::from_draft(id, draft, author_id, Utc::now());
        guard.1.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: i64, draft: T::Draft) -> RepoResult<Option<T>> {
        let mut guard = self.items.lock().await;
        Ok(guard.1.iter_mut().find(|item| item.id() == id).map(|item| {
            item.apply(draft, Utc::now());
            item.clone()
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut guard = self.items.lock().await;
        let before = guard.1.len();
        guard.1.retain(|item| item.id() != id);
        Ok(guard.1.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::connection::{ALREADY_CONNECTED, PENDING_EXISTS};
    use crate::domain::content::{Resource, ResourceCategory, ResourceDraft};
    use crate::domain::team::TeamInput;
    use crate::domain::user::Email;

    async fn provision(store: &InMemoryStore, name: &str) -> User {
        store
            .provision(NewUser {
                identity_ref: format!("idp|{}", name),
                email: Email::new(format!("{}@example.com", name)).unwrap(),
                name: name.to_string(),
                role: Role::User,
            })
            .await
            .unwrap()
    }

    fn draft(name: &str, max_members: i32) -> TeamDraft {
        TeamDraft::new(TeamInput {
            name: name.to_string(),
            description: None,
            project_idea: None,
            max_members: Some(max_members),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn provision_is_idempotent_per_identity() {
        let store = InMemoryStore::new();
        let first = provision(&store, "ada").await;
        let again = provision(&store, "ada").await;
        let other = provision(&store, "grace").await;

        assert_eq!(first.id, 1);
        assert_eq!(again.id, first.id);
        assert_eq!(other.id, 2);
    }

    #[tokio::test]
    async fn stale_profile_write_keeps_newer_stage() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;
        store
            .save_registration(ada.id, "Ada", &Profile::default(), "ada")
            .await
            .unwrap();

        // Loaded at step 2, saved after the confirmation below
        let mut stale = UserRepository::find_by_id(&store, ada.id).await.unwrap().unwrap();
        let confirmed = store
            .transition_stage(
                ada.id,
                RegistrationStage::DevpostSubmitted,
                RegistrationStage::DevpostConfirmed,
            )
            .await
            .unwrap();
        assert_eq!(confirmed.registration_step(), 3);

        stale.profile.bio = Some("Rustacean".into());
        let saved = store
            .update_profile(ada.id, &stale.name, &stale.profile)
            .await
            .unwrap();

        assert_eq!(saved.registration_step(), 3);
        assert!(saved.devpost_verified);
        assert_eq!(saved.profile.bio.as_deref(), Some("Rustacean"));
    }

    #[tokio::test]
    async fn stale_transition_is_a_conflict() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;
        store
            .transition_stage(ada.id, RegistrationStage::Registered, RegistrationStage::Approved)
            .await
            .unwrap();

        // A revoke racing ahead of a second approval
        store
            .transition_stage(ada.id, RegistrationStage::Approved, RegistrationStage::DevpostConfirmed)
            .await
            .unwrap();
        let err = store
            .transition_stage(ada.id, RegistrationStage::Registered, RegistrationStage::Approved)
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Conflict(_)));
        let stored = UserRepository::find_by_id(&store, ada.id).await.unwrap().unwrap();
        assert_eq!(stored.stage, RegistrationStage::DevpostConfirmed);
    }

    #[tokio::test]
    async fn registration_resubmit_keeps_later_stage() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;
        store.set_role(ada.id, Role::Admin).await.unwrap();
        store
            .transition_stage(ada.id, RegistrationStage::Registered, RegistrationStage::Approved)
            .await
            .unwrap();

        let saved = store
            .save_registration(ada.id, "Ada", &Profile::default(), "ada_l")
            .await
            .unwrap();

        assert_eq!(saved.stage, RegistrationStage::Approved);
        assert_eq!(saved.role, Role::Admin);
        assert_eq!(saved.devpost_username.as_deref(), Some("ada_l"));
    }

    #[tokio::test]
    async fn create_with_leader_adds_membership() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;

        let team = store.create_with_leader(draft("Crabs", 4), ada.id).await.unwrap();
        let members = store.members(team.id()).await.unwrap();

        assert_eq!(members.len(), 1);
        assert!(members[0].is_leader());
        assert!(store.find_by_member(ada.id).await.unwrap().is_some());

        let err = store
            .create_with_leader(draft("Crabs II", 4), ada.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn accepting_twice_adds_one_member() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;
        let grace = provision(&store, "grace").await;
        let team = store.create_with_leader(draft("Crabs", 4), ada.id).await.unwrap();

        let inv = store.create_invitation(team.id(), ada.id, grace.id).await.unwrap();
        store.accept_invitation(inv.id).await.unwrap();
        let second = store.accept_invitation(inv.id).await;

        assert!(matches!(second, Err(RepoError::Conflict(_))));
        assert_eq!(store.members(team.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn full_team_rejects_acceptance() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;
        let grace = provision(&store, "grace").await;
        let linus = provision(&store, "linus").await;
        let team = store.create_with_leader(draft("Pair", 2), ada.id).await.unwrap();

        let a = store.create_invitation(team.id(), ada.id, grace.id).await.unwrap();
        let b = store.create_invitation(team.id(), ada.id, linus.id).await.unwrap();
        store.accept_invitation(a.id).await.unwrap();

        let err = store.accept_invitation(b.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Team is full");
        let still_pending = store.find_invitation(b.id).await.unwrap().unwrap();
        assert_eq!(still_pending.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn deleting_team_removes_dependents() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;
        let grace = provision(&store, "grace").await;
        let team = store.create_with_leader(draft("Crabs", 4), ada.id).await.unwrap();
        store.create_invitation(team.id(), ada.id, grace.id).await.unwrap();

        assert!(store.delete(team.id()).await.unwrap());
        assert!(store.find_by_member(ada.id).await.unwrap().is_none());
        assert!(store.pending_invitations_for(grace.id).await.unwrap().is_empty());
        assert!(!store.delete(team.id()).await.unwrap());
    }

    #[tokio::test]
    async fn one_open_connection_per_pair() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;
        let grace = provision(&store, "grace").await;

        let first = ConnectionRepository::create(&store, ada.id, grace.id, None)
            .await
            .unwrap();
        let reverse = ConnectionRepository::create(&store, grace.id, ada.id, None).await;
        assert_eq!(reverse.unwrap_err().to_string(), PENDING_EXISTS);

        store.respond(first.id, RequestStatus::Accepted).await.unwrap();
        let again = ConnectionRepository::create(&store, ada.id, grace.id, None).await;
        assert_eq!(again.unwrap_err().to_string(), ALREADY_CONNECTED);
        assert_eq!(store.list_accepted(ada.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn declined_connection_can_be_retried() {
        let store = InMemoryStore::new();
        let ada = provision(&store, "ada").await;
        let grace = provision(&store, "grace").await;

        let first = ConnectionRepository::create(&store, ada.id, grace.id, None)
            .await
            .unwrap();
        store.respond(first.id, RequestStatus::Declined).await.unwrap();

        let retry = ConnectionRepository::create(&store, ada.id, grace.id, Some("Again?".into()))
            .await
            .unwrap();
        assert_eq!(retry.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn content_collection_crud() {
        let repo: InMemoryContent<Resource> = InMemoryContent::new();
        let draft = ResourceDraft {
            title: "Rust Book".into(),
            description: None,
            url: "https://doc.rust-lang.org/book/".into(),
            category: ResourceCategory::Documentation,
        };

        let created = repo.create(draft.clone(), 1).await.unwrap();
        assert_eq!(created.uploaded_by_id, 1);

        let renamed = ResourceDraft {
            title: "The Book".into(),
            ..draft
        };
        let updated = repo.update(created.id, renamed.clone()).await.unwrap().unwrap();
        assert_eq!(updated.title, "The Book");
        assert!(repo.update(99, renamed).await.unwrap().is_none());

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
