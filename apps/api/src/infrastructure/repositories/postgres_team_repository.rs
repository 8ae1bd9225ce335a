use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::conflict_on;
use crate::domain::repositories::{RepoError, RepoResult, TeamRepository};
use crate::domain::request::{Decision, RequestStatus};
use crate::domain::team::{
    Team, TeamDraft, TeamInvitation, TeamMember, TeamRole, TeamSummary,
};

const TEAM_COLUMNS: &str =
    "id, name, description, project_idea, max_members, created_by, created_at, updated_at";

const INVITATION_COLUMNS: &str =
    "id, team_id, inviter_id, invitee_id, status, created_at, responded_at";

const ONE_TEAM_PER_USER: &str = "team_members_one_team_per_user";
const ALREADY_IN_TEAM: &str = "You are already in a team";

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    description: Option<String>,
    project_idea: Option<String>,
    max_members: i32,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(r: TeamRow) -> Self {
        Team::from_persistence(
            r.id,
            r.name,
            r.description,
            r.project_idea,
            r.max_members,
            r.created_by,
            r.created_at,
            r.updated_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct TeamSummaryRow {
    id: i64,
    name: String,
    description: Option<String>,
    project_idea: Option<String>,
    max_members: i32,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    member_count: i64,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    team_id: i64,
    user_id: i64,
    role: TeamRole,
    joined_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct InvitationRow {
    id: i64,
    team_id: i64,
    inviter_id: i64,
    invitee_id: i64,
    status: RequestStatus,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl From<InvitationRow> for TeamInvitation {
    fn from(r: InvitationRow) -> Self {
        TeamInvitation {
            id: r.id,
            team_id: r.team_id,
            inviter_id: r.inviter_id,
            invitee_id: r.invitee_id,
            status: r.status,
            created_at: r.created_at,
            responded_at: r.responded_at,
        }
    }
}

/// PostgreSQL implementation of TeamRepository
///
/// Team creation and invitation acceptance each run in a single
/// transaction; the team row is locked while its head count is checked.
#[derive(Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create_with_leader(&self, draft: TeamDraft, leader_id: i64) -> RepoResult<Team> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO teams (name, description, project_idea, max_members, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TEAM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.project_idea)
            .bind(draft.max_members)
            .bind(leader_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(row.id)
            .bind(leader_id)
            .bind(TeamRole::Leader)
            .execute(&mut *tx)
            .await
            .map_err(conflict_on(ONE_TEAM_PER_USER, ALREADY_IN_TEAM))?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Team>> {
        let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1");
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Team::from))
    }

    async fn find_by_member(&self, user_id: i64) -> RepoResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT t.id, t.name, t.description, t.project_idea, t.max_members,
                   t.created_by, t.created_at, t.updated_at
            FROM teams t
            JOIN team_members m ON m.team_id = t.id
            WHERE m.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Team::from))
    }

    async fn list(&self) -> RepoResult<Vec<TeamSummary>> {
        let rows = sqlx::query_as::<_, TeamSummaryRow>(
            r#"
            SELECT t.id, t.name, t.description, t.project_idea, t.max_members,
                   t.created_by, t.created_at, t.updated_at,
                   COUNT(m.user_id) AS member_count
            FROM teams t
            LEFT JOIN team_members m ON m.team_id = t.id
            GROUP BY t.id
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TeamSummary {
                team: Team::from_persistence(
                    r.id,
                    r.name,
                    r.description,
                    r.project_idea,
                    r.max_members,
                    r.created_by,
                    r.created_at,
                    r.updated_at,
                ),
                member_count: r.member_count,
            })
            .collect())
    }

    async fn members(&self, team_id: i64) -> RepoResult<Vec<TeamMember>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT team_id, user_id, role, joined_at
            FROM team_members
            WHERE team_id = $1
            ORDER BY role, joined_at
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TeamMember {
                team_id: r.team_id,
                user_id: r.user_id,
                role: r.role,
                joined_at: r.joined_at,
            })
            .collect())
    }

    async fn update(&self, team: &Team) -> RepoResult<Team> {
        let sql = format!(
            "UPDATE teams
             SET name = $2, description = $3, project_idea = $4, max_members = $5,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {TEAM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(team.id())
            .bind(team.name())
            .bind(team.description())
            .bind(team.project_idea())
            .bind(team.max_members())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepoError::not_found(format!("Team not found: {}", team.id())))?;

        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_member(&self, team_id: i64, user_id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_invitation(
        &self,
        team_id: i64,
        inviter_id: i64,
        invitee_id: i64,
    ) -> RepoResult<TeamInvitation> {
        let sql = format!(
            "INSERT INTO team_invitations (team_id, inviter_id, invitee_id)
             VALUES ($1, $2, $3)
             RETURNING {INVITATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(team_id)
            .bind(inviter_id)
            .bind(invitee_id)
            .fetch_one(&self.pool)
            .await
            .map_err(conflict_on(
                "team_invitations_one_pending",
                "This user already has a pending invitation from your team",
            ))?;

        Ok(row.into())
    }

    async fn find_invitation(&self, id: i64) -> RepoResult<Option<TeamInvitation>> {
        let sql = format!("SELECT {INVITATION_COLUMNS} FROM team_invitations WHERE id = $1");
        let row = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TeamInvitation::from))
    }

    async fn find_pending_invitation(
        &self,
        team_id: i64,
        invitee_id: i64,
    ) -> RepoResult<Option<TeamInvitation>> {
        let sql = format!(
            "SELECT {INVITATION_COLUMNS} FROM team_invitations
             WHERE team_id = $1 AND invitee_id = $2 AND status = 'pending'"
        );
        let row = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(team_id)
            .bind(invitee_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TeamInvitation::from))
    }

    async fn pending_invitations_for(&self, invitee_id: i64) -> RepoResult<Vec<TeamInvitation>> {
        let sql = format!(
            "SELECT {INVITATION_COLUMNS} FROM team_invitations
             WHERE invitee_id = $1 AND status = 'pending'
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(invitee_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TeamInvitation::from).collect())
    }

    async fn accept_invitation(&self, id: i64) -> RepoResult<TeamInvitation> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {INVITATION_COLUMNS} FROM team_invitations WHERE id = $1 FOR UPDATE");
        let mut invitation: TeamInvitation = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RepoError::not_found(format!("Invitation not found: {}", id)))?
            .into();

        invitation
            .respond(Decision::Accept)
            .map_err(|e| RepoError::conflict(e.to_string()))?;

        let (max_members,): (i32,) =
            sqlx::query_as("SELECT max_members FROM teams WHERE id = $1 FOR UPDATE")
                .bind(invitation.team_id)
                .fetch_one(&mut *tx)
                .await?;
        let (member_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                .bind(invitation.team_id)
                .fetch_one(&mut *tx)
                .await?;
        if member_count >= i64::from(max_members) {
            return Err(RepoError::conflict("Team is full"));
        }

        sqlx::query("INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(invitation.team_id)
            .bind(invitation.invitee_id)
            .bind(TeamRole::Member)
            .execute(&mut *tx)
            .await
            .map_err(conflict_on(ONE_TEAM_PER_USER, ALREADY_IN_TEAM))?;

        let sql = format!(
            "UPDATE team_invitations SET status = $2, responded_at = NOW()
             WHERE id = $1
             RETURNING {INVITATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(id)
            .bind(invitation.status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn decline_invitation(&self, id: i64) -> RepoResult<TeamInvitation> {
        let sql = format!(
            "UPDATE team_invitations SET status = 'declined', responded_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {INVITATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => match self.find_invitation(id).await? {
                Some(_) => Err(RepoError::conflict("Invitation has already been answered")),
                None => Err(RepoError::not_found(format!("Invitation not found: {}", id))),
            },
        }
    }
}
