use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::auth::Action;
use crate::domain::request::{Decision, RequestStatus};
use crate::domain::team::{Team, TeamDraft, TeamInput, TeamInvitation, TeamMember, TeamRole};

/// Team as listed in the directory
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub project_idea: Option<String>,
    pub max_members: i32,
    pub member_count: i64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamResponse {
    fn new(team: &Team, member_count: i64) -> Self {
        Self {
            id: team.id(),
            name: team.name().to_string(),
            description: team.description().map(str::to_string),
            project_idea: team.project_idea().map(str::to_string),
            max_members: team.max_members(),
            member_count,
            created_by: team.created_by(),
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: i64,
    pub name: Option<String>,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

/// Team with its member list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub members: Vec<MemberResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: i64,
    pub team_id: i64,
    pub team_name: Option<String>,
    pub inviter_id: i64,
    pub invitee_id: i64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl InvitationResponse {
    fn new(invitation: TeamInvitation, team_name: Option<String>) -> Self {
        Self {
            id: invitation.id,
            team_id: invitation.team_id,
            team_name,
            inviter_id: invitation.inviter_id,
            invitee_id: invitation.invitee_id,
            status: invitation.status,
            created_at: invitation.created_at,
            responded_at: invitation.responded_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RespondInvitationRequest {
    pub decision: Decision,
}

async fn load_team(state: &AppState, id: i64) -> Result<Team, ApiError> {
    state
        .teams
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Team not found: {}", id)))
}

async fn detail(state: &AppState, team: &Team) -> Result<TeamDetailResponse, ApiError> {
    let members = state.teams.members(team.id()).await?;
    let mut rows = Vec::with_capacity(members.len());
    for member in &members {
        let name = state
            .users
            .find_by_id(member.user_id)
            .await?
            .map(|u| u.name);
        rows.push(MemberResponse {
            user_id: member.user_id,
            name,
            role: member.role,
            joined_at: member.joined_at,
        });
    }

    Ok(TeamDetailResponse {
        team: TeamResponse::new(team, members.len() as i64),
        members: rows,
    })
}

fn is_leader(members: &[TeamMember], user_id: i64) -> bool {
    members.iter().any(|m| m.user_id == user_id && m.is_leader())
}

/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    caller.authorize(Action::ViewTeams)?;

    let teams = state.teams.list().await?;
    let responses = teams
        .iter()
        .map(|s| TeamResponse::new(&s.team, s.member_count))
        .collect();

    Ok(Json(responses))
}

/// Create a team led by the caller
///
/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<TeamInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamDetailResponse>), ApiError> {
    let me = caller.authorize(Action::ManageTeam)?;
    let Json(req) = body?;

    let draft = TeamDraft::new(req)?;
    if state.teams.find_by_member(me.id).await?.is_some() {
        return Err(ApiError::bad_request("You are already in a team"));
    }

    let team = state.teams.create_with_leader(draft, me.id).await?;
    tracing::info!(team_id = team.id(), leader_id = me.id, "team created");

    Ok((StatusCode::CREATED, Json(detail(&state, &team).await?)))
}

/// The caller's team, or `null`
///
/// GET /api/teams/mine
pub async fn my_team(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Option<TeamDetailResponse>>, ApiError> {
    let me = caller.authorize(Action::ViewTeams)?;

    match state.teams.find_by_member(me.id).await? {
        Some(team) => Ok(Json(Some(detail(&state, &team).await?))),
        None => Ok(Json(None)),
    }
}

/// GET /api/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TeamDetailResponse>, ApiError> {
    caller.authorize(Action::ViewTeams)?;
    let Path(id) = path?;

    let team = load_team(&state, id).await?;
    Ok(Json(detail(&state, &team).await?))
}

/// PUT /api/teams/:id
pub async fn update_team(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<TeamInput>, JsonRejection>,
) -> Result<Json<TeamDetailResponse>, ApiError> {
    let me = caller.authorize(Action::ManageTeam)?;
    let Path(id) = path?;
    let Json(req) = body?;

    let mut team = load_team(&state, id).await?;
    let members = state.teams.members(id).await?;
    if !is_leader(&members, me.id) {
        return Err(ApiError::forbidden("Only the team leader can update the team"));
    }

    team.apply(TeamDraft::new(req)?, members.len() as i64)?;
    let saved = state.teams.update(&team).await?;

    Ok(Json(detail(&state, &saved).await?))
}

/// Delete a team; allowed for its leader and for admins
///
/// DELETE /api/teams/:id
pub async fn delete_team(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let me = caller.authorize(Action::ManageTeam)?;
    let Path(id) = path?;

    load_team(&state, id).await?;
    let members = state.teams.members(id).await?;
    if !me.is_admin() && !is_leader(&members, me.id) {
        return Err(ApiError::forbidden("Only the team leader can delete the team"));
    }

    if !state.teams.delete(id).await? {
        return Err(ApiError::not_found(format!("Team not found: {}", id)));
    }
    tracing::info!(team_id = id, deleted_by = me.id, "team deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/teams/leave
pub async fn leave_team(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<StatusCode, ApiError> {
    let me = caller.authorize(Action::ManageTeam)?;

    let team = state
        .teams
        .find_by_member(me.id)
        .await?
        .ok_or_else(|| ApiError::bad_request("You are not in a team"))?;
    let members = state.teams.members(team.id()).await?;
    if is_leader(&members, me.id) {
        return Err(ApiError::bad_request(
            "The team leader cannot leave; delete the team instead",
        ));
    }

    state.teams.remove_member(team.id(), me.id).await?;
    tracing::info!(team_id = team.id(), user_id = me.id, "member left team");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/teams/:id/members/:user_id
pub async fn remove_member(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let me = caller.authorize(Action::ManageTeam)?;
    let Path((id, user_id)) = path?;

    load_team(&state, id).await?;
    let members = state.teams.members(id).await?;
    if !is_leader(&members, me.id) {
        return Err(ApiError::forbidden("Only the team leader can remove members"));
    }
    if user_id == me.id {
        return Err(ApiError::bad_request("The team leader cannot be removed"));
    }

    if !state.teams.remove_member(id, user_id).await? {
        return Err(ApiError::not_found("User is not a member of this team"));
    }
    tracing::info!(team_id = id, user_id, "member removed from team");

    Ok(StatusCode::NO_CONTENT)
}

/// Invite a participant to the caller's team
///
/// POST /api/teams/invitations
pub async fn invite(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<InviteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InvitationResponse>), ApiError> {
    let me = caller.authorize(Action::InviteToTeam)?;
    let Json(req) = body?;

    let team = state
        .teams
        .find_by_member(me.id)
        .await?
        .ok_or_else(|| ApiError::bad_request("You are not in a team"))?;
    let members = state.teams.members(team.id()).await?;
    if !is_leader(&members, me.id) {
        return Err(ApiError::forbidden("Only the team leader can invite members"));
    }
    if req.user_id == me.id {
        return Err(ApiError::bad_request("You cannot invite yourself"));
    }
    if state.users.find_by_id(req.user_id).await?.is_none() {
        return Err(ApiError::not_found(format!("User not found: {}", req.user_id)));
    }
    if state.teams.find_by_member(req.user_id).await?.is_some() {
        return Err(ApiError::bad_request("User is already in a team"));
    }
    if team.is_full(members.len() as i64) {
        return Err(ApiError::bad_request("Team is full"));
    }
    if state
        .teams
        .find_pending_invitation(team.id(), req.user_id)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request(
            "This user already has a pending invitation from your team",
        ));
    }

    let invitation = state
        .teams
        .create_invitation(team.id(), me.id, req.user_id)
        .await?;
    tracing::info!(team_id = team.id(), invitee_id = req.user_id, "invitation sent");

    Ok((
        StatusCode::CREATED,
        Json(InvitationResponse::new(invitation, Some(team.name().to_string()))),
    ))
}

/// Pending invitations addressed to the caller
///
/// GET /api/teams/invitations
pub async fn my_invitations(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<InvitationResponse>>, ApiError> {
    let me = caller.authorize(Action::RespondInvitation)?;

    let invitations = state.teams.pending_invitations_for(me.id).await?;
    let mut responses = Vec::with_capacity(invitations.len());
    for invitation in invitations {
        let team_name = state
            .teams
            .find_by_id(invitation.team_id)
            .await?
            .map(|t| t.name().to_string());
        responses.push(InvitationResponse::new(invitation, team_name));
    }

    Ok(Json(responses))
}

/// Accept or decline an invitation
///
/// POST /api/teams/invitations/:id/respond
pub async fn respond_invitation(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<RespondInvitationRequest>, JsonRejection>,
) -> Result<Json<InvitationResponse>, ApiError> {
    let me = caller.authorize(Action::RespondInvitation)?;
    let Path(id) = path?;
    let Json(req) = body?;

    let invitation = state
        .teams
        .find_invitation(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Invitation not found: {}", id)))?;
    if invitation.invitee_id != me.id {
        return Err(ApiError::forbidden(
            "Only the invitee can respond to this invitation",
        ));
    }

    let answered = match req.decision {
        Decision::Accept => state.teams.accept_invitation(id).await?,
        Decision::Decline => state.teams.decline_invitation(id).await?,
    };
    tracing::info!(
        invitation_id = id,
        team_id = answered.team_id,
        status = %answered.status,
        "invitation answered"
    );

    let team_name = state
        .teams
        .find_by_id(answered.team_id)
        .await?
        .map(|t| t.name().to_string());
    Ok(Json(InvitationResponse::new(answered, team_name)))
}
