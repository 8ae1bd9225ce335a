use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::handlers::profile::UserResponse;
use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::auth::Action;
use crate::domain::repositories::UserFilter;
use crate::domain::user::{RegistrationStage, Role, User};

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub stage: Option<RegistrationStage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
    pub user_id: i64,
    pub role: Role,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    pub registered: usize,
    pub devpost_submitted: usize,
    pub devpost_confirmed: usize,
    pub approved: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: usize,
    pub admins: usize,
    pub by_stage: StageCounts,
    pub teams: usize,
    pub submissions: usize,
}

async fn load_user(state: &AppState, id: i64) -> Result<User, ApiError> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", id)))
}

/// GET /api/admin/users?stage=
pub async fn list_users(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<UsersQuery>, QueryRejection>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    caller.authorize(Action::ViewUsers)?;
    let Query(query) = query?;

    let users = state
        .users
        .list(UserFilter {
            stage: query.stage,
            ..Default::default()
        })
        .await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Participants who confirmed Devpost and wait for approval
///
/// GET /api/admin/pending
pub async fn pending_approvals(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    caller.authorize(Action::ViewUsers)?;

    let users = state
        .users
        .list(UserFilter {
            stage: Some(RegistrationStage::DevpostConfirmed),
            ..Default::default()
        })
        .await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Grant portal access
///
/// POST /api/admin/approve
pub async fn approve(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<UserIdRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let admin = caller.authorize(Action::ApproveAccess)?;
    let Json(req) = body?;

    let mut user = load_user(&state, req.user_id).await?;
    let from = user.stage;
    if !user.approve()? {
        return Ok(Json(UserResponse::from(&user)));
    }
    let saved = state
        .users
        .transition_stage(user.id, from, user.stage)
        .await?;
    tracing::info!(user_id = saved.id, approved_by = admin.id, "portal access granted");

    Ok(Json(UserResponse::from(&saved)))
}

/// POST /api/admin/revoke
pub async fn revoke(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<UserIdRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let admin = caller.authorize(Action::RevokeAccess)?;
    let Json(req) = body?;

    let mut user = load_user(&state, req.user_id).await?;
    let from = user.stage;
    user.revoke()?;
    let saved = state
        .users
        .transition_stage(user.id, from, user.stage)
        .await?;
    tracing::info!(user_id = saved.id, revoked_by = admin.id, "portal access revoked");

    Ok(Json(UserResponse::from(&saved)))
}

/// POST /api/admin/role
pub async fn set_role(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<SetRoleRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let admin = caller.authorize(Action::SetRole)?;
    let Json(req) = body?;
    if req.user_id == admin.id {
        return Err(ApiError::bad_request("You cannot change your own role"));
    }

    let saved = state.users.set_role(req.user_id, req.role).await?;
    tracing::info!(user_id = saved.id, role = %saved.role, changed_by = admin.id, "role changed");

    Ok(Json(UserResponse::from(&saved)))
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<StatsResponse>, ApiError> {
    caller.authorize(Action::ViewStats)?;

    let users = state.users.list(UserFilter::default()).await?;
    let mut by_stage = StageCounts::default();
    for user in &users {
        match user.stage {
            RegistrationStage::Registered => by_stage.registered += 1,
            RegistrationStage::DevpostSubmitted => by_stage.devpost_submitted += 1,
            RegistrationStage::DevpostConfirmed => by_stage.devpost_confirmed += 1,
            RegistrationStage::Approved => by_stage.approved += 1,
        }
    }

    Ok(Json(StatsResponse {
        total_users: users.len(),
        admins: users.iter().filter(|u| u.is_admin()).count(),
        by_stage,
        teams: state.teams.list().await?.len(),
        submissions: state.submissions.list().await?.len(),
    }))
}
