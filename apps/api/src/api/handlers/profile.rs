use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::auth::Action;
use crate::domain::user::{ExperienceLevel, ProfileUpdate, Role, User};

/// Full record of a participant, shown to the participant and to admins
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub registration_step: i16,
    pub portal_access_granted: bool,
    pub devpost_username: Option<String>,
    pub devpost_verified: bool,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub looking_for_team: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let p = &user.profile;
        Self {
            id: user.id,
            email: user.email.to_string(),
            name: user.name.clone(),
            role: user.role,
            registration_step: user.registration_step(),
            portal_access_granted: user.has_portal_access(),
            devpost_username: user.devpost_username.clone(),
            devpost_verified: user.devpost_verified,
            bio: p.bio.clone(),
            skills: p.skills.clone(),
            interests: p.interests.clone(),
            experience_level: p.experience_level,
            github_url: p.github_url.clone(),
            linkedin_url: p.linkedin_url.clone(),
            portfolio_url: p.portfolio_url.clone(),
            looking_for_team: p.looking_for_team,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// What other participants see; no email or registration state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub id: i64,
    pub name: String,
    pub devpost_username: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub looking_for_team: bool,
}

impl From<&User> for PublicProfileResponse {
    fn from(user: &User) -> Self {
        let p = &user.profile;
        Self {
            id: user.id,
            name: user.name.clone(),
            devpost_username: user.devpost_username.clone(),
            bio: p.bio.clone(),
            skills: p.skills.clone(),
            interests: p.interests.clone(),
            experience_level: p.experience_level,
            github_url: p.github_url.clone(),
            linkedin_url: p.linkedin_url.clone(),
            portfolio_url: p.portfolio_url.clone(),
            looking_for_team: p.looking_for_team,
        }
    }
}

/// GET /api/profile
pub async fn get_profile(caller: Caller) -> Result<Json<UserResponse>, ApiError> {
    let user = caller.authorize(Action::ViewOwnProfile)?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    caller.authorize(Action::UpdateOwnProfile)?;
    let Json(req) = body?;
    let mut user = caller.into_user();

    user.apply_profile(req)?;
    let saved = state
        .users
        .update_profile(user.id, &user.name, &user.profile)
        .await?;

    Ok(Json(UserResponse::from(&saved)))
}

/// GET /api/profile/:id
pub async fn get_profile_by_id(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<PublicProfileResponse>, ApiError> {
    caller.authorize(Action::ViewProfile)?;
    let Path(id) = path?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", id)))?;

    Ok(Json(PublicProfileResponse::from(&user)))
}
