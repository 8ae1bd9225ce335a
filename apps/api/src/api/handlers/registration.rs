use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::handlers::profile::UserResponse;
use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::auth::Action;
use crate::domain::user::{DevpostUsername, ProfileUpdate, RegistrationStage, User};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatusResponse {
    pub stage: RegistrationStage,
    pub registration_step: i16,
    pub portal_access_granted: bool,
    pub devpost_username: Option<String>,
    pub devpost_verified: bool,
    pub next_action: &'static str,
}

impl From<&User> for RegistrationStatusResponse {
    fn from(user: &User) -> Self {
        Self {
            stage: user.stage,
            registration_step: user.registration_step(),
            portal_access_granted: user.has_portal_access(),
            devpost_username: user.devpost_username.clone(),
            devpost_verified: user.devpost_verified,
            next_action: user.stage.next_action(),
        }
    }
}

/// Request body for step 1 -> 2
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRegistrationRequest {
    pub devpost_username: String,
    #[serde(flatten)]
    pub profile: ProfileUpdate,
}

/// GET /api/registration
pub async fn status(caller: Caller) -> Result<Json<RegistrationStatusResponse>, ApiError> {
    let user = caller.authorize(Action::ViewRegistration)?;
    Ok(Json(RegistrationStatusResponse::from(user)))
}

/// Submit the Devpost username and profile
///
/// POST /api/registration/complete
pub async fn complete(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<CompleteRegistrationRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    caller.authorize(Action::CompleteRegistration)?;
    let Json(req) = body?;
    let mut user = caller.into_user();

    let username = DevpostUsername::new(req.devpost_username)?;
    user.complete_registration(username.clone(), req.profile)?;
    let saved = state
        .users
        .save_registration(user.id, &user.name, &user.profile, username.as_str())
        .await?;

    tracing::info!(user_id = saved.id, step = saved.registration_step(), "registration completed");
    Ok(Json(UserResponse::from(&saved)))
}

/// Self-confirmation of the Devpost registration
///
/// POST /api/registration/confirm-devpost
pub async fn confirm_devpost(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<RegistrationStatusResponse>, ApiError> {
    caller.authorize(Action::ConfirmDevpost)?;
    let mut user = caller.into_user();

    let from = user.stage;
    if !user.confirm_devpost()? {
        return Ok(Json(RegistrationStatusResponse::from(&user)));
    }
    let saved = state
        .users
        .transition_stage(user.id, from, user.stage)
        .await?;

    tracing::info!(user_id = saved.id, "devpost registration confirmed");
    Ok(Json(RegistrationStatusResponse::from(&saved)))
}
