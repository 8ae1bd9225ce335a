use axum::Json;
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::middleware::{Caller, MaybeCaller};
use crate::domain::user::{Role, User};

/// Identity summary returned by `GET /api/auth/me`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub portal_access_granted: bool,
    pub registration_step: i16,
}

impl From<&User> for MeResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            name: user.name.clone(),
            role: user.role,
            portal_access_granted: user.has_portal_access(),
            registration_step: user.registration_step(),
        }
    }
}

/// Current caller, or `null` without a valid token
///
/// GET /api/auth/me
pub async fn me(
    MaybeCaller(caller): MaybeCaller,
) -> Result<Json<Option<MeResponse>>, ApiError> {
    Ok(Json(caller.map(|Caller(user)| MeResponse::from(&user))))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
