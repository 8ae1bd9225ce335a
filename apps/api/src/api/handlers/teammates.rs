use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::handlers::profile::PublicProfileResponse;
use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::auth::Action;
use crate::domain::repositories::UserFilter;
use crate::domain::user::{ExperienceLevel, RegistrationStage};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeammateQuery {
    pub skill: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
}

/// Approved participants looking for a team, excluding the caller
///
/// GET /api/teammates?skill=&experienceLevel=
pub async fn list_teammates(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<TeammateQuery>, QueryRejection>,
) -> Result<Json<Vec<PublicProfileResponse>>, ApiError> {
    let me = caller.authorize(Action::BrowseTeammates)?;
    let Query(query) = query?;

    let candidates = state
        .users
        .list(UserFilter {
            stage: Some(RegistrationStage::Approved),
            looking_for_team: Some(true),
        })
        .await?;

    let skill = query
        .skill
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let matches = candidates
        .iter()
        .filter(|u| u.id != me.id)
        .filter(|u| {
            skill.map_or(true, |s| {
                u.profile.skills.iter().any(|k| k.eq_ignore_ascii_case(s))
            })
        })
        .filter(|u| {
            query
                .experience_level
                .map_or(true, |level| u.profile.experience_level == Some(level))
        })
        .map(PublicProfileResponse::from)
        .collect();

    Ok(Json(matches))
}
