use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::auth::Action;
use crate::domain::submission::{Submission, SubmissionDraft};

/// The submission of the caller's team, or `null`
///
/// GET /api/submissions/mine
pub async fn my_submission(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Option<Submission>>, ApiError> {
    let me = caller.authorize(Action::ViewOwnSubmission)?;

    let Some(team) = state.teams.find_by_member(me.id).await? else {
        return Ok(Json(None));
    };
    Ok(Json(state.submissions.find_by_team(team.id()).await?))
}

/// Create or replace the team's submission; any member may submit
///
/// PUT /api/submissions/mine
pub async fn upsert_submission(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<SubmissionDraft>, JsonRejection>,
) -> Result<Json<Submission>, ApiError> {
    let me = caller.authorize(Action::SubmitProject)?;
    let Json(draft) = body?;

    let team = state
        .teams
        .find_by_member(me.id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Join a team before submitting a project"))?;

    let submission = state
        .submissions
        .upsert(team.id(), draft.validate()?, me.id)
        .await?;
    tracing::info!(team_id = team.id(), submitted_by = me.id, "project submitted");

    Ok(Json(submission))
}

/// GET /api/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Submission>>, ApiError> {
    caller.authorize(Action::ViewSubmissions)?;
    Ok(Json(state.submissions.list().await?))
}
