//! Handlers shared by the admin-authored collections
//!
//! Resources, announcements, schedule events and sponsors all expose the
//! same list/get/create/update/delete routes; [`Collection`] ties each item
//! type to its repository and to the actions that guard reads and writes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::api::middleware::{Caller, MaybeCaller};
use crate::api::state::AppState;
use crate::auth::Action;
use crate::domain::content::{Announcement, ContentItem, Resource, ScheduleEvent, Sponsor};
use crate::domain::repositories::ContentRepository;

pub trait Collection: ContentItem {
    /// Guard for list/get; `None` means anyone may read
    const READ: Option<Action>;
    const WRITE: Action;

    fn repository(state: &AppState) -> &Arc<dyn ContentRepository<Self>>;
}

impl Collection for Resource {
    const READ: Option<Action> = Some(Action::ViewResources);
    const WRITE: Action = Action::ManageResources;

    fn repository(state: &AppState) -> &Arc<dyn ContentRepository<Self>> {
        &state.resources
    }
}

impl Collection for Announcement {
    const READ: Option<Action> = Some(Action::ViewAnnouncements);
    const WRITE: Action = Action::ManageAnnouncements;

    fn repository(state: &AppState) -> &Arc<dyn ContentRepository<Self>> {
        &state.announcements
    }
}

impl Collection for ScheduleEvent {
    const READ: Option<Action> = None;
    const WRITE: Action = Action::ManageSchedule;

    fn repository(state: &AppState) -> &Arc<dyn ContentRepository<Self>> {
        &state.schedule
    }
}

impl Collection for Sponsor {
    const READ: Option<Action> = None;
    const WRITE: Action = Action::ManageSponsors;

    fn repository(state: &AppState) -> &Arc<dyn ContentRepository<Self>> {
        &state.sponsors
    }
}

fn check_read<T: Collection>(caller: Option<&Caller>) -> Result<(), ApiError> {
    match T::READ {
        None => Ok(()),
        Some(action) => {
            let caller = caller.ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
            caller.authorize(action).map(|_| ())
        }
    }
}

fn not_found<T: Collection>(id: i64) -> ApiError {
    ApiError::not_found(format!("{} not found: {}", T::KIND, id))
}

/// GET /api/{collection}
pub async fn list<T: Collection>(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
) -> Result<Json<Vec<T>>, ApiError> {
    check_read::<T>(caller.as_ref())?;
    Ok(Json(T::repository(&state).list().await?))
}

/// GET /api/{collection}/:id
pub async fn get<T: Collection>(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<T>, ApiError> {
    check_read::<T>(caller.as_ref())?;
    let Path(id) = path?;
    let item = T::repository(&state)
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    Ok(Json(item))
}

/// POST /api/{collection}
pub async fn create<T: Collection>(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<T::Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let admin = caller.authorize(T::WRITE)?;
    let Json(draft) = body?;

    let draft = T::validate(draft)?;
    let item = T::repository(&state).create(draft, admin.id).await?;
    tracing::info!(kind = T::KIND, id = item.id(), author_id = admin.id, "content created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/{collection}/:id
pub async fn update<T: Collection>(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<T::Draft>, JsonRejection>,
) -> Result<Json<T>, ApiError> {
    let admin = caller.authorize(T::WRITE)?;
    let Path(id) = path?;
    let Json(draft) = body?;

    let draft = T::validate(draft)?;
    let item = T::repository(&state)
        .update(id, draft)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    tracing::info!(kind = T::KIND, id, editor_id = admin.id, "content updated");

    Ok(Json(item))
}

/// DELETE /api/{collection}/:id
pub async fn delete<T: Collection>(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let admin = caller.authorize(T::WRITE)?;
    let Path(id) = path?;

    if !T::repository(&state).delete(id).await? {
        return Err(not_found::<T>(id));
    }
    tracing::info!(kind = T::KIND, id, deleted_by = admin.id, "content deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Announcements flagged public, readable without signing in
///
/// GET /api/announcements/public
pub async fn list_public_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>, ApiError> {
    let all = state.announcements.list().await?;
    Ok(Json(all.into_iter().filter(|a| a.is_public).collect()))
}
