use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::handlers::profile::PublicProfileResponse;
use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::auth::Action;
use crate::domain::connection::ConnectionRequest;
use crate::domain::request::{Decision, RequestStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConnectionRequest {
    pub receiver_id: i64,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub decision: Decision,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionResponse {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<ConnectionRequest> for ConnectionResponse {
    fn from(r: ConnectionRequest) -> Self {
        Self {
            id: r.id,
            sender_id: r.sender_id,
            receiver_id: r.receiver_id,
            message: r.message,
            status: r.status,
            created_at: r.created_at,
            responded_at: r.responded_at,
        }
    }
}

/// POST /api/connections
pub async fn send(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<SendConnectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ConnectionResponse>), ApiError> {
    let me = caller.authorize(Action::SendConnection)?;
    let Json(req) = body?;

    let message = ConnectionRequest::validate_new(me.id, req.receiver_id, req.message)?;
    if state.users.find_by_id(req.receiver_id).await?.is_none() {
        return Err(ApiError::not_found(format!("User not found: {}", req.receiver_id)));
    }
    let created = state
        .connections
        .create(me.id, req.receiver_id, message)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Accepted connections, as the other participant's profile
///
/// GET /api/connections
pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<PublicProfileResponse>>, ApiError> {
    let me = caller.authorize(Action::ViewConnections)?;

    let accepted = state.connections.list_accepted(me.id).await?;
    let mut peers = Vec::with_capacity(accepted.len());
    for request in &accepted {
        if let Some(peer) = state.users.find_by_id(request.peer_of(me.id)).await? {
            peers.push(PublicProfileResponse::from(&peer));
        }
    }

    Ok(Json(peers))
}

/// GET /api/connections/incoming?status=
pub async fn incoming(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<Vec<ConnectionResponse>>, ApiError> {
    let me = caller.authorize(Action::ViewConnections)?;
    let Query(query) = query?;
    let requests = state.connections.list_incoming(me.id, query.status).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// GET /api/connections/outgoing?status=
pub async fn outgoing(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<Vec<ConnectionResponse>>, ApiError> {
    let me = caller.authorize(Action::ViewConnections)?;
    let Query(query) = query?;
    let requests = state.connections.list_outgoing(me.id, query.status).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// POST /api/connections/:id/respond
pub async fn respond(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<RespondRequest>, JsonRejection>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let me = caller.authorize(Action::RespondConnection)?;
    let Path(id) = path?;
    let Json(req) = body?;

    let request = state
        .connections
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Connection request not found: {}", id)))?;
    if request.receiver_id != me.id {
        return Err(ApiError::forbidden(
            "Only the recipient can respond to this request",
        ));
    }

    let updated = state.connections.respond(id, req.decision.status()).await?;
    Ok(Json(updated.into()))
}
