use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::conflict_on;
use crate::domain::connection::{ConnectionRequest, PENDING_EXISTS};
use crate::domain::repositories::{ConnectionRepository, RepoError, RepoResult};
use crate::domain::request::RequestStatus;

const REQUEST_COLUMNS: &str =
    "id, sender_id, receiver_id, message, status, created_at, responded_at";

#[derive(sqlx::FromRow)]
struct RequestRow {
    id: i64,
    sender_id: i64,
    receiver_id: i64,
    message: Option<String>,
    status: RequestStatus,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl From<RequestRow> for ConnectionRequest {
    fn from(r: RequestRow) -> Self {
        ConnectionRequest {
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

/// PostgreSQL implementation of ConnectionRepository
#[derive(Clone)]
pub struct PostgresConnectionRepository {
    pool: PgPool,
}

impl PostgresConnectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        condition: &str,
        user_id: i64,
        status: Option<RequestStatus>,
    ) -> RepoResult<Vec<ConnectionRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM connection_requests
             WHERE {condition} AND ($2::request_status IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, RequestRow>(&sql)
            .bind(user_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ConnectionRequest::from).collect())
    }
}

#[async_trait]
impl ConnectionRepository for PostgresConnectionRepository {
    async fn create(
        &self,
        sender_id: i64,
        receiver_id: i64,
        message: Option<String>,
    ) -> RepoResult<ConnectionRequest> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM connection_requests
             WHERE status IN ('pending', 'accepted')
               AND ((sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1))
             LIMIT 1"
        );
        let open = sqlx::query_as::<_, RequestRow>(&sql)
            .bind(sender_id)
            .bind(receiver_id)
            .fetch_optional(&self.pool)
            .await?
            .map(ConnectionRequest::from);
        if let Some(message) = open.as_ref().and_then(ConnectionRequest::blocks_new_request) {
            return Err(RepoError::conflict(message));
        }

        // The pair index catches a concurrent send that passed the check above
        let sql = format!(
            "INSERT INTO connection_requests (sender_id, receiver_id, message)
             VALUES ($1, $2, $3)
             RETURNING {REQUEST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RequestRow>(&sql)
            .bind(sender_id)
            .bind(receiver_id)
            .bind(message)
            .fetch_one(&self.pool)
            .await
            .map_err(conflict_on("connection_requests_one_open_per_pair", PENDING_EXISTS))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ConnectionRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM connection_requests WHERE id = $1");
        let row = sqlx::query_as::<_, RequestRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ConnectionRequest::from))
    }

    async fn list_incoming(
        &self,
        receiver_id: i64,
        status: Option<RequestStatus>,
    ) -> RepoResult<Vec<ConnectionRequest>> {
        self.fetch_where("receiver_id = $1", receiver_id, status).await
    }

    async fn list_outgoing(
        &self,
        sender_id: i64,
        status: Option<RequestStatus>,
    ) -> RepoResult<Vec<ConnectionRequest>> {
        self.fetch_where("sender_id = $1", sender_id, status).await
    }

    async fn list_accepted(&self, user_id: i64) -> RepoResult<Vec<ConnectionRequest>> {
        self.fetch_where(
            "(sender_id = $1 OR receiver_id = $1)",
            user_id,
            Some(RequestStatus::Accepted),
        )
        .await
    }

    async fn respond(&self, id: i64, status: RequestStatus) -> RepoResult<ConnectionRequest> {
        let sql = format!(
            "UPDATE connection_requests SET status = $2, responded_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {REQUEST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RequestRow>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::conflict("Request has already been answered")),
                None => Err(RepoError::not_found(format!("Connection request not found: {}", id))),
            },
        }
    }
}
