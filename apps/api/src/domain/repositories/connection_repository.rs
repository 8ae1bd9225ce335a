use async_trait::async_trait;

use crate::domain::connection::ConnectionRequest;
use crate::domain::repositories::RepoResult;
use crate::domain::request::RequestStatus;

/// Repository trait for connection requests between participants
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Records a pending request
    ///
    /// Fails with `Conflict` while the pair already has a pending or
    /// accepted request in either direction.
    async fn create(
        &self,
        sender_id: i64,
        receiver_id: i64,
        message: Option<String>,
    ) -> RepoResult<ConnectionRequest>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ConnectionRequest>>;

    async fn list_incoming(
        &self,
        receiver_id: i64,
        status: Option<RequestStatus>,
    ) -> RepoResult<Vec<ConnectionRequest>>;

    async fn list_outgoing(
        &self,
        sender_id: i64,
        status: Option<RequestStatus>,
    ) -> RepoResult<Vec<ConnectionRequest>>;

    /// Accepted requests where the user is on either side
    async fn list_accepted(&self, user_id: i64) -> RepoResult<Vec<ConnectionRequest>>;

    /// Resolve a pending request; `Conflict` if it was already answered
    async fn respond(&self, id: i64, status: RequestStatus) -> RepoResult<ConnectionRequest>;
}
