use async_trait::async_trait;

use crate::domain::content::ContentItem;
use crate::domain::repositories::RepoResult;

/// Repository trait shared by the admin-authored content collections
#[async_trait]
pub trait ContentRepository<T: ContentItem>: Send + Sync {
    /// All records in listing order
    async fn list(&self) -> RepoResult<Vec<T>>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<T>>;

    async fn create(&self, draft: T::Draft, author_id: i64) -> RepoResult<T>;

    /// Returns `None` if no record has this id
    async fn update(&self, id: i64, draft: T::Draft) -> RepoResult<Option<T>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}
