// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod memory;
pub mod postgres_connection_repository;
pub mod postgres_content_repository;
pub mod postgres_submission_repository;
pub mod postgres_team_repository;
pub mod postgres_user_repository;

pub use memory::{InMemoryContent, InMemoryStore};
pub use postgres_connection_repository::PostgresConnectionRepository;
pub use postgres_content_repository::PostgresContentRepository;
pub use postgres_submission_repository::PostgresSubmissionRepository;
pub use postgres_team_repository::PostgresTeamRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepoError;

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        RepoError::Storage(e.to_string())
    }
}

/// Maps a violation of the named constraint to `Conflict(message)`
pub(crate) fn conflict_on(constraint: &str, message: &str) -> impl FnOnce(sqlx::Error) -> RepoError {
    let constraint = constraint.to_string();
    let message = message.to_string();
    move |e| {
        let violated = e
            .as_database_error()
            .and_then(|db| db.constraint())
            .is_some_and(|c| c == constraint);
        if violated {
            RepoError::Conflict(message)
        } else {
            RepoError::from(e)
        }
    }
}
