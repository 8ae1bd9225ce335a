// Repository contracts (ports)
// Implemented by the Postgres and in-memory adapters in infrastructure

pub mod connection_repository;
pub mod content_repository;
pub mod submission_repository;
pub mod team_repository;
pub mod user_repository;

use thiserror::Error;

pub use connection_repository::ConnectionRepository;
pub use content_repository::ContentRepository;
pub use submission_repository::SubmissionRepository;
pub use team_repository::TeamRepository;
pub use user_repository::{UserFilter, UserRepository, STAGE_CHANGED};

/// Failure reported by a repository
#[derive(Debug, Error)]
pub enum RepoError {
    /// A uniqueness or state rule enforced by the store was violated
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// The store itself failed; details are logged, not shown to callers
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepoError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
