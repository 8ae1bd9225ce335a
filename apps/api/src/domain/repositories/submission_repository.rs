use async_trait::async_trait;

use crate::domain::repositories::RepoResult;
use crate::domain::submission::{Submission, SubmissionDraft};

/// Repository trait for team project submissions
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn find_by_team(&self, team_id: i64) -> RepoResult<Option<Submission>>;

    /// Insert or replace the team's single submission
    async fn upsert(
        &self,
        team_id: i64,
        draft: SubmissionDraft,
        submitted_by_id: i64,
    ) -> RepoResult<Submission>;

    /// All submissions, most recently updated first
    async fn list(&self) -> RepoResult<Vec<Submission>>;
}
