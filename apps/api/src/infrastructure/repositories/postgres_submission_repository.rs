use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::repositories::{RepoResult, SubmissionRepository};
use crate::domain::submission::{Submission, SubmissionDraft};

const SUBMISSION_COLUMNS: &str = "id, team_id, project_name, description, devpost_url, \
     repository_url, demo_url, submitted_by_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: i64,
    team_id: i64,
    project_name: String,
    description: Option<String>,
    devpost_url: String,
    repository_url: Option<String>,
    demo_url: Option<String>,
    submitted_by_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(r: SubmissionRow) -> Self {
        Submission {
            id: r.id,
            team_id: r.team_id,
            project_name: r.project_name,
            description: r.description,
            devpost_url: r.devpost_url,
            repository_url: r.repository_url,
            demo_url: r.demo_url,
            submitted_by_id: r.submitted_by_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL implementation of SubmissionRepository
#[derive(Clone)]
pub struct PostgresSubmissionRepository {
    pool: PgPool,
}

impl PostgresSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for PostgresSubmissionRepository {
    async fn find_by_team(&self, team_id: i64) -> RepoResult<Option<Submission>> {
        let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE team_id = $1");
        let row = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Submission::from))
    }

    async fn upsert(
        &self,
        team_id: i64,
        draft: SubmissionDraft,
        submitted_by_id: i64,
    ) -> RepoResult<Submission> {
        let sql = format!(
            "INSERT INTO submissions
                (team_id, project_name, description, devpost_url, repository_url, demo_url,
                 submitted_by_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (team_id) DO UPDATE SET
                project_name = EXCLUDED.project_name,
                description = EXCLUDED.description,
                devpost_url = EXCLUDED.devpost_url,
                repository_url = EXCLUDED.repository_url,
                demo_url = EXCLUDED.demo_url,
                submitted_by_id = EXCLUDED.submitted_by_id,
                updated_at = NOW()
             RETURNING {SUBMISSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(team_id)
            .bind(draft.project_name)
            .bind(draft.description)
            .bind(draft.devpost_url)
            .bind(draft.repository_url)
            .bind(draft.demo_url)
            .bind(submitted_by_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list(&self) -> RepoResult<Vec<Submission>> {
        let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM submissions ORDER BY updated_at DESC, id DESC");
        let rows = sqlx::query_as::<_, SubmissionRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Submission::from).collect())
    }
}
