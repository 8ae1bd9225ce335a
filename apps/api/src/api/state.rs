use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::content::{Announcement, Resource, ScheduleEvent, Sponsor};
use crate::domain::repositories::{
    ConnectionRepository, ContentRepository, SubmissionRepository, TeamRepository,
    UserRepository,
};
use crate::infrastructure::repositories::{
    InMemoryContent, InMemoryStore, PostgresConnectionRepository, PostgresContentRepository,
    PostgresSubmissionRepository, PostgresTeamRepository, PostgresUserRepository,
};

/// Shared handler state: one handle per repository plus the runtime config
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub connections: Arc<dyn ConnectionRepository>,
    pub resources: Arc<dyn ContentRepository<Resource>>,
    pub announcements: Arc<dyn ContentRepository<Announcement>>,
    pub schedule: Arc<dyn ContentRepository<ScheduleEvent>>,
    pub sponsors: Arc<dyn ContentRepository<Sponsor>>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn postgres(pool: PgPool, config: AppConfig) -> Self {
        let content = Arc::new(PostgresContentRepository::new(pool.clone()));
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            teams: Arc::new(PostgresTeamRepository::new(pool.clone())),
            connections: Arc::new(PostgresConnectionRepository::new(pool.clone())),
            resources: content.clone(),
            announcements: content.clone(),
            schedule: content.clone(),
            sponsors: content,
            submissions: Arc::new(PostgresSubmissionRepository::new(pool)),
            config: Arc::new(config),
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            teams: store.clone(),
            connections: store.clone(),
            resources: Arc::new(InMemoryContent::new()),
            announcements: Arc::new(InMemoryContent::new()),
            schedule: Arc::new(InMemoryContent::new()),
            sponsors: Arc::new(InMemoryContent::new()),
            submissions: store,
            config: Arc::new(config),
        }
    }
}
