use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::content::{
    Announcement, AnnouncementDraft, AnnouncementPriority, EventType, Resource,
    ResourceCategory, ResourceDraft, ScheduleDraft, ScheduleEvent, Sponsor, SponsorDraft,
    SponsorTier,
};
use crate::domain::repositories::{ContentRepository, RepoResult};

/// PostgreSQL implementation of the content collections
///
/// One handle serves all four tables; each collection gets its own
/// `ContentRepository` impl.
#[derive(Clone)]
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn delete_from(&self, table: &str, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ===== Resources =====

const RESOURCE_COLUMNS: &str =
    "id, title, description, url, category, uploaded_by_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ResourceRow {
    id: i64,
    title: String,
    description: Option<String>,
    url: String,
    category: ResourceCategory,
    uploaded_by_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ResourceRow> for Resource {
    fn from(r: ResourceRow) -> Self {
        Resource {
            id: r.id,
            title: r.title,
            description: r.description,
            url: r.url,
            category: r.category,
            uploaded_by_id: r.uploaded_by_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl ContentRepository<Resource> for PostgresContentRepository {
    async fn list(&self) -> RepoResult<Vec<Resource>> {
        let sql = format!("SELECT {RESOURCE_COLUMNS} FROM resources ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, ResourceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Resource::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Resource>> {
        let sql = format!("SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = $1");
        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resource::from))
    }

    async fn create(&self, draft: ResourceDraft, author_id: i64) -> RepoResult<Resource> {
        let sql = format!(
            "INSERT INTO resources (title, description, url, category, uploaded_by_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {RESOURCE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(draft.title)
            .bind(draft.description)
            .bind(draft.url)
            .bind(draft.category)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: ResourceDraft) -> RepoResult<Option<Resource>> {
        let sql = format!(
            "UPDATE resources
             SET title = $2, description = $3, url = $4, category = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {RESOURCE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(id)
            .bind(draft.title)
            .bind(draft.description)
            .bind(draft.url)
            .bind(draft.category)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resource::from))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.delete_from("resources", id).await
    }
}

// ===== Announcements =====

const ANNOUNCEMENT_COLUMNS: &str =
    "id, title, content, priority, pinned, is_public, posted_by_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AnnouncementRow {
    id: i64,
    title: String,
    content: String,
    priority: AnnouncementPriority,
    pinned: bool,
    is_public: bool,
    posted_by_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<AnnouncementRow> for Announcement {
    fn from(r: AnnouncementRow) -> Self {
        Announcement {
            id: r.id,
            title: r.title,
            content: r.content,
            priority: r.priority,
            pinned: r.pinned,
            is_public: r.is_public,
            posted_by_id: r.posted_by_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl ContentRepository<Announcement> for PostgresContentRepository {
    async fn list(&self) -> RepoResult<Vec<Announcement>> {
        let sql = format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements
             ORDER BY pinned DESC, created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Announcement::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Announcement>> {
        let sql = format!("SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = $1");
        let row = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Announcement::from))
    }

    async fn create(&self, draft: AnnouncementDraft, author_id: i64) -> RepoResult<Announcement> {
        let sql = format!(
            "INSERT INTO announcements (title, content, priority, pinned, is_public, posted_by_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ANNOUNCEMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .bind(draft.title)
            .bind(draft.content)
            .bind(draft.priority)
            .bind(draft.pinned)
            .bind(draft.is_public)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: AnnouncementDraft) -> RepoResult<Option<Announcement>> {
        let sql = format!(
            "UPDATE announcements
             SET title = $2, content = $3, priority = $4, pinned = $5, is_public = $6,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {ANNOUNCEMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .bind(id)
            .bind(draft.title)
            .bind(draft.content)
            .bind(draft.priority)
            .bind(draft.pinned)
            .bind(draft.is_public)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Announcement::from))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.delete_from("announcements", id).await
    }
}

// ===== Schedule =====

const SCHEDULE_COLUMNS: &str = "id, title, description, location, start_time, end_time, \
     event_type, created_by_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    id: i64,
    title: String,
    description: Option<String>,
    location: Option<String>,
    start_time: chrono::DateTime<chrono::Utc>,
    end_time: chrono::DateTime<chrono::Utc>,
    event_type: EventType,
    created_by_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ScheduleRow> for ScheduleEvent {
    fn from(r: ScheduleRow) -> Self {
        ScheduleEvent {
            id: r.id,
            title: r.title,
            description: r.description,
            location: r.location,
            start_time: r.start_time,
            end_time: r.end_time,
            event_type: r.event_type,
            created_by_id: r.created_by_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl ContentRepository<ScheduleEvent> for PostgresContentRepository {
    async fn list(&self) -> RepoResult<Vec<ScheduleEvent>> {
        let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedule_events ORDER BY start_time, id");
        let rows = sqlx::query_as::<_, ScheduleRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ScheduleEvent::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ScheduleEvent>> {
        let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedule_events WHERE id = $1");
        let row = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ScheduleEvent::from))
    }

    async fn create(&self, draft: ScheduleDraft, author_id: i64) -> RepoResult<ScheduleEvent> {
        let sql = format!(
            "INSERT INTO schedule_events
                (title, description, location, start_time, end_time, event_type, created_by_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SCHEDULE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(draft.title)
            .bind(draft.description)
            .bind(draft.location)
            .bind(draft.start_time)
            .bind(draft.end_time)
            .bind(draft.event_type)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: ScheduleDraft) -> RepoResult<Option<ScheduleEvent>> {
        let sql = format!(
            "UPDATE schedule_events
             SET title = $2, description = $3, location = $4, start_time = $5,
                 end_time = $6, event_type = $7, updated_at = NOW()
             WHERE id = $1
             RETURNING {SCHEDULE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(id)
            .bind(draft.title)
            .bind(draft.description)
            .bind(draft.location)
            .bind(draft.start_time)
            .bind(draft.end_time)
            .bind(draft.event_type)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ScheduleEvent::from))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.delete_from("schedule_events", id).await
    }
}

// ===== Sponsors =====

const SPONSOR_COLUMNS: &str = "id, name, description, logo_url, website_url, tier, \
     display_order, created_by_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SponsorRow {
    id: i64,
    name: String,
    description: Option<String>,
    logo_url: Option<String>,
    website_url: Option<String>,
    tier: SponsorTier,
    display_order: i32,
    created_by_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<SponsorRow> for Sponsor {
    fn from(r: SponsorRow) -> Self {
        Sponsor {
            id: r.id,
            name: r.name,
            description: r.description,
            logo_url: r.logo_url,
            website_url: r.website_url,
            tier: r.tier,
            display_order: r.display_order,
            created_by_id: r.created_by_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl ContentRepository<Sponsor> for PostgresContentRepository {
    async fn list(&self) -> RepoResult<Vec<Sponsor>> {
        let sql = format!("SELECT {SPONSOR_COLUMNS} FROM sponsors ORDER BY tier, display_order, name");
        let rows = sqlx::query_as::<_, SponsorRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Sponsor::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Sponsor>> {
        let sql = format!("SELECT {SPONSOR_COLUMNS} FROM sponsors WHERE id = $1");
        let row = sqlx::query_as::<_, SponsorRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Sponsor::from))
    }

    async fn create(&self, draft: SponsorDraft, author_id: i64) -> RepoResult<Sponsor> {
        let sql = format!(
            "INSERT INTO sponsors
                (name, description, logo_url, website_url, tier, display_order, created_by_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SPONSOR_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SponsorRow>(&sql)
            .bind(draft.name)
            .bind(draft.description)
            .bind(draft.logo_url)
            .bind(draft.website_url)
            .bind(draft.tier)
            .bind(draft.display_order)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: SponsorDraft) -> RepoResult<Option<Sponsor>> {
        let sql = format!(
            "UPDATE sponsors
             SET name = $2, description = $3, logo_url = $4, website_url = $5, tier = $6,
                 display_order = $7, updated_at = NOW()
             WHERE id = $1
             RETURNING {SPONSOR_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SponsorRow>(&sql)
            .bind(id)
            .bind(draft.name)
            .bind(draft.description)
            .bind(draft.logo_url)
            .bind(draft.website_url)
            .bind(draft.tier)
            .bind(draft.display_order)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Sponsor::from))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.delete_from("sponsors", id).await
    }
}
