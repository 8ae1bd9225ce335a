use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::repositories::{
    RepoError, RepoResult, UserFilter, UserRepository, STAGE_CHANGED,
};
use crate::domain::user::{
    Email, ExperienceLevel, NewUser, Profile, RegistrationStage, Role, User,
};

const USER_COLUMNS: &str = "
    id, identity_ref, email, name, role, registration_stage,
    devpost_username, devpost_verified,
    bio, skills, interests, experience_level,
    github_url, linkedin_url, portfolio_url, looking_for_team,
    created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    identity_ref: String,
    email: String,
    name: String,
    role: Role,
    registration_stage: RegistrationStage,
    devpost_username: Option<String>,
    devpost_verified: bool,
    bio: Option<String>,
    skills: Vec<String>,
    interests: Vec<String>,
    experience_level: Option<ExperienceLevel>,
    github_url: Option<String>,
    linkedin_url: Option<String>,
    portfolio_url: Option<String>,
    looking_for_team: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&r.email)
            .map_err(|e| RepoError::Storage(format!("Invalid email from database: {}", e)))?;
        Ok(User {
            id: r.id,
            identity_ref: r.identity_ref,
            email,
            name: r.name,
            role: r.role,
            stage: r.registration_stage,
            devpost_username: r.devpost_username,
            devpost_verified: r.devpost_verified,
            profile: Profile {
                bio: r.bio,
                skills: r.skills,
                interests: r.interests,
                experience_level: r.experience_level,
                github_url: r.github_url,
                linkedin_url: r.linkedin_url,
                portfolio_url: r.portfolio_url,
                looking_for_team: r.looking_for_team,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn provision(&self, user: NewUser) -> RepoResult<User> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let sql = format!(
            "INSERT INTO users (identity_ref, email, name, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (identity_ref) DO UPDATE SET identity_ref = EXCLUDED.identity_ref
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.identity_ref)
            .bind(user.email.as_str())
            .bind(&user.name)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_identity(&self, identity_ref: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE identity_ref = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(identity_ref)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self, filter: UserFilter) -> RepoResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::registration_stage IS NULL OR registration_stage = $1)
               AND ($2::boolean IS NULL OR looking_for_team = $2)
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(filter.stage)
            .bind(filter.looking_for_team)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_profile(&self, id: i64, name: &str, profile: &Profile) -> RepoResult<User> {
        let sql = format!(
            "UPDATE users SET
                name = $2, bio = $3, skills = $4, interests = $5, experience_level = $6,
                github_url = $7, linkedin_url = $8, portfolio_url = $9,
                looking_for_team = $10, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let row = bind_profile(sqlx::query_as::<_, UserRow>(&sql).bind(id).bind(name), profile)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        row.try_into()
    }

    async fn save_registration(
        &self,
        id: i64,
        name: &str,
        profile: &Profile,
        devpost_username: &str,
    ) -> RepoResult<User> {
        let sql = format!(
            "UPDATE users SET
                name = $2, bio = $3, skills = $4, interests = $5, experience_level = $6,
                github_url = $7, linkedin_url = $8, portfolio_url = $9,
                looking_for_team = $10, devpost_username = $11,
                registration_stage = CASE
                    WHEN registration_stage = 'registered' THEN 'devpost_submitted'
                    ELSE registration_stage
                END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let row = bind_profile(sqlx::query_as::<_, UserRow>(&sql).bind(id).bind(name), profile)
            .bind(devpost_username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        row.try_into()
    }

    async fn transition_stage(
        &self,
        id: i64,
        from: RegistrationStage,
        to: RegistrationStage,
    ) -> RepoResult<User> {
        let sql = format!(
            "UPDATE users SET
                registration_stage = $3,
                devpost_verified = devpost_verified OR $4,
                updated_at = NOW()
             WHERE id = $1 AND registration_stage = $2
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(to == RegistrationStage::DevpostConfirmed)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.try_into(),
            None if self.find_by_id(id).await?.is_some() => Err(RepoError::conflict(STAGE_CHANGED)),
            None => Err(user_not_found(id)),
        }
    }

    async fn set_role(&self, id: i64, role: Role) -> RepoResult<User> {
        let sql = format!(
            "UPDATE users SET role = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        row.try_into()
    }
}

type UserQuery<'q> =
    sqlx::query::QueryAs<'q, sqlx::Postgres, UserRow, sqlx::postgres::PgArguments>;

/// Binds profile columns as `$3..$10`, after `id` and `name`
fn bind_profile<'q>(query: UserQuery<'q>, profile: &'q Profile) -> UserQuery<'q> {
    query
        .bind(&profile.bio)
        .bind(&profile.skills)
        .bind(&profile.interests)
        .bind(profile.experience_level)
        .bind(&profile.github_url)
        .bind(&profile.linkedin_url)
        .bind(&profile.portfolio_url)
        .bind(profile.looking_for_team)
}

fn user_not_found(id: i64) -> RepoError {
    RepoError::not_found(format!("User not found: {}", id))
}
