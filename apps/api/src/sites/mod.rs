// Persistence Gateway: CRUD against the cv_websites table, keyed by
// id / custom slug / user id. Single-row atomic operations; last writer wins.

pub mod handlers;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::record::{SessionRow, WebsiteRow};

pub const MAX_SLUG_CHARS: usize = 32;

/// Storage seam for profile records. Handlers depend on this trait so the
/// core flows can be exercised against a stub store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<WebsiteRow>, sqlx::Error>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Uuid>, sqlx::Error>;

    /// Looks up by UUID first, then by custom slug.
    async fn resolve(&self, id_or_slug: &str) -> Result<Option<WebsiteRow>, sqlx::Error>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<WebsiteRow>, sqlx::Error>;

    /// Inserts a new record, or replaces `website_data` when `id` is given.
    /// Returns the record id.
    async fn upsert(
        &self,
        id: Option<Uuid>,
        user_id: Uuid,
        website_data: &Value,
    ) -> Result<Uuid, sqlx::Error>;

    async fn update_data(&self, id: Uuid, website_data: &Value) -> Result<(), sqlx::Error>;

    async fn set_slug(&self, id: Uuid, slug: &str) -> Result<(), sqlx::Error>;

    /// Removes the entire record; profile records are never partially deleted.
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;

    /// Preserves an unparseable model reply for manual recovery.
    async fn record_analysis_failure(
        &self,
        user_id: Uuid,
        raw_response: &str,
    ) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed store.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<WebsiteRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM cv_websites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM cv_websites WHERE custom_slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }

    async fn resolve(&self, id_or_slug: &str) -> Result<Option<WebsiteRow>, sqlx::Error> {
        if let Ok(id) = Uuid::parse_str(id_or_slug) {
            return self.get_by_id(id).await;
        }
        sqlx::query_as("SELECT * FROM cv_websites WHERE custom_slug = $1")
            .bind(id_or_slug)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<WebsiteRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM cv_websites WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn upsert(
        &self,
        id: Option<Uuid>,
        user_id: Uuid,
        website_data: &Value,
    ) -> Result<Uuid, sqlx::Error> {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO cv_websites (id, user_id, website_data, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (id)
            DO UPDATE SET website_data = EXCLUDED.website_data, updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(website_data)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    async fn update_data(&self, id: Uuid, website_data: &Value) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE cv_websites SET website_data = $1, updated_at = NOW() WHERE id = $2")
            .bind(website_data)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_slug(&self, id: Uuid, slug: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE cv_websites SET custom_slug = $1, updated_at = NOW() WHERE id = $2")
            .bind(slug)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM cv_websites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn record_analysis_failure(
        &self,
        user_id: Uuid,
        raw_response: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO analysis_failures (id, user_id, raw_response, created_at)
             VALUES ($1, $2, $3, NOW())",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(raw_response)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Records are scoped to their owner. A valid session for a different user
/// gets the same 404 as a nonexistent record, so record ids cannot be
/// enumerated.
pub fn ensure_owner(session: &SessionRow, record: &WebsiteRow) -> Result<(), AppError> {
    if session.user_id != record.user_id {
        return Err(AppError::NotFound(format!(
            "No website found for '{}'",
            record.id
        )));
    }
    Ok(())
}

/// Custom slugs: lowercase letters, digits, and hyphens only, at most 32
/// characters. Uniqueness is enforced at write time by the database.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_CHARS {
        return Err(AppError::Validation(format!(
            "Slug must be between 1 and {MAX_SLUG_CHARS} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::Validation(
            "Slug may only contain lowercase letters, digits, and hyphens".to_string(),
        ));
    }
    Ok(())
}
