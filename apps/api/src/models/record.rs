use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted CV website. `website_data` is the Profile Document stored
/// as an opaque JSON blob; deletion removes the whole row, never parts of it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebsiteRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub custom_slug: Option<String>,
    pub website_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An authenticated session. Explicit lifecycle (login/refresh/logout)
/// instead of ambient provider state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRow {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
