//! Session lifecycle: login issues a bearer token, refresh extends it,
//! logout revokes it. Mutating profile routes call [`require_session`].

use axum::{extract::State, http::HeaderMap, Json};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::record::SessionRow;
use crate::state::AppState;

pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let session = create_session(&state.db, req.user_id).await?;
    tracing::info!(user_id = %req.user_id, "Session created");
    Ok(Json(session_body(&session)))
}

/// POST /api/v1/auth/refresh
///
/// Extends the current session by another [`SESSION_TTL_HOURS`]. An expired
/// or unknown token is rejected, not silently re-issued.
pub async fn handle_refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);

    let session: Option<SessionRow> = sqlx::query_as(
        "UPDATE sessions SET expires_at = $1 WHERE token = $2 AND expires_at > NOW() RETURNING *",
    )
    .bind(expires_at)
    .bind(token)
    .fetch_optional(&state.db)
    .await?;

    let session = session.ok_or(AppError::Unauthorized)?;
    Ok(Json(session_body(&session)))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(&state.db)
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// Resolves the bearer token in `headers` to a live session, or fails with
/// 401. Expired sessions are treated exactly like missing ones.
pub async fn require_session(pool: &PgPool, headers: &HeaderMap) -> Result<SessionRow, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let session: Option<SessionRow> =
        sqlx::query_as("SELECT * FROM sessions WHERE token = $1 AND expires_at > NOW()")
            .bind(token)
            .fetch_optional(pool)
            .await?;
    session.ok_or(AppError::Unauthorized)
}

async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<SessionRow, AppError> {
    let token = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
    let session: SessionRow = sqlx::query_as(
        "INSERT INTO sessions (token, user_id, created_at, expires_at)
         VALUES ($1, $2, NOW(), $3) RETURNING *",
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;
    Ok(session)
}

fn session_body(session: &SessionRow) -> Value {
    json!({
        "token": session.token,
        "userId": session.user_id,
        "expiresAt": session.expires_at,
    })
}

/// Extracts `Authorization: Bearer <uuid>`. Anything malformed is `None`.
fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parses_uuid() {
        let token = Uuid::new_v4();
        let headers = headers_with(&format!("Bearer {token}"));
        assert_eq!(bearer_token(&headers), Some(token));
    }

    #[test]
    fn test_bearer_token_rejects_malformed_headers() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Bearer not-a-uuid")), None);
        assert_eq!(
            bearer_token(&headers_with(&Uuid::new_v4().to_string())),
            None
        );
        assert_eq!(
            bearer_token(&headers_with(&format!("Basic {}", Uuid::new_v4()))),
            None
        );
    }
}
