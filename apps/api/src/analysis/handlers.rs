//! CV upload and conversational edit endpoints.

use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::analysis::{analyze_cv, edit_profile};
use crate::auth::require_session;
use crate::errors::AppError;
use crate::extract::{extract_text, validate_document, ExtractError, MIN_TEXT_CHARS};
use crate::sites::ensure_owner;
use crate::state::AppState;

/// POST /api/v1/cv/upload
///
/// Multipart fields: `file` (the CV document), optional `designStyle` and
/// `linkedInUrl`. Extracts text on a blocking thread, runs analysis, and
/// persists the resulting profile as a new website record.
pub async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let session = require_session(&state.db, &headers).await?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut design_style: Option<String> = None;
    let mut linkedin_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart request: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .ok_or_else(|| {
                        AppError::Validation("The file field has no content type".to_string())
                    })?
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?;
                file = Some((content_type, bytes.to_vec()));
            }
            Some("designStyle") => {
                design_style = field.text().await.ok().filter(|s| !s.trim().is_empty());
            }
            Some("linkedInUrl") => {
                linkedin_url = field.text().await.ok().filter(|s| !s.trim().is_empty());
            }
            _ => {}
        }
    }

    let (content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("No file was uploaded".to_string()))?;
    let media_type = validate_document(&content_type, bytes.len())?;

    // Document parsing is CPU-bound; keep it off the async workers.
    let text = tokio::task::spawn_blocking(move || extract_text(media_type, &bytes))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| match e {
            ExtractError::UnsupportedType(_) => AppError::Validation(e.to_string()),
            other => AppError::Extraction(other.to_string()),
        })?;

    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(AppError::InsufficientText(
            "The document contains too little text to build a profile from".to_string(),
        ));
    }

    let outcome = analyze_cv(
        &state.llm,
        &text,
        design_style.as_deref(),
        linkedin_url.as_deref(),
    )
    .await?;

    if outcome.degraded {
        warn!(user_id = %session.user_id, "Analysis degraded to fallback profile");
        if let Some(raw) = &outcome.raw_response {
            state
                .store
                .record_analysis_failure(session.user_id, raw)
                .await?;
        }
    }

    let profile =
        serde_json::to_value(&outcome.profile).map_err(|e| AppError::Internal(e.into()))?;
    let id = state.store.upsert(None, session.user_id, &profile).await?;

    info!(user_id = %session.user_id, site = %id, degraded = outcome.degraded, "CV analyzed");

    Ok(Json(json!({
        "id": id,
        "profile": profile,
        "degraded": outcome.degraded,
    })))
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub prompt: String,
}

/// POST /api/v1/sites/:id/edit
///
/// Applies a natural-language edit to the whole stored profile.
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
    headers: HeaderMap,
    Json(req): Json<EditRequest>,
) -> Result<Json<Value>, AppError> {
    let session = require_session(&state.db, &headers).await?;

    if req.prompt.trim().is_empty() {
        return Err(AppError::Validation(
            "The edit request must not be empty".to_string(),
        ));
    }

    let record = state
        .store
        .resolve(&id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No website found for '{id_or_slug}'")))?;
    ensure_owner(&session, &record)?;

    let updated = edit_profile(&state.llm, &req.prompt, &record.website_data).await?;
    state.store.update_data(record.id, &updated).await?;

    info!(site = %record.id, "Profile edited via AI request");

    Ok(Json(json!({
        "success": true,
        "updatedProfile": updated,
    })))
}
