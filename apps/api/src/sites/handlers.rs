//! Website record endpoints: fetch, list, field patch, slug, image upload,
//! delete, and JSON export.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::require_session;
use crate::errors::AppError;
use crate::export::{build_export, export_filename};
use crate::extract::validate_profile_image;
use crate::profile::update_profile_field;
use crate::sites::{ensure_owner, validate_slug};
use crate::state::AppState;

/// GET /api/v1/sites/:id — accepts a UUID or a custom slug.
pub async fn handle_get_site(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let record = state
        .store
        .resolve(&id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No website found for '{id_or_slug}'")))?;
    Ok(Json(serde_json::to_value(record).map_err(|e| AppError::Internal(e.into()))?))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
}

/// GET /api/v1/sites?user_id=...
pub async fn handle_list_sites(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    require_session(&state.db, &headers).await?;
    let records = state.store.list_by_user(query.user_id).await?;
    Ok(Json(json!({ "sites": records })))
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdateRequest {
    pub field: String,
    pub value: String,
}

/// PATCH /api/v1/sites/:id/field
///
/// Applies one field-path update to the stored profile and returns the
/// updated document. Unrecognized paths are a 400, not a silent no-op.
pub async fn handle_update_field(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
    headers: HeaderMap,
    Json(req): Json<FieldUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    let session = require_session(&state.db, &headers).await?;

    let record = state
        .store
        .resolve(&id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No website found for '{id_or_slug}'")))?;
    ensure_owner(&session, &record)?;

    let updated = update_profile_field(&record.website_data, &req.field, &req.value)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    state.store.update_data(record.id, &updated).await?;

    info!(site = %record.id, field = %req.field, "Profile field updated");

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugRequest {
    pub custom_slug: String,
}

/// PUT /api/v1/sites/:id/slug
pub async fn handle_set_slug(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SlugRequest>,
) -> Result<Json<Value>, AppError> {
    let session = require_session(&state.db, &headers).await?;
    validate_slug(&req.custom_slug)?;

    let record = state
        .store
        .resolve(&id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No website found for '{id_or_slug}'")))?;
    ensure_owner(&session, &record)?;

    if let Some(existing) = state.store.find_by_slug(&req.custom_slug).await? {
        if existing != record.id {
            return Err(AppError::Validation(format!(
                "The slug '{}' is already taken",
                req.custom_slug
            )));
        }
    }

    state
        .store
        .set_slug(record.id, &req.custom_slug)
        .await
        .map_err(|e| match &e {
            // Lost a race against a concurrent claim on the same slug.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Validation(format!("The slug '{}' is already taken", req.custom_slug))
            }
            _ => AppError::Database(e),
        })?;

    info!(site = %record.id, slug = %req.custom_slug, "Custom slug set");

    Ok(Json(json!({ "success": true, "slug": req.custom_slug })))
}

/// DELETE /api/v1/sites/:id
pub async fn handle_delete_site(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let session = require_session(&state.db, &headers).await?;

    let record = state
        .store
        .resolve(&id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No website found for '{id_or_slug}'")))?;
    ensure_owner(&session, &record)?;

    state.store.delete(record.id).await?;
    info!(site = %record.id, "Website deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sites/:id/image
///
/// Uploads a profile picture to object storage and stores its public URL in
/// the profile's `displayPicture` field.
pub async fn handle_upload_image(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let session = require_session(&state.db, &headers).await?;

    let record = state
        .store
        .resolve(&id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No website found for '{id_or_slug}'")))?;
    ensure_owner(&session, &record)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart request: {e}")))?
    {
        let name = field.name().map(str::to_string);
        if name.as_deref() == Some("file") {
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
    }

    let (content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("No image was uploaded".to_string()))?;
    let extension = validate_profile_image(&content_type, bytes.len())?;

    let key = format!("avatars/{}.{extension}", record.id);
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .content_type(&content_type)
        .body(bytes.into())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Image upload failed: {e}")))?;

    let url = format!(
        "{}/{key}",
        state.config.public_asset_base_url.trim_end_matches('/')
    );
    let updated = update_profile_field(&record.website_data, "displayPicture", &url)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    state.store.update_data(record.id, &updated).await?;

    info!(site = %record.id, key = %key, "Profile image uploaded");

    Ok(Json(json!({ "url": url })))
}

/// GET /api/v1/sites/:id/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Response, AppError> {
    let record = state
        .store
        .resolve(&id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No website found for '{id_or_slug}'")))?;

    let export = build_export(&record.website_data);
    let filename = export_filename(&record.website_data);

    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(export),
    )
        .into_response())
}
