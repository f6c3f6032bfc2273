//! PDF export endpoint.
//!
//! The client rasterizes each rendered section to a PNG capture and posts
//! them here as base64; the server plans pagination, composes the PDF on a
//! blocking thread, and streams it back. If composition fails outright the
//! response degrades to the text-only fallback rather than erroring.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::export::filename_stem;
use crate::pdf::compose::compose_pdf;
use crate::pdf::fallback::build_fallback_pdf;
use crate::pdf::paginate::{plan_standard, plan_two_column, PagePlan};
use crate::pdf::types::{
    BlockExtent, CapturedSection, CvLayout, PageMetrics, SectionKind, Theme,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPayload {
    pub kind: SectionKind,
    pub image_base64: String,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPdfRequest {
    pub layout: CvLayout,
    pub theme: Theme,
    pub sections: Vec<SectionPayload>,
    /// Required for the two-column layout.
    pub sidebar: Option<SectionPayload>,
}

/// POST /api/v1/sites/:id/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
    Json(req): Json<ExportPdfRequest>,
) -> Result<Response, AppError> {
    let record = state
        .store
        .resolve(&id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No website found for '{id_or_slug}'")))?;

    let filename = pdf_filename(&record.website_data);

    let profile = record.website_data.clone();
    let layout = req.layout;
    let theme = req.theme;

    let bytes = tokio::task::spawn_blocking(move || render(req, &profile))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(?layout, ?theme, "PDF composition failed, using fallback: {e:#}");
            let profile = record.website_data.clone();
            tokio::task::spawn_blocking(move || build_fallback_pdf(&profile))
                .await
                .map_err(|e| AppError::Internal(e.into()))?
                .map_err(AppError::Internal)?
        }
    };

    info!(site = %record.id, size = bytes.len(), "PDF export complete");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Download filename from the sanitized profile name; the raw name never
/// reaches the `Content-Disposition` header.
fn pdf_filename(profile: &serde_json::Value) -> String {
    let stem = filename_stem(profile.get("name").and_then(|v| v.as_str()).unwrap_or(""));
    if stem.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{stem}-resume.pdf")
    }
}

/// Decodes captures, plans pagination, and composes. Runs on a blocking
/// thread; any error here triggers the fallback document.
fn render(req: ExportPdfRequest, profile: &serde_json::Value) -> anyhow::Result<Vec<u8>> {
    let title = profile
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("CV");

    let metrics = PageMetrics::for_layout(req.layout);
    // The two-column layout always renders on white; only the standard
    // layout honors the dark theme background.
    let theme = match req.layout {
        CvLayout::Standard => req.theme,
        CvLayout::TwoColumn => Theme::Light,
    };
    let mut sections = decode_sections(req.sections);
    // Captures render in their fixed document order regardless of how the
    // client happened to send them.
    sections.sort_by_key(|s| s.kind);

    let extents: Vec<BlockExtent> = sections.iter().map(BlockExtent::from).collect();

    let (plan, sidebar): (PagePlan, Option<CapturedSection>) = match req.layout {
        CvLayout::Standard => (plan_standard(&extents, &metrics), None),
        CvLayout::TwoColumn => {
            let payload = req
                .sidebar
                .ok_or_else(|| anyhow::anyhow!("two-column export requires a sidebar capture"))?;
            let sidebar = decode_section(payload)
                .ok_or_else(|| anyhow::anyhow!("sidebar capture failed to decode"))?;
            let plan = plan_two_column(&BlockExtent::from(&sidebar), &extents, &metrics);
            (plan, Some(sidebar))
        }
    };

    compose_pdf(title, &plan, &sections, sidebar.as_ref(), &metrics, theme)
}

/// Base64-decodes the captures. A capture that fails to decode is dropped
/// with a warning; the remaining sections still export.
fn decode_sections(payloads: Vec<SectionPayload>) -> Vec<CapturedSection> {
    payloads
        .into_iter()
        .filter_map(|payload| {
            let kind = payload.kind;
            let section = decode_section(payload);
            if section.is_none() {
                warn!(?kind, "Dropping capture with invalid base64 payload");
            }
            section
        })
        .collect()
}

fn decode_section(payload: SectionPayload) -> Option<CapturedSection> {
    let png = BASE64.decode(payload.image_base64.as_bytes()).ok()?;
    Some(CapturedSection {
        kind: payload.kind,
        png,
        width_px: payload.width_px,
        height_px: payload.height_px,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(kind: SectionKind, image_base64: &str) -> SectionPayload {
        SectionPayload {
            kind,
            image_base64: image_base64.to_string(),
            width_px: 100,
            height_px: 50,
        }
    }

    #[test]
    fn test_invalid_base64_sections_dropped() {
        let sections = decode_sections(vec![
            payload(SectionKind::Header, "aGVsbG8="),
            payload(SectionKind::Footer, "!!!not-base64!!!"),
        ]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Header);
        assert_eq!(sections[0].png, b"hello");
    }

    #[test]
    fn test_pdf_filename_is_header_safe() {
        use serde_json::json;
        assert_eq!(
            pdf_filename(&json!({"name": r#"Ada "The Countess" Lovelace"#})),
            "Ada-The-Countess-Lovelace-resume.pdf"
        );
        assert_eq!(pdf_filename(&json!({"name": "Grace Hopper"})), "Grace-Hopper-resume.pdf");
        assert_eq!(pdf_filename(&json!({"name": "日本語"})), "resume.pdf");
        assert_eq!(pdf_filename(&json!({})), "resume.pdf");
    }

    #[test]
    fn test_section_kinds_sort_in_document_order() {
        let mut kinds = vec![
            SectionKind::Footer,
            SectionKind::Header,
            SectionKind::Projects,
            SectionKind::ExperienceItem,
            SectionKind::ExperienceTitle,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Header,
                SectionKind::ExperienceTitle,
                SectionKind::ExperienceItem,
                SectionKind::Projects,
                SectionKind::Footer,
            ]
        );
    }
}
