// AI Extraction Client: sends extracted CV text to the LLM, parses the
// structured reply into a Profile Document, and degrades to a placeholder
// profile (preserving the raw response) when the reply is unparseable.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod postprocess;
pub mod prompts;

use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{extract_json_object, LlmClient};
use crate::models::profile::ProfileDocument;

/// Result of analyzing one CV text.
///
/// `degraded` is true when the model reply could not be parsed and the
/// placeholder profile was substituted; `raw_response` then carries the
/// unparsed reply for manual recovery.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub profile: ProfileDocument,
    pub degraded: bool,
    pub raw_response: Option<String>,
}

/// Analyzes raw CV text into a Profile Document.
///
/// JSON-parse failures do NOT fail the operation: the caller gets the fixed
/// fallback profile and the raw reply to persist for diagnostics. Transport
/// and API errors DO fail the operation.
pub async fn analyze_cv(
    llm: &LlmClient,
    cv_text: &str,
    design_style: Option<&str>,
    linkedin_url: Option<&str>,
) -> Result<AnalysisOutcome, AppError> {
    let prompt = prompts::CV_PARSE_PROMPT_TEMPLATE
        .replace("{cv_text}", cv_text)
        .replace("{design_style}", design_style.unwrap_or("modern"));

    let response = llm
        .call(&prompt, prompts::CV_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("CV analysis call failed: {e}")))?;

    let text = response.text().unwrap_or_default().to_string();

    let (mut profile, degraded, raw_response) = match parse_profile(&text) {
        Some(profile) => (profile, false, None),
        None => {
            warn!("Could not parse model reply as a profile; substituting fallback");
            (fallback_profile(), true, Some(text))
        }
    };

    postprocess::postprocess(&mut profile, cv_text, design_style, linkedin_url);

    Ok(AnalysisOutcome {
        profile,
        degraded,
        raw_response,
    })
}

/// Applies a free-form edit request to an existing profile, returning the
/// whole updated document. Unlike analysis, an unparseable reply here is an
/// error: silently dropping an explicit edit would be worse than failing.
pub async fn edit_profile(
    llm: &LlmClient,
    prompt: &str,
    current_profile: &Value,
) -> Result<Value, AppError> {
    let current =
        serde_json::to_string_pretty(current_profile).map_err(|e| AppError::Internal(e.into()))?;
    let full_prompt = prompts::EDIT_PROMPT_TEMPLATE
        .replace("{current_profile}", &current)
        .replace("{prompt}", prompt);

    let response = llm
        .call(&full_prompt, prompts::EDIT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Profile edit call failed: {e}")))?;

    let text = response.text().unwrap_or_default();
    extract_json_object(text)
        .ok_or_else(|| AppError::Llm("Model reply did not contain an updated profile".to_string()))
}

/// Parses a model reply into a typed profile, tolerating prose around the
/// JSON and a stray top-level `certifications` list.
fn parse_profile(text: &str) -> Option<ProfileDocument> {
    let mut value = extract_json_object(text)?;
    fold_certifications(&mut value);
    serde_json::from_value(value).ok()
}

/// Some replies put certifications at the top level instead of inside
/// customSections; fold them into a Certifications custom section.
fn fold_certifications(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    let Some(certs) = obj.remove("certifications") else {
        return;
    };
    if obj.contains_key("customSections") {
        return;
    }
    let Some(certs) = certs.as_array() else {
        return;
    };
    let items: Vec<Value> = certs
        .iter()
        .filter_map(|c| c.as_str())
        .map(|name| json!({"name": name, "description": ""}))
        .collect();
    if items.is_empty() {
        return;
    }
    obj.insert(
        "customSections".to_string(),
        json!([{"title": "Certifications", "items": items}]),
    );
}

/// The fixed profile substituted when the model reply cannot be parsed.
pub fn fallback_profile() -> ProfileDocument {
    let mut profile = ProfileDocument::default();
    profile.bio = "We could not automatically read your CV. \
        Your original text has been kept; use the editor to fill in your details."
        .to_string();
    profile
}
