//! Structured JSON export: wraps the stored Profile Document in metadata and
//! styling hints so external site builders can rehydrate the CV.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvExport {
    pub metadata: ExportMetadata,
    pub styling: Styling,
    /// The Profile Document exactly as stored, byte-for-byte re-importable.
    pub profile: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub converter_hints: ConverterHints,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterHints {
    pub recommended_layout: &'static str,
    pub preferred_sections: Vec<&'static str>,
    pub font_recommendations: FontRecommendations,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRecommendations {
    pub heading_font: String,
    pub body_font: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Styling {
    pub colors: Colors,
    pub fonts: FontRecommendations,
    pub spacing: Spacing,
    pub layout: LayoutHints,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    pub section_gap: &'static str,
    pub item_gap: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutHints {
    pub page_size: &'static str,
    pub margins: &'static str,
    pub columns: u8,
}

/// Builds the export wrapper around a stored profile.
pub fn build_export(profile: &Value) -> CvExport {
    let design_style = profile
        .get("designStyle")
        .and_then(Value::as_str)
        .unwrap_or("modern");

    let colors = profile
        .get("colorScheme")
        .and_then(Value::as_array)
        .map(|scheme| {
            let color = |i: usize, fallback: &str| {
                scheme
                    .get(i)
                    .and_then(Value::as_str)
                    .unwrap_or(fallback)
                    .to_string()
            };
            Colors {
                primary: color(0, "#1a1a2e"),
                secondary: color(1, "#16213e"),
                accent: color(2, "#0f3460"),
            }
        })
        .unwrap_or_else(|| Colors {
            primary: "#1a1a2e".to_string(),
            secondary: "#16213e".to_string(),
            accent: "#0f3460".to_string(),
        });

    let fonts = font_recommendations(profile);

    CvExport {
        metadata: ExportMetadata {
            version: EXPORT_VERSION,
            generated_at: Utc::now(),
            converter_hints: ConverterHints {
                recommended_layout: if design_style == "tech" {
                    "two-column"
                } else {
                    "single-column"
                },
                preferred_sections: vec![
                    "header",
                    "experience",
                    "education",
                    "skills",
                    "projects",
                ],
                font_recommendations: font_recommendations(profile),
            },
        },
        styling: Styling {
            colors,
            fonts,
            spacing: Spacing {
                section_gap: "1.5rem",
                item_gap: "0.75rem",
            },
            layout: LayoutHints {
                page_size: "A4",
                margins: "1in",
                columns: if design_style == "tech" { 2 } else { 1 },
            },
        },
        profile: profile.clone(),
    }
}

/// Reduces a display name to a stem safe for filenames and
/// `Content-Disposition` headers: ASCII letters, digits, and hyphens only,
/// whitespace runs collapsed to single hyphens, everything else dropped.
pub fn filename_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    cleaned
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Filename for the download: the sanitized profile name suffixed `-cv.json`.
pub fn export_filename(profile: &Value) -> String {
    let stem = filename_stem(profile.get("name").and_then(Value::as_str).unwrap_or(""));
    if stem.is_empty() {
        "cv.json".to_string()
    } else {
        format!("{stem}-cv.json")
    }
}

fn font_recommendations(profile: &Value) -> FontRecommendations {
    let pairings = profile.get("fontPairings");
    let font = |key: &str, fallback: &str| {
        pairings
            .and_then(|p| p.get(key))
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string()
    };
    FontRecommendations {
        heading_font: font("heading", "Inter"),
        body_font: font("body", "Inter"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_survives_export_round_trip() {
        let profile = json!({
            "name": "Ada Lovelace",
            "title": "Mathematician",
            "skills": ["Math", "Computing"],
            "experience": [{"title": "Analyst", "company": "Babbage & Co",
                            "period": "1842", "description": "Notes on the Analytical Engine"}]
        });
        let export = build_export(&profile);
        let serialized = serde_json::to_value(&export).unwrap();
        assert_eq!(serialized["profile"], profile);
        assert_eq!(serialized["metadata"]["version"], "1.0");
    }

    #[test]
    fn test_tech_style_selects_two_columns() {
        let export = build_export(&json!({"name": "Ada", "designStyle": "tech"}));
        assert_eq!(export.styling.layout.columns, 2);
        assert_eq!(
            export.metadata.converter_hints.recommended_layout,
            "two-column"
        );

        let export = build_export(&json!({"name": "Ada", "designStyle": "modern"}));
        assert_eq!(export.styling.layout.columns, 1);
    }

    #[test]
    fn test_color_scheme_feeds_styling() {
        let export = build_export(&json!({
            "name": "Ada",
            "colorScheme": ["#111111", "#222222", "#333333"]
        }));
        assert_eq!(export.styling.colors.primary, "#111111");
        assert_eq!(export.styling.colors.accent, "#333333");
    }

    #[test]
    fn test_export_filename_hyphenates_name() {
        assert_eq!(
            export_filename(&json!({"name": "Ada  Lovelace"})),
            "Ada-Lovelace-cv.json"
        );
        assert_eq!(export_filename(&json!({})), "cv.json");
        assert_eq!(export_filename(&json!({"name": "   "})), "cv.json");
    }

    #[test]
    fn test_filename_stem_drops_header_breaking_characters() {
        assert_eq!(filename_stem(r#"Ada "The Countess" Lovelace"#), "Ada-The-Countess-Lovelace");
        assert_eq!(filename_stem("José Álvarez"), "Jos-lvarez");
        assert_eq!(filename_stem("a/b\\c;d"), "abcd");
        assert_eq!(filename_stem("\"\""), "");
    }
}
