//! Profile Document — the canonical nested representation of one person's
//! CV/resume content. Field names serialize in camelCase to match the
//! persisted JSON blob and the client wire format.

use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_NAME: &str = "Your Name";
pub const PLACEHOLDER_TITLE: &str = "Your Professional Title";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub description: String,
    /// Bullet points, order preserved for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSectionItem {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Open-ended extension point for content that doesn't fit the fixed schema
/// (certifications, publications, workshops, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<CustomSectionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontPairings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// The canonical resume representation.
///
/// Invariant: `experience` and `education` are always present as sequences
/// (possibly empty). All other array-valued fields may be absent and are
/// treated as empty when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Vec<SocialLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_sections: Option<Vec<CustomSection>>,
    // Presentation hints, not structural data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_pairings: Option<FontPairings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_picture: Option<String>,
}

fn default_name() -> String {
    PLACEHOLDER_NAME.to_string()
}

fn default_title() -> String {
    PLACEHOLDER_TITLE.to_string()
}

impl Default for ProfileDocument {
    fn default() -> Self {
        ProfileDocument {
            id: None,
            name: default_name(),
            title: default_title(),
            bio: String::new(),
            headline: String::new(),
            contact: None,
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            projects: None,
            languages: None,
            social_links: None,
            custom_sections: None,
            design_style: None,
            color_scheme: None,
            font_pairings: None,
            optimization_notes: None,
            display_picture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_placeholders() {
        let doc: ProfileDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.name, PLACEHOLDER_NAME);
        assert_eq!(doc.title, PLACEHOLDER_TITLE);
        assert!(doc.experience.is_empty());
        assert!(doc.education.is_empty());
    }

    #[test]
    fn test_camel_case_wire_format() {
        let mut doc = ProfileDocument::default();
        doc.social_links = Some(vec![SocialLink {
            platform: "LinkedIn".to_string(),
            url: "https://linkedin.com/in/x".to_string(),
        }]);
        doc.custom_sections = Some(vec![]);
        doc.display_picture = Some("https://example.com/p.png".to_string());

        let v = serde_json::to_value(&doc).unwrap();
        assert!(v.get("socialLinks").is_some());
        assert!(v.get("customSections").is_some());
        assert!(v.get("displayPicture").is_some());
        assert!(v.get("social_links").is_none());
    }

    #[test]
    fn test_absent_optional_arrays_stay_absent() {
        let doc = ProfileDocument::default();
        let v = serde_json::to_value(&doc).unwrap();
        assert!(v.get("projects").is_none());
        assert!(v.get("languages").is_none());
        // experience/education always serialize, even when empty
        assert!(v.get("experience").unwrap().as_array().unwrap().is_empty());
        assert!(v.get("education").unwrap().as_array().unwrap().is_empty());
    }

}
