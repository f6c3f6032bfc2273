//! Post-processing of model-extracted profiles: empty-section cleanup,
//! LinkedIn merging, and heuristic bio synthesis when the model omitted one.

use crate::models::profile::{ProfileDocument, SocialLink};

const SUMMARY_HEADERS: [&str; 6] = [
    "professional summary",
    "professional objective",
    "career objective",
    "summary",
    "profile",
    "objective",
];

const SKILLS_NOTE: &str = "No explicit Skills section was found in your CV. \
    Consider adding a dedicated Skills section to highlight your expertise.";

/// Normalizes a freshly extracted profile in place.
pub fn postprocess(
    profile: &mut ProfileDocument,
    cv_text: &str,
    design_style: Option<&str>,
    linkedin_url: Option<&str>,
) {
    // Empty entries are treated as fabrications and dropped.
    profile.skills.retain(|s| !s.trim().is_empty());

    if let Some(projects) = profile.projects.take() {
        let projects: Vec<_> = projects
            .into_iter()
            .filter(|p| !p.name.trim().is_empty() || !p.description.trim().is_empty())
            .collect();
        if !projects.is_empty() {
            profile.projects = Some(projects);
        }
    }

    if let Some(sections) = profile.custom_sections.take() {
        let sections: Vec<_> = sections.into_iter().filter(|s| !s.items.is_empty()).collect();
        if !sections.is_empty() {
            profile.custom_sections = Some(sections);
        }
    }

    if let Some(languages) = profile.languages.take() {
        let languages: Vec<_> = languages
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .collect();
        if !languages.is_empty() {
            profile.languages = Some(languages);
        }
    }

    if let Some(url) = linkedin_url {
        merge_linkedin(profile, url);
    }

    if profile.bio.trim().is_empty() {
        if let Some(bio) = synthesize_bio(cv_text) {
            profile.bio = bio;
        }
    }

    if profile.design_style.is_none() {
        profile.design_style = Some(design_style.unwrap_or("modern").to_string());
    }

    if profile.skills.is_empty() {
        profile.optimization_notes = Some(SKILLS_NOTE.to_string());
    }
}

/// Adds the user-supplied LinkedIn URL, but only when the extracted data has
/// no LinkedIn entry already.
fn merge_linkedin(profile: &mut ProfileDocument, url: &str) {
    let links = profile.social_links.get_or_insert_with(Vec::new);
    let has_linkedin = links.iter().any(|link| {
        link.platform.to_lowercase().contains("linkedin")
            || link.url.to_lowercase().contains("linkedin.com")
    });
    if !has_linkedin {
        links.push(SocialLink {
            platform: "LinkedIn".to_string(),
            url: url.to_string(),
        });
    }
}

/// Tries to recover a bio from the raw CV text.
///
/// First pass: a section under a summary-like header. Second pass: the first
/// plausible paragraph within the opening 20 lines (40-500 chars, no colon,
/// not a bullet or numbered line).
pub fn synthesize_bio(cv_text: &str) -> Option<String> {
    let lines: Vec<&str> = cv_text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let lowered = line.trim().to_lowercase();
        if !SUMMARY_HEADERS.iter().any(|h| lowered.contains(h)) {
            continue;
        }

        let mut content = Vec::new();
        for next in lines.iter().skip(i + 1) {
            let trimmed = next.trim();
            let lowered = trimmed.to_lowercase();
            if SUMMARY_HEADERS.iter().any(|h| lowered.contains(h))
                || is_bullet(trimmed)
                || content.len() >= 5
            {
                break;
            }
            if !trimmed.is_empty() {
                content.push(trimmed);
            }
        }

        if !content.is_empty() {
            return Some(content.join(" "));
        }
    }

    // No labeled section; summaries often lead the document without a header.
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines.iter().take(20) {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            current.push(trimmed);
        } else if !current.is_empty() {
            paragraphs.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.into_iter().find(|p| {
        p.len() > 40 && p.len() < 500 && !p.contains(':') && !is_bullet(p) && !is_numbered(p)
    })
}

fn is_bullet(line: &str) -> bool {
    line.starts_with('\u{2022}') || line.starts_with('-') || line.starts_with('*')
}

fn is_numbered(line: &str) -> bool {
    let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    let rest = &line[digits.len()..];
    rest.starts_with('.') && rest[1..].starts_with(char::is_whitespace)
}
