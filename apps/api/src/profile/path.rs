//! Field path grammar.
//!
//! Recognized shapes:
//! - `field`                      — bare top-level identifier
//! - `parent.child`               — dotted nested property
//! - `array[N].property`          — indexed sequence element
//! - `array[N].items[M].property` — doubly-indexed custom-section item
//!
//! A path that matches none of these is an explicit error, never a silent
//! no-op: a typo in a field path must not drop the edit on the floor.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FieldPathError {
    #[error("Unrecognized field path: {0}")]
    UnrecognizedPath(String),

    #[error("Profile document is not a JSON object")]
    NotAnObject,

    #[error("Field '{0}' holds a sequence; use an indexed path like '{0}[0].…'")]
    ParentIsSequence(String),
}

/// A parsed field path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPath {
    /// `name`
    Top(String),
    /// `parent.child`
    Nested { parent: String, child: String },
    /// `array[N].property`
    Indexed {
        array: String,
        index: usize,
        property: String,
    },
    /// `array[N].items[M].property`
    ItemIndexed {
        array: String,
        index: usize,
        item: usize,
        property: String,
    },
}

fn indexed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-zA-Z]+)\[(\d+)\]\.(?:items\[(\d+)\]\.([a-zA-Z]+)|([a-zA-Z]+))$")
            .expect("indexed field path regex")
    })
}

fn nested_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-zA-Z]+)\.([a-zA-Z]+)$").expect("nested field path regex"))
}

fn top_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z]+$").expect("top-level field path regex"))
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<FieldPath, FieldPathError> {
        if let Some(caps) = indexed_re().captures(path) {
            // The historical client sends 'experiences'; the data model uses
            // 'experience'.
            let array = canonical_array_name(&caps[1]).to_string();
            let index: usize = caps[2]
                .parse()
                .map_err(|_| FieldPathError::UnrecognizedPath(path.to_string()))?;

            return match (caps.get(3), caps.get(4), caps.get(5)) {
                (Some(item), Some(property), None) => {
                    let item: usize = item
                        .as_str()
                        .parse()
                        .map_err(|_| FieldPathError::UnrecognizedPath(path.to_string()))?;
                    Ok(FieldPath::ItemIndexed {
                        array,
                        index,
                        item,
                        property: property.as_str().to_string(),
                    })
                }
                (None, None, Some(property)) => Ok(FieldPath::Indexed {
                    array,
                    index,
                    property: property.as_str().to_string(),
                }),
                _ => Err(FieldPathError::UnrecognizedPath(path.to_string())),
            };
        }

        if let Some(caps) = nested_re().captures(path) {
            return Ok(FieldPath::Nested {
                parent: caps[1].to_string(),
                child: caps[2].to_string(),
            });
        }

        if top_re().is_match(path) {
            return Ok(FieldPath::Top(path.to_string()));
        }

        Err(FieldPathError::UnrecognizedPath(path.to_string()))
    }
}

fn canonical_array_name(name: &str) -> &str {
    if name == "experiences" {
        "experience"
    } else {
        name
    }
}
