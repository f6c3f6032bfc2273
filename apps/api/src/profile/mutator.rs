//! Applies a single field-path update to a Profile Document.
//!
//! The mutator operates on the persisted JSON form (`serde_json::Value`) so
//! that raw-string fallbacks can be stored even where the typed schema
//! expects an array. The input document is never mutated; every update
//! returns a new document value which the caller both applies locally and
//! pushes to the store.

use serde_json::{json, Map, Value};

use crate::profile::path::{FieldPath, FieldPathError};

/// Updates `document` at `path` with `value`, returning the new document.
///
/// Post-condition: the returned document always carries `experience` as an
/// array, regardless of which field was updated.
pub fn update_profile_field(
    document: &Value,
    path: &str,
    value: &str,
) -> Result<Value, FieldPathError> {
    let parsed = FieldPath::parse(path)?;

    let mut doc = document
        .as_object()
        .cloned()
        .ok_or(FieldPathError::NotAnObject)?;

    match parsed {
        FieldPath::Top(name) => {
            doc.insert(name.clone(), coerce_top_level(&name, value));
        }

        FieldPath::Nested { parent, child } => {
            // A dotted path must not clobber a sequence field: writing
            // `experience.note` would otherwise wipe every entry.
            if doc.get(&parent).map(Value::is_array).unwrap_or(false) {
                return Err(FieldPathError::ParentIsSequence(parent));
            }
            let obj = ensure_object(&mut doc, &parent);
            obj.insert(child, Value::String(value.to_string()));
        }

        FieldPath::Indexed {
            array,
            index,
            property,
        } => {
            let arr = ensure_array(&mut doc, &array);
            pad_with_objects(arr, index);
            let element = ensure_element_object(arr, index);
            element.insert(property.clone(), coerce_indexed(&property, value));
        }

        FieldPath::ItemIndexed {
            array,
            index,
            item,
            property,
        } => {
            let arr = ensure_array(&mut doc, &array);
            pad_with_objects(arr, index);
            let element = ensure_element_object(arr, index);

            let items = element
                .entry("items".to_string())
                .or_insert_with(|| json!([]));
            if !items.is_array() {
                *items = json!([]);
            }
            let items = items.as_array_mut().expect("items ensured as array");
            pad_with_objects(items, item);
            let target = ensure_element_object(items, item);
            target.insert(property, Value::String(value.to_string()));
        }
    }

    // Callers must never observe a document without an experience sequence.
    if !doc.get("experience").map(Value::is_array).unwrap_or(false) {
        doc.insert("experience".to_string(), json!([]));
    }

    Ok(Value::Object(doc))
}

/// Top-level `skills`/`languages` accept either a JSON array or a
/// comma-separated string; everything else is stored verbatim.
fn coerce_top_level(field: &str, value: &str) -> Value {
    if field == "skills" || field == "languages" {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(value) {
            return Value::Array(items);
        }
        let items: Vec<Value> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect();
        return Value::Array(items);
    }
    Value::String(value.to_string())
}

/// `details` properties and values shaped like a JSON array are parsed as
/// JSON; if parsing fails, the raw string is stored instead (never an error).
fn coerce_indexed(property: &str, value: &str) -> Value {
    let looks_like_array = value.starts_with('[') && value.ends_with(']');
    if property == "details" || looks_like_array {
        if let Ok(parsed) = serde_json::from_str::<Value>(value) {
            return parsed;
        }
    }
    Value::String(value.to_string())
}

fn ensure_object<'a>(doc: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = doc.entry(key.to_string()).or_insert_with(|| json!({}));
    if !entry.is_object() {
        *entry = json!({});
    }
    entry.as_object_mut().expect("entry ensured as object")
}

fn ensure_array<'a>(doc: &'a mut Map<String, Value>, key: &str) -> &'a mut Vec<Value> {
    let entry = doc.entry(key.to_string()).or_insert_with(|| json!([]));
    if !entry.is_array() {
        *entry = json!([]);
    }
    entry.as_array_mut().expect("entry ensured as array")
}

/// Appends empty objects until the sequence has at least `index + 1` elements.
fn pad_with_objects(arr: &mut Vec<Value>, index: usize) {
    while arr.len() <= index {
        arr.push(json!({}));
    }
}

fn ensure_element_object(arr: &mut [Value], index: usize) -> &mut Map<String, Value> {
    if !arr[index].is_object() {
        arr[index] = json!({});
    }
    arr[index].as_object_mut().expect("element ensured as object")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_doc() -> Value {
        json!({})
    }

    #[test]
    fn test_top_level_string_set() {
        let out = update_profile_field(&empty_doc(), "name", "Ada Lovelace").unwrap();
        assert_eq!(out["name"], "Ada Lovelace");
    }

    #[test]
    fn test_input_document_is_not_mutated() {
        let doc = json!({"name": "Before"});
        let _ = update_profile_field(&doc, "name", "After").unwrap();
        assert_eq!(doc["name"], "Before");
    }

    #[test]
    fn test_nested_creates_parent_object() {
        let out = update_profile_field(&empty_doc(), "contact.email", "ada@example.com").unwrap();
        assert_eq!(out["contact"]["email"], "ada@example.com");
    }

    #[test]
    fn test_indexed_pads_with_empty_objects() {
        let out = update_profile_field(&empty_doc(), "education[2].degree", "BSc").unwrap();
        let arr = out["education"].as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr[0], json!({}));
        assert_eq!(arr[1], json!({}));
        assert_eq!(arr[2]["degree"], "BSc");
    }

    #[test]
    fn test_experiences_alias_routes_to_experience() {
        let out = update_profile_field(&empty_doc(), "experiences[0].title", "Engineer").unwrap();
        assert_eq!(out["experience"][0]["title"], "Engineer");
        assert!(out.get("experiences").is_none());
    }

    #[test]
    fn test_details_parses_json_array() {
        let out = update_profile_field(
            &empty_doc(),
            "experience[0].details",
            r#"["Shipped v1", "Cut latency 40%"]"#,
        )
        .unwrap();
        assert_eq!(
            out["experience"][0]["details"],
            json!(["Shipped v1", "Cut latency 40%"])
        );
    }

    #[test]
    fn test_details_falls_back_to_raw_string_on_bad_json() {
        let out =
            update_profile_field(&empty_doc(), "experience[0].details", "[not, valid json")
                .unwrap();
        assert_eq!(out["experience"][0]["details"], "[not, valid json");
    }

    #[test]
    fn test_array_shaped_value_parses_on_any_property() {
        let out = update_profile_field(
            &empty_doc(),
            "projects[0].technologies",
            r#"["Rust", "Postgres"]"#,
        )
        .unwrap();
        assert_eq!(out["projects"][0]["technologies"], json!(["Rust", "Postgres"]));
    }

    #[test]
    fn test_skills_comma_split_trims_and_drops_empties() {
        let out = update_profile_field(&empty_doc(), "skills", "Go, Rust ,  ").unwrap();
        assert_eq!(out["skills"], json!(["Go", "Rust"]));
    }

    #[test]
    fn test_languages_accept_json_array() {
        let out =
            update_profile_field(&empty_doc(), "languages", r#"["English", "French"]"#).unwrap();
        assert_eq!(out["languages"], json!(["English", "French"]));
    }

    #[test]
    fn test_experience_always_present_after_any_update() {
        let out = update_profile_field(&empty_doc(), "bio", "Hello").unwrap();
        assert!(out["experience"].as_array().unwrap().is_empty());

        let doc = json!({"name": "Ada"});
        let out = update_profile_field(&doc, "contact.phone", "555").unwrap();
        assert!(out["experience"].is_array());
    }

    #[test]
    fn test_idempotent_for_scalar_paths() {
        let once = update_profile_field(&empty_doc(), "experience[1].company", "Acme").unwrap();
        let twice = update_profile_field(&once, "experience[1].company", "Acme").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_section_item_scenario() {
        let out = update_profile_field(
            &empty_doc(),
            "customSections[0].items[2].description",
            "Built a compiler",
        )
        .unwrap();
        assert_eq!(
            out["customSections"],
            json!([{"items": [{}, {}, {"description": "Built a compiler"}]}])
        );
    }

    #[test]
    fn test_unrecognized_path_is_an_error() {
        let err = update_profile_field(&empty_doc(), "experience[0]", "x").unwrap_err();
        assert!(matches!(err, FieldPathError::UnrecognizedPath(_)));
    }

    #[test]
    fn test_nested_path_refuses_to_clobber_sequence() {
        let doc = json!({"experience": [{"title": "Engineer", "company": "Acme"}]});
        let err = update_profile_field(&doc, "experience.note", "oops").unwrap_err();
        assert_eq!(err, FieldPathError::ParentIsSequence("experience".to_string()));
        // The original document keeps its entries.
        assert_eq!(doc["experience"][0]["title"], "Engineer");
    }

    #[test]
    fn test_nested_path_still_replaces_scalar_parent() {
        let doc = json!({"contact": "n/a"});
        let out = update_profile_field(&doc, "contact.email", "ada@example.com").unwrap();
        assert_eq!(out["contact"]["email"], "ada@example.com");
    }

    #[test]
    fn test_non_object_document_is_an_error() {
        let err = update_profile_field(&json!([1, 2]), "name", "x").unwrap_err();
        assert_eq!(err, FieldPathError::NotAnObject);
    }

    #[test]
    fn test_existing_array_elements_preserved() {
        let doc = json!({"experience": [{"title": "Old", "company": "Acme"}]});
        let out = update_profile_field(&doc, "experience[0].title", "New").unwrap();
        assert_eq!(out["experience"][0]["title"], "New");
        assert_eq!(out["experience"][0]["company"], "Acme");
    }
}
