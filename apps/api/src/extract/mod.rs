// Document Text Extractor: turns an uploaded CV file into plain text.
// Page-oriented, failure-tolerant PDF extraction plus raw-text passthrough
// for Word/plain uploads.

pub mod text;
pub mod validation;

pub use text::{extract_text, ExtractError, MediaType, MIN_TEXT_CHARS};
pub use validation::{validate_document, validate_profile_image};
