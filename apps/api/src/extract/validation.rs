//! Upload validation: media type, size ceilings, empty files.

use crate::errors::AppError;
use crate::extract::text::MediaType;

pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

const IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Validates an uploaded CV document and resolves its media type.
pub fn validate_document(content_type: &str, size: usize) -> Result<MediaType, AppError> {
    let media_type = MediaType::from_mime(content_type).map_err(|_| {
        AppError::Validation("Please upload a PDF, Word document, or text file".to_string())
    })?;

    if size == 0 {
        return Err(AppError::Validation(
            "The file appears to be empty".to_string(),
        ));
    }
    if size > MAX_DOCUMENT_BYTES {
        return Err(AppError::Validation(
            "File size should be less than 10MB".to_string(),
        ));
    }

    Ok(media_type)
}

/// Validates an uploaded profile image. Returns the file extension to store
/// the object under.
pub fn validate_profile_image(content_type: &str, size: usize) -> Result<&'static str, AppError> {
    if !IMAGE_TYPES.contains(&content_type) {
        return Err(AppError::Validation(
            "Please upload a valid image file (JPEG, PNG, GIF or WebP)".to_string(),
        ));
    }

    if size == 0 {
        return Err(AppError::Validation(
            "The file appears to be empty".to_string(),
        ));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "Image size should be less than 2MB".to_string(),
        ));
    }

    Ok(match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        _ => "webp",
    })
}
