//! Per-field validation rules for uploads and edits.
//!
//! Each check is a pure function returning zero or one field-scoped error;
//! callers collect everything before rejecting so the client sees all
//! problems at once instead of fixing them one round-trip at a time.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::filename::file_extension;
use crate::kind_map::KindMap;
use crate::models::{MediaType, TrimRange, Visibility};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_TAGS_CHARS: usize = 500;
pub const MAX_CATEGORY_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;
/// 2 MiB cap on rewritten text content.
pub const MAX_TEXT_BYTES: usize = 2 * 1024 * 1024;
/// 100 MiB cap on replacement images.
pub const MAX_IMAGE_BYTES: u64 = 100 * 1024 * 1024;
/// Shortest clip a trim may produce, in seconds.
pub const MIN_CLIP_SECONDS: f64 = 0.1;

/// One validation failure, scoped to the offending field. `field` is `None`
/// for record-level problems (missing file, transform failures).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn record(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

pub fn check_title(title: &str) -> Option<FieldError> {
    if title.trim().is_empty() {
        Some(FieldError::new("title", "Title is required."))
    } else if title.chars().count() > MAX_TITLE_CHARS {
        Some(FieldError::new(
            "title",
            "Title cannot exceed 200 characters.",
        ))
    } else {
        None
    }
}

pub fn check_tags(tags: Option<&str>) -> Option<FieldError> {
    match tags {
        Some(t) if !t.is_empty() && t.chars().count() > MAX_TAGS_CHARS => Some(FieldError::new(
            "tags",
            "Tags must be 500 characters or fewer.",
        )),
        _ => None,
    }
}

pub fn check_category(category: Option<&str>) -> Option<FieldError> {
    match category {
        Some(c) if !c.is_empty() && c.chars().count() > MAX_CATEGORY_CHARS => Some(
            FieldError::new("category", "Category must be 100 characters or fewer."),
        ),
        _ => None,
    }
}

pub fn check_description(description: Option<&str>) -> Option<FieldError> {
    match description {
        Some(d) if !d.is_empty() && d.chars().count() > MAX_DESCRIPTION_CHARS => Some(
            FieldError::new("description", "Description must be 2000 characters or fewer."),
        ),
        _ => None,
    }
}

/// Accepts exactly `Private`/`Public` case-insensitively; returns the
/// normalized value on success.
pub fn check_visibility(value: &str) -> Result<Visibility, FieldError> {
    Visibility::parse(value)
        .ok_or_else(|| FieldError::new("visibility", "Visibility selection is invalid."))
}

pub fn check_text_content(content: &str) -> Option<FieldError> {
    if content.trim().is_empty() {
        return Some(FieldError::new("text_content", "File content cannot be empty."));
    }

    if content.len() > MAX_TEXT_BYTES {
        return Some(FieldError::new(
            "text_content",
            format!(
                "Text content exceeds the {}MB limit.",
                MAX_TEXT_BYTES / (1024 * 1024)
            ),
        ));
    }

    None
}

pub fn check_image_replacement(
    size_bytes: u64,
    file_name: &str,
    kind_map: &KindMap,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if size_bytes == 0 {
        errors.push(FieldError::new(
            "image_replacement",
            "Please choose a non-empty image.",
        ));
        return errors;
    }

    if size_bytes > MAX_IMAGE_BYTES {
        errors.push(FieldError::new(
            "image_replacement",
            format!(
                "Image exceeds the {}MB limit.",
                MAX_IMAGE_BYTES / (1024 * 1024)
            ),
        ));
    }

    let extension = file_extension(file_name);
    if !kind_map.is_image_extension(&extension) {
        let mut supported = kind_map.image_extensions().to_vec();
        supported.sort();
        errors.push(FieldError::new(
            "image_replacement",
            format!(
                "Unsupported image format. Supported formats: {}",
                supported.join(", ")
            ),
        ));
    }

    errors
}

/// Validate trim bounds against the known source duration.
///
/// Supplied bounds are clamped to zero; a missing end falls back to the
/// source duration. Bounds beyond the source duration (with a 0.001s
/// tolerance for float drift in stored durations) are rejected, the end must
/// be strictly after the start, and the clip must be at least
/// [`MIN_CLIP_SECONDS`] long.
pub fn check_trim_range(
    start: Option<f64>,
    end: Option<f64>,
    source_duration: Option<f64>,
) -> Result<TrimRange, Vec<FieldError>> {
    let mut errors = Vec::new();

    let start_val = start.unwrap_or(0.0).max(0.0);
    let end_val = end.or(source_duration).unwrap_or(0.0).max(0.0);

    if let Some(duration) = source_duration {
        if start_val > duration + 0.001 {
            errors.push(FieldError::new(
                "trim_start_seconds",
                "Start time exceeds the video duration.",
            ));
        }
        if end_val > duration + 0.001 {
            errors.push(FieldError::new(
                "trim_end_seconds",
                "End time exceeds the video duration.",
            ));
        }
    }

    if end_val <= start_val {
        errors.push(FieldError::new(
            "trim_end_seconds",
            "End time must be greater than start time.",
        ));
    } else if end_val - start_val + 1e-9 < MIN_CLIP_SECONDS {
        // The epsilon keeps legitimate 0.1s clips from being rejected over
        // float subtraction artifacts.
        errors.push(FieldError::new(
            "trim_end_seconds",
            "Trimmed clip must be at least 0.1 seconds long.",
        ));
    }

    if errors.is_empty() {
        Ok(TrimRange {
            start: start_val,
            end: end_val,
        })
    } else {
        Err(errors)
    }
}

/// Upload-time validation: non-empty file, size cap, extension allow-list for
/// the declared type.
pub fn check_upload_file(
    file_name: &str,
    size_bytes: u64,
    declared: MediaType,
    max_upload_bytes: u64,
    kind_map: &KindMap,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if size_bytes == 0 {
        errors.push(FieldError::new("file", "Please select a file."));
        return errors;
    }

    if size_bytes > max_upload_bytes {
        errors.push(FieldError::new(
            "file",
            format!(
                "File size exceeds {}MB limit.",
                max_upload_bytes / (1024 * 1024)
            ),
        ));
    }

    let extension = file_extension(file_name);
    if extension.is_empty()
        || !kind_map
            .upload_extensions(declared)
            .contains(&extension)
    {
        errors.push(FieldError::new("file", "Unsupported file format."));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_required() {
        assert!(check_title("").is_some());
        assert!(check_title("   ").is_some());
        assert!(check_title("ok").is_none());
    }

    #[test]
    fn test_title_length_boundary() {
        let exact = "a".repeat(200);
        assert!(check_title(&exact).is_none());
        let over = "a".repeat(201);
        let err = check_title(&over).unwrap();
        assert_eq!(err.field.as_deref(), Some("title"));
        assert_eq!(err.message, "Title cannot exceed 200 characters.");
    }

    #[test]
    fn test_tags_category_description_limits() {
        assert!(check_tags(Some(&"t".repeat(500))).is_none());
        assert!(check_tags(Some(&"t".repeat(501))).is_some());
        assert!(check_tags(None).is_none());

        assert!(check_category(Some(&"c".repeat(100))).is_none());
        assert!(check_category(Some(&"c".repeat(101))).is_some());

        assert!(check_description(Some(&"d".repeat(2000))).is_none());
        assert!(check_description(Some(&"d".repeat(2001))).is_some());
    }

    #[test]
    fn test_visibility_values() {
        assert_eq!(check_visibility("private").unwrap(), Visibility::Private);
        assert_eq!(check_visibility("PUBLIC").unwrap(), Visibility::Public);
        let err = check_visibility("shared").unwrap_err();
        assert_eq!(err.message, "Visibility selection is invalid.");
    }

    #[test]
    fn test_text_content_rules() {
        assert!(check_text_content("hello").is_none());
        let err = check_text_content("  \n ").unwrap();
        assert_eq!(err.message, "File content cannot be empty.");

        let big = "x".repeat(MAX_TEXT_BYTES + 1);
        let err = check_text_content(&big).unwrap();
        assert!(err.message.contains("2MB"));

        let exactly = "x".repeat(MAX_TEXT_BYTES);
        assert!(check_text_content(&exactly).is_none());
    }

    #[test]
    fn test_image_replacement_empty_file() {
        let map = KindMap::default();
        let errors = check_image_replacement(0, "photo.png", &map);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Please choose a non-empty image.");
    }

    #[test]
    fn test_image_replacement_bad_extension() {
        let map = KindMap::default();
        let errors = check_image_replacement(10, "photo.tiff", &map);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Unsupported image format."));
    }

    #[test]
    fn test_image_replacement_too_large_and_bad_extension_collects_both() {
        let map = KindMap::default();
        let errors = check_image_replacement(MAX_IMAGE_BYTES + 1, "photo.tiff", &map);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_trim_range_happy_path() {
        let range = check_trim_range(Some(2.0), Some(5.0), Some(10.0)).unwrap();
        assert_eq!(range.start, 2.0);
        assert_eq!(range.end, 5.0);
        assert!((range.clip_duration() - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_trim_range_clamps_negative_start() {
        let range = check_trim_range(Some(-3.0), Some(4.0), Some(10.0)).unwrap();
        assert_eq!(range.start, 0.0);
    }

    #[test]
    fn test_trim_range_end_defaults_to_duration() {
        let range = check_trim_range(Some(1.0), None, Some(8.0)).unwrap();
        assert_eq!(range.end, 8.0);
    }

    #[test]
    fn test_trim_range_exceeding_duration() {
        let errors = check_trim_range(Some(11.0), Some(12.0), Some(10.0)).unwrap_err();
        let fields: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
        assert!(fields.contains(&"trim_start_seconds"));
        assert!(fields.contains(&"trim_end_seconds"));
    }

    #[test]
    fn test_trim_range_duration_tolerance() {
        // Stored durations drift below the real value; 0.001s of slack keeps
        // full-length trims valid.
        assert!(check_trim_range(Some(0.0), Some(10.0005), Some(10.0)).is_ok());
        assert!(check_trim_range(Some(0.0), Some(10.01), Some(10.0)).is_err());
    }

    #[test]
    fn test_trim_range_end_not_after_start() {
        let errors = check_trim_range(Some(5.0), Some(5.0), Some(10.0)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "End time must be greater than start time.");
    }

    #[test]
    fn test_trim_range_minimum_clip_boundary() {
        // 0.099s clip is rejected, 0.1s is accepted.
        assert!(check_trim_range(Some(0.0), Some(0.099), Some(10.0)).is_err());
        assert!(check_trim_range(Some(0.0), Some(0.1), Some(10.0)).is_ok());
        // Float subtraction artifacts must not reject a legitimate 0.1s clip.
        assert!(check_trim_range(Some(4.9), Some(5.0), Some(10.0)).is_ok());
    }

    #[test]
    fn test_trim_range_without_known_duration() {
        // Unknown source duration skips the bound checks but keeps ordering.
        assert!(check_trim_range(Some(2.0), Some(100.0), None).is_ok());
        assert!(check_trim_range(Some(2.0), None, None).is_err());
    }

    #[test]
    fn test_upload_file_rules() {
        let map = KindMap::default();
        let max = 100 * 1024 * 1024;

        assert!(check_upload_file("a.mp4", 10, MediaType::Video, max, &map).is_empty());
        assert!(check_upload_file("a.pdf", 10, MediaType::Document, max, &map).is_empty());

        let errors = check_upload_file("a.mp4", 0, MediaType::Video, max, &map);
        assert_eq!(errors[0].message, "Please select a file.");

        let errors = check_upload_file("a.exe", 10, MediaType::Video, max, &map);
        assert_eq!(errors[0].message, "Unsupported file format.");

        let errors = check_upload_file("a.mp4", max + 1, MediaType::Video, max, &map);
        assert!(errors[0].message.contains("100MB"));
    }
}
