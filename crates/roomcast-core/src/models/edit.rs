//! Transient types for the media edit workflow. None of these are persisted;
//! they exist for the duration of one edit call.

use std::path::PathBuf;

use bytes::Bytes;
use uuid::Uuid;

/// New metadata values for an edit. All fields are the raw user input;
/// trimming and visibility normalization happen during validation.
#[derive(Debug, Clone)]
pub struct EditMetadata {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub visibility: String,
}

/// Kind-specific payload of an edit, as a tagged sum so each variant carries
/// only the fields that apply to it.
#[derive(Debug, Clone)]
pub enum EditPayload {
    /// Metadata-only edit; the artifact is untouched.
    MetadataOnly,
    /// Rewrite the backing text file with new UTF-8 content.
    Text { content: String },
    /// Replace the backing image with uploaded bytes.
    Image {
        bytes: Bytes,
        original_file_name: String,
        content_type: Option<String>,
    },
    /// Trim the backing video to `[start, end]` seconds.
    VideoTrim {
        start: Option<f64>,
        end: Option<f64>,
        overwrite: bool,
    },
}

impl EditPayload {
    pub fn kind_name(&self) -> &'static str {
        match self {
            EditPayload::MetadataOnly => "metadata",
            EditPayload::Text { .. } => "text",
            EditPayload::Image { .. } => "image",
            EditPayload::VideoTrim { .. } => "video_trim",
        }
    }
}

/// One edit call: the target record, new metadata, and the kind-specific
/// payload.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub file_id: Uuid,
    pub metadata: EditMetadata,
    pub payload: EditPayload,
}

/// Validated and clamped trim bounds, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    pub fn clip_duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Result of a kind-specific transform. `None` fields mean "unchanged";
/// the orchestrator applies only the populated ones to the record.
#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    /// Absolute path of the new artifact, for the superseded-file comparison.
    pub new_physical_path: Option<PathBuf>,
    pub stored_file_name: Option<String>,
    pub relative_path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub file_size: Option<i64>,
    pub duration_seconds: Option<f64>,
    pub file_format: Option<String>,
    pub original_file_name: Option<String>,
    pub content_type: Option<String>,
}
