use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Declared coarse type chosen at upload time.
///
/// This is what the uploader said the file is; the transform engine works on
/// the derived [`crate::kind_map::MediaKind`] instead, which also inspects the
/// file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Document,
    Picture,
    Video,
}

impl MediaType {
    /// Storage subfolder under `uploads/` for artifacts of this type.
    pub fn storage_subfolder(&self) -> &'static str {
        match self {
            MediaType::Document => "documents",
            MediaType::Picture => "pictures",
            MediaType::Video => "videos",
        }
    }

    /// Parse a declared type, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "document" => Some(MediaType::Document),
            "picture" => Some(MediaType::Picture),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MediaType::Document => "document",
            MediaType::Picture => "picture",
            MediaType::Video => "video",
        };
        write!(f, "{}", s)
    }
}

/// Record visibility. Canonical casing on the wire is `Private` / `Public`;
/// parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "visibility", rename_all = "lowercase")
)]
pub enum Visibility {
    Private,
    Public,
}

impl Visibility {
    /// Case-insensitive parse; `None` for anything that is not
    /// `Private`/`Public`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "private" => Some(Visibility::Private),
            "public" => Some(Visibility::Public),
            _ => None,
        }
    }

    /// Normalize to a canonical value, defaulting to `Private` for anything
    /// unrecognized.
    pub fn normalize(value: &str) -> Self {
        Self::parse(value).unwrap_or(Visibility::Private)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "Private",
            Visibility::Public => "Public",
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Private
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted media record (table `media_files`).
///
/// Invariant: `stored_file_name`/`file_path` point to an artifact that exists
/// under the storage root whenever the record is considered valid, and
/// `file_size` equals that artifact's byte length.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct MediaRecord {
    pub file_id: Uuid,
    pub user_id: String,
    pub title: String,
    pub file_type: MediaType,
    /// Lowercase extension including the leading dot, e.g. `.mp4`.
    pub file_format: String,
    pub original_file_name: String,
    pub stored_file_name: String,
    pub content_type: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub visibility: Visibility,
    /// Comma-separated free text; empty when the user supplied none.
    pub tags: String,
    pub file_size: i64,
    /// Relative path beginning `/uploads/...`.
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}
