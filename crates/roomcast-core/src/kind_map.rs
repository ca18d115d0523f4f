//! Extension-to-kind classification tables.
//!
//! The allow-lists are built once at startup from [`crate::config::Config`]
//! and passed by reference into validation and the transform engine, so there
//! is a single source of truth and no global mutable state.

use crate::models::MediaType;

/// Coarse classification driving which transform applies to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Text,
    Image,
    Video,
    Opaque,
}

/// Immutable extension allow-lists keyed by kind.
///
/// All entries are stored lowercase with the leading dot (`.mp4`), matching
/// how `file_format` is persisted.
#[derive(Debug, Clone)]
pub struct KindMap {
    video_extensions: Vec<String>,
    image_extensions: Vec<String>,
    text_extensions: Vec<String>,
    document_extensions: Vec<String>,
}

fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().to_lowercase();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{}", trimmed)
    }
}

fn normalize_all(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| normalize_extension(e))
        .filter(|e| !e.is_empty())
        .collect()
}

impl KindMap {
    pub fn new(
        video_extensions: &[String],
        image_extensions: &[String],
        text_extensions: &[String],
        document_extensions: &[String],
    ) -> Self {
        Self {
            video_extensions: normalize_all(video_extensions),
            image_extensions: normalize_all(image_extensions),
            text_extensions: normalize_all(text_extensions),
            document_extensions: normalize_all(document_extensions),
        }
    }

    /// Classify a record from its declared type and its stored extension.
    ///
    /// Video and image also match on the declared type; text matches purely
    /// on the extension allow-list, regardless of what the uploader declared.
    pub fn classify(&self, declared: MediaType, file_format: &str) -> MediaKind {
        let ext = normalize_extension(file_format);

        if declared == MediaType::Video || self.video_extensions.contains(&ext) {
            return MediaKind::Video;
        }

        if declared == MediaType::Picture || self.image_extensions.contains(&ext) {
            return MediaKind::Image;
        }

        if self.text_extensions.contains(&ext) {
            return MediaKind::Text;
        }

        MediaKind::Opaque
    }

    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions.contains(&normalize_extension(ext))
    }

    /// Upload allow-list for a declared type.
    pub fn upload_extensions(&self, declared: MediaType) -> &[String] {
        match declared {
            MediaType::Document => &self.document_extensions,
            MediaType::Picture => &self.image_extensions,
            MediaType::Video => &self.video_extensions,
        }
    }

    pub fn image_extensions(&self) -> &[String] {
        &self.image_extensions
    }
}

impl Default for KindMap {
    fn default() -> Self {
        let to_vec = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self::new(
            &to_vec(&[".mp4", ".mov", ".m4v", ".avi", ".mkv"]),
            &to_vec(&[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"]),
            &to_vec(&[
                ".txt",
                ".md",
                ".markdown",
                ".json",
                ".yaml",
                ".yml",
                ".csv",
                ".log",
                ".xml",
            ]),
            &to_vec(&[
                ".pdf",
                ".txt",
                ".text",
                ".md",
                ".markdown",
                ".json",
                ".yaml",
                ".yml",
                ".csv",
                ".log",
                ".xml",
                ".doc",
                ".docx",
            ]),
        )
    }
}
