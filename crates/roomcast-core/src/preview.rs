//! Derived presentation data for a media record: guessed content type,
//! human-readable size, and how a document should be previewed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{MediaRecord, MediaType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentPreviewMode {
    Pdf,
    PlainText,
    None,
}

/// Never persisted; rebuilt from the record on every request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaPreview {
    pub content_type: String,
    pub file_size_label: String,
    pub document_preview_mode: DocumentPreviewMode,
    pub document_embed_url: Option<String>,
}

/// Fixed extension-to-MIME table. Unknown extensions fall back to
/// `application/octet-stream`.
pub fn guess_content_type(file_format: &str) -> &'static str {
    if file_format.trim().is_empty() {
        return "application/octet-stream";
    }

    match file_format.trim().to_lowercase().as_str() {
        ".pdf" => "application/pdf",
        ".txt" | ".text" => "text/plain",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".bmp" => "image/bmp",
        ".webp" => "image/webp",
        ".mp4" => "video/mp4",
        ".mov" => "video/quicktime",
        ".m4v" => "video/x-m4v",
        ".avi" => "video/x-msvideo",
        ".mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

/// Human-readable byte count: `B` with no decimals, larger units with up to
/// two.
pub fn format_file_size(bytes: i64) -> String {
    if bytes < 0 {
        return "0 B".to_string();
    }

    const SUFFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut suffix_index = 0;

    while size >= 1024.0 && suffix_index < SUFFIXES.len() - 1 {
        size /= 1024.0;
        suffix_index += 1;
    }

    if suffix_index == 0 {
        format!("{:.0} {}", size, SUFFIXES[suffix_index])
    } else {
        let rounded = format!("{:.2}", size);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", trimmed, SUFFIXES[suffix_index])
    }
}

pub fn build_preview(record: &MediaRecord) -> MediaPreview {
    let content_type = if record.content_type.trim().is_empty() {
        guess_content_type(&record.file_format).to_string()
    } else {
        record.content_type.clone()
    };

    let mut preview = MediaPreview {
        content_type,
        file_size_label: format_file_size(record.file_size),
        document_preview_mode: DocumentPreviewMode::None,
        document_embed_url: None,
    };

    // Inline preview only applies to declared documents.
    if record.file_type == MediaType::Document {
        match record.file_format.trim().to_lowercase().as_str() {
            ".pdf" => {
                preview.document_preview_mode = DocumentPreviewMode::Pdf;
                preview.document_embed_url = Some(record.file_path.clone());
            }
            ".txt" | ".text" => {
                preview.document_preview_mode = DocumentPreviewMode::PlainText;
                preview.document_embed_url = Some(record.file_path.clone());
            }
            _ => {}
        }
    }

    preview
}
