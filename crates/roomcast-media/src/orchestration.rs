//! Edit orchestration: validate, transform, persist, clean up.
//!
//! Every edit moves through the same four stages. Validation collects every
//! field problem in one pass before anything touches disk, the transform
//! writes new artifacts without touching the old ones, persistence commits
//! the merged record, and only then are superseded files removed. A failure
//! in any stage leaves the previous stage's state intact.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use roomcast_core::models::{
    EditMetadata, EditPayload, EditRequest, MediaRecord, TransformOutcome, TrimRange, Visibility,
};
use roomcast_core::validation::{
    check_category, check_description, check_image_replacement, check_tags, check_text_content,
    check_title, check_trim_range, check_visibility, FieldError,
};
use roomcast_core::{AppError, KindMap, MediaKind};
use roomcast_storage::{is_same_path, MediaStore};

use crate::persistence::MediaPersistence;
use crate::probe::probe_duration;
use crate::process::TranscodeRunner;
use crate::transform::TransformEngine;

/// Transform decided on during validation, carrying validated inputs only.
enum Planned {
    None,
    Text(String),
    Image {
        bytes: Bytes,
        original_file_name: String,
        content_type: Option<String>,
    },
    Trim {
        range: TrimRange,
        overwrite: bool,
    },
}

pub struct EditOrchestrator {
    engine: TransformEngine,
    persistence: Arc<dyn MediaPersistence>,
    store: MediaStore,
    runner: Arc<dyn TranscodeRunner>,
    kind_map: KindMap,
}

impl EditOrchestrator {
    pub fn new(
        engine: TransformEngine,
        persistence: Arc<dyn MediaPersistence>,
        store: MediaStore,
        runner: Arc<dyn TranscodeRunner>,
        kind_map: KindMap,
    ) -> Self {
        Self {
            engine,
            persistence,
            store,
            runner,
            kind_map,
        }
    }

    /// Apply one edit to the caller's record and return the persisted result.
    #[tracing::instrument(skip(self, request), fields(
        file_id = %request.file_id,
        payload = request.payload.kind_name(),
    ))]
    pub async fn edit(
        &self,
        user_id: &str,
        request: EditRequest,
    ) -> Result<MediaRecord, AppError> {
        let record = self
            .persistence
            .get(user_id, request.file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Media file not found".to_string()))?;

        let mut errors = Vec::new();
        let visibility = self.check_metadata(&request.metadata, &mut errors);

        let mut probed_duration = None;
        let planned = self
            .check_payload(&record, request.payload, &mut errors, &mut probed_duration)
            .await;

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let old_relative = record.file_path.clone();
        let old_thumbnail = record.thumbnail_path.clone();

        // Metadata lands on the working copy first so transforms derive
        // filenames from the new title.
        let mut working = record;
        if probed_duration.is_some() {
            working.duration_seconds = probed_duration;
        }
        let visibility = visibility.unwrap_or(working.visibility);
        apply_metadata(&mut working, &request.metadata, visibility, user_id);

        let outcome = match planned {
            Planned::None => TransformOutcome::default(),
            Planned::Text(content) => self.engine.rewrite_text(&working, &content).await?,
            Planned::Image {
                bytes,
                original_file_name,
                content_type,
            } => {
                self.engine
                    .replace_image(
                        &working,
                        &bytes,
                        &original_file_name,
                        content_type.as_deref(),
                    )
                    .await?
            }
            Planned::Trim { range, overwrite } => {
                self.engine.trim_video(&working, range, overwrite).await?
            }
        };

        apply_outcome(&mut working, &outcome);

        let persisted = match self.persistence.update(&working).await {
            Ok(persisted) => persisted,
            Err(e) => {
                self.discard_new_artifacts(&outcome, &old_relative, old_thumbnail.as_deref())
                    .await;
                return Err(e);
            }
        };

        self.remove_superseded(&outcome, &old_relative, old_thumbnail.as_deref())
            .await;

        Ok(persisted)
    }

    fn check_metadata(
        &self,
        metadata: &EditMetadata,
        errors: &mut Vec<FieldError>,
    ) -> Option<Visibility> {
        errors.extend(check_title(&metadata.title));
        errors.extend(check_tags(metadata.tags.as_deref()));
        errors.extend(check_category(metadata.category.as_deref()));
        errors.extend(check_description(metadata.description.as_deref()));

        match check_visibility(&metadata.visibility) {
            Ok(visibility) => Some(visibility),
            Err(e) => {
                errors.push(e);
                None
            }
        }
    }

    /// Kind-gate the payload against the record and run its checks. A trim
    /// against a record with no stored duration probes the artifact here, so
    /// the bounds check always sees the freshest duration we can get.
    async fn check_payload(
        &self,
        record: &MediaRecord,
        payload: EditPayload,
        errors: &mut Vec<FieldError>,
        probed_duration: &mut Option<f64>,
    ) -> Planned {
        let kind = self.kind_map.classify(record.file_type, &record.file_format);

        match payload {
            EditPayload::MetadataOnly => Planned::None,
            EditPayload::Text { content } => {
                if kind != MediaKind::Text {
                    errors.push(FieldError::new(
                        "text_content",
                        "Text editing is only available for text files.",
                    ));
                    return Planned::None;
                }
                errors.extend(check_text_content(&content));
                Planned::Text(content)
            }
            EditPayload::Image {
                bytes,
                original_file_name,
                content_type,
            } => {
                if kind != MediaKind::Image {
                    errors.push(FieldError::new(
                        "image_replacement",
                        "Image replacement is only available for picture files.",
                    ));
                    return Planned::None;
                }
                errors.extend(check_image_replacement(
                    bytes.len() as u64,
                    &original_file_name,
                    &self.kind_map,
                ));
                Planned::Image {
                    bytes,
                    original_file_name,
                    content_type,
                }
            }
            EditPayload::VideoTrim {
                start,
                end,
                overwrite,
            } => {
                if kind != MediaKind::Video {
                    errors.push(FieldError::new(
                        "trim_start_seconds",
                        "Trimming is only available for video files.",
                    ));
                    return Planned::None;
                }

                let duration = match record.duration_seconds {
                    Some(duration) => Some(duration),
                    None => {
                        let probed = match self.store.resolve(&record.file_path) {
                            Ok(path) => probe_duration(self.runner.as_ref(), &path).await,
                            Err(e) => {
                                tracing::warn!(error = %e, "Could not resolve video for probing");
                                None
                            }
                        };
                        *probed_duration = probed;
                        probed
                    }
                };

                match check_trim_range(start, end, duration) {
                    Ok(range) => Planned::Trim { range, overwrite },
                    Err(mut range_errors) => {
                        errors.append(&mut range_errors);
                        Planned::None
                    }
                }
            }
        }
    }

    /// A persist failure must not leak the artifacts the transform just
    /// wrote; the record still points at the old ones.
    async fn discard_new_artifacts(
        &self,
        outcome: &TransformOutcome,
        old_relative: &str,
        old_thumbnail: Option<&str>,
    ) {
        if let Some(new_relative) = outcome.relative_path.as_deref() {
            if !new_relative.eq_ignore_ascii_case(old_relative) {
                if let Err(e) = self.store.delete(new_relative).await {
                    tracing::warn!(error = %e, path = new_relative, "Failed to discard unpersisted artifact");
                }
            }
        }

        if let Some(new_thumbnail) = outcome.thumbnail_path.as_deref() {
            let same = old_thumbnail
                .map(|old| old.eq_ignore_ascii_case(new_thumbnail))
                .unwrap_or(false);
            if !same {
                if let Err(e) = self.store.delete(new_thumbnail).await {
                    tracing::warn!(error = %e, path = new_thumbnail, "Failed to discard unpersisted thumbnail");
                }
            }
        }
    }

    /// Delete files the committed record no longer references. Removal is
    /// best-effort: the record is already persisted, so an orphaned file
    /// beats a dangling reference.
    async fn remove_superseded(
        &self,
        outcome: &TransformOutcome,
        old_relative: &str,
        old_thumbnail: Option<&str>,
    ) {
        if let Some(new_relative) = outcome.relative_path.as_deref() {
            let same = match (
                self.store.resolve(old_relative),
                self.store.resolve(new_relative),
            ) {
                (Ok(old_path), Ok(new_path)) => is_same_path(&old_path, &new_path),
                _ => true,
            };
            if !same {
                if let Err(e) = self.store.delete(old_relative).await {
                    tracing::warn!(error = %e, path = old_relative, "Failed to remove superseded artifact");
                }
            }
        }

        if let (Some(new_thumbnail), Some(old)) = (outcome.thumbnail_path.as_deref(), old_thumbnail)
        {
            if !old.eq_ignore_ascii_case(new_thumbnail) {
                if let Err(e) = self.store.delete(old).await {
                    tracing::warn!(error = %e, path = old, "Failed to remove superseded thumbnail");
                }
            }
        }
    }
}

fn apply_metadata(
    record: &mut MediaRecord,
    metadata: &EditMetadata,
    visibility: Visibility,
    user_id: &str,
) {
    record.title = metadata.title.trim().to_string();
    record.description = normalize_optional(metadata.description.as_deref());
    record.category = normalize_optional(metadata.category.as_deref());
    record.tags = metadata
        .tags
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    record.visibility = visibility;
    record.updated_at = Utc::now();
    record.updated_by = Some(user_id.to_string());
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        Some("") | None => None,
        Some(trimmed) => Some(trimmed.to_string()),
    }
}

/// Merge a transform outcome into the record. The stored name and path move
/// together or not at all, so the record never points a fresh name at a
/// stale location.
fn apply_outcome(record: &mut MediaRecord, outcome: &TransformOutcome) {
    if let (Some(stored), Some(relative)) =
        (&outcome.stored_file_name, &outcome.relative_path)
    {
        if !stored.is_empty() && !relative.is_empty() {
            record.stored_file_name = stored.clone();
            record.file_path = relative.clone();
        }
    }

    if let Some(thumbnail) = &outcome.thumbnail_path {
        record.thumbnail_path = Some(thumbnail.clone());
    }
    if let Some(format) = &outcome.file_format {
        record.file_format = format.clone();
    }
    if let Some(size) = outcome.file_size {
        record.file_size = size;
    }
    if let Some(duration) = outcome.duration_seconds {
        record.duration_seconds = Some(duration);
    }
    if let Some(original) = &outcome.original_file_name {
        record.original_file_name = original.clone();
    }
    if let Some(content_type) = &outcome.content_type {
        record.content_type = content_type.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRunner, MemoryPersistence, Script};
    use roomcast_core::models::MediaType;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn record(file_type: MediaType, format: &str, relative: &str, stored: &str) -> MediaRecord {
        MediaRecord {
            file_id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            title: "Original Title".to_string(),
            file_type,
            file_format: format.to_string(),
            original_file_name: format!("original{}", format),
            stored_file_name: stored.to_string(),
            content_type: String::new(),
            description: None,
            category: None,
            visibility: Visibility::Private,
            tags: String::new(),
            file_size: 0,
            file_path: relative.to_string(),
            thumbnail_path: None,
            duration_seconds: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            updated_by: None,
        }
    }

    fn metadata(title: &str) -> EditMetadata {
        EditMetadata {
            title: title.to_string(),
            description: None,
            category: None,
            tags: None,
            visibility: "Private".to_string(),
        }
    }

    struct Rig {
        orchestrator: EditOrchestrator,
        store: MediaStore,
        persistence: Arc<MemoryPersistence>,
        runner: Arc<FakeRunner>,
    }

    async fn rig(
        root: &std::path::Path,
        record: MediaRecord,
        scripts: Vec<Script>,
        fail_update: bool,
    ) -> Rig {
        let store = MediaStore::new(root).await.unwrap();
        let runner = Arc::new(FakeRunner::new(scripts));
        let persistence = Arc::new(if fail_update {
            MemoryPersistence::failing_updates(record)
        } else {
            MemoryPersistence::with_record(record)
        });
        let engine = TransformEngine::new(runner.clone(), store.clone(), 120);
        let orchestrator = EditOrchestrator::new(
            engine,
            persistence.clone(),
            store.clone(),
            runner.clone(),
            KindMap::default(),
        );
        Rig {
            orchestrator,
            store,
            persistence,
            runner,
        }
    }

    #[tokio::test]
    async fn test_metadata_only_edit_updates_record_and_leaves_file_alone() {
        let dir = tempdir().unwrap();
        let mut source = record(
            MediaType::Document,
            ".txt",
            "/uploads/documents/notes-abc.txt",
            "notes-abc.txt",
        );
        source.tags = "old".to_string();
        let file_id = source.file_id;

        let rig = rig(dir.path(), source, vec![], false).await;
        rig.store
            .write("/uploads/documents/notes-abc.txt", b"untouched")
            .await
            .unwrap();

        let request = EditRequest {
            file_id,
            metadata: EditMetadata {
                title: "  Renamed  ".to_string(),
                description: Some("   ".to_string()),
                category: Some(" Travel ".to_string()),
                tags: Some(" a, b ".to_string()),
                visibility: "public".to_string(),
            },
            payload: EditPayload::MetadataOnly,
        };

        let updated = rig.orchestrator.edit("user-1", request).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description, None);
        assert_eq!(updated.category.as_deref(), Some("Travel"));
        assert_eq!(updated.tags, "a, b");
        assert_eq!(updated.visibility, Visibility::Public);
        assert_eq!(updated.updated_by.as_deref(), Some("user-1"));

        assert_eq!(
            rig.store
                .read("/uploads/documents/notes-abc.txt")
                .await
                .unwrap(),
            b"untouched"
        );
        assert!(rig.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_validation_collects_every_error_and_touches_nothing() {
        let dir = tempdir().unwrap();
        let source = record(
            MediaType::Video,
            ".mp4",
            "/uploads/videos/clip-abc.mp4",
            "clip-abc.mp4",
        );
        let file_id = source.file_id;

        let rig = rig(dir.path(), source, vec![], false).await;
        rig.store
            .write("/uploads/videos/clip-abc.mp4", b"video-bytes")
            .await
            .unwrap();

        let request = EditRequest {
            file_id,
            metadata: EditMetadata {
                title: "   ".to_string(),
                description: None,
                category: None,
                tags: Some("x".repeat(501)),
                visibility: "sideways".to_string(),
            },
            payload: EditPayload::Text {
                content: "not applicable to video".to_string(),
            },
        };

        let err = rig.orchestrator.edit("user-1", request).await.unwrap_err();
        let errors = match err {
            AppError::Validation(errors) => errors,
            other => panic!("unexpected error: {:?}", other),
        };

        let fields: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"tags"));
        assert!(fields.contains(&"visibility"));
        assert!(fields.contains(&"text_content"));

        assert_eq!(
            rig.store.read("/uploads/videos/clip-abc.mp4").await.unwrap(),
            b"video-bytes"
        );
        assert!(rig.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_text_edit_is_idempotent() {
        let dir = tempdir().unwrap();
        let source = record(
            MediaType::Document,
            ".txt",
            "/uploads/documents/notes-abc.txt",
            "notes-abc.txt",
        );
        let file_id = source.file_id;

        let rig = rig(dir.path(), source, vec![], false).await;
        rig.store
            .write("/uploads/documents/notes-abc.txt", b"v1")
            .await
            .unwrap();

        for _ in 0..2 {
            let request = EditRequest {
                file_id,
                metadata: metadata("Notes"),
                payload: EditPayload::Text {
                    content: "same content".to_string(),
                },
            };
            let updated = rig.orchestrator.edit("user-1", request).await.unwrap();
            assert_eq!(updated.file_size, "same content".len() as i64);
            assert_eq!(updated.file_path, "/uploads/documents/notes-abc.txt");
        }

        assert_eq!(
            rig.store
                .read("/uploads/documents/notes-abc.txt")
                .await
                .unwrap(),
            b"same content"
        );
    }

    #[tokio::test]
    async fn test_image_replacement_swaps_artifact_and_cleans_old_one() {
        let dir = tempdir().unwrap();
        let mut source = record(
            MediaType::Picture,
            ".jpg",
            "/uploads/pictures/photo-abc.jpg",
            "photo-abc.jpg",
        );
        source.thumbnail_path = Some("/uploads/thumbnails/photo-abc-thumb.jpg".to_string());
        let file_id = source.file_id;

        let rig = rig(dir.path(), source, vec![Script::Succeed], false).await;
        rig.store
            .write("/uploads/pictures/photo-abc.jpg", b"old-image")
            .await
            .unwrap();
        rig.store
            .write("/uploads/thumbnails/photo-abc-thumb.jpg", b"old-thumb")
            .await
            .unwrap();

        let request = EditRequest {
            file_id,
            metadata: metadata("Photo"),
            payload: EditPayload::Image {
                bytes: Bytes::from_static(b"new-image-bytes"),
                original_file_name: "upload.png".to_string(),
                content_type: Some("image/png".to_string()),
            },
        };

        let updated = rig.orchestrator.edit("user-1", request).await.unwrap();

        assert!(updated.file_path.starts_with("/uploads/pictures/photo-"));
        assert!(updated.file_path.ends_with(".png"));
        assert_eq!(updated.file_format, ".png");
        assert_eq!(updated.content_type, "image/png");
        assert_eq!(updated.file_size, b"new-image-bytes".len() as i64);

        // Old artifact and thumbnail are gone, new ones exist.
        assert!(!rig
            .store
            .exists("/uploads/pictures/photo-abc.jpg")
            .await
            .unwrap());
        assert!(!rig
            .store
            .exists("/uploads/thumbnails/photo-abc-thumb.jpg")
            .await
            .unwrap());
        assert!(rig.store.exists(&updated.file_path).await.unwrap());
        let new_thumbnail = updated.thumbnail_path.unwrap();
        assert_ne!(new_thumbnail, "/uploads/thumbnails/photo-abc-thumb.jpg");
        assert!(rig.store.exists(&new_thumbnail).await.unwrap());
    }

    #[tokio::test]
    async fn test_trim_produces_fresh_artifact_thumbnail_and_duration() {
        let dir = tempdir().unwrap();
        let mut source = record(
            MediaType::Video,
            ".mp4",
            "/uploads/videos/clip-abc.mp4",
            "clip-abc.mp4",
        );
        source.duration_seconds = Some(10.0);
        source.thumbnail_path = Some("/uploads/thumbnails/clip-abc-thumb.jpg".to_string());
        let file_id = source.file_id;

        let rig = rig(
            dir.path(),
            source,
            vec![Script::Succeed, Script::Succeed],
            false,
        )
        .await;
        rig.store
            .write("/uploads/videos/clip-abc.mp4", b"source-video")
            .await
            .unwrap();
        rig.store
            .write("/uploads/thumbnails/clip-abc-thumb.jpg", b"old-thumb")
            .await
            .unwrap();

        let request = EditRequest {
            file_id,
            metadata: metadata("Clip"),
            payload: EditPayload::VideoTrim {
                start: Some(2.0),
                end: Some(5.0),
                overwrite: false,
            },
        };

        let updated = rig.orchestrator.edit("user-1", request).await.unwrap();

        let duration = updated.duration_seconds.unwrap();
        assert!((duration - 3.0).abs() < 0.001);
        assert_ne!(updated.file_path, "/uploads/videos/clip-abc.mp4");
        let new_thumbnail = updated.thumbnail_path.unwrap();
        assert_ne!(new_thumbnail, "/uploads/thumbnails/clip-abc-thumb.jpg");

        // Superseded artifact and thumbnail are removed after the commit.
        assert!(!rig
            .store
            .exists("/uploads/videos/clip-abc.mp4")
            .await
            .unwrap());
        assert!(!rig
            .store
            .exists("/uploads/thumbnails/clip-abc-thumb.jpg")
            .await
            .unwrap());
        assert!(rig.store.exists(&updated.file_path).await.unwrap());
        assert!(rig.store.exists(&new_thumbnail).await.unwrap());
    }

    #[tokio::test]
    async fn test_trim_probes_duration_when_record_has_none() {
        let dir = tempdir().unwrap();
        let source = record(
            MediaType::Video,
            ".mp4",
            "/uploads/videos/clip-abc.mp4",
            "clip-abc.mp4",
        );
        let file_id = source.file_id;

        let rig = rig(
            dir.path(),
            source,
            vec![Script::Banner { duration: 10.0 }],
            false,
        )
        .await;
        rig.store
            .write("/uploads/videos/clip-abc.mp4", b"source-video")
            .await
            .unwrap();

        let request = EditRequest {
            file_id,
            metadata: metadata("Clip"),
            payload: EditPayload::VideoTrim {
                start: Some(0.0),
                end: Some(12.0),
                overwrite: false,
            },
        };

        let err = rig.orchestrator.edit("user-1", request).await.unwrap_err();
        let errors = match err {
            AppError::Validation(errors) => errors,
            other => panic!("unexpected error: {:?}", other),
        };
        assert!(errors
            .iter()
            .any(|e| e.message == "End time exceeds the video duration."));

        // Exactly one probe call, with no output argument.
        let calls = rig.runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], "-i");
    }

    #[tokio::test]
    async fn test_trim_rejected_for_non_video() {
        let dir = tempdir().unwrap();
        let source = record(
            MediaType::Document,
            ".txt",
            "/uploads/documents/notes-abc.txt",
            "notes-abc.txt",
        );
        let file_id = source.file_id;

        let rig = rig(dir.path(), source, vec![], false).await;

        let request = EditRequest {
            file_id,
            metadata: metadata("Notes"),
            payload: EditPayload::VideoTrim {
                start: Some(0.0),
                end: Some(1.0),
                overwrite: false,
            },
        };

        let err = rig.orchestrator.edit("user-1", request).await.unwrap_err();
        let errors = match err {
            AppError::Validation(errors) => errors,
            other => panic!("unexpected error: {:?}", other),
        };
        assert!(errors
            .iter()
            .any(|e| e.message == "Trimming is only available for video files."));
    }

    #[tokio::test]
    async fn test_persist_failure_discards_new_artifacts_and_keeps_original() {
        let dir = tempdir().unwrap();
        let mut source = record(
            MediaType::Video,
            ".mp4",
            "/uploads/videos/clip-abc.mp4",
            "clip-abc.mp4",
        );
        source.duration_seconds = Some(10.0);
        let file_id = source.file_id;

        let rig = rig(
            dir.path(),
            source,
            vec![Script::Succeed, Script::Succeed],
            true,
        )
        .await;
        rig.store
            .write("/uploads/videos/clip-abc.mp4", b"source-video")
            .await
            .unwrap();

        let request = EditRequest {
            file_id,
            metadata: metadata("Clip"),
            payload: EditPayload::VideoTrim {
                start: Some(2.0),
                end: Some(5.0),
                overwrite: false,
            },
        };

        let err = rig.orchestrator.edit("user-1", request).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        // Original artifact intact and still the only video on disk.
        assert_eq!(
            rig.store.read("/uploads/videos/clip-abc.mp4").await.unwrap(),
            b"source-video"
        );
        let videos_dir = dir.path().join("uploads/videos");
        let mut entries = tokio::fs::read_dir(&videos_dir).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["clip-abc.mp4".to_string()]);

        // Record unchanged.
        let stored = rig.persistence.snapshot(file_id);
        assert_eq!(stored.title, "Original Title");
        assert_eq!(stored.file_path, "/uploads/videos/clip-abc.mp4");
        assert_eq!(stored.duration_seconds, Some(10.0));
    }

    #[tokio::test]
    async fn test_edit_unknown_record_is_not_found() {
        let dir = tempdir().unwrap();
        let source = record(
            MediaType::Document,
            ".txt",
            "/uploads/documents/notes-abc.txt",
            "notes-abc.txt",
        );

        let rig = rig(dir.path(), source, vec![], false).await;

        let request = EditRequest {
            file_id: Uuid::new_v4(),
            metadata: metadata("Anything"),
            payload: EditPayload::MetadataOnly,
        };

        let err = rig.orchestrator.edit("user-1", request).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
