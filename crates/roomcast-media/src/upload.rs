//! Upload workflow: validate, store, enrich, persist.
//!
//! The artifact is written before the record is inserted; a failed insert
//! rolls the written files back, so the database never references a file
//! that was cleaned up and the disk never keeps a file no record points at.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use roomcast_core::filename::{file_extension, file_stem, safe_file_name};
use roomcast_core::models::{MediaRecord, MediaType, Visibility};
use roomcast_core::preview::guess_content_type;
use roomcast_core::validation::{
    check_category, check_description, check_tags, check_title, check_upload_file,
    check_visibility,
};
use roomcast_core::{AppError, KindMap};
use roomcast_storage::{upload_relative_path, MediaStore};

use crate::persistence::MediaPersistence;
use crate::probe::probe_duration;
use crate::process::TranscodeRunner;
use crate::transform::TransformEngine;

/// One upload: user-entered metadata plus the file as received.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub visibility: String,
    pub file_type: MediaType,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

pub struct UploadWorkflow {
    engine: TransformEngine,
    persistence: Arc<dyn MediaPersistence>,
    store: MediaStore,
    runner: Arc<dyn TranscodeRunner>,
    kind_map: KindMap,
    max_upload_bytes: u64,
}

impl UploadWorkflow {
    pub fn new(
        engine: TransformEngine,
        persistence: Arc<dyn MediaPersistence>,
        store: MediaStore,
        runner: Arc<dyn TranscodeRunner>,
        kind_map: KindMap,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            engine,
            persistence,
            store,
            runner,
            kind_map,
            max_upload_bytes,
        }
    }

    #[tracing::instrument(skip(self, request), fields(
        file_name = %request.file_name,
        file_type = ?request.file_type,
        size_bytes = request.data.len(),
    ))]
    pub async fn upload(
        &self,
        user_id: &str,
        request: UploadRequest,
    ) -> Result<MediaRecord, AppError> {
        let mut errors = Vec::new();
        errors.extend(check_title(&request.title));
        errors.extend(check_tags(request.tags.as_deref()));
        errors.extend(check_category(request.category.as_deref()));
        errors.extend(check_description(request.description.as_deref()));

        let visibility = match check_visibility(&request.visibility) {
            Ok(visibility) => visibility,
            Err(e) => {
                errors.push(e);
                Visibility::Private
            }
        };

        errors.extend(check_upload_file(
            &request.file_name,
            request.data.len() as u64,
            request.file_type,
            self.max_upload_bytes,
            &self.kind_map,
        ));

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let extension = file_extension(&request.file_name);
        let stored_file_name = safe_file_name(&request.title, &extension);
        let relative_path = upload_relative_path(request.file_type, &stored_file_name);

        let written_path = self.store.write(&relative_path, &request.data).await?;

        let stem = file_stem(&stored_file_name);
        let (duration_seconds, thumbnail_path) = match request.file_type {
            MediaType::Video => {
                let duration = probe_duration(self.runner.as_ref(), &written_path).await;
                let thumbnail = self
                    .engine
                    .generate_video_thumbnail(&relative_path, &stem)
                    .await;
                (duration, thumbnail)
            }
            MediaType::Picture => {
                let thumbnail = self
                    .engine
                    .generate_image_thumbnail(&relative_path, &stem)
                    .await;
                (None, thumbnail)
            }
            MediaType::Document => (None, None),
        };

        let content_type = match request.content_type.as_deref() {
            Some(provided) if !provided.trim().is_empty() => provided.to_string(),
            _ => guess_content_type(&extension).to_string(),
        };

        let now = Utc::now();
        let record = MediaRecord {
            file_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: request.title.trim().to_string(),
            file_type: request.file_type,
            file_format: extension,
            original_file_name: request.file_name.clone(),
            stored_file_name,
            content_type,
            description: normalize_optional(request.description.as_deref()),
            category: normalize_optional(request.category.as_deref()),
            visibility,
            tags: request
                .tags
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            file_size: request.data.len() as i64,
            file_path: relative_path.clone(),
            thumbnail_path: thumbnail_path.clone(),
            duration_seconds,
            created_at: now,
            updated_at: now,
            updated_by: Some(user_id.to_string()),
        };

        match self.persistence.insert(&record).await {
            Ok(inserted) => {
                tracing::info!(
                    file_id = %inserted.file_id,
                    path = %inserted.file_path,
                    size_bytes = inserted.file_size,
                    "Stored uploaded media"
                );
                Ok(inserted)
            }
            Err(e) => {
                // Roll the written files back so the failed insert leaves
                // no orphans behind.
                if let Err(cleanup) = self.store.delete(&relative_path).await {
                    tracing::warn!(error = %cleanup, path = %relative_path, "Failed to remove artifact after insert failure");
                }
                if let Some(thumbnail) = thumbnail_path.as_deref() {
                    if let Err(cleanup) = self.store.delete(thumbnail).await {
                        tracing::warn!(error = %cleanup, path = thumbnail, "Failed to remove thumbnail after insert failure");
                    }
                }
                Err(e)
            }
        }
    }
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        Some("") | None => None,
        Some(trimmed) => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRunner, MemoryPersistence, Script};
    use tempfile::tempdir;

    fn request(file_type: MediaType, file_name: &str, data: &'static [u8]) -> UploadRequest {
        UploadRequest {
            title: "My Upload".to_string(),
            description: Some("a description".to_string()),
            category: None,
            tags: Some("travel, sunset".to_string()),
            visibility: "Public".to_string(),
            file_type,
            file_name: file_name.to_string(),
            content_type: None,
            data: Bytes::from_static(data),
        }
    }

    struct Rig {
        workflow: UploadWorkflow,
        store: MediaStore,
        persistence: Arc<MemoryPersistence>,
        runner: Arc<FakeRunner>,
    }

    async fn rig(root: &std::path::Path, scripts: Vec<Script>, fail_insert: bool) -> Rig {
        let store = MediaStore::new(root).await.unwrap();
        let runner = Arc::new(FakeRunner::new(scripts));
        let persistence = Arc::new(if fail_insert {
            MemoryPersistence::failing_inserts()
        } else {
            MemoryPersistence::empty()
        });
        let engine = TransformEngine::new(runner.clone(), store.clone(), 120);
        let workflow = UploadWorkflow::new(
            engine,
            persistence.clone(),
            store.clone(),
            runner.clone(),
            KindMap::default(),
            10 * 1024 * 1024,
        );
        Rig {
            workflow,
            store,
            persistence,
            runner,
        }
    }

    #[tokio::test]
    async fn test_video_upload_probes_duration_and_builds_thumbnail() {
        let dir = tempdir().unwrap();
        let rig = rig(
            dir.path(),
            vec![Script::Banner { duration: 42.5 }, Script::Succeed],
            false,
        )
        .await;

        let record = rig
            .workflow
            .upload("user-1", request(MediaType::Video, "Holiday Video.MP4", b"vvvv"))
            .await
            .unwrap();

        assert_eq!(record.title, "My Upload");
        assert_eq!(record.file_format, ".mp4");
        assert_eq!(record.original_file_name, "Holiday Video.MP4");
        assert!(record.stored_file_name.starts_with("my-upload-"));
        assert!(record.file_path.starts_with("/uploads/videos/"));
        assert_eq!(record.content_type, "video/mp4");
        assert_eq!(record.visibility, Visibility::Public);
        assert_eq!(record.tags, "travel, sunset");
        assert_eq!(record.file_size, 4);
        assert_eq!(record.duration_seconds, Some(42.5));
        assert_eq!(record.updated_by.as_deref(), Some("user-1"));

        let thumbnail = record.thumbnail_path.unwrap();
        assert!(thumbnail.starts_with("/uploads/thumbnails/"));
        assert!(rig.store.exists(&record.file_path).await.unwrap());
        assert!(rig.store.exists(&thumbnail).await.unwrap());

        // Probe first, thumbnail second.
        let calls = rig.runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0][0], "-i");
        assert_eq!(calls[1][0], "-ss");
    }

    #[tokio::test]
    async fn test_document_upload_skips_transcoder_entirely() {
        let dir = tempdir().unwrap();
        let rig = rig(dir.path(), vec![], false).await;

        let record = rig
            .workflow
            .upload("user-1", request(MediaType::Document, "notes.txt", b"hello"))
            .await
            .unwrap();

        assert_eq!(record.duration_seconds, None);
        assert_eq!(record.thumbnail_path, None);
        assert_eq!(record.content_type, "text/plain");
        assert!(rig.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_validation_collects_all_errors() {
        let dir = tempdir().unwrap();
        let rig = rig(dir.path(), vec![], false).await;

        let mut bad = request(MediaType::Video, "malware.exe", b"");
        bad.title = String::new();
        bad.visibility = "upside-down".to_string();

        let err = rig.workflow.upload("user-1", bad).await.unwrap_err();
        let errors = match err {
            AppError::Validation(errors) => errors,
            other => panic!("unexpected error: {:?}", other),
        };

        let fields: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"visibility"));
        assert!(fields.contains(&"file"));

        assert!(rig.persistence.all().is_empty());
        assert!(rig.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path()).await.unwrap();
        let runner = Arc::new(FakeRunner::new(vec![]));
        let persistence = Arc::new(MemoryPersistence::empty());
        let engine = TransformEngine::new(runner.clone(), store.clone(), 120);
        let workflow = UploadWorkflow::new(
            engine,
            persistence,
            store,
            runner,
            KindMap::default(),
            3, // three bytes
        );

        let err = workflow
            .upload("user-1", request(MediaType::Document, "notes.txt", b"hello"))
            .await
            .unwrap_err();
        let errors = match err {
            AppError::Validation(errors) => errors,
            other => panic!("unexpected error: {:?}", other),
        };
        assert!(errors.iter().any(|e| e.message.contains("exceeds")));
    }

    #[tokio::test]
    async fn test_insert_failure_rolls_back_written_files() {
        let dir = tempdir().unwrap();
        let rig = rig(
            dir.path(),
            vec![Script::Banner { duration: 5.0 }, Script::Succeed],
            true,
        )
        .await;

        let err = rig
            .workflow
            .upload("user-1", request(MediaType::Video, "clip.mp4", b"vvvv"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        // Both the artifact and its thumbnail were rolled back.
        for sub in ["uploads/videos", "uploads/thumbnails"] {
            let path = dir.path().join(sub);
            if tokio::fs::try_exists(&path).await.unwrap() {
                let mut entries = tokio::fs::read_dir(&path).await.unwrap();
                assert!(entries.next_entry().await.unwrap().is_none());
            }
        }
        assert!(rig.persistence.all().is_empty());
    }
}
