//! Media deletion.
//!
//! The row is removed first; it is the commit point. File removal after
//! that is best-effort, because the record is already gone and a leftover
//! file on disk is recoverable in a way a dangling database reference
//! is not.

use std::sync::Arc;

use uuid::Uuid;

use roomcast_core::models::MediaRecord;
use roomcast_core::AppError;
use roomcast_storage::MediaStore;

use crate::persistence::MediaPersistence;

pub struct DeleteWorkflow {
    persistence: Arc<dyn MediaPersistence>,
    store: MediaStore,
}

impl DeleteWorkflow {
    pub fn new(persistence: Arc<dyn MediaPersistence>, store: MediaStore) -> Self {
        Self { persistence, store }
    }

    /// Delete a record and its files. Returns `false` when the record does
    /// not exist for this user.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, file_id: Uuid) -> Result<bool, AppError> {
        let Some(record) = self.persistence.get(user_id, file_id).await? else {
            return Ok(false);
        };

        let removed = self.persistence.delete(user_id, file_id).await?;
        if !removed {
            return Ok(false);
        }

        self.remove_files(&record).await;
        tracing::info!(file_id = %file_id, path = %record.file_path, "Deleted media record");
        Ok(true)
    }

    async fn remove_files(&self, record: &MediaRecord) {
        if let Err(e) = self.store.delete(&record.file_path).await {
            tracing::warn!(error = %e, path = %record.file_path, "Failed to remove deleted record's artifact");
        }
        if let Some(thumbnail) = record.thumbnail_path.as_deref() {
            if let Err(e) = self.store.delete(thumbnail).await {
                tracing::warn!(error = %e, path = thumbnail, "Failed to remove deleted record's thumbnail");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryPersistence;
    use chrono::Utc;
    use roomcast_core::models::{MediaType, Visibility};
    use tempfile::tempdir;

    fn record(relative: &str, thumbnail: Option<&str>) -> MediaRecord {
        MediaRecord {
            file_id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            title: "Doomed".to_string(),
            file_type: MediaType::Picture,
            file_format: ".jpg".to_string(),
            original_file_name: "doomed.jpg".to_string(),
            stored_file_name: "doomed-abc.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            description: None,
            category: None,
            visibility: Visibility::Private,
            tags: String::new(),
            file_size: 3,
            file_path: relative.to_string(),
            thumbnail_path: thumbnail.map(str::to_string),
            duration_seconds: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            updated_by: None,
        }
    }

    #[tokio::test]
    async fn test_delete_removes_row_artifact_and_thumbnail() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path()).await.unwrap();
        store
            .write("/uploads/pictures/doomed-abc.jpg", b"img")
            .await
            .unwrap();
        store
            .write("/uploads/thumbnails/doomed-abc-thumb.jpg", b"thumb")
            .await
            .unwrap();

        let target = record(
            "/uploads/pictures/doomed-abc.jpg",
            Some("/uploads/thumbnails/doomed-abc-thumb.jpg"),
        );
        let file_id = target.file_id;
        let persistence = Arc::new(MemoryPersistence::with_record(target));

        let workflow = DeleteWorkflow::new(persistence.clone(), store.clone());
        assert!(workflow.delete("user-1", file_id).await.unwrap());

        assert!(persistence.all().is_empty());
        assert!(!store
            .exists("/uploads/pictures/doomed-abc.jpg")
            .await
            .unwrap());
        assert!(!store
            .exists("/uploads/thumbnails/doomed-abc-thumb.jpg")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_unknown_record_returns_false() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path()).await.unwrap();
        let persistence = Arc::new(MemoryPersistence::empty());

        let workflow = DeleteWorkflow::new(persistence, store);
        assert!(!workflow.delete("user-1", Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_files_already_missing() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path()).await.unwrap();

        let target = record("/uploads/pictures/gone-already.jpg", None);
        let file_id = target.file_id;
        let persistence = Arc::new(MemoryPersistence::with_record(target));

        let workflow = DeleteWorkflow::new(persistence.clone(), store);
        assert!(workflow.delete("user-1", file_id).await.unwrap());
        assert!(persistence.all().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_scoped_to_owner() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path()).await.unwrap();
        store
            .write("/uploads/pictures/doomed-abc.jpg", b"img")
            .await
            .unwrap();

        let target = record("/uploads/pictures/doomed-abc.jpg", None);
        let file_id = target.file_id;
        let persistence = Arc::new(MemoryPersistence::with_record(target));

        let workflow = DeleteWorkflow::new(persistence.clone(), store.clone());
        assert!(!workflow.delete("someone-else", file_id).await.unwrap());

        assert_eq!(persistence.all().len(), 1);
        assert!(store
            .exists("/uploads/pictures/doomed-abc.jpg")
            .await
            .unwrap());
    }
}
