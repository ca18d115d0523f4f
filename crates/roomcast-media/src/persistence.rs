//! Record persistence seam for the media workflows.
//!
//! The workflows only need these four operations, so they talk to this
//! trait instead of the concrete repository. Tests swap in an in-memory
//! implementation; production wires up [`MediaRepository`].

use async_trait::async_trait;
use uuid::Uuid;

use roomcast_core::models::MediaRecord;
use roomcast_core::AppError;
use roomcast_db::MediaRepository;

#[async_trait]
pub trait MediaPersistence: Send + Sync {
    async fn insert(&self, record: &MediaRecord) -> Result<MediaRecord, AppError>;

    async fn get(&self, user_id: &str, file_id: Uuid) -> Result<Option<MediaRecord>, AppError>;

    async fn update(&self, record: &MediaRecord) -> Result<MediaRecord, AppError>;

    async fn delete(&self, user_id: &str, file_id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
impl MediaPersistence for MediaRepository {
    async fn insert(&self, record: &MediaRecord) -> Result<MediaRecord, AppError> {
        MediaRepository::insert(self, record).await
    }

    async fn get(&self, user_id: &str, file_id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        MediaRepository::get(self, user_id, file_id).await
    }

    async fn update(&self, record: &MediaRecord) -> Result<MediaRecord, AppError> {
        MediaRepository::update(self, record).await
    }

    async fn delete(&self, user_id: &str, file_id: Uuid) -> Result<bool, AppError> {
        MediaRepository::delete(self, user_id, file_id).await
    }
}
