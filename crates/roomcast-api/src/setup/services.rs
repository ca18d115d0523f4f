//! Service initialization and application state setup

use anyhow::{Context, Result};
use roomcast_core::Config;
use roomcast_db::{AlbumRepository, MediaRepository};
use roomcast_media::{
    DeleteWorkflow, EditOrchestrator, FfmpegRunner, MediaPersistence, TranscodeRunner,
    TransformEngine, UploadWorkflow,
};
use roomcast_storage::MediaStore;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::state::{AlbumState, AppState, DbState, MediaState};

/// Initialize all services and repositories, returning the application state
pub async fn initialize_services(config: Config, pool: PgPool) -> Result<Arc<AppState>> {
    let store = MediaStore::new(config.storage_root.clone())
        .await
        .context("Failed to initialize media storage")?;
    tracing::info!(root = %config.storage_root.display(), "Media store initialized");

    let runner: Arc<dyn TranscodeRunner> = Arc::new(FfmpegRunner::new(
        config.ffmpeg_path.clone(),
        Duration::from_secs(config.ffmpeg_timeout_secs),
    ));

    let repository = MediaRepository::new(pool.clone());
    let persistence: Arc<dyn MediaPersistence> = Arc::new(repository.clone());

    let engine = TransformEngine::new(runner.clone(), store.clone(), config.ffmpeg_timeout_secs);

    let uploads = Arc::new(UploadWorkflow::new(
        engine.clone(),
        persistence.clone(),
        store.clone(),
        runner.clone(),
        config.kind_map(),
        config.max_upload_bytes,
    ));
    let edits = Arc::new(EditOrchestrator::new(
        engine,
        persistence.clone(),
        store.clone(),
        runner,
        config.kind_map(),
    ));
    let deletes = Arc::new(DeleteWorkflow::new(persistence, store.clone()));
    tracing::info!(
        ffmpeg_path = %config.ffmpeg_path,
        ffmpeg_timeout_secs = config.ffmpeg_timeout_secs,
        "Media workflows initialized"
    );

    let album_repository = AlbumRepository::new(pool.clone());

    Ok(Arc::new(AppState {
        db: DbState { pool },
        media: MediaState {
            repository,
            store,
            uploads,
            edits,
            deletes,
        },
        albums: AlbumState {
            repository: album_repository,
        },
        config,
    }))
}
