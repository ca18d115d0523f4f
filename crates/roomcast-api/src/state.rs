//! Application state shared across handlers.
//!
//! State is split into focused sub-states so handlers can extract exactly
//! what they use via `FromRef` instead of threading the whole `AppState`
//! through every signature.

use std::sync::Arc;

use roomcast_core::Config;
use roomcast_db::{AlbumRepository, MediaRepository};
use roomcast_media::{DeleteWorkflow, EditOrchestrator, UploadWorkflow};
use roomcast_storage::MediaStore;
use sqlx::PgPool;

/// Database handles used by health checks.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
}

/// Media repository plus the workflows that drive uploads, edits, and
/// deletes. Workflows are shared behind `Arc` because each one owns its
/// transcoder handle.
#[derive(Clone)]
pub struct MediaState {
    pub repository: MediaRepository,
    pub store: MediaStore,
    pub uploads: Arc<UploadWorkflow>,
    pub edits: Arc<EditOrchestrator>,
    pub deletes: Arc<DeleteWorkflow>,
}

#[derive(Clone)]
pub struct AlbumState {
    pub repository: AlbumRepository,
}

/// Top-level application state aggregating all sub-states.
pub struct AppState {
    pub db: DbState,
    pub media: MediaState,
    pub albums: AlbumState,
    pub config: Config,
}

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for AlbumState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.albums.clone()
    }
}
