use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Persisted album (table `albums`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Album {
    pub album_id: Uuid,
    pub album_name: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Membership row linking a media record to an album (table `album_files`).
/// Unique on `(album_id, file_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct AlbumFile {
    pub album_file_id: Uuid,
    pub album_id: Uuid,
    pub file_id: Uuid,
}

/// Album plus its member count, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct AlbumSummary {
    pub album_id: Uuid,
    pub album_name: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub file_count: i64,
}
