use roomcast_core::models::{MediaRecord, MediaType};
use roomcast_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for media file records
///
/// Stores the catalog row for every managed file. Physical file contents
/// live in the media store; this repository only tracks the relative paths
/// pointing at them.
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "media_files", db.operation = "insert", db.record_id = %record.file_id))]
    pub async fn insert(&self, record: &MediaRecord) -> Result<MediaRecord, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            INSERT INTO media_files (
                file_id, user_id, title, file_type, file_format,
                original_file_name, stored_file_name, content_type,
                description, category, visibility, tags,
                file_size, file_path, thumbnail_path, duration_seconds,
                created_at, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(record.file_id)
        .bind(&record.user_id)
        .bind(&record.title)
        .bind(record.file_type)
        .bind(&record.file_format)
        .bind(&record.original_file_name)
        .bind(&record.stored_file_name)
        .bind(&record.content_type)
        .bind(&record.description)
        .bind(&record.category)
        .bind(record.visibility)
        .bind(&record.tags)
        .bind(record.file_size)
        .bind(&record.file_path)
        .bind(&record.thumbnail_path)
        .bind(record.duration_seconds)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(&record.updated_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Get a record by id, scoped to its owner.
    #[tracing::instrument(skip(self), fields(db.table = "media_files", db.operation = "select", db.record_id = %file_id))]
    pub async fn get(
        &self,
        user_id: &str,
        file_id: Uuid,
    ) -> Result<Option<MediaRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRecord>(
            "SELECT * FROM media_files WHERE user_id = $1 AND file_id = $2",
        )
        .bind(user_id)
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List records newest-first, optionally filtered by declared type.
    #[tracing::instrument(skip(self), fields(db.table = "media_files", db.operation = "select"))]
    pub async fn list(
        &self,
        user_id: &str,
        file_type: Option<MediaType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MediaRecord>, AppError> {
        let rows = match file_type {
            None => {
                sqlx::query_as::<Postgres, MediaRecord>(
                    "SELECT * FROM media_files WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                )
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            Some(file_type) => {
                sqlx::query_as::<Postgres, MediaRecord>(
                    "SELECT * FROM media_files WHERE user_id = $1 AND file_type = $2 ORDER BY created_at DESC LIMIT $3 OFFSET $4",
                )
                .bind(user_id)
                .bind(file_type)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    /// Case-insensitive substring match against the tags column.
    #[tracing::instrument(skip(self), fields(db.table = "media_files", db.operation = "select"))]
    pub async fn search_by_tag(
        &self,
        user_id: &str,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MediaRecord>, AppError> {
        let escaped = tag
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{}%", escaped);

        let rows = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            SELECT * FROM media_files
            WHERE user_id = $1 AND tags ILIKE $2
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Persist the record's current mutable state. The caller merges
    /// metadata and transform results into the record before saving.
    #[tracing::instrument(skip(self, record), fields(db.table = "media_files", db.operation = "update", db.record_id = %record.file_id))]
    pub async fn update(&self, record: &MediaRecord) -> Result<MediaRecord, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            UPDATE media_files SET
                title = $3,
                file_format = $4,
                original_file_name = $5,
                stored_file_name = $6,
                content_type = $7,
                description = $8,
                category = $9,
                visibility = $10,
                tags = $11,
                file_size = $12,
                file_path = $13,
                thumbnail_path = $14,
                duration_seconds = $15,
                updated_at = $16,
                updated_by = $17
            WHERE user_id = $1 AND file_id = $2
            RETURNING *
            "#,
        )
        .bind(&record.user_id)
        .bind(record.file_id)
        .bind(&record.title)
        .bind(&record.file_format)
        .bind(&record.original_file_name)
        .bind(&record.stored_file_name)
        .bind(&record.content_type)
        .bind(&record.description)
        .bind(&record.category)
        .bind(record.visibility)
        .bind(&record.tags)
        .bind(record.file_size)
        .bind(&record.file_path)
        .bind(&record.thumbnail_path)
        .bind(record.duration_seconds)
        .bind(record.updated_at)
        .bind(&record.updated_by)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| AppError::NotFound("Media file not found".to_string()))
    }

    /// Delete the catalog row. Physical files are the caller's concern;
    /// album links go with the row via cascade.
    #[tracing::instrument(skip(self), fields(db.table = "media_files", db.operation = "delete", db.record_id = %file_id))]
    pub async fn delete(&self, user_id: &str, file_id: Uuid) -> Result<bool, AppError> {
        let rows_affected =
            sqlx::query("DELETE FROM media_files WHERE user_id = $1 AND file_id = $2")
                .bind(user_id)
                .bind(file_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows_affected > 0)
    }
}
