use roomcast_core::models::{Album, AlbumFile, AlbumSummary, MediaRecord};
use roomcast_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for albums and their file memberships
#[derive(Clone)]
pub struct AlbumRepository {
    pool: PgPool,
}

impl AlbumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new album. Album names are unique per user.
    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "insert"))]
    pub async fn create(&self, user_id: &str, name: &str) -> Result<Album, AppError> {
        let duplicate_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM albums WHERE user_id = $1 AND album_name = $2)",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        if duplicate_exists {
            return Err(AppError::BadRequest(
                "An album with this name already exists.".to_string(),
            ));
        }

        let album = sqlx::query_as::<Postgres, Album>(
            r#"
            INSERT INTO albums (album_id, album_name, user_id)
            VALUES ($1, $2, $3)
            RETURNING album_id, album_name, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(album)
    }

    /// Get album by ID (owner-scoped)
    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "select", db.record_id = %album_id))]
    pub async fn get(&self, user_id: &str, album_id: Uuid) -> Result<Option<Album>, AppError> {
        let album = sqlx::query_as::<Postgres, Album>(
            "SELECT album_id, album_name, user_id, created_at FROM albums WHERE user_id = $1 AND album_id = $2",
        )
        .bind(user_id)
        .bind(album_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(album)
    }

    /// List the user's albums with their file counts.
    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "select"))]
    pub async fn list(&self, user_id: &str) -> Result<Vec<AlbumSummary>, AppError> {
        let albums = sqlx::query_as::<Postgres, AlbumSummary>(
            r#"
            SELECT a.album_id, a.album_name, a.user_id, a.created_at,
                   COUNT(af.album_file_id) AS file_count
            FROM albums a
            LEFT JOIN album_files af ON af.album_id = a.album_id
            WHERE a.user_id = $1
            GROUP BY a.album_id, a.album_name, a.user_id, a.created_at
            ORDER BY a.album_name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(albums)
    }

    /// Rename an album, keeping names unique per user.
    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "update", db.record_id = %album_id))]
    pub async fn rename(
        &self,
        user_id: &str,
        album_id: Uuid,
        name: &str,
    ) -> Result<Album, AppError> {
        let duplicate_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM albums WHERE user_id = $1 AND album_name = $2 AND album_id != $3)",
        )
        .bind(user_id)
        .bind(name)
        .bind(album_id)
        .fetch_one(&self.pool)
        .await?;

        if duplicate_exists {
            return Err(AppError::BadRequest(
                "An album with this name already exists.".to_string(),
            ));
        }

        let album = sqlx::query_as::<Postgres, Album>(
            r#"
            UPDATE albums SET album_name = $3
            WHERE user_id = $1 AND album_id = $2
            RETURNING album_id, album_name, user_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(album_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        album.ok_or_else(|| AppError::NotFound("Album not found".to_string()))
    }

    /// Delete an album and its file links. The files themselves stay.
    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "delete", db.record_id = %album_id))]
    pub async fn delete(&self, user_id: &str, album_id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM album_files WHERE album_id IN (SELECT album_id FROM albums WHERE user_id = $1 AND album_id = $2)",
        )
        .bind(user_id)
        .bind(album_id)
        .execute(&mut *tx)
        .await?;

        let rows_affected =
            sqlx::query("DELETE FROM albums WHERE user_id = $1 AND album_id = $2")
                .bind(user_id)
                .bind(album_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        tx.commit().await?;

        Ok(rows_affected > 0)
    }

    /// Link a file into an album. Both must belong to the user.
    #[tracing::instrument(skip(self), fields(db.table = "album_files", db.operation = "insert", db.record_id = %file_id))]
    pub async fn add_file(
        &self,
        user_id: &str,
        album_id: Uuid,
        file_id: Uuid,
    ) -> Result<AlbumFile, AppError> {
        let album_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM albums WHERE user_id = $1 AND album_id = $2)",
        )
        .bind(user_id)
        .bind(album_id)
        .fetch_one(&self.pool)
        .await?;

        if !album_exists {
            return Err(AppError::NotFound("Album not found".to_string()));
        }

        let file_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM media_files WHERE user_id = $1 AND file_id = $2)",
        )
        .bind(user_id)
        .bind(file_id)
        .fetch_one(&self.pool)
        .await?;

        if !file_exists {
            return Err(AppError::NotFound("Media file not found".to_string()));
        }

        let link_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM album_files WHERE album_id = $1 AND file_id = $2)",
        )
        .bind(album_id)
        .bind(file_id)
        .fetch_one(&self.pool)
        .await?;

        if link_exists {
            return Err(AppError::BadRequest(
                "File is already in this album.".to_string(),
            ));
        }

        let link = sqlx::query_as::<Postgres, AlbumFile>(
            r#"
            INSERT INTO album_files (album_file_id, album_id, file_id)
            VALUES ($1, $2, $3)
            RETURNING album_file_id, album_id, file_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(album_id)
        .bind(file_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(link)
    }

    /// Remove a file from an album. Returns false when no link existed.
    #[tracing::instrument(skip(self), fields(db.table = "album_files", db.operation = "delete", db.record_id = %file_id))]
    pub async fn remove_file(
        &self,
        user_id: &str,
        album_id: Uuid,
        file_id: Uuid,
    ) -> Result<bool, AppError> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM album_files
            WHERE file_id = $3
              AND album_id IN (SELECT album_id FROM albums WHERE user_id = $1 AND album_id = $2)
            "#,
        )
        .bind(user_id)
        .bind(album_id)
        .bind(file_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// List the media records in an album, newest first.
    #[tracing::instrument(skip(self), fields(db.table = "album_files", db.operation = "select", db.record_id = %album_id))]
    pub async fn list_files(
        &self,
        user_id: &str,
        album_id: Uuid,
    ) -> Result<Vec<MediaRecord>, AppError> {
        let album_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM albums WHERE user_id = $1 AND album_id = $2)",
        )
        .bind(user_id)
        .bind(album_id)
        .fetch_one(&self.pool)
        .await?;

        if !album_exists {
            return Err(AppError::NotFound("Album not found".to_string()));
        }

        let rows = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            SELECT m.* FROM media_files m
            JOIN album_files af ON af.file_id = m.file_id
            WHERE af.album_id = $1 AND m.user_id = $2
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(album_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
