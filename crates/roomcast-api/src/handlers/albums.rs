//! Album CRUD and membership handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use roomcast_core::models::{Album, AlbumFile, AlbumSummary, MediaRecord};
use roomcast_core::{AppError, FieldError};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AlbumState;

pub const MAX_ALBUM_NAME_CHARS: usize = 255;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AlbumNameRequest {
    pub name: String,
}

/// Trim and validate an album name.
fn check_album_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "name",
            "Please provide an album name.",
        )]));
    }
    if trimmed.chars().count() > MAX_ALBUM_NAME_CHARS {
        return Err(AppError::Validation(vec![FieldError::new(
            "name",
            format!(
                "Album name must be {} characters or fewer.",
                MAX_ALBUM_NAME_CHARS
            ),
        )]));
    }
    Ok(trimmed.to_string())
}

#[utoipa::path(
    post,
    path = "/api/albums",
    tag = "albums",
    request_body = AlbumNameRequest,
    responses(
        (status = 201, description = "Album created", body = Album),
        (status = 400, description = "Invalid or duplicate name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(user_id = %user.user_id, operation = "create_album")
)]
pub async fn create_album(
    State(state): State<AlbumState>,
    user: UserContext,
    ValidatedJson(body): ValidatedJson<AlbumNameRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = check_album_name(&body.name)?;
    let album = state.repository.create(&user.user_id, &name).await?;
    Ok((StatusCode::CREATED, Json(album)))
}

#[utoipa::path(
    get,
    path = "/api/albums",
    tag = "albums",
    responses(
        (status = 200, description = "Caller's albums with file counts", body = Vec<AlbumSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, operation = "list_albums")
)]
pub async fn list_albums(
    State(state): State<AlbumState>,
    user: UserContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let albums = state.repository.list(&user.user_id).await?;
    Ok(Json(albums))
}

#[utoipa::path(
    put,
    path = "/api/albums/{id}",
    tag = "albums",
    params(
        ("id" = Uuid, Path, description = "Album ID")
    ),
    request_body = AlbumNameRequest,
    responses(
        (status = 200, description = "Album renamed", body = Album),
        (status = 400, description = "Invalid or duplicate name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Album not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(user_id = %user.user_id, album_id = %id, operation = "rename_album")
)]
pub async fn rename_album(
    State(state): State<AlbumState>,
    user: UserContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<AlbumNameRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = check_album_name(&body.name)?;
    let album = state.repository.rename(&user.user_id, id, &name).await?;
    Ok(Json(album))
}

#[utoipa::path(
    delete,
    path = "/api/albums/{id}",
    tag = "albums",
    params(
        ("id" = Uuid, Path, description = "Album ID")
    ),
    responses(
        (status = 204, description = "Album deleted; member files stay"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Album not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, album_id = %id, operation = "delete_album")
)]
pub async fn delete_album(
    State(state): State<AlbumState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let removed = state.repository.delete(&user.user_id, id).await?;
    if !removed {
        return Err(HttpAppError(AppError::NotFound(
            "Album not found".to_string(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/albums/{id}/files",
    tag = "albums",
    params(
        ("id" = Uuid, Path, description = "Album ID")
    ),
    responses(
        (status = 200, description = "Media records in the album, newest first", body = Vec<MediaRecord>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Album not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, album_id = %id, operation = "list_album_files")
)]
pub async fn list_album_files(
    State(state): State<AlbumState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.repository.list_files(&user.user_id, id).await?;
    Ok(Json(records))
}

#[utoipa::path(
    post,
    path = "/api/albums/{id}/files/{file_id}",
    tag = "albums",
    params(
        ("id" = Uuid, Path, description = "Album ID"),
        ("file_id" = Uuid, Path, description = "Media file ID")
    ),
    responses(
        (status = 201, description = "File added to album", body = AlbumFile),
        (status = 400, description = "File already in album", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Album or file not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, album_id = %id, file_id = %file_id, operation = "add_album_file")
)]
pub async fn add_album_file(
    State(state): State<AlbumState>,
    user: UserContext,
    Path((id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let link = state
        .repository
        .add_file(&user.user_id, id, file_id)
        .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

#[utoipa::path(
    delete,
    path = "/api/albums/{id}/files/{file_id}",
    tag = "albums",
    params(
        ("id" = Uuid, Path, description = "Album ID"),
        ("file_id" = Uuid, Path, description = "Media file ID")
    ),
    responses(
        (status = 204, description = "File removed from album; the file itself stays"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Album or membership not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, album_id = %id, file_id = %file_id, operation = "remove_album_file")
)]
pub async fn remove_album_file(
    State(state): State<AlbumState>,
    user: UserContext,
    Path((id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Distinguish a missing album from a missing membership.
    if state.repository.get(&user.user_id, id).await?.is_none() {
        return Err(HttpAppError(AppError::NotFound(
            "Album not found".to_string(),
        )));
    }

    let removed = state
        .repository
        .remove_file(&user.user_id, id, file_id)
        .await?;
    if !removed {
        return Err(HttpAppError(AppError::NotFound(
            "File is not in this album.".to_string(),
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_album_name_trims() {
        assert_eq!(check_album_name("  Holiday 2025  ").unwrap(), "Holiday 2025");
    }

    #[test]
    fn test_check_album_name_rejects_blank() {
        let err = check_album_name("   ").unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors[0].field.as_deref(), Some("name"));
            }
            _ => panic!("Expected Validation variant"),
        }
    }

    #[test]
    fn test_check_album_name_rejects_overlong() {
        let name = "a".repeat(MAX_ALBUM_NAME_CHARS + 1);
        assert!(check_album_name(&name).is_err());
        let name = "a".repeat(MAX_ALBUM_NAME_CHARS);
        assert!(check_album_name(&name).is_ok());
    }
}
