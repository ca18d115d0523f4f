use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use roomcast_core::models::MediaRecord;
use roomcast_core::preview::{build_preview, MediaPreview};
use roomcast_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::MediaState;

/// A record together with its derived presentation data.
#[derive(Debug, Serialize, ToSchema)]
pub struct MediaDetailResponse {
    pub record: MediaRecord,
    pub preview: MediaPreview,
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Media file ID")
    ),
    responses(
        (status = 200, description = "Media found", body = MediaDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, media_id = %id, operation = "get_media")
)]
pub async fn get_media(
    State(state): State<MediaState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state
        .repository
        .get(&user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media file not found".to_string()))?;

    let preview = build_preview(&record);

    Ok(Json(MediaDetailResponse { record, preview }))
}
