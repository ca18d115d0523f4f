use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use roomcast_core::models::{EditMetadata, EditPayload, EditRequest, MediaRecord};
use roomcast_core::AppError;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::MediaState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrimVideoRequest {
    /// Clip start in seconds; omitted or negative means the source start.
    pub trim_start_seconds: Option<f64>,
    /// Clip end in seconds; omitted means the source end.
    pub trim_end_seconds: Option<f64>,
    /// Replace the original artifact instead of writing a new one.
    #[serde(default)]
    pub overwrite: bool,
}

/// Trim video handler
///
/// Cuts the stored video to the requested bounds. Metadata is carried over
/// from the current record so only the artifact changes.
#[utoipa::path(
    post,
    path = "/api/media/{id}/trim",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Media file ID")
    ),
    request_body = TrimVideoRequest,
    responses(
        (status = 200, description = "Video trimmed", body = MediaRecord),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 422, description = "Transcoder rejected the trim", body = ErrorResponse),
        (status = 504, description = "Transcoder timed out", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(user_id = %user.user_id, media_id = %id, operation = "trim_video")
)]
pub async fn trim_video(
    State(state): State<MediaState>,
    user: UserContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<TrimVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state
        .repository
        .get(&user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media file not found".to_string()))?;

    // Trim changes the artifact only; current metadata rides along unchanged.
    let metadata = EditMetadata {
        title: record.title.clone(),
        description: record.description.clone(),
        category: record.category.clone(),
        tags: Some(record.tags.clone()),
        visibility: record.visibility.to_string(),
    };

    let request = EditRequest {
        file_id: id,
        metadata,
        payload: EditPayload::VideoTrim {
            start: body.trim_start_seconds,
            end: body.trim_end_seconds,
            overwrite: body.overwrite,
        },
    };

    let record = state.edits.edit(&user.user_id, request).await?;

    Ok(Json(record))
}
