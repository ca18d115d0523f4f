use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use roomcast_core::AppError;
use uuid::Uuid;

use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::MediaState;

#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Media file ID")
    ),
    responses(
        (status = 204, description = "Media deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, media_id = %id, operation = "delete_media")
)]
pub async fn delete_media(
    State(state): State<MediaState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let removed = state.deletes.delete(&user.user_id, id).await?;

    if !removed {
        return Err(HttpAppError(AppError::NotFound(
            "Media file not found".to_string(),
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
