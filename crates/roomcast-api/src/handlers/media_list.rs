use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use roomcast_core::models::{MediaRecord, MediaType};
use roomcast_core::AppError;
use serde::Deserialize;

use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::MediaState;

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListMediaQuery {
    pub file_type: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// List media handler
///
/// Returns the caller's records newest first. A non-empty `tag` switches to
/// the tag search; otherwise the optional `file_type` filter applies.
#[utoipa::path(
    get,
    path = "/api/media",
    tag = "media",
    params(
        ("file_type" = Option<String>, Query, description = "Filter by declared type: document, picture, or video"),
        ("tag" = Option<String>, Query, description = "Case-insensitive substring match against record tags"),
        ("limit" = Option<i64>, Query, description = "Page size, 1-500 (default 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip (default 0)")
    ),
    responses(
        (status = 200, description = "Media records", body = Vec<MediaRecord>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, operation = "list_media")
)]
pub async fn list_media(
    State(state): State<MediaState>,
    user: UserContext,
    Query(query): Query<ListMediaQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (limit, offset) = clamp_page(query.limit, query.offset);

    if let Some(tag) = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let records = state
            .repository
            .search_by_tag(&user.user_id, tag, limit, offset)
            .await?;
        return Ok(Json(records));
    }

    let file_type = match query.file_type.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(MediaType::parse(value).ok_or_else(|| {
            AppError::InvalidInput(
                "file_type must be one of: document, picture, video".to_string(),
            )
        })?),
        _ => None,
    };

    let records = state
        .repository
        .list(&user.user_id, file_type, limit, offset)
        .await?;

    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page_defaults() {
        assert_eq!(clamp_page(None, None), (100, 0));
    }

    #[test]
    fn test_clamp_page_bounds() {
        assert_eq!(clamp_page(Some(0), Some(-5)), (1, 0));
        assert_eq!(clamp_page(Some(10_000), Some(40)), (500, 40));
        assert_eq!(clamp_page(Some(25), Some(50)), (25, 50));
    }
}
