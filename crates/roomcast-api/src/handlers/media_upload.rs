use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use roomcast_core::models::{MediaRecord, MediaType};
use roomcast_core::{AppError, FieldError};
use roomcast_media::UploadRequest;

use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::MediaState;

/// Accumulated multipart fields for an upload.
#[derive(Default)]
struct UploadForm {
    title: String,
    description: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    visibility: Option<String>,
    file_type: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Option<Bytes>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, HttpAppError> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(HttpAppError(AppError::BadRequest(format!(
                    "Failed to read multipart: {}",
                    e
                ))));
            }
        };
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            form.file_name = field.file_name().map(|s: &str| s.to_string());
            form.content_type = field.content_type().map(|s: &str| s.to_string());
            form.data = Some(field.bytes().await.map_err(|e| {
                HttpAppError(AppError::BadRequest(format!(
                    "Failed to read file data: {}",
                    e
                )))
            })?);
            continue;
        }

        let value = field.text().await.map_err(|e| {
            HttpAppError(AppError::BadRequest(format!(
                "Failed to read form field '{}': {}",
                field_name, e
            )))
        })?;

        match field_name.as_str() {
            "title" => form.title = value,
            "description" => form.description = Some(value),
            "category" => form.category = Some(value),
            "tags" => form.tags = Some(value),
            "visibility" => form.visibility = Some(value),
            "file_type" => form.file_type = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

/// Upload media handler
///
/// Reads the multipart form, then delegates validation, storage, probing,
/// thumbnailing, and persistence to the upload workflow.
#[utoipa::path(
    post,
    path = "/api/media",
    tag = "media",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Media uploaded successfully", body = MediaRecord),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %user.user_id, operation = "upload_media")
)]
pub async fn upload_media(
    State(state): State<MediaState>,
    user: UserContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_upload_form(multipart).await?;

    let file_type = match form.file_type.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => MediaType::parse(value).ok_or_else(|| {
            AppError::Validation(vec![FieldError::new(
                "file_type",
                "Please choose a valid file type.",
            )])
        })?,
        _ => {
            return Err(HttpAppError(AppError::Validation(vec![FieldError::new(
                "file_type",
                "Please choose a valid file type.",
            )])));
        }
    };

    let request = UploadRequest {
        title: form.title,
        description: form.description,
        category: form.category,
        tags: form.tags,
        // Absent visibility keeps the default instead of failing validation.
        visibility: form.visibility.unwrap_or_else(|| "Private".to_string()),
        file_type,
        file_name: form.file_name.unwrap_or_default(),
        content_type: form.content_type,
        data: form.data.unwrap_or_default(),
    };

    let record = state.uploads.upload(&user.user_id, request).await?;

    Ok((StatusCode::CREATED, Json(record)))
}
