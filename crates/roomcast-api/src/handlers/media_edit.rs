use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use roomcast_core::models::{EditMetadata, EditPayload, EditRequest, MediaRecord};
use roomcast_core::AppError;
use uuid::Uuid;

use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::MediaState;

/// Accumulated multipart fields for an edit.
#[derive(Default)]
struct EditForm {
    title: String,
    description: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    visibility: Option<String>,
    text_content: Option<String>,
    image_file_name: Option<String>,
    image_content_type: Option<String>,
    image_bytes: Option<Bytes>,
}

impl EditForm {
    /// Choose the payload variant from what the form carried. An image part
    /// wins over text content; neither means a metadata-only edit. The part
    /// being present is what matters, not its size, so a zero-byte image
    /// still reaches validation and gets a field error.
    fn into_payload(self) -> (EditMetadata, EditPayload) {
        let metadata = EditMetadata {
            title: self.title,
            description: self.description,
            category: self.category,
            tags: self.tags,
            visibility: self.visibility.unwrap_or_else(|| "Private".to_string()),
        };

        let payload = if let Some(bytes) = self.image_bytes {
            EditPayload::Image {
                bytes,
                original_file_name: self.image_file_name.unwrap_or_default(),
                content_type: self.image_content_type,
            }
        } else if let Some(content) = self.text_content {
            EditPayload::Text { content }
        } else {
            EditPayload::MetadataOnly
        };

        (metadata, payload)
    }
}

async fn read_edit_form(mut multipart: Multipart) -> Result<EditForm, HttpAppError> {
    let mut form = EditForm::default();

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

        if field_name == "image_replacement" {
            form.image_file_name = field.file_name().map(|s: &str| s.to_string());
            form.image_content_type = field.content_type().map(|s: &str| s.to_string());
            form.image_bytes = Some(field.bytes().await.map_err(|e| {
                HttpAppError(AppError::BadRequest(format!(
                    "Failed to read image data: {}",
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
            "text_content" => form.text_content = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

/// Edit media handler
///
/// Applies new metadata and, depending on which parts the form carried,
/// rewrites text content, replaces the image artifact, or leaves the file
/// untouched. Trims go through the dedicated trim endpoint.
#[utoipa::path(
    put,
    path = "/api/media/{id}",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Media file ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Media updated", body = MediaRecord),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 422, description = "Transform failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %user.user_id, media_id = %id, operation = "edit_media")
)]
pub async fn edit_media(
    State(state): State<MediaState>,
    user: UserContext,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_edit_form(multipart).await?;
    let (metadata, payload) = form.into_payload();

    let request = EditRequest {
        file_id: id,
        metadata,
        payload,
    };

    let record = state.edits.edit(&user.user_id, request).await?;

    Ok(Json(record))
}
