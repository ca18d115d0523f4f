//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use roomcast_core::models;
use roomcast_core::preview;
use roomcast_core::validation;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RoomCast API",
        version = "0.1.0",
        description = "Media management API with support for pictures, videos, and documents. Uploads get thumbnails and duration probing, videos can be trimmed server-side, text files can be edited in place, and files can be organized into albums. All endpoints live under /api/."
    ),
    paths(
        // Media
        handlers::media_upload::upload_media,
        handlers::media_list::list_media,
        handlers::media_get::get_media,
        handlers::media_edit::edit_media,
        handlers::media_trim::trim_video,
        handlers::media_delete::delete_media,
        // Albums
        handlers::albums::create_album,
        handlers::albums::list_albums,
        handlers::albums::rename_album,
        handlers::albums::delete_album,
        handlers::albums::list_album_files,
        handlers::albums::add_album_file,
        handlers::albums::remove_album_file,
    ),
    components(
        schemas(
            // Core models
            models::MediaRecord,
            models::MediaType,
            models::Visibility,
            models::Album,
            models::AlbumFile,
            models::AlbumSummary,
            validation::FieldError,
            // Preview models
            preview::MediaPreview,
            preview::DocumentPreviewMode,
            // Request/response bodies
            handlers::media_get::MediaDetailResponse,
            handlers::media_trim::TrimVideoRequest,
            handlers::albums::AlbumNameRequest,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "media", description = "Upload, list, edit, trim, and delete media files"),
        (name = "albums", description = "Album management and file membership operations")
    )
)]
pub struct ApiDoc;
