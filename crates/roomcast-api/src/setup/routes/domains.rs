//! Domain route groups (media and albums).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;

pub fn media_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/media", API_PREFIX),
            post(handlers::media_upload::upload_media),
        )
        .route(
            &format!("{}/media", API_PREFIX),
            get(handlers::media_list::list_media),
        )
        .route(
            &format!("{}/media/{{id}}", API_PREFIX),
            get(handlers::media_get::get_media),
        )
        .route(
            &format!("{}/media/{{id}}", API_PREFIX),
            put(handlers::media_edit::edit_media),
        )
        .route(
            &format!("{}/media/{{id}}/trim", API_PREFIX),
            post(handlers::media_trim::trim_video),
        )
        .route(
            &format!("{}/media/{{id}}", API_PREFIX),
            delete(handlers::media_delete::delete_media),
        )
}

pub fn album_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/albums", API_PREFIX),
            post(handlers::albums::create_album),
        )
        .route(
            &format!("{}/albums", API_PREFIX),
            get(handlers::albums::list_albums),
        )
        .route(
            &format!("{}/albums/{{id}}", API_PREFIX),
            put(handlers::albums::rename_album),
        )
        .route(
            &format!("{}/albums/{{id}}", API_PREFIX),
            delete(handlers::albums::delete_album),
        )
        .route(
            &format!("{}/albums/{{id}}/files", API_PREFIX),
            get(handlers::albums::list_album_files),
        )
        .route(
            &format!("{}/albums/{{id}}/files/{{file_id}}", API_PREFIX),
            post(handlers::albums::add_album_file),
        )
        .route(
            &format!("{}/albums/{{id}}/files/{{file_id}}", API_PREFIX),
            delete(handlers::albums::remove_album_file),
        )
}
