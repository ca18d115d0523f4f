//! RoomCast Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all RoomCast components.

pub mod config;
pub mod error;
pub mod filename;
pub mod kind_map;
pub mod models;
pub mod preview;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use kind_map::{KindMap, MediaKind};
pub use models::{
    Album, AlbumFile, AlbumSummary, EditMetadata, EditPayload, EditRequest, MediaRecord,
    MediaType, TransformOutcome, TrimRange, Visibility,
};
pub use validation::FieldError;
