//! RoomCast Storage Library
//!
//! This crate provides local filesystem storage for RoomCast. Every managed
//! file lives under a single configured root directory, and every path a
//! caller hands in is a root-relative key.
//!
//! # Storage key format
//!
//! Keys are the web-style relative paths stored on media records, e.g.
//! `/uploads/videos/{filename}` or `/uploads/thumbnails/{filename}`. A
//! leading `/` is stripped during resolution and keys must not contain `..`;
//! resolution is centralized in the `resolver` module so the sandbox check
//! cannot be bypassed.

pub mod error;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use resolver::{is_same_path, thumbnail_relative_path, upload_relative_path, PathResolver};
pub use store::MediaStore;
