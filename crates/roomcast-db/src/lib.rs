//! RoomCast Database Library
//!
//! Repository implementations over PostgreSQL. Repositories own no business
//! rules; they persist and fetch records, scoped to the owning user on every
//! query.

pub mod db;

pub use db::{AlbumRepository, MediaRepository};
