//! Database repositories for data access layer
//!
//! Each repository is responsible for a single domain entity and provides
//! CRUD operations and specialized queries. Every query is scoped to the
//! owning user; a record id alone is never enough to touch a row.

pub mod albums;
pub mod media;

pub use albums::AlbumRepository;
pub use media::MediaRepository;
