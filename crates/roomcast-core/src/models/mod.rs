pub mod album;
pub mod edit;
pub mod media;

pub use album::{Album, AlbumFile, AlbumSummary};
pub use edit::{EditMetadata, EditPayload, EditRequest, TransformOutcome, TrimRange};
pub use media::{MediaRecord, MediaType, Visibility};
