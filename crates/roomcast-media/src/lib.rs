//! RoomCast Media Workflows
//!
//! This crate runs the artifact-level side of the application: uploading,
//! editing (metadata, text rewrite, image replacement, video trim),
//! deletion, and the ffmpeg invocations behind probing, trimming, and
//! thumbnails.

pub mod delete;
pub mod orchestration;
pub mod persistence;
pub mod probe;
pub mod process;
pub mod transform;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use delete::DeleteWorkflow;
pub use orchestration::EditOrchestrator;
pub use persistence::MediaPersistence;
pub use probe::{format_timestamp, parse_duration, probe_duration};
pub use process::{FfmpegRunner, RunOutcome, RunStatus, TranscodeRunner};
pub use transform::TransformEngine;
pub use upload::{UploadRequest, UploadWorkflow};
