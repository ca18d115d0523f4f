//! Kind-specific artifact transforms.
//!
//! Each transform returns a [`TransformOutcome`] describing only the record
//! fields it changed; applying the outcome and cleaning up superseded files
//! is the orchestrator's job.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use roomcast_core::filename::{file_extension, file_stem, safe_file_name};
use roomcast_core::models::{MediaRecord, MediaType, TransformOutcome, TrimRange};
use roomcast_core::preview::guess_content_type;
use roomcast_core::AppError;
use roomcast_storage::{thumbnail_relative_path, upload_relative_path, MediaStore};

use crate::probe::format_timestamp;
use crate::process::{RunStatus, TranscodeRunner};

const STDERR_TAIL_CHARS: usize = 500;
const FALLBACK_VIDEO_EXTENSION: &str = ".mp4";

/// Runs the artifact-level half of edits: text rewrites, image replacement,
/// video trims, and thumbnail generation.
#[derive(Clone)]
pub struct TransformEngine {
    runner: Arc<dyn TranscodeRunner>,
    store: MediaStore,
    timeout_secs: u64,
}

impl TransformEngine {
    pub fn new(runner: Arc<dyn TranscodeRunner>, store: MediaStore, timeout_secs: u64) -> Self {
        Self {
            runner,
            store,
            timeout_secs,
        }
    }

    /// Rewrite a text artifact in place. The write goes through a temp file
    /// and rename in the artifact's directory, so a crash mid-write never
    /// leaves a half-written file at the stored path.
    #[tracing::instrument(skip(self, content), fields(file_id = %record.file_id))]
    pub async fn rewrite_text(
        &self,
        record: &MediaRecord,
        content: &str,
    ) -> Result<TransformOutcome, AppError> {
        let bytes = content.as_bytes().to_vec();
        let new_size = bytes.len() as i64;
        self.store.write_atomic(&record.file_path, bytes).await?;

        Ok(TransformOutcome {
            file_size: Some(new_size),
            ..Default::default()
        })
    }

    /// Write replacement image bytes to a freshly derived filename and
    /// regenerate the thumbnail from them.
    #[tracing::instrument(skip(self, bytes), fields(file_id = %record.file_id, size_bytes = bytes.len()))]
    pub async fn replace_image(
        &self,
        record: &MediaRecord,
        bytes: &Bytes,
        original_file_name: &str,
        content_type: Option<&str>,
    ) -> Result<TransformOutcome, AppError> {
        let extension = file_extension(original_file_name);
        let stored_file_name = safe_file_name(&record.title, &extension);
        let relative_path = upload_relative_path(MediaType::Picture, &stored_file_name);

        let new_physical_path = self.store.write(&relative_path, bytes).await?;

        let stem = file_stem(&stored_file_name);
        let thumbnail_path = self.generate_image_thumbnail(&relative_path, &stem).await;

        let content_type = match content_type {
            Some(provided) if !provided.trim().is_empty() => provided.to_string(),
            _ => guess_content_type(&extension).to_string(),
        };

        Ok(TransformOutcome {
            new_physical_path: Some(new_physical_path),
            stored_file_name: Some(stored_file_name),
            relative_path: Some(relative_path),
            thumbnail_path,
            file_size: Some(bytes.len() as i64),
            file_format: Some(extension),
            original_file_name: Some(original_file_name.to_string()),
            content_type: Some(content_type),
            ..Default::default()
        })
    }

    /// Trim a video to the validated range.
    ///
    /// The clip is cut into a temp file next to the source with a stream
    /// copy first; if the container refuses the copy, a re-encode runs as
    /// the fallback. Only then does the result land at its final path, by
    /// rename for a new file or copy-over for `overwrite`.
    #[tracing::instrument(skip(self), fields(
        file_id = %record.file_id,
        trim_start = range.start,
        trim_end = range.end,
        overwrite = overwrite,
    ))]
    pub async fn trim_video(
        &self,
        record: &MediaRecord,
        range: TrimRange,
        overwrite: bool,
    ) -> Result<TransformOutcome, AppError> {
        let input_path = self.store.resolve(&record.file_path)?;
        if !tokio::fs::try_exists(&input_path).await.unwrap_or(false) {
            return Err(AppError::NotFound(format!(
                "Video file is missing from storage: {}",
                record.file_path
            )));
        }

        let extension = {
            let from_name = file_extension(&record.stored_file_name);
            if from_name.is_empty() {
                FALLBACK_VIDEO_EXTENSION.to_string()
            } else {
                from_name
            }
        };

        let work_dir = input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.store.resolver().root().to_path_buf());

        // Same directory as the final destination, so persist() is a rename
        // on one filesystem.
        let temp = tokio::task::spawn_blocking({
            let work_dir = work_dir.clone();
            let extension = extension.clone();
            move || {
                tempfile::Builder::new()
                    .prefix("trim-")
                    .suffix(&extension)
                    .tempfile_in(work_dir)
            }
        })
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
        .map_err(|e| AppError::Storage(format!("Failed to create temp file: {}", e)))?;

        let input_arg = input_path.to_string_lossy().to_string();
        let output_arg = temp.path().to_string_lossy().to_string();
        let start_ts = format_timestamp(range.start);
        let duration_ts = format_timestamp(range.clip_duration());

        let copy_args = vec![
            "-ss".to_string(),
            start_ts.clone(),
            "-i".to_string(),
            input_arg.clone(),
            "-t".to_string(),
            duration_ts.clone(),
            "-c".to_string(),
            "copy".to_string(),
            output_arg.clone(),
            "-y".to_string(),
        ];

        let outcome = self.runner.run(&copy_args).await;
        match outcome.status {
            RunStatus::Exited(0) => {}
            RunStatus::Exited(code) => {
                tracing::info!(
                    exit_code = code,
                    "Stream-copy trim rejected, re-encoding"
                );
                let encode_args = vec![
                    "-ss".to_string(),
                    start_ts,
                    "-i".to_string(),
                    input_arg,
                    "-t".to_string(),
                    duration_ts,
                    "-c:v".to_string(),
                    "libx264".to_string(),
                    "-preset".to_string(),
                    "medium".to_string(),
                    "-crf".to_string(),
                    "22".to_string(),
                    "-c:a".to_string(),
                    "aac".to_string(),
                    "-movflags".to_string(),
                    "faststart".to_string(),
                    output_arg.clone(),
                    "-y".to_string(),
                ];
                let fallback = self.runner.run(&encode_args).await;
                match fallback.status {
                    RunStatus::Exited(0) => {}
                    RunStatus::Exited(_) => {
                        return Err(AppError::TransformFailed(format!(
                            "Transcoder rejected the trim: {}",
                            tail(&fallback.stderr_text, STDERR_TAIL_CHARS)
                        )));
                    }
                    RunStatus::TimedOut => {
                        return Err(AppError::TranscodeTimeout {
                            seconds: self.timeout_secs,
                        });
                    }
                    RunStatus::LaunchFailed(reason) => {
                        return Err(AppError::TransformFailed(format!(
                            "Failed to start transcoder: {}",
                            reason
                        )));
                    }
                }
            }
            RunStatus::TimedOut => {
                return Err(AppError::TranscodeTimeout {
                    seconds: self.timeout_secs,
                });
            }
            RunStatus::LaunchFailed(reason) => {
                return Err(AppError::TransformFailed(format!(
                    "Failed to start transcoder: {}",
                    reason
                )));
            }
        }

        let produced = tokio::fs::metadata(temp.path())
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if produced == 0 {
            return Err(AppError::TransformFailed(
                "Transcoder produced no output".to_string(),
            ));
        }

        let new_duration = range.clip_duration();

        if overwrite {
            tokio::fs::copy(temp.path(), &input_path)
                .await
                .map_err(|e| {
                    AppError::Storage(format!("Failed to replace original video: {}", e))
                })?;
            // Temp file is dropped and removed here.

            let new_size = tokio::fs::metadata(&input_path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to read trimmed video: {}", e)))?
                .len() as i64;

            let stem = file_stem(&record.stored_file_name);
            let thumbnail_path = self
                .generate_video_thumbnail(&record.file_path, &stem)
                .await;

            Ok(TransformOutcome {
                file_size: Some(new_size),
                duration_seconds: Some(new_duration),
                thumbnail_path,
                ..Default::default()
            })
        } else {
            let stored_file_name = safe_file_name(&record.title, &extension);
            let relative_path = upload_relative_path(MediaType::Video, &stored_file_name);
            let new_physical_path = self.store.resolve(&relative_path)?;

            tokio::task::spawn_blocking({
                let destination = new_physical_path.clone();
                move || temp.persist(destination)
            })
            .await
            .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
            .map_err(|e| AppError::Storage(format!("Failed to place trimmed video: {}", e)))?;

            let new_size = tokio::fs::metadata(&new_physical_path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to read trimmed video: {}", e)))?
                .len() as i64;

            let stem = file_stem(&stored_file_name);
            let thumbnail_path = self.generate_video_thumbnail(&relative_path, &stem).await;

            Ok(TransformOutcome {
                new_physical_path: Some(new_physical_path),
                stored_file_name: Some(stored_file_name),
                relative_path: Some(relative_path),
                thumbnail_path,
                file_size: Some(new_size),
                duration_seconds: Some(new_duration),
                ..Default::default()
            })
        }
    }

    /// Grab a frame one second in as the video's thumbnail. Failure is
    /// logged and reported as `None`; a video without a thumbnail is fine.
    pub async fn generate_video_thumbnail(
        &self,
        input_relative: &str,
        stem: &str,
    ) -> Option<String> {
        let (input_arg, output_arg, output_relative) =
            self.thumbnail_paths(input_relative, stem).await?;

        let args = vec![
            "-ss".to_string(),
            "00:00:01".to_string(),
            "-i".to_string(),
            input_arg,
            "-frames:v".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            output_arg,
            "-y".to_string(),
        ];

        self.finish_thumbnail(&args, output_relative).await
    }

    /// Scale an image to 400px wide for its thumbnail. Failure is logged
    /// and reported as `None`.
    pub async fn generate_image_thumbnail(
        &self,
        input_relative: &str,
        stem: &str,
    ) -> Option<String> {
        let (input_arg, output_arg, output_relative) =
            self.thumbnail_paths(input_relative, stem).await?;

        let args = vec![
            "-i".to_string(),
            input_arg,
            "-vf".to_string(),
            "scale=400:-1".to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            output_arg,
            "-y".to_string(),
        ];

        self.finish_thumbnail(&args, output_relative).await
    }

    async fn thumbnail_paths(
        &self,
        input_relative: &str,
        stem: &str,
    ) -> Option<(String, String, String)> {
        let output_relative = thumbnail_relative_path(stem);

        let input_path = match self.store.resolve(input_relative) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, input = input_relative, "Thumbnail input did not resolve");
                return None;
            }
        };
        let output_path = match self.store.resolve(&output_relative) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, output = %output_relative, "Thumbnail output did not resolve");
                return None;
            }
        };

        if let Some(parent) = output_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!(error = %e, "Failed to create thumbnail directory");
                return None;
            }
        }

        Some((
            input_path.to_string_lossy().to_string(),
            output_path.to_string_lossy().to_string(),
            output_relative,
        ))
    }

    async fn finish_thumbnail(&self, args: &[String], output_relative: String) -> Option<String> {
        let outcome = self.runner.run(args).await;
        if !outcome.success() {
            tracing::warn!(
                status = ?outcome.status,
                stderr = %tail(&outcome.stderr_text, STDERR_TAIL_CHARS),
                "Thumbnail generation failed"
            );
            return None;
        }

        let produced = match self.store.size(&output_relative).await {
            Ok(size) => size,
            Err(_) => 0,
        };
        if produced == 0 {
            tracing::warn!(output = %output_relative, "Thumbnail generation produced no file");
            let _ = self.store.delete(&output_relative).await;
            return None;
        }

        Some(output_relative)
    }

    pub fn store(&self) -> &MediaStore {
        &self.store
    }
}

fn tail(text: &str, max_chars: usize) -> &str {
    let trimmed = text.trim();
    let count = trimmed.chars().count();
    if count <= max_chars {
        return trimmed;
    }
    let skip = count - max_chars;
    match trimmed.char_indices().nth(skip) {
        Some((index, _)) => &trimmed[index..],
        None => trimmed,
    }
}
