//! Transcoder process invocation.
//!
//! Every ffmpeg call in the crate goes through [`TranscodeRunner`], so the
//! transform and probe logic can be exercised in tests without the binary
//! installed. The real runner enforces a hard wall-clock timeout and kills
//! the process when it is exceeded.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// How a transcoder invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Process ran to completion with this exit code.
    Exited(i32),
    /// Process could not be started.
    LaunchFailed(String),
    /// Process exceeded the timeout and was killed.
    TimedOut,
}

/// Outcome of a single transcoder invocation. Launch failures and timeouts
/// are values here, not errors; callers decide what each one means.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub stderr_text: String,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        matches!(self.status, RunStatus::Exited(0))
    }
}

#[async_trait]
pub trait TranscodeRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> RunOutcome;
}

/// Runs the configured ffmpeg binary.
pub struct FfmpegRunner {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegRunner {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TranscodeRunner for FfmpegRunner {
    #[tracing::instrument(skip(self, args), fields(
        process.command = %self.ffmpeg_path,
        timeout_secs = self.timeout.as_secs(),
    ))]
    async fn run(&self, args: &[String]) -> RunOutcome {
        let start = Instant::now();

        let mut child = match Command::new(&self.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start transcoder");
                return RunOutcome {
                    status: RunStatus::LaunchFailed(e.to_string()),
                    stderr_text: String::new(),
                };
            }
        };

        // Drain both pipes concurrently so a chatty process never stalls on
        // a full pipe buffer while we wait on it.
        let stdout_task = tokio::spawn(drain(child.stdout.take()));
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(exit)) => RunStatus::Exited(exit.code().unwrap_or(-1)),
            Ok(Err(e)) => RunStatus::LaunchFailed(format!("wait failed: {}", e)),
            Err(_) => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                RunStatus::TimedOut
            }
        };

        let _ = stdout_task.await;
        let stderr_text = stderr_task.await.unwrap_or_default();

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            status = ?status,
            "Transcoder run finished"
        );

        RunOutcome {
            status,
            stderr_text,
        }
    }
}

async fn drain<R>(pipe: Option<R>) -> String
where
    R: AsyncRead + Unpin + Send,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_run_captures_stderr_on_success() {
        let runner = FfmpegRunner::new("/bin/sh", Duration::from_secs(5));
        let outcome = runner.run(&sh("echo oops >&2; exit 0")).await;

        assert!(outcome.success());
        assert_eq!(outcome.status, RunStatus::Exited(0));
        assert!(outcome.stderr_text.contains("oops"));
    }

    #[tokio::test]
    async fn test_run_reports_nonzero_exit() {
        let runner = FfmpegRunner::new("/bin/sh", Duration::from_secs(5));
        let outcome = runner.run(&sh("exit 3")).await;

        assert!(!outcome.success());
        assert_eq!(outcome.status, RunStatus::Exited(3));
    }

    #[tokio::test]
    async fn test_run_reports_launch_failure() {
        let runner = FfmpegRunner::new(
            "/nonexistent/transcoder-binary",
            Duration::from_secs(5),
        );
        let outcome = runner.run(&[]).await;

        assert!(matches!(outcome.status, RunStatus::LaunchFailed(_)));
    }

    #[tokio::test]
    async fn test_run_kills_on_timeout() {
        let runner = FfmpegRunner::new("/bin/sh", Duration::from_millis(100));
        let start = Instant::now();
        let outcome = runner.run(&sh("sleep 5")).await;

        assert_eq!(outcome.status, RunStatus::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(4));
    }
}
