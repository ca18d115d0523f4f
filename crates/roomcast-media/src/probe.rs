//! Duration probing and timestamp formatting for the transcoder.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::process::TranscodeRunner;

static DURATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration:\s*(\d{2,}):(\d{2}):(\d{2}(?:\.\d+)?)")
        .expect("duration pattern must compile")
});

/// Pull the stream duration out of transcoder banner output.
///
/// ffmpeg prints `Duration: 00:01:05.27, start: ...` on stderr when invoked
/// with just an input. Returns `None` when no duration line is present
/// (`Duration: N/A`, unreadable input).
pub fn parse_duration(stderr_text: &str) -> Option<f64> {
    let caps = DURATION_LINE.captures(stderr_text)?;
    let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Probe a file's duration by running the transcoder with only an input.
///
/// The exit status is ignored: ffmpeg exits nonzero when no output is
/// given, but still prints the banner we parse. A file with no readable
/// duration probes as `None`, never as an error.
pub async fn probe_duration(runner: &dyn TranscodeRunner, input: &Path) -> Option<f64> {
    let args = vec!["-i".to_string(), input.to_string_lossy().to_string()];
    let outcome = runner.run(&args).await;
    let duration = parse_duration(&outcome.stderr_text);

    tracing::debug!(input = %input.display(), duration = ?duration, "Probed media duration");
    duration
}

/// Render seconds as an `hh:mm:ss.fff` transcoder timestamp. Non-finite and
/// negative values clamp to zero.
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    let whole = seconds as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = seconds - (hours * 3600 + minutes * 60) as f64;
    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs)
}
