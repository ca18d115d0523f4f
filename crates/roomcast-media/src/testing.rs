//! Test doubles shared by the unit tests in this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use roomcast_core::models::MediaRecord;
use roomcast_core::AppError;

use crate::persistence::MediaPersistence;
use crate::probe::format_timestamp;
use crate::process::{RunOutcome, RunStatus, TranscodeRunner};

/// Scripted behavior for one transcoder invocation; scripts are consumed in
/// order, and extra invocations succeed.
#[derive(Debug, Clone)]
pub enum Script {
    /// Exit 0 after writing placeholder bytes to the output argument.
    Succeed,
    /// Exit 1 with the given stderr.
    Fail { stderr: String },
    /// Report a timeout kill.
    Timeout,
    /// Report that the binary could not be started.
    LaunchFail,
    /// Exit 1 with a probe banner carrying this duration; writes nothing.
    Banner { duration: f64 },
}

pub struct FakeRunner {
    scripts: Mutex<VecDeque<Script>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Argument vectors of every invocation so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscodeRunner for FakeRunner {
    async fn run(&self, args: &[String]) -> RunOutcome {
        self.calls.lock().unwrap().push(args.to_vec());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Script::Succeed);

        match script {
            Script::Succeed => {
                if let Some(output) = output_arg(args) {
                    std::fs::write(output, b"transcoded").unwrap();
                }
                RunOutcome {
                    status: RunStatus::Exited(0),
                    stderr_text: String::new(),
                }
            }
            Script::Fail { stderr } => RunOutcome {
                status: RunStatus::Exited(1),
                stderr_text: stderr,
            },
            Script::Timeout => RunOutcome {
                status: RunStatus::TimedOut,
                stderr_text: String::new(),
            },
            Script::LaunchFail => RunOutcome {
                status: RunStatus::LaunchFailed("No such file or directory".to_string()),
                stderr_text: String::new(),
            },
            Script::Banner { duration } => RunOutcome {
                status: RunStatus::Exited(1),
                stderr_text: format!(
                    "  Duration: {}, start: 0.000000, bitrate: 1024 kb/s",
                    format_timestamp(duration)
                ),
            },
        }
    }
}

/// The output path is the argument before the trailing `-y`, or the last
/// argument when `-y` is absent. Probe invocations (`-i <input>` only)
/// must use `Script::Banner` so nothing gets written.
fn output_arg(args: &[String]) -> Option<&String> {
    match args.last().map(String::as_str) {
        Some("-y") => args.get(args.len().checked_sub(2)?),
        _ => args.last(),
    }
}

/// In-memory [`MediaPersistence`] with switchable failure injection.
pub struct MemoryPersistence {
    records: Mutex<HashMap<Uuid, MediaRecord>>,
    fail_insert: bool,
    fail_update: bool,
}

impl MemoryPersistence {
    pub fn empty() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_insert: false,
            fail_update: false,
        }
    }

    pub fn with_record(record: MediaRecord) -> Self {
        let persistence = Self::empty();
        persistence
            .records
            .lock()
            .unwrap()
            .insert(record.file_id, record);
        persistence
    }

    pub fn failing_inserts() -> Self {
        let mut persistence = Self::empty();
        persistence.fail_insert = true;
        persistence
    }

    pub fn failing_updates(record: MediaRecord) -> Self {
        let mut persistence = Self::with_record(record);
        persistence.fail_update = true;
        persistence
    }

    pub fn snapshot(&self, file_id: Uuid) -> MediaRecord {
        self.records.lock().unwrap().get(&file_id).unwrap().clone()
    }

    pub fn all(&self) -> Vec<MediaRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl MediaPersistence for MemoryPersistence {
    async fn insert(&self, record: &MediaRecord) -> Result<MediaRecord, AppError> {
        if self.fail_insert {
            return Err(AppError::Internal(
                "simulated persistence failure".to_string(),
            ));
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.file_id, record.clone());
        Ok(record.clone())
    }

    async fn get(&self, user_id: &str, file_id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&file_id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn update(&self, record: &MediaRecord) -> Result<MediaRecord, AppError> {
        if self.fail_update {
            return Err(AppError::Internal(
                "simulated persistence failure".to_string(),
            ));
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.file_id, record.clone());
        Ok(record.clone())
    }

    async fn delete(&self, user_id: &str, file_id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.lock().unwrap();
        match records.get(&file_id) {
            Some(record) if record.user_id == user_id => {
                records.remove(&file_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
