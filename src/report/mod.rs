//! Round result reporting and score persistence.
//!
//! The round engine hands out one `RoundResult` per completed round; the
//! reporter pushes it to a `ScoreSink` from a background thread so the UI
//! loop never waits on the write. A failed write is retried once, then
//! logged and dropped — an unsaved score is never fatal and never surfaces
//! to the player.

use std::{
    fs, io,
    path::PathBuf,
    sync::mpsc,
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RoundResult;

/// Default score file, next to the executable's working directory.
pub const DEFAULT_STORE_FILE: &str = "wordfall_scores.json";
/// Environment variable overriding the score file path.
pub const STORE_PATH_ENV: &str = "WORDFALL_SCORES";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("score store io failure")]
    Io(#[from] io::Error),
    #[error("score record encoding failure")]
    Encode(#[from] serde_json::Error),
}

/// One persisted row: final score, level identifier and wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub level: String,
    pub score: u32,
    pub timestamp_ms: u64,
}

impl ScoreRecord {
    pub fn new(result: &RoundResult) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            level: result.level.as_str().to_string(),
            score: result.score,
            timestamp_ms,
        }
    }
}

/// Where completed-round scores go. The production sink is a JSON file;
/// tests substitute their own.
pub trait ScoreSink: Send {
    fn record(&mut self, record: &ScoreRecord) -> Result<(), ReportError>;
}

/// Appends records to a single JSON array file. A missing or corrupt file
/// starts a fresh history rather than failing the write.
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_env() -> Self {
        let path = std::env::var_os(STORE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
        Self::new(path)
    }

    pub fn load(&self) -> Vec<ScoreRecord> {
        match fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(records) => records,
                Err(err) => {
                    log::warn!("score file {:?} unreadable, starting fresh: {err}", self.path);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        }
    }
}

impl ScoreSink for JsonScoreStore {
    fn record(&mut self, record: &ScoreRecord) -> Result<(), ReportError> {
        let mut records = self.load();
        records.push(record.clone());
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, json)?;
        log::info!(
            "saved score {} for level {} ({} records total)",
            record.score,
            record.level,
            records.len()
        );
        Ok(())
    }
}

/// Fire-and-forget reporter. `submit` hands the record to a worker thread
/// over a channel and returns immediately; dropping the reporter closes the
/// channel and joins the worker so a pending write finishes on clean exit.
pub struct ScoreReporter {
    tx: Option<mpsc::Sender<ScoreRecord>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ScoreReporter {
    pub fn spawn<S: ScoreSink + 'static>(mut sink: S) -> Self {
        let (tx, rx) = mpsc::channel::<ScoreRecord>();
        let worker = thread::spawn(move || {
            for record in rx {
                if let Err(first) = sink.record(&record) {
                    log::warn!("score write failed, retrying once: {first}");
                    if let Err(second) = sink.record(&record) {
                        log::error!("score write failed after retry, dropping record: {second}");
                    }
                }
            }
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    pub fn submit(&self, record: ScoreRecord) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(record).is_err() {
            log::error!("score reporter worker is gone; result dropped");
        }
    }
}

impl Drop for ScoreReporter {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
