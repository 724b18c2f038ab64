//! Snapshot persistence boundary.
//!
//! The session persists through this gateway after every mutating
//! operation and every tick. Failures never reach the caller: saves are
//! fire-and-forget, loads treat missing or unparsable content as absent.
//! The workout snapshot and the journey-progress record live under
//! separate keys so journey progress can outlive an ended session.

use crate::app_dirs::AppDirs;
use crate::session::Phase;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Fixed storage keys, one per record kind.
pub const WORKOUT_KEY: &str = "workout";
pub const JOURNEY_KEY: &str = "journey";

/// Serializable projection of a live session plus the wall-clock moment it
/// was taken. `last_tick` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub is_active: bool,
    pub phase: Phase,
    pub paused: bool,
    pub elapsed_time: u64,
    pub interval: u32,
    pub interval_countdown: i64,
    pub intervals_completed: u32,
    pub warmup_countdown: u32,
    pub pace: f64,
    pub session_distance_mm: u64,
    pub journey_id: String,
    pub journey_progress_mm: u64,
    pub scenery: String,
    pub last_tick: i64,
}

/// Journey progress kept independently of any single session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyRecord {
    pub journey_id: String,
    pub progress_mm: u64,
}

pub trait PersistenceGateway {
    fn load_snapshot(&self) -> Option<Snapshot>;
    fn save_snapshot(&self, snapshot: &Snapshot);
    fn clear_snapshot(&self);
    fn load_journey(&self) -> Option<JourneyRecord>;
    fn save_journey(&self, record: &JourneyRecord);
}

/// JSON files under the app state directory, one per key.
#[derive(Debug, Clone)]
pub struct FileGateway {
    dir: PathBuf,
}

impl FileGateway {
    /// Gateway in the shared app state directory, falling back to the
    /// working directory when no state dir can be resolved.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let dir = AppDirs::snapshot_dir().unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let bytes = fs::read(self.path_for(key)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        if fs::create_dir_all(&self.dir).is_err() {
            return;
        }
        if let Ok(data) = serde_json::to_vec_pretty(value) {
            let _ = fs::write(self.path_for(key), data);
        }
    }
}

impl PersistenceGateway for FileGateway {
    fn load_snapshot(&self) -> Option<Snapshot> {
        self.read(WORKOUT_KEY)
    }

    fn save_snapshot(&self, snapshot: &Snapshot) {
        self.write(WORKOUT_KEY, snapshot);
    }

    fn clear_snapshot(&self) {
        let _ = fs::remove_file(self.path_for(WORKOUT_KEY));
    }

    fn load_journey(&self) -> Option<JourneyRecord> {
        self.read(JOURNEY_KEY)
    }

    fn save_journey(&self, record: &JourneyRecord) {
        self.write(JOURNEY_KEY, record);
    }
}

/// In-memory gateway for tests; clones share the same backing store so a
/// test can hold a handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    snapshot: Arc<Mutex<Option<Snapshot>>>,
    journey: Arc<Mutex<Option<JourneyRecord>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load_snapshot(&self) -> Option<Snapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    fn save_snapshot(&self, snapshot: &Snapshot) {
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
    }

    fn clear_snapshot(&self) {
        *self.snapshot.lock().unwrap() = None;
    }

    fn load_journey(&self) -> Option<JourneyRecord> {
        self.journey.lock().unwrap().clone()
    }

    fn save_journey(&self, record: &JourneyRecord) {
        *self.journey.lock().unwrap() = Some(record.clone());
    }
}
