//! External status reporting for in-flight uploads
//!
//! The session publishes point updates keyed by an opaque reference key so an
//! outer status store can surface progress and terminal state. Updates are
//! best-effort side effects; a tracker can be a no-op where nothing consumes
//! progress.

use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Uploading,
    Completed,
    Failed,
}

/// Point-in-time status of one push, as last reported by its session
#[derive(Debug, Clone)]
pub struct UploadStatus {
    /// Bytes acknowledged by the registry so far
    pub offset: u64,
    /// Expected total size, 0 while unknown
    pub total: u64,
    pub state: TransferState,
}

pub trait StatusTracker: Send + Sync {
    fn set_status(&self, ref_key: &str, status: UploadStatus);
    fn get_status(&self, ref_key: &str) -> Option<UploadStatus>;
}

/// Tracker backed by an in-process map, for tests and single-process callers
#[derive(Default)]
pub struct InMemoryStatusTracker {
    records: Mutex<HashMap<String, UploadStatus>>,
}

impl InMemoryStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusTracker for InMemoryStatusTracker {
    fn set_status(&self, ref_key: &str, status: UploadStatus) {
        let mut records = self.records.lock().expect("status tracker lock poisoned");
        records.insert(ref_key.to_string(), status);
    }

    fn get_status(&self, ref_key: &str) -> Option<UploadStatus> {
        let records = self.records.lock().expect("status tracker lock poisoned");
        records.get(ref_key).cloned()
    }
}

/// Tracker that discards all updates
pub struct NoopStatusTracker;

impl StatusTracker for NoopStatusTracker {
    fn set_status(&self, _ref_key: &str, _status: UploadStatus) {}

    fn get_status(&self, _ref_key: &str) -> Option<UploadStatus> {
        None
    }
}
