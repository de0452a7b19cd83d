//! In-memory audit log of dispatched calls.
//!
//! Append-only: records stay until the last `CallLog` handle is dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One request/response pair as seen by the dispatcher.
///
/// `headers` and `params` hold JSON text so the record stays flat for hosts
/// that only read strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedCall {
    pub url: String,
    pub headers: String,
    pub params: String,
    #[serde(rename = "methodType")]
    pub method_type: String,
    pub response: String,
}

/// Shared handle; clones append to the same list.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    records: Arc<Mutex<Vec<LoggedCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, call: LoggedCall) {
        self.records.lock().push(call);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every record, oldest first.
    pub fn snapshot(&self) -> Vec<LoggedCall> {
        self.records.lock().clone()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.records.lock())
    }
}
