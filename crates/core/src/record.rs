//! Persisted history record.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::params::PromptParams;
use crate::types::{RecordId, Timestamp};

/// Default capacity of the prompt history.
pub const MAX_HISTORY_ITEMS: usize = 10;

/// One successful generation.
///
/// Serialized as `{ id, timestamp, params, generatedText }`, with the
/// timestamp as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: RecordId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    pub params: PromptParams,
    pub generated_text: String,
}

impl HistoryRecord {
    /// Create a record with a fresh id and the current time.
    ///
    /// The timestamp is truncated to millisecond precision so that a record
    /// compares equal to itself after a persist/reload cycle.
    pub fn new(params: PromptParams, generated_text: impl Into<String>) -> Self {
        let now = Utc::now();
        let timestamp = chrono::DateTime::from_timestamp_millis(now.timestamp_millis())
            .unwrap_or(now);
        Self {
            id: RecordId::now_v7(),
            timestamp,
            params,
            generated_text: generated_text.into(),
        }
    }
}
