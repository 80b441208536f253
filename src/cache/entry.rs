use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Error;

/// Snapshot of one cache key.
///
/// `data` is the last good payload and survives failed refreshes; `error` is the
/// most recent failure and is cleared by the next success.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    pub data: Option<Arc<Value>>,
    pub error: Option<Arc<Error>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_validating: bool,
}

impl CacheEntry {
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }

    /// Last good data is on screen but the latest refresh failed.
    pub fn is_stale(&self) -> bool {
        self.data.is_some() && self.error.is_some()
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading() && !self.is_validating
    }
}
