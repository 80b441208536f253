use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::cache::CacheEntry;
use crate::github::decode_envelope;
use crate::render::Panel;

/// What a panel knows about one endpoint at render time.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading,
    Ready {
        data: T,
        updated_at: Option<DateTime<Utc>>,
    },
    /// Last good data plus the error from the refresh that failed after it.
    Stale {
        data: T,
        error: String,
    },
    Failed {
        error: String,
    },
}

impl<T: DeserializeOwned> Resource<T> {
    pub fn from_entry(entry: &CacheEntry) -> Self {
        let error = entry.error.as_ref().map(|e| e.to_string());

        let Some(body) = entry.data.as_deref() else {
            return match error {
                Some(error) => Resource::Failed { error },
                None => Resource::Loading,
            };
        };

        match decode_envelope::<T>(body) {
            Ok(Some(data)) => match error {
                Some(error) => Resource::Stale { data, error },
                None => Resource::Ready {
                    data,
                    updated_at: entry.updated_at,
                },
            },
            Ok(None) => match error {
                Some(error) => Resource::Failed { error },
                None => Resource::Loading,
            },
            Err(e) => {
                tracing::warn!("Undecodable payload: {}", e);
                Resource::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

impl<T> Resource<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Ready { data, .. } | Resource::Stale { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Ready { data, updated_at } => Resource::Ready {
                data: f(data),
                updated_at,
            },
            Resource::Stale { data, error } => Resource::Stale {
                data: f(data),
                error,
            },
            Resource::Failed { error } => Resource::Failed { error },
        }
    }

    /// Builds the panel for this resource: a skeleton of `rows` while loading,
    /// an error tile on failure, otherwise whatever `build` makes of the data.
    pub fn panel(&self, title: &str, rows: usize, build: impl FnOnce(&T) -> Panel) -> Panel {
        match self {
            Resource::Loading => Panel::loading(title, rows),
            Resource::Ready { data, .. } => build(data),
            Resource::Stale { data, error } => build(data).mark_stale(error),
            Resource::Failed { error } => Panel::error(title, error),
        }
    }
}
