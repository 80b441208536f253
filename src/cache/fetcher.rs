use async_trait::async_trait;
use serde_json::Value;

use crate::cache::key::CacheKey;
use crate::error::Result;

/// Where the polling cache gets its payloads from.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, key: &CacheKey) -> Result<Value>;

    /// Asks the source to drop whatever it caches on its side.
    async fn clear_remote(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
