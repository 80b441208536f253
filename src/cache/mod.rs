pub mod entry;
pub mod fetcher;
pub mod key;
pub mod store;

pub use entry::CacheEntry;
pub use fetcher::Fetcher;
pub use key::CacheKey;
pub use store::{PollOptions, PollingCache, Subscription};
