mod error;
mod fetcher;
mod freshness;
mod listing;
mod store;
mod types;

pub use error::{FetchError, StoreError};
pub use fetcher::{ElementSource, Fetcher, HttpSource, LISTING_ARTIFACT};
pub use freshness::FreshnessGate;
pub use store::{ElementStore, FileStore};
pub use types::{ElementRecord, FetchStatus, RetentionPolicy};

#[cfg(test)]
pub use store::MemoryStore;
