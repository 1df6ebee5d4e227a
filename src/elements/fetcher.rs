use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::elements::error::FetchError;
use crate::elements::freshness::FreshnessGate;
use crate::elements::listing::parse_listing;
use crate::elements::store::ElementStore;
use crate::elements::types::FetchStatus;

pub const LISTING_ARTIFACT: &str = "latest_tle.txt";

/// Remote endpoint serving a flat three-line element listing
pub trait ElementSource {
    fn fetch_listing(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ElementSource for HttpSource {
    fn fetch_listing(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text()?)
    }
}

/// Refreshes the element store from a source, at most once per gate interval.
///
/// Callers sharing one `Fetcher` are serialised; separate `Fetcher`s over the
/// same store, or separate processes, can still both fetch.
pub struct Fetcher<'a, S, F> {
    store: &'a S,
    source: F,
    gate: FreshnessGate,
    artifact_path: PathBuf,
    fetch_lock: Mutex<()>,
}

impl<'a, S: ElementStore, F: ElementSource> Fetcher<'a, S, F> {
    pub fn new(store: &'a S, source: F, gate: FreshnessGate, artifact_path: PathBuf) -> Self {
        Self {
            store,
            source,
            gate,
            artifact_path,
            fetch_lock: Mutex::new(()),
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Downloads and ingests the listing at `url` unless the store already
    /// holds a record younger than the gate interval.
    ///
    /// Any source error aborts before the store is touched.
    pub fn ensure_fresh(&self, url: &str) -> Result<FetchStatus, FetchError> {
        let _guard = self.fetch_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.gate.is_fetch_due(self.store)? {
            log::info!(
                "Element sets are younger than {} minutes, skipping fetch",
                self.gate.min_interval().num_minutes()
            );
            return Ok(FetchStatus::UpToDate);
        }

        log::info!("Fetching element listing from {}", url);
        let content = self.source.fetch_listing(url)?;

        let listing = parse_listing(&content);
        if listing.dropped_lines > 0 {
            log::warn!(
                "Dropped {} trailing line(s) not forming a complete element set",
                listing.dropped_lines
            );
        }

        for group in &listing.groups {
            self.store.insert(&group.name, &group.line1, &group.line2)?;
        }
        log::info!("Ingested {} element sets", listing.groups.len());

        self.write_artifact(&content)?;

        Ok(FetchStatus::Fetched {
            inserted: listing.groups.len(),
            dropped_lines: listing.dropped_lines,
        })
    }

    fn write_artifact(&self, content: &str) -> Result<(), FetchError> {
        let path = self.artifact_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(FetchError::Artifact)?;
        }
        fs::write(path, content).map_err(FetchError::Artifact)?;
        log::debug!("Saved raw listing to {}", path.display());
        Ok(())
    }
}
