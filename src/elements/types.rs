use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One dated orbital element set as stored in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: Uuid,
    pub sat_name: String,
    pub line1: String,
    pub line2: String,
    pub created_on: DateTime<Utc>,
}

impl ElementRecord {
    pub fn new(sat_name: &str, line1: &str, line2: &str, created_on: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sat_name: sat_name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            created_on,
        }
    }
}

/// How many historical records to keep when the ledger is pruned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    #[default]
    KeepAll,
    /// Keep the newest `n` records of every satellite
    KeepLatest(usize),
}

/// Outcome of [`Fetcher::ensure_fresh`](super::Fetcher::ensure_fresh)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    UpToDate,
    Fetched {
        inserted: usize,
        dropped_lines: usize,
    },
    /// The fetch failed and the caller chose to continue with stored records
    Stale,
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::UpToDate => write!(f, "Element sets are up to date"),
            FetchStatus::Fetched { inserted, .. } => {
                write!(f, "Fetched {} element sets", inserted)
            }
            FetchStatus::Stale => write!(f, "Fetch failed, using stored element sets"),
        }
    }
}
