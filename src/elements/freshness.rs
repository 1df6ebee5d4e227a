use chrono::{DateTime, Duration, Utc};

use crate::elements::error::StoreError;
use crate::elements::store::ElementStore;

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::hours(2);

/// Rate limit for re-fetching element listings from the remote source.
///
/// The check is a pure read of the store: it is not atomic with the fetch
/// that follows it. [`Fetcher`](super::Fetcher) serialises the two.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessGate {
    min_interval: Duration,
}

impl Default for FreshnessGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl FreshnessGate {
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn is_fetch_due<S: ElementStore>(&self, store: &S) -> Result<bool, StoreError> {
        self.is_fetch_due_at(store, Utc::now())
    }

    pub fn is_fetch_due_at<S: ElementStore>(
        &self,
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let Some(latest) = store.latest_any()? else {
            return Ok(true);
        };

        let age = (now - latest.created_on).abs();
        Ok(age > self.min_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::store::MemoryStore;
    use crate::elements::types::ElementRecord;

    fn store_with_record_aged(age: Duration, now: DateTime<Utc>) -> MemoryStore {
        MemoryStore::from_records(vec![ElementRecord::new("ISS (ZARYA)", "l1", "l2", now - age)])
    }

    #[test]
    fn empty_store_is_due() {
        let gate = FreshnessGate::default();
        assert!(gate.is_fetch_due(&MemoryStore::new()).unwrap());
    }

    #[test]
    fn record_within_interval_is_not_due() {
        let now = Utc::now();
        let gate = FreshnessGate::default();

        let store = store_with_record_aged(Duration::minutes(30), now);
        assert!(!gate.is_fetch_due_at(&store, now).unwrap());

        let store = store_with_record_aged(Duration::hours(2), now);
        assert!(!gate.is_fetch_due_at(&store, now).unwrap());
    }

    #[test]
    fn record_older_than_interval_is_due() {
        let now = Utc::now();
        let store = store_with_record_aged(Duration::hours(2) + Duration::seconds(1), now);
        assert!(FreshnessGate::default().is_fetch_due_at(&store, now).unwrap());
    }

    #[test]
    fn only_the_newest_record_counts() {
        let now = Utc::now();
        let store = MemoryStore::from_records(vec![
            ElementRecord::new("CSS (TIANHE)", "l1", "l2", now - Duration::days(3)),
            ElementRecord::new("ISS (ZARYA)", "l1", "l2", now - Duration::minutes(5)),
        ]);
        assert!(!FreshnessGate::default().is_fetch_due_at(&store, now).unwrap());
    }

    #[test]
    fn custom_interval() {
        let now = Utc::now();
        let store = store_with_record_aged(Duration::minutes(20), now);
        let gate = FreshnessGate::new(Duration::minutes(15));
        assert!(gate.is_fetch_due_at(&store, now).unwrap());
    }
}
