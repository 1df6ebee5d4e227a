use std::collections::{BTreeSet, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use crate::elements::error::StoreError;
use crate::elements::types::{ElementRecord, RetentionPolicy};

/// Append-only ledger of element records.
///
/// Implementations never update or delete a record as part of these
/// operations. When several records share the newest `created_on`, the one
/// appended last wins.
pub trait ElementStore {
    fn insert(&self, sat_name: &str, line1: &str, line2: &str) -> Result<Uuid, StoreError>;
    fn records(&self) -> Result<Vec<ElementRecord>, StoreError>;

    fn get(&self, id: Uuid) -> Result<Option<ElementRecord>, StoreError> {
        Ok(self.records()?.into_iter().find(|r| r.id == id))
    }

    fn latest_for(&self, sat_name: &str) -> Result<Option<ElementRecord>, StoreError> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.sat_name == sat_name)
            .max_by_key(|r| r.created_on))
    }

    fn latest_any(&self) -> Result<Option<ElementRecord>, StoreError> {
        Ok(self.records()?.into_iter().max_by_key(|r| r.created_on))
    }

    fn unique_names(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.records()?.into_iter().map(|r| r.sat_name).collect())
    }
}

fn new_record(sat_name: &str, line1: &str, line2: &str) -> ElementRecord {
    ElementRecord::new(sat_name, line1, line2, Utc::now().trunc_subsecs(0))
}

/// JSON-lines file, one record per line
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &ElementRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Rewrites the ledger keeping only what `policy` retains.
    /// Returns the number of removed records.
    pub fn prune(&self, policy: RetentionPolicy) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let records = self.records()?;
        let total = records.len();
        let kept = apply_retention(records, policy);
        let removed = total - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        let mut content = String::new();
        for record in &kept {
            content.push_str(&serde_json::to_string(record)?);
            content.push('\n');
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;

        log::info!(
            "Pruned {} of {} element records in {}",
            removed,
            total,
            self.path.display()
        );
        Ok(removed)
    }
}

impl ElementStore for FileStore {
    fn insert(&self, sat_name: &str, line1: &str, line2: &str) -> Result<Uuid, StoreError> {
        let record = new_record(sat_name, line1, line2);
        self.append(&record)?;
        Ok(record.id)
    }

    fn records(&self) -> Result<Vec<ElementRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|source| StoreError::Corrupt {
                line: index + 1,
                source,
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

/// In-process ledger
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ElementRecord>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ElementRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

#[cfg(test)]
impl ElementStore for MemoryStore {
    fn insert(&self, sat_name: &str, line1: &str, line2: &str) -> Result<Uuid, StoreError> {
        let record = new_record(sat_name, line1, line2);
        let id = record.id;
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        Ok(id)
    }

    fn records(&self) -> Result<Vec<ElementRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Keeps ledger order; only drops records beyond the newest `n` per satellite
pub fn apply_retention(records: Vec<ElementRecord>, policy: RetentionPolicy) -> Vec<ElementRecord> {
    let keep = match policy {
        RetentionPolicy::KeepAll => return records,
        RetentionPolicy::KeepLatest(n) => n,
    };

    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        by_name.entry(&record.sat_name).or_default().push(index);
    }

    let mut retained = vec![false; records.len()];
    for indices in by_name.values_mut() {
        // newest first, later appends win ties
        indices.sort_by(|a, b| {
            records[*b]
                .created_on
                .cmp(&records[*a].created_on)
                .then(b.cmp(a))
        });
        for index in indices.iter().take(keep) {
            retained[*index] = true;
        }
    }

    records
        .into_iter()
        .zip(retained)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect()
}
