//! Bounded, persisted log of past conversions.
use crate::core::storage::KeyValueStorage;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

/// Most records kept; older ones are evicted on insert.
pub const HISTORY_CAPACITY: usize = 10;

/// Storage key holding the serialized history array.
pub const HISTORY_STORAGE_KEY: &str = "conversionHistory";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub result: String,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortOrder::Latest => "latest",
                SortOrder::Oldest => "oldest",
            }
        )
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest" => Ok(SortOrder::Latest),
            "oldest" => Ok(SortOrder::Oldest),
            _ => Err(anyhow!("Invalid sort order: {}", s)),
        }
    }
}

/// Conversion records, most recent insert first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<ConversionRecord>,
}

impl History {
    pub fn from_records(mut records: Vec<ConversionRecord>) -> Self {
        records.truncate(HISTORY_CAPACITY);
        Self { records }
    }

    pub fn add(&mut self, record: ConversionRecord) {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A copy of the records ordered by timestamp. Stored order is untouched.
    pub fn sorted(&self, order: SortOrder) -> Vec<ConversionRecord> {
        let mut sorted = self.records.clone();
        match order {
            SortOrder::Latest => sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::Oldest => sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        }
        sorted
    }

    /// Reads the history from storage. A missing or unreadable entry yields
    /// an empty history.
    pub fn load(storage: &dyn KeyValueStorage) -> Self {
        let raw = match storage.get(HISTORY_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored conversion history");
                return Self::default();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read conversion history, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<ConversionRecord>>(&raw) {
            Ok(records) => {
                debug!(count = records.len(), "Loaded conversion history");
                Self::from_records(records)
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable conversion history");
                Self::default()
            }
        }
    }

    /// Writes the whole record set to storage.
    pub fn save(&self, storage: &dyn KeyValueStorage) -> Result<()> {
        let json =
            serde_json::to_string(&self.records).context("Failed to serialize history")?;
        storage
            .set(HISTORY_STORAGE_KEY, &json)
            .context("Failed to persist conversion history")?;
        debug!(count = self.records.len(), "Persisted conversion history");
        Ok(())
    }
}
