//! Offline demo dataset.
//!
//! Records are loaded on first use and kept for the lifetime of the dataset.
//! Load failures never surface as errors: the dataset is simply empty.

use std::path::PathBuf;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::model::{Criteria, MaterialRecord};

/// Dataset compiled into the binary.
const EMBEDDED_DATASET: &str = include_str!("../../data/demo_materials.json");

/// On-disk dataset formats: versioned envelope or a bare record list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Versioned {
        version: u32,
        materials: Vec<serde_json::Value>,
    },
    Bare(Vec<serde_json::Value>),
}

#[derive(Debug, Clone)]
enum DatasetSource {
    Embedded,
    File(PathBuf),
}

/// Lazily loaded, read-only collection of sample records.
#[derive(Debug)]
pub struct DemoDataset {
    source: DatasetSource,
    records: OnceLock<Vec<MaterialRecord>>,
    #[cfg(test)]
    loads: AtomicUsize,
}

impl DemoDataset {
    fn with_source(source: DatasetSource, records: OnceLock<Vec<MaterialRecord>>) -> Self {
        Self {
            source,
            records,
            #[cfg(test)]
            loads: AtomicUsize::new(0),
        }
    }

    /// The built-in dataset.
    pub fn embedded() -> Self {
        Self::with_source(DatasetSource::Embedded, OnceLock::new())
    }

    /// A dataset read from a JSON file on first use.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(DatasetSource::File(path.into()), OnceLock::new())
    }

    /// The configured dataset file, or the built-in one.
    pub fn from_config(config: &Config) -> Self {
        match config.demo_dataset_path() {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    /// An already-loaded dataset.
    pub fn from_records(records: Vec<MaterialRecord>) -> Self {
        let lock = OnceLock::new();
        let _ = lock.set(records);
        Self::with_source(DatasetSource::Embedded, lock)
    }

    /// All records, loading them if this is the first access.
    pub fn records(&self) -> &[MaterialRecord] {
        self.records.get_or_init(|| self.load())
    }

    pub fn is_loaded(&self) -> bool {
        self.records.get().is_some()
    }

    /// Records matching `criteria`, in dataset order, truncated to `limit`.
    pub fn search(&self, criteria: &Criteria, limit: usize) -> Vec<MaterialRecord> {
        let matches: Vec<MaterialRecord> = self
            .records()
            .iter()
            .filter(|record| criteria.matches(record))
            .take(limit)
            .cloned()
            .collect();

        debug!(
            criteria = %criteria.describe(),
            count = matches.len(),
            "Demo dataset search"
        );
        matches
    }

    fn load(&self) -> Vec<MaterialRecord> {
        #[cfg(test)]
        self.loads.fetch_add(1, Ordering::SeqCst);

        let (label, content) = match &self.source {
            DatasetSource::Embedded => ("built-in".to_string(), EMBEDDED_DATASET.to_string()),
            DatasetSource::File(path) => match std::fs::read_to_string(path) {
                Ok(content) => (path.display().to_string(), content),
                Err(e) => {
                    warn!(
                        "Demo dataset not readable at {}: {}. Using an empty dataset.",
                        path.display(),
                        e
                    );
                    return Vec::new();
                }
            },
        };

        let records = parse_dataset(&content, &label);
        info!("Loaded {} demo materials from {}", records.len(), label);
        records
    }
}

impl Default for DemoDataset {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Parse dataset JSON, skipping records that lack an identifier.
fn parse_dataset(content: &str, label: &str) -> Vec<MaterialRecord> {
    let materials = match serde_json::from_str::<DatasetFile>(content) {
        Ok(DatasetFile::Versioned { version, materials }) => {
            debug!(version, "Demo dataset version");
            materials
        }
        Ok(DatasetFile::Bare(materials)) => materials,
        Err(e) => {
            warn!(
                "Demo dataset {} is not valid JSON: {}. Using an empty dataset.",
                label, e
            );
            return Vec::new();
        }
    };

    materials
        .into_iter()
        .filter_map(|value| match MaterialRecord::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping demo record in {}: {}", label, e);
                None
            }
        })
        .collect()
}
