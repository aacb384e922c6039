use csv::ReaderBuilder;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::constants::{COL_KAMPUS, COL_KOMISARIAT, COL_LK, COL_NAMA, COL_NIK, COL_TAHUN};
use crate::error::{Result, RosterError};
use crate::types::{Member, RecordSet};

/// A tabular data source: a file on disk or an in-memory byte buffer
/// (e.g. an uploaded file handed over by the presentation layer).
#[derive(Debug, Clone)]
pub enum DataSource {
    Path(PathBuf),
    Buffer { name: String, bytes: Vec<u8> },
}

impl DataSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DataSource::Path(path.into())
    }

    /// Stable reference string identifying this source; the cache key
    pub fn reference(&self) -> String {
        match self {
            DataSource::Path(path) => path.display().to_string(),
            DataSource::Buffer { name, .. } => format!("buffer:{}", name),
        }
    }
}

fn compute_fingerprint(source_ref: &str, bytes: &[u8]) -> String {
    // Canonical string of reference + content; can be evolved later
    let mut hasher = Sha256::new();
    hasher.update(source_ref.as_bytes());
    hasher.update(b"|");
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Memoizes parsed record sets by source reference + content fingerprint,
/// so repeated loads of the same unchanged source skip re-parsing. A new
/// reference or changed content is a miss.
#[derive(Debug, Default)]
pub struct LoaderCache {
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: String,
    records: RecordSet,
}

impl LoaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the source, consulting the cache first
    pub fn load(&mut self, source: &DataSource) -> Result<RecordSet> {
        let source_ref = source.reference();
        let bytes = match source {
            DataSource::Path(path) => fs::read(path).map_err(|e| RosterError::Load {
                source_ref: source_ref.clone(),
                reason: e.to_string(),
            })?,
            DataSource::Buffer { bytes, .. } => bytes.clone(),
        };

        let fingerprint = compute_fingerprint(&source_ref, &bytes);
        if let Some(entry) = self.entries.get(&source_ref) {
            if entry.fingerprint == fingerprint {
                debug!(source = %source_ref, "loader cache hit");
                return Ok(entry.records.clone());
            }
        }

        let records = parse_records(&bytes, &source_ref)?;
        info!(source = %source_ref, rows = records.len(), "loaded record set");
        self.entries.insert(
            source_ref,
            CacheEntry {
                fingerprint,
                records: records.clone(),
            },
        );
        Ok(records)
    }
}

/// Parse CSV bytes into a record set with column types coerced: years as
/// integers, ids as opaque strings, statuses as raw strings. Column order in
/// the source is irrelevant; lookups go through the header map. Columns
/// missing entirely are left for the validator to report.
pub fn parse_records(bytes: &[u8], source_ref: &str) -> Result<RecordSet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let index: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();

    let field = |record: &csv::StringRecord, col: &str| -> String {
        index
            .get(col)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .to_string()
    };

    let mut members = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;

        let tahun = if index.contains_key(COL_TAHUN) {
            let raw = field(&record, COL_TAHUN);
            raw.parse::<i32>().map_err(|_| RosterError::Load {
                source_ref: source_ref.to_string(),
                reason: format!(
                    "row {}: '{}' value '{}' is not a valid year",
                    row_idx + 2,
                    COL_TAHUN,
                    raw
                ),
            })?
        } else {
            0
        };

        members.push(Member {
            nik: field(&record, COL_NIK),
            nama: field(&record, COL_NAMA),
            komisariat: field(&record, COL_KOMISARIAT),
            tahun,
            kampus: field(&record, COL_KAMPUS),
            lk: [
                field(&record, COL_LK[0]),
                field(&record, COL_LK[1]),
                field(&record, COL_LK[2]),
            ],
        });
    }

    Ok(RecordSet { columns, members })
}
