use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::{SEMUA, STATUS_BELUM, STATUS_SELESAI};

/// One roster entry with column types coerced by the loader.
///
/// The three LK statuses are kept as the raw strings from the source;
/// "Selesai" and "Belum" are the recognized values and anything else simply
/// never matches a status comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Opaque member identifier
    pub nik: String,
    pub nama: String,
    /// Komisariat label; case-sensitive key into the campus mapping
    pub komisariat: String,
    /// Cohort year ("Tahun Kaderisasi")
    pub tahun: i32,
    pub kampus: String,
    /// Statuses for LK 1, LK 2, LK 3 in stage order
    pub lk: [String; 3],
}

impl Member {
    /// Whether the given stage (0-based) is recorded as completed;
    /// false for a stage index beyond LK 3
    pub fn stage_completed(&self, stage: usize) -> bool {
        self.lk.get(stage).is_some_and(|s| s == STATUS_SELESAI)
    }
}

/// The loaded record set: coerced members plus the header list actually
/// observed in the source, so the validator can report missing columns.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub members: Vec<Member>,
}

impl RecordSet {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Komisariat selector: one specific unit, or every unit ("Semua")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSelector {
    All,
    One(String),
}

impl UnitSelector {
    /// Parse the CLI form: "Semua" (or empty) selects all units
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == SEMUA {
            UnitSelector::All
        } else {
            UnitSelector::One(value.to_string())
        }
    }

    pub fn matches(&self, komisariat: &str) -> bool {
        match self {
            UnitSelector::All => true,
            UnitSelector::One(unit) => unit == komisariat,
        }
    }
}

/// Filter criteria applied as a logical AND over the record set.
///
/// Empty year/campus sets keep nothing (nothing is selected); an empty
/// status set and an empty search token are no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub komisariat: UnitSelector,
    pub tahun: BTreeSet<i32>,
    pub kampus: BTreeSet<String>,
    pub status: BTreeSet<String>,
    pub search: String,
}

impl FilterCriteria {
    /// Criteria that keep every row of the given record set: all units, all
    /// observed years and campuses, both statuses, no search token.
    pub fn all_of(records: &RecordSet) -> Self {
        FilterCriteria {
            komisariat: UnitSelector::All,
            tahun: records.members.iter().map(|m| m.tahun).collect(),
            kampus: records.members.iter().map(|m| m.kampus.clone()).collect(),
            status: [STATUS_SELESAI, STATUS_BELUM]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            search: String::new(),
        }
    }
}
