use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{SEED_MAPPING, UNKNOWN_CAMPUS};

static SEED: Lazy<CampusMapping> = Lazy::new(|| {
    let mut mapping = CampusMapping {
        permitted: HashMap::new(),
        order: Vec::new(),
    };
    for (label, campuses) in SEED_MAPPING {
        mapping.insert(label.to_string(), campuses.iter().map(|c| c.to_string()).collect());
    }
    mapping
});

/// Reference table constraining which campuses are valid for which
/// komisariat. Keys are case-sensitive exact strings; insertion order is
/// preserved for display. Mutation is additive only: the normalizer may add
/// labels discovered in input data, existing keys are never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampusMapping {
    permitted: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl CampusMapping {
    /// A fresh mapping holding only the seed table. Each session owns its
    /// own instance so normalized labels never leak across sessions.
    pub fn seeded() -> Self {
        SEED.clone()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.permitted.contains_key(label)
    }

    /// Permitted campuses for a label, in their stored order
    pub fn permitted(&self, label: &str) -> Option<&[String]> {
        self.permitted.get(label).map(|c| c.as_slice())
    }

    /// Whether the label's permitted set is exactly the "(unknown)"
    /// sentinel, which disables the campus-consistency check for it.
    pub fn is_unknown(&self, label: &str) -> bool {
        matches!(self.permitted.get(label), Some(c) if c.len() == 1 && c[0] == UNKNOWN_CAMPUS)
    }

    /// Labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|l| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert a label with its permitted campuses. No-op if the label is
    /// already present: existing entries are never overwritten.
    pub fn insert(&mut self, label: String, campuses: Vec<String>) {
        if self.permitted.contains_key(&label) {
            return;
        }
        self.order.push(label.clone());
        self.permitted.insert(label, campuses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_mapping_preserves_seed_order() {
        let mapping = CampusMapping::seeded();
        let labels: Vec<&str> = mapping.labels().collect();
        assert_eq!(labels.first(), Some(&"Komfakdisa"));
        assert_eq!(labels.last(), Some(&"Komici"));
        assert_eq!(labels.len(), SEED_MAPPING.len());
    }

    #[test]
    fn insert_never_overwrites() {
        let mut mapping = CampusMapping::seeded();
        mapping.insert("Komtar".to_string(), vec!["ITB".to_string()]);
        assert_eq!(mapping.permitted("Komtar"), Some(&["UIN".to_string()][..]));
        assert_eq!(mapping.len(), SEED_MAPPING.len());
    }

    #[test]
    fn unknown_sentinel_detected() {
        let mut mapping = CampusMapping::seeded();
        mapping.insert("Komisariat Lama".to_string(), vec![UNKNOWN_CAMPUS.to_string()]);
        assert!(mapping.is_unknown("Komisariat Lama"));
        assert!(!mapping.is_unknown("Komtar"));
    }
}
