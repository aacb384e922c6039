use std::collections::BTreeSet;
use tracing::info;

use crate::constants::{COL_KAMPUS, COL_KOMISARIAT, UNKNOWN_CAMPUS};
use crate::mapping::CampusMapping;
use crate::types::RecordSet;

/// Extend the mapping with komisariat labels discovered in the record set.
///
/// For every distinct label not already a mapping key, the distinct
/// non-empty campus values observed for that label are collected, sorted,
/// and inserted; a label with no observed campus gets the "(unknown)"
/// sentinel. Existing keys are never overwritten, so the step is additive
/// and idempotent, and it never rejects data. A record set missing the
/// komisariat or kampus column is left untouched; the validator reports
/// those columns.
pub fn normalize_labels(records: &RecordSet, mapping: &mut CampusMapping) {
    if !records.has_column(COL_KOMISARIAT) || !records.has_column(COL_KAMPUS) {
        return;
    }

    // Distinct unknown labels in first-encountered order
    let mut unknown: Vec<&str> = Vec::new();
    for member in &records.members {
        let label = member.komisariat.as_str();
        if label.is_empty() || mapping.contains(label) || unknown.contains(&label) {
            continue;
        }
        unknown.push(label);
    }

    for label in unknown {
        let campuses: BTreeSet<&str> = records
            .members
            .iter()
            .filter(|m| m.komisariat == label && !m.kampus.is_empty())
            .map(|m| m.kampus.as_str())
            .collect();

        let permitted: Vec<String> = if campuses.is_empty() {
            vec![UNKNOWN_CAMPUS.to_string()]
        } else {
            campuses.into_iter().map(|c| c.to_string()).collect()
        };

        info!(label = %label, campuses = ?permitted, "accepting unrecognized komisariat label");
        mapping.insert(label.to_string(), permitted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEED_MAPPING;
    use crate::types::Member;

    fn member(komisariat: &str, kampus: &str) -> Member {
        Member {
            nik: "1".to_string(),
            nama: "Test".to_string(),
            komisariat: komisariat.to_string(),
            tahun: 2020,
            kampus: kampus.to_string(),
            lk: ["Belum".to_string(), "Belum".to_string(), "Belum".to_string()],
        }
    }

    fn record_set(members: Vec<Member>) -> RecordSet {
        RecordSet {
            columns: vec![COL_KOMISARIAT.to_string(), COL_KAMPUS.to_string()],
            members,
        }
    }

    #[test]
    fn unknown_label_gets_sorted_observed_campuses() {
        let records = record_set(vec![
            member("Komisariat Baru", "UGM"),
            member("Komisariat Baru", "ITS"),
            member("Komisariat Baru", "UGM"),
        ]);
        let mut mapping = CampusMapping::seeded();
        normalize_labels(&records, &mut mapping);

        assert_eq!(
            mapping.permitted("Komisariat Baru"),
            Some(&["ITS".to_string(), "UGM".to_string()][..])
        );
    }

    #[test]
    fn label_without_campus_gets_sentinel() {
        let records = record_set(vec![member("Komisariat Lama", "")]);
        let mut mapping = CampusMapping::seeded();
        normalize_labels(&records, &mut mapping);

        assert!(mapping.is_unknown("Komisariat Lama"));
    }

    #[test]
    fn known_labels_are_untouched() {
        let records = record_set(vec![member("Komtar", "ITB")]);
        let mut mapping = CampusMapping::seeded();
        normalize_labels(&records, &mut mapping);

        // Observed campus does not widen the seeded entry
        assert_eq!(mapping.permitted("Komtar"), Some(&["UIN".to_string()][..]));
    }

    #[test]
    fn normalizer_is_idempotent() {
        let records = record_set(vec![
            member("Komisariat Baru", "UGM"),
            member("Komisariat Lama", ""),
        ]);
        let mut once = CampusMapping::seeded();
        normalize_labels(&records, &mut once);
        let mut twice = once.clone();
        normalize_labels(&records, &mut twice);

        assert_eq!(once.len(), twice.len());
        let once_labels: Vec<&str> = once.labels().collect();
        let twice_labels: Vec<&str> = twice.labels().collect();
        assert_eq!(once_labels, twice_labels);
    }

    #[test]
    fn every_observed_label_becomes_a_key() {
        let records = record_set(vec![
            member("Komtar", "UIN"),
            member("Komisariat Baru", "UGM"),
            member("Komisariat Lain", ""),
        ]);
        let mut mapping = CampusMapping::seeded();
        normalize_labels(&records, &mut mapping);

        for m in &records.members {
            assert!(mapping.contains(&m.komisariat));
        }
        assert_eq!(mapping.len(), SEED_MAPPING.len() + 2);
    }

    #[test]
    fn missing_columns_are_a_no_op() {
        let records = RecordSet {
            columns: vec!["Nama".to_string()],
            members: vec![member("Komisariat Baru", "UGM")],
        };
        let mut mapping = CampusMapping::seeded();
        normalize_labels(&records, &mut mapping);
        assert!(!mapping.contains("Komisariat Baru"));
    }
}
