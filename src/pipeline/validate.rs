use std::collections::BTreeSet;
use tracing::warn;

use crate::constants::required_columns;
use crate::error::{CampusViolation, Result, RosterError};
use crate::mapping::CampusMapping;
use crate::types::RecordSet;

/// Enforce schema and referential rules against the (possibly extended)
/// mapping. Checks run in order and each failure is terminal for the input,
/// carrying the complete batch of violations so the operator can fix the
/// source file in one round-trip:
///
/// 1. required columns present, else `Schema` with the missing columns in
///    schema order;
/// 2. every non-empty komisariat label is a mapping key (an empty cell is
///    a missing value, not an unknown label), else `UnknownLabels` with
///    the sorted offending labels;
/// 3. every row's campus is in its label's permitted set (skipped for
///    sentinel labels), else `CampusMismatch` with every violating row.
///
/// On success the record set is returned unchanged, valid for querying.
pub fn validate(records: RecordSet, mapping: &CampusMapping) -> Result<RecordSet> {
    let missing: Vec<String> = required_columns()
        .into_iter()
        .filter(|col| !records.has_column(col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        warn!(missing = ?missing, "record set rejected: missing columns");
        return Err(RosterError::Schema { missing });
    }

    // An empty label is a missing value, not an unknown one; the normalizer
    // skips it for the same reason, and the campus check falls through
    // because a missing label has no permitted set
    let unknown: BTreeSet<String> = records
        .members
        .iter()
        .map(|m| m.komisariat.clone())
        .filter(|label| !label.is_empty() && !mapping.contains(label))
        .collect();
    if !unknown.is_empty() {
        let labels: Vec<String> = unknown.into_iter().collect();
        warn!(labels = ?labels, "record set rejected: unrecognized komisariat labels");
        return Err(RosterError::UnknownLabels { labels });
    }

    let mut violations = Vec::new();
    for (row, member) in records.members.iter().enumerate() {
        if mapping.is_unknown(&member.komisariat) {
            continue;
        }
        // Label existence was established by the previous check
        let permitted = match mapping.permitted(&member.komisariat) {
            Some(p) if !p.is_empty() => p,
            _ => continue,
        };
        if !permitted.contains(&member.kampus) {
            violations.push(CampusViolation {
                row,
                komisariat: member.komisariat.clone(),
                found: member.kampus.clone(),
                expected: permitted[0].clone(),
            });
        }
    }
    if !violations.is_empty() {
        warn!(count = violations.len(), "record set rejected: campus mismatches");
        return Err(RosterError::CampusMismatch { violations });
    }

    Ok(records)
}
