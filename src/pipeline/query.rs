use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::constants::{COL_LK, STATUS_BELUM};
use crate::types::{FilterCriteria, Member, RecordSet};

/// Whether a member passes every filter in the criteria.
///
/// The criteria are AND-composed, so the outcome is independent of any
/// filter ordering. The status filter keeps a row when ANY of its three
/// stage statuses is in the selected set; an empty status set and an empty
/// search token are no-ops.
pub fn matches(member: &Member, criteria: &FilterCriteria) -> bool {
    if !criteria.komisariat.matches(&member.komisariat) {
        return false;
    }
    if !criteria.tahun.contains(&member.tahun) {
        return false;
    }
    if !criteria.kampus.contains(&member.kampus) {
        return false;
    }
    if !criteria.search.is_empty() {
        let token = criteria.search.to_lowercase();
        let name_hit = member.nama.to_lowercase().contains(&token);
        let nik_hit = member.nik.contains(&criteria.search);
        if !name_hit && !nik_hit {
            return false;
        }
    }
    if !criteria.status.is_empty() && !member.lk.iter().any(|s| criteria.status.contains(s)) {
        return false;
    }
    true
}

/// Derive the filtered view, preserving input order
pub fn filter<'a>(records: &'a RecordSet, criteria: &FilterCriteria) -> Vec<&'a Member> {
    records
        .members
        .iter()
        .filter(|m| matches(m, criteria))
        .collect()
}

/// One row of the three-row stage summary table
#[derive(Debug, Clone, Serialize)]
pub struct StageCounts {
    pub stage: String,
    pub selesai: usize,
    pub belum: usize,
}

/// Summary statistics over a filtered view. A pure function of the view:
/// safe to recompute on every criteria change.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total: usize,
    /// Most frequent cohort year; None for an empty view
    pub top_tahun: Option<i32>,
    /// Most frequent komisariat label; None for an empty view
    pub top_komisariat: Option<String>,
    /// Per-stage completed percentage, rounded down; 0 for an empty view
    pub completion_pct: [u32; 3],
    /// Counts bucketed by cohort year, ascending
    pub tahun_counts: Vec<(i32, usize)>,
    /// Counts bucketed by komisariat, descending by count
    pub komisariat_counts: Vec<(String, usize)>,
    pub stages: Vec<StageCounts>,
}

/// Most frequent value; ties go to the value first encountered in input
/// order, so the result is deterministic for a fixed input ordering.
fn most_frequent<T, I>(values: I) -> Option<T>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        let entry = counts.entry(value).or_insert((0, idx));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .min_by_key(|(_, (count, first_seen))| (std::cmp::Reverse(*count), *first_seen))
        .map(|(value, _)| value)
}

pub fn summarize(view: &[&Member]) -> Summary {
    let total = view.len();

    let top_tahun = most_frequent(view.iter().map(|m| m.tahun));
    let top_komisariat = most_frequent(view.iter().map(|m| m.komisariat.clone()));

    let mut completed = [0usize; 3];
    let mut pending = [0usize; 3];
    for member in view {
        for stage in 0..3 {
            if member.stage_completed(stage) {
                completed[stage] += 1;
            } else if member.lk[stage] == STATUS_BELUM {
                pending[stage] += 1;
            }
        }
    }

    let mut completion_pct = [0u32; 3];
    if total > 0 {
        for stage in 0..3 {
            completion_pct[stage] = (100 * completed[stage] / total) as u32;
        }
    }

    let mut tahun_buckets: BTreeMap<i32, usize> = BTreeMap::new();
    for member in view {
        *tahun_buckets.entry(member.tahun).or_default() += 1;
    }

    let mut komisariat_buckets: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, member) in view.iter().enumerate() {
        let entry = komisariat_buckets
            .entry(member.komisariat.as_str())
            .or_insert((0, idx));
        entry.0 += 1;
    }
    let mut komisariat_counts: Vec<(&str, (usize, usize))> = komisariat_buckets.into_iter().collect();
    komisariat_counts.sort_by_key(|(_, (count, first_seen))| (std::cmp::Reverse(*count), *first_seen));

    let stages = (0..3)
        .map(|stage| StageCounts {
            stage: COL_LK[stage].to_string(),
            selesai: completed[stage],
            belum: pending[stage],
        })
        .collect();

    Summary {
        total,
        top_tahun,
        top_komisariat,
        completion_pct,
        tahun_counts: tahun_buckets.into_iter().collect(),
        komisariat_counts: komisariat_counts
            .into_iter()
            .map(|(label, (count, _))| (label.to_string(), count))
            .collect(),
        stages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STATUS_SELESAI;
    use crate::types::UnitSelector;
    use std::collections::BTreeSet;

    fn member(nik: &str, nama: &str, komisariat: &str, tahun: i32, lk1: &str) -> Member {
        Member {
            nik: nik.to_string(),
            nama: nama.to_string(),
            komisariat: komisariat.to_string(),
            tahun,
            kampus: "UIN".to_string(),
            lk: [lk1.to_string(), "Belum".to_string(), "Belum".to_string()],
        }
    }

    fn record_set(members: Vec<Member>) -> RecordSet {
        RecordSet {
            columns: crate::constants::required_columns()
                .into_iter()
                .map(|c| c.to_string())
                .collect(),
            members,
        }
    }

    fn criteria(records: &RecordSet) -> FilterCriteria {
        FilterCriteria::all_of(records)
    }

    #[test]
    fn komtar_example_filters_and_summarizes() {
        let records = record_set(vec![
            member("1", "Ahmad", "Komtar", 2020, "Selesai"),
            member("2", "Budi", "Komtar", 2021, "Belum"),
        ]);
        let mut c = criteria(&records);
        c.komisariat = UnitSelector::One("Komtar".to_string());

        let view = filter(&records, &c);
        assert_eq!(view.len(), 2);

        let summary = summarize(&view);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completion_pct[0], 50);
        assert_eq!(summary.top_komisariat.as_deref(), Some("Komtar"));
    }

    #[test]
    fn empty_status_set_is_a_no_op() {
        let records = record_set(vec![
            member("1", "Ahmad", "Komtar", 2020, "Selesai"),
            member("2", "Budi", "Komtar", 2021, "Belum"),
        ]);
        let mut with_statuses = criteria(&records);
        let mut without = criteria(&records);
        without.status = BTreeSet::new();
        with_statuses.status =
            [STATUS_SELESAI, STATUS_BELUM].iter().map(|s| s.to_string()).collect();

        assert_eq!(
            filter(&records, &without).len(),
            filter(&records, &with_statuses).len()
        );
    }

    #[test]
    fn status_filter_matches_any_stage() {
        let mut late_bloomer = member("1", "Ahmad", "Komtar", 2020, "Belum");
        late_bloomer.lk[2] = "Selesai".to_string();
        let records = record_set(vec![
            late_bloomer,
            member("2", "Budi", "Komtar", 2021, "Belum"),
        ]);
        let mut c = criteria(&records);
        c.status = [STATUS_SELESAI.to_string()].into_iter().collect();

        let view = filter(&records, &c);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].nik, "1");
    }

    #[test]
    fn search_matches_name_case_insensitively_or_nik() {
        let records = record_set(vec![
            member("32760101", "Ahmad Fauzi", "Komtar", 2020, "Belum"),
            member("32760202", "Budi Santoso", "Komtar", 2020, "Belum"),
        ]);
        let mut c = criteria(&records);
        c.search = "fauzi".to_string();
        assert_eq!(filter(&records, &c).len(), 1);

        c.search = "0202".to_string();
        let view = filter(&records, &c);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].nama, "Budi Santoso");

        c.search = "nobody".to_string();
        assert!(filter(&records, &c).is_empty());
    }

    #[test]
    fn filters_compose_order_independently() {
        let records = record_set(vec![
            member("1", "Ahmad", "Komtar", 2020, "Selesai"),
            member("2", "Budi", "Komfaksy", 2021, "Belum"),
            member("3", "Citra", "Komtar", 2021, "Selesai"),
        ]);
        let mut c = criteria(&records);
        c.komisariat = UnitSelector::One("Komtar".to_string());
        c.tahun = [2021].into_iter().collect();
        c.status = [STATUS_SELESAI.to_string()].into_iter().collect();
        c.search = "citra".to_string();

        // Applying single-criterion passes in two different orders must
        // agree with the combined predicate
        let combined: Vec<&str> = filter(&records, &c).iter().map(|m| m.nik.as_str()).collect();

        let mut unit_only = criteria(&records);
        unit_only.komisariat = c.komisariat.clone();
        let mut year_only = criteria(&records);
        year_only.tahun = c.tahun.clone();
        let mut status_only = criteria(&records);
        status_only.status = c.status.clone();
        let mut search_only = criteria(&records);
        search_only.search = c.search.clone();

        let forward: Vec<&str> = records
            .members
            .iter()
            .filter(|m| matches(m, &unit_only))
            .filter(|m| matches(m, &year_only))
            .filter(|m| matches(m, &status_only))
            .filter(|m| matches(m, &search_only))
            .map(|m| m.nik.as_str())
            .collect();
        let backward: Vec<&str> = records
            .members
            .iter()
            .filter(|m| matches(m, &search_only))
            .filter(|m| matches(m, &status_only))
            .filter(|m| matches(m, &year_only))
            .filter(|m| matches(m, &unit_only))
            .map(|m| m.nik.as_str())
            .collect();

        assert_eq!(combined, forward);
        assert_eq!(combined, backward);
        assert_eq!(combined, vec!["3"]);
    }

    #[test]
    fn empty_view_summary_has_zero_percentages() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completion_pct, [0, 0, 0]);
        assert_eq!(summary.top_tahun, None);
        assert_eq!(summary.top_komisariat, None);
        assert!(summary.tahun_counts.is_empty());
    }

    #[test]
    fn most_frequent_tie_breaks_by_first_encountered() {
        let records = record_set(vec![
            member("1", "A", "Komtar", 2021, "Belum"),
            member("2", "B", "Komfaksy", 2020, "Belum"),
            member("3", "C", "Komfaksy", 2021, "Belum"),
            member("4", "D", "Komtar", 2020, "Belum"),
        ]);
        let view = filter(&records, &criteria(&records));
        let summary = summarize(&view);

        // Both years and both units occur twice; first encountered wins
        assert_eq!(summary.top_tahun, Some(2021));
        assert_eq!(summary.top_komisariat.as_deref(), Some("Komtar"));
    }

    #[test]
    fn buckets_and_stage_table() {
        let records = record_set(vec![
            member("1", "A", "Komtar", 2021, "Selesai"),
            member("2", "B", "Komtar", 2020, "Selesai"),
            member("3", "C", "Komfaksy", 2020, "Belum"),
        ]);
        let view = filter(&records, &criteria(&records));
        let summary = summarize(&view);

        assert_eq!(summary.tahun_counts, vec![(2020, 2), (2021, 1)]);
        assert_eq!(
            summary.komisariat_counts,
            vec![("Komtar".to_string(), 2), ("Komfaksy".to_string(), 1)]
        );
        assert_eq!(summary.stages.len(), 3);
        assert_eq!(summary.stages[0].stage, "LK 1");
        assert_eq!(summary.stages[0].selesai, 2);
        assert_eq!(summary.stages[0].belum, 1);
        assert_eq!(summary.stages[1].selesai, 0);
        assert_eq!(summary.stages[1].belum, 3);
    }
}
