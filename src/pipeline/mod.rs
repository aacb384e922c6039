pub mod export;
pub mod loader;
pub mod normalize;
pub mod query;
pub mod validate;

use tracing::info;

use crate::error::Result;
use crate::mapping::CampusMapping;
use crate::types::{FilterCriteria, Member, RecordSet};
use loader::{DataSource, LoaderCache};
use query::Summary;

/// One operator session over the roster pipeline.
///
/// Owns its own mapping and loader cache, so labels normalized here never
/// leak into another session. Each interaction runs the full pass
/// load → normalize → validate (loader memoized) and queries derive fresh
/// views from the retained validated record set.
pub struct RosterSession {
    mapping: CampusMapping,
    cache: LoaderCache,
    records: Option<RecordSet>,
}

impl RosterSession {
    pub fn new() -> Self {
        Self {
            mapping: CampusMapping::seeded(),
            cache: LoaderCache::new(),
            records: None,
        }
    }

    /// Run loader → normalizer → validator for the source and retain the
    /// validated record set. On any error the previously retained record
    /// set is dropped: no partial acceptance.
    pub fn refresh(&mut self, source: &DataSource) -> Result<()> {
        self.records = None;
        let records = self.cache.load(source)?;
        normalize::normalize_labels(&records, &mut self.mapping);
        let validated = validate::validate(records, &self.mapping)?;
        info!(rows = validated.len(), "record set validated");
        self.records = Some(validated);
        Ok(())
    }

    /// The validated record set from the last successful refresh
    pub fn records(&self) -> Option<&RecordSet> {
        self.records.as_ref()
    }

    pub fn mapping(&self) -> &CampusMapping {
        &self.mapping
    }

    /// Derive the filtered view and its summary for the given criteria
    pub fn query(&self, criteria: &FilterCriteria) -> (Vec<&Member>, Summary) {
        let view = match &self.records {
            Some(records) => query::filter(records, criteria),
            None => Vec::new(),
        };
        let summary = query::summarize(&view);
        (view, summary)
    }
}

impl Default for RosterSession {
    fn default() -> Self {
        Self::new()
    }
}
