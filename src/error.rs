use thiserror::Error;

/// One campus-consistency violation, reported with enough context for the
/// operator to fix the row in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampusViolation {
    /// Zero-based row index within the record set
    pub row: usize,
    /// Komisariat label on the offending row
    pub komisariat: String,
    /// Campus value found in the file
    pub found: String,
    /// Suggested correction (first permitted campus for the label)
    pub expected: String,
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to load data source '{source_ref}': {reason}")]
    Load { source_ref: String, reason: String },

    #[error("missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("unrecognized komisariat labels: {}", labels.join(", "))]
    UnknownLabels { labels: Vec<String> },

    #[error("{} row(s) have a campus outside their komisariat mapping", violations.len())]
    CampusMismatch { violations: Vec<CampusViolation> },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RosterError>;
