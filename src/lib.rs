pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod pipeline;
pub mod types;

pub use error::{CampusViolation, Result, RosterError};
pub use mapping::CampusMapping;
pub use pipeline::loader::DataSource;
pub use pipeline::RosterSession;
pub use types::{FilterCriteria, Member, RecordSet, UnitSelector};
