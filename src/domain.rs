//! Domain models for risk analysis.
//!
//! This module contains the static record catalogs, the selection state of a
//! session, and the arithmetic that turns a selection into risk scores.

/// The fixed hazard, fault tree and risk control catalogs.
pub mod catalog;
pub use catalog::{Catalog, UnknownRecordError};

mod config;
pub use config::{Config, ConfigError, ReportFormat};

mod fraction;
pub use fraction::{Fraction, InvalidFractionError};

/// Catalog record types.
pub mod record;
pub use record::{
    Category, FaultTreeEventRecord, HazardRecord, Record, RecordId, RiskControlMeasureRecord,
    Severity,
};

pub mod score;
pub use score::{Phase, Revisions, ScoreState};

mod selection;
pub use selection::{Selection, Toggle};

mod session;
pub use session::{Session, UseContext};
