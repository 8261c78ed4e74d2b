//! Risk Analysis Simulator
//!
//! Hazards, fault tree events and risk control measures are picked from fixed
//! catalogs, and combined into an initial and a final risk score.

pub mod domain;
pub use domain::{
    Catalog, Config, Fraction, Record, RecordId, ReportFormat, ScoreState, Selection, Session,
    Toggle, UseContext,
};

/// Read-only snapshots of a session for display.
pub mod report;
pub use report::Report;
