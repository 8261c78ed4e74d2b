use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Phase, Session, UseContext};

/// The delimiter placed between record names in a summary line.
pub const DELIMITER: &str = ", ";

/// A borrowed snapshot of a session, suitable for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    /// When the snapshot was taken.
    pub generated: DateTime<Utc>,
    /// Description of the device under analysis.
    pub context: &'a UseContext,
    /// Names of the selected hazards, in selection order.
    pub hazards: Vec<&'a str>,
    /// Names of the selected fault tree events, in selection order.
    pub fault_tree_events: Vec<&'a str>,
    /// Names of the selected risk control measures, in selection order.
    pub risk_control_measures: Vec<&'a str>,
    /// The most recently computed initial risk score.
    pub initial_risk_score: f64,
    /// The most recently computed final risk score.
    pub final_risk_score: f64,
    /// Which scores have been computed.
    pub phase: Phase,
    /// Whether the selection changed after the scores were computed.
    pub stale: bool,
}

impl<'a> Report<'a> {
    /// Takes a snapshot of the session.
    #[must_use]
    pub fn from_session(session: &'a Session<'_>) -> Self {
        let scores = session.scores();
        Self {
            generated: Utc::now(),
            context: &session.context,
            hazards: session.hazards().names().collect(),
            fault_tree_events: session.fault_tree_events().names().collect(),
            risk_control_measures: session.risk_control_measures().names().collect(),
            initial_risk_score: scores.initial(),
            final_risk_score: scores.final_score(),
            phase: scores.phase(),
            stale: session.scores_are_stale(),
        }
    }

    /// The selected hazard names joined by [`DELIMITER`].
    #[must_use]
    pub fn hazard_summary(&self) -> String {
        self.hazards.join(DELIMITER)
    }

    /// The selected fault tree event names joined by [`DELIMITER`].
    #[must_use]
    pub fn fault_tree_event_summary(&self) -> String {
        self.fault_tree_events.join(DELIMITER)
    }

    /// The selected risk control measure names joined by [`DELIMITER`].
    #[must_use]
    pub fn risk_control_measure_summary(&self) -> String {
        self.risk_control_measures.join(DELIMITER)
    }

    /// A [`fmt::Display`] rendering of the report as labelled lines of text.
    ///
    /// Scores are printed with `precision` decimal places. Context lines are
    /// omitted when the corresponding field is empty.
    #[must_use]
    pub const fn text(&self, precision: usize) -> TextReport<'_, 'a> {
        TextReport {
            report: self,
            precision,
        }
    }

    /// Renders the report as labelled lines of text.
    #[must_use]
    pub fn to_text(&self, precision: usize) -> String {
        self.text(precision).to_string()
    }

    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Text rendering of a [`Report`] at a fixed score precision.
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'r, 'a> {
    report: &'r Report<'a>,
    precision: usize,
}

impl fmt::Display for TextReport<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let context = [
            ("Intended Use", &report.context.intended_use),
            ("Use Case", &report.context.use_case),
            ("Indications for Use", &report.context.indications_for_use),
        ];
        let mut has_context = false;
        for (label, value) in context {
            if !value.is_empty() {
                writeln!(f, "{label}: {value}")?;
                has_context = true;
            }
        }
        if has_context {
            writeln!(f)?;
        }

        writeln!(f, "Selected Hazards: {}", report.hazard_summary())?;
        writeln!(
            f,
            "Selected Fault Tree Events: {}",
            report.fault_tree_event_summary()
        )?;
        writeln!(
            f,
            "Selected Risk Control Measures: {}",
            report.risk_control_measure_summary()
        )?;
        writeln!(
            f,
            "Initial Risk Score: {}",
            format_score(report.initial_risk_score, self.precision)
        )?;
        writeln!(
            f,
            "Final Risk Score: {}",
            format_score(report.final_risk_score, self.precision)
        )
    }
}

/// Formats a score with a fixed number of decimal places.
#[must_use]
pub fn format_score(score: f64, precision: usize) -> String {
    format!("{score:.precision$}")
}
