use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    Catalog, Record, RecordId,
    catalog::UnknownRecordError,
    record::{FaultTreeEventRecord, HazardRecord, RiskControlMeasureRecord},
    score::{self, Revisions, ScoreState},
    selection::{Selection, Toggle},
};

/// Free-text description of the device under analysis.
///
/// These fields are stored verbatim and never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseContext {
    /// The intended use of the device.
    pub intended_use: String,
    /// The use case being analysed.
    pub use_case: String,
    /// The indications for use.
    pub indications_for_use: String,
}

/// The state of one risk analysis.
///
/// A session starts with nothing selected and both scores at zero. It is
/// changed only by the toggle and compute operations (and by editing the
/// [`UseContext`]). Scores are never recomputed implicitly, so they can be
/// stale relative to the current selection.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    catalog: &'a Catalog,
    /// Description of the device under analysis.
    pub context: UseContext,
    hazards: Selection<'a, HazardRecord>,
    fault_tree_events: Selection<'a, FaultTreeEventRecord>,
    risk_control_measures: Selection<'a, RiskControlMeasureRecord>,
    scores: ScoreState,
    revisions: Revisions,
}

impl<'a> Session<'a> {
    /// Starts an empty session over the given catalog.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            context: UseContext::default(),
            hazards: Selection::default(),
            fault_tree_events: Selection::default(),
            risk_control_measures: Selection::default(),
            scores: ScoreState::default(),
            revisions: Revisions::default(),
        }
    }

    /// The catalog this session selects from.
    #[must_use]
    pub const fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Toggles a hazard in or out of the selection.
    #[instrument(level = "debug", skip_all, fields(id = record.id, name = record.name))]
    pub fn toggle_hazard(&mut self, record: &'a HazardRecord) -> Toggle {
        let toggle = self.hazards.toggle(record);
        self.revisions.initial_inputs += 1;
        log_toggle(toggle, self.revisions)
    }

    /// Toggles a fault tree event in or out of the selection.
    #[instrument(level = "debug", skip_all, fields(id = record.id, name = record.name))]
    pub fn toggle_fault_tree_event(&mut self, record: &'a FaultTreeEventRecord) -> Toggle {
        let toggle = self.fault_tree_events.toggle(record);
        self.revisions.initial_inputs += 1;
        log_toggle(toggle, self.revisions)
    }

    /// Toggles a risk control measure in or out of the selection.
    #[instrument(level = "debug", skip_all, fields(id = record.id, name = record.name))]
    pub fn toggle_risk_control_measure(&mut self, record: &'a RiskControlMeasureRecord) -> Toggle {
        let toggle = self.risk_control_measures.toggle(record);
        self.revisions.measures += 1;
        log_toggle(toggle, self.revisions)
    }

    /// Toggles the catalog hazard with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog has no hazard with this id.
    pub fn toggle_hazard_by_id(&mut self, id: RecordId) -> Result<Toggle, UnknownRecordError> {
        let record = self
            .catalog
            .hazard(id)
            .ok_or_else(|| unknown::<HazardRecord>(id))?;
        Ok(self.toggle_hazard(record))
    }

    /// Toggles the catalog fault tree event with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog has no fault tree event with this id.
    pub fn toggle_fault_tree_event_by_id(
        &mut self,
        id: RecordId,
    ) -> Result<Toggle, UnknownRecordError> {
        let record = self
            .catalog
            .fault_tree_event(id)
            .ok_or_else(|| unknown::<FaultTreeEventRecord>(id))?;
        Ok(self.toggle_fault_tree_event(record))
    }

    /// Toggles the catalog risk control measure with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog has no risk control measure with this
    /// id.
    pub fn toggle_risk_control_measure_by_id(
        &mut self,
        id: RecordId,
    ) -> Result<Toggle, UnknownRecordError> {
        let record = self
            .catalog
            .risk_control_measure(id)
            .ok_or_else(|| unknown::<RiskControlMeasureRecord>(id))?;
        Ok(self.toggle_risk_control_measure(record))
    }

    /// Sums the probabilities of the selected hazards and fault tree events
    /// and stores the result as the initial risk score.
    #[instrument(level = "debug", skip(self))]
    pub fn compute_initial_risk_score(&mut self) -> f64 {
        let value = score::initial_risk(self.hazards.iter(), self.fault_tree_events.iter());
        self.scores.set_initial(value, self.revisions);
        debug!(initial = value, "computed initial risk score");
        value
    }

    /// Discounts the current initial risk score by the mean effectiveness of
    /// the selected risk control measures and stores the result as the final
    /// risk score.
    ///
    /// Uses whatever initial score is currently stored, without recomputing
    /// it. With no measures selected the final score equals the initial
    /// score.
    #[instrument(level = "debug", skip(self))]
    pub fn compute_final_risk_score(&mut self) -> f64 {
        let value = score::final_risk(self.scores.initial(), self.risk_control_measures.iter());
        self.scores.set_final(value, self.revisions);
        debug!(
            initial = self.scores.initial(),
            final_score = value,
            measures = self.risk_control_measures.len(),
            "computed final risk score"
        );
        value
    }

    /// The selected hazards.
    #[must_use]
    pub const fn hazards(&self) -> &Selection<'a, HazardRecord> {
        &self.hazards
    }

    /// The selected fault tree events.
    #[must_use]
    pub const fn fault_tree_events(&self) -> &Selection<'a, FaultTreeEventRecord> {
        &self.fault_tree_events
    }

    /// The selected risk control measures.
    #[must_use]
    pub const fn risk_control_measures(&self) -> &Selection<'a, RiskControlMeasureRecord> {
        &self.risk_control_measures
    }

    /// The current scores.
    #[must_use]
    pub const fn scores(&self) -> &ScoreState {
        &self.scores
    }

    /// Whether a computed score no longer matches the records it depends on.
    ///
    /// The initial score depends on hazards and fault tree events. The final
    /// score depends on risk control measures and on the initial score it was
    /// derived from.
    #[must_use]
    pub const fn scores_are_stale(&self) -> bool {
        self.scores.is_stale(self.revisions)
    }
}

fn log_toggle(toggle: Toggle, revisions: Revisions) -> Toggle {
    debug!(
        ?toggle,
        initial_inputs = revisions.initial_inputs,
        measures = revisions.measures,
        "selection changed"
    );
    toggle
}

const fn unknown<R: Record>(id: RecordId) -> UnknownRecordError {
    UnknownRecordError {
        category: R::CATEGORY,
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::score::Phase;

    const EPSILON: f64 = 1e-12;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn new_session_is_empty_and_zeroed() {
        let session = Session::new(Catalog::builtin());

        assert!(session.hazards().is_empty());
        assert!(session.fault_tree_events().is_empty());
        assert!(session.risk_control_measures().is_empty());
        assert_eq!(session.scores().initial(), 0.0);
        assert_eq!(session.scores().final_score(), 0.0);
        assert_eq!(session.scores().phase(), Phase::Uncomputed);
    }

    #[test]
    fn computes_initial_and_final_scores() {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        session.toggle_hazard(&catalog.hazards()[0]);
        session.toggle_hazard(&catalog.hazards()[1]);
        session.toggle_fault_tree_event(&catalog.fault_tree_events()[0]);
        session.toggle_risk_control_measure(&catalog.risk_control_measures()[0]);
        session.toggle_risk_control_measure(&catalog.risk_control_measures()[1]);

        assert_close(session.compute_initial_risk_score(), 0.035);
        assert_close(session.compute_final_risk_score(), 0.008_75);
        assert_eq!(session.scores().phase(), Phase::Final);
    }

    #[test]
    fn final_score_without_measures_falls_back_to_initial() {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        session.toggle_hazard(&catalog.hazards()[0]);
        session.toggle_hazard(&catalog.hazards()[1]);
        session.toggle_fault_tree_event(&catalog.fault_tree_events()[0]);
        session.compute_initial_risk_score();

        let value = session.compute_final_risk_score();

        assert!(!value.is_nan());
        assert_close(value, 0.035);
    }

    #[test]
    fn final_before_initial_uses_zero() {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        session.toggle_hazard(&catalog.hazards()[2]);
        session.toggle_risk_control_measure(&catalog.risk_control_measures()[2]);

        assert_eq!(session.compute_final_risk_score(), 0.0);
    }

    #[test]
    fn final_uses_last_computed_initial_not_current_selection() {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        session.toggle_hazard(&catalog.hazards()[2]);
        session.compute_initial_risk_score();

        // Selection changes after the initial score was computed.
        session.toggle_hazard(&catalog.hazards()[0]);

        assert_close(session.compute_final_risk_score(), 0.05);
        assert_close(session.scores().initial(), 0.05);
    }

    #[test]
    fn toggling_after_compute_marks_scores_stale() {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        session.toggle_hazard(&catalog.hazards()[0]);
        session.compute_initial_risk_score();
        assert!(!session.scores_are_stale());

        session.toggle_fault_tree_event(&catalog.fault_tree_events()[1]);
        assert!(session.scores_are_stale());

        session.compute_initial_risk_score();
        assert!(!session.scores_are_stale());
    }

    #[test]
    fn scores_follow_the_usual_workflow_without_going_stale() {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        session.toggle_hazard(&catalog.hazards()[0]);
        session.compute_initial_risk_score();

        // Measures do not feed the initial score.
        session.toggle_risk_control_measure(&catalog.risk_control_measures()[0]);
        assert!(!session.scores_are_stale());

        session.compute_final_risk_score();
        assert!(!session.scores_are_stale());
    }

    #[test]
    fn toggling_a_measure_after_final_marks_scores_stale() {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        session.toggle_hazard(&catalog.hazards()[0]);
        session.compute_initial_risk_score();
        session.compute_final_risk_score();

        session.toggle_risk_control_measure(&catalog.risk_control_measures()[1]);

        assert!(session.scores_are_stale());
    }

    #[test]
    fn recomputing_initial_leaves_final_stale_until_recomputed() {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        session.toggle_hazard(&catalog.hazards()[0]);
        session.compute_initial_risk_score();
        session.compute_final_risk_score();

        session.toggle_hazard(&catalog.hazards()[1]);
        session.compute_initial_risk_score();
        assert!(session.scores_are_stale());

        session.compute_final_risk_score();
        assert!(!session.scores_are_stale());
    }

    #[test]
    fn toggle_by_id_resolves_catalog_records() {
        let mut session = Session::new(Catalog::builtin());

        assert_eq!(session.toggle_hazard_by_id(3), Ok(Toggle::Selected));
        assert_eq!(session.toggle_fault_tree_event_by_id(2), Ok(Toggle::Selected));
        assert_eq!(
            session.toggle_risk_control_measure_by_id(1),
            Ok(Toggle::Selected)
        );
        assert_eq!(session.toggle_hazard_by_id(3), Ok(Toggle::Deselected));
        assert_eq!(session.fault_tree_events().join_names(", "), "Component Failure");
    }

    #[test]
    fn toggle_by_unknown_id_is_an_error() {
        let mut session = Session::new(Catalog::builtin());

        let error = session.toggle_risk_control_measure_by_id(42).unwrap_err();

        assert_eq!(
            error,
            UnknownRecordError {
                category: crate::domain::Category::RiskControlMeasure,
                id: 42,
            }
        );
        assert!(session.risk_control_measures().is_empty());
    }

    #[test]
    fn catalog_is_unchanged_by_session_activity() {
        let catalog = Catalog::builtin();
        let before = catalog.clone();

        let mut session = Session::new(catalog);
        for hazard in catalog.hazards() {
            session.toggle_hazard(hazard);
        }
        for event in catalog.fault_tree_events() {
            session.toggle_fault_tree_event(event);
        }
        for measure in catalog.risk_control_measures() {
            session.toggle_risk_control_measure(measure);
        }
        session.compute_initial_risk_score();
        session.compute_final_risk_score();
        session.toggle_hazard(&catalog.hazards()[0]);
        session.compute_final_risk_score();

        assert_eq!(*catalog, before);
    }
}
