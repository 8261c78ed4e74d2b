//! Risk score arithmetic.
//!
//! Scores are plain sums and means over the selected records. No weighting is
//! applied and overlapping failure modes are not corrected for.

use serde::Serialize;

use super::record::{FaultTreeEventRecord, HazardRecord, RiskControlMeasureRecord};

/// Sums the probabilities of the given hazards and fault tree events.
///
/// Returns `0.0` when both are empty.
pub fn initial_risk<'a>(
    hazards: impl IntoIterator<Item = &'a HazardRecord>,
    events: impl IntoIterator<Item = &'a FaultTreeEventRecord>,
) -> f64 {
    let hazards = hazards.into_iter().map(|hazard| hazard.probability.get());
    let events = events.into_iter().map(|event| event.probability.get());
    hazards.chain(events).sum()
}

/// The arithmetic mean effectiveness of the given measures.
///
/// Returns `None` when there are no measures.
pub fn mean_effectiveness<'a>(
    measures: impl IntoIterator<Item = &'a RiskControlMeasureRecord>,
) -> Option<f64> {
    let (count, total) = measures
        .into_iter()
        .fold((0_u32, 0.0), |(count, total), measure| {
            (count + 1, total + measure.effectiveness.get())
        });
    (count > 0).then(|| total / f64::from(count))
}

/// Discounts `initial` by the mean effectiveness of the given measures.
///
/// With no measures the mean effectiveness is taken to be zero, so the result
/// equals `initial`.
pub fn final_risk<'a>(
    initial: f64,
    measures: impl IntoIterator<Item = &'a RiskControlMeasureRecord>,
) -> f64 {
    let mean = mean_effectiveness(measures).unwrap_or(0.0);
    initial * (1.0 - mean)
}

/// Which scores have been computed in this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No score has been computed.
    #[default]
    Uncomputed,
    /// The initial score has been computed, the final score has not.
    Initial,
    /// Both scores have been computed.
    Final,
}

/// Selection revisions a score can be compared against.
///
/// Hazards and fault tree events feed the initial score, risk control
/// measures feed only the final score, so each is counted separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revisions {
    /// Bumped whenever a hazard or fault tree event is toggled.
    pub initial_inputs: u64,
    /// Bumped whenever a risk control measure is toggled.
    pub measures: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FinalStamp {
    measures: u64,
    /// The generation of the initial score the final score was derived from.
    initial_generation: u64,
}

/// The two derived scores of a session.
///
/// Scores are only changed by the compute operations. Each score remembers
/// the revision of the inputs it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreState {
    initial: f64,
    #[serde(rename = "final")]
    final_: f64,
    #[serde(skip)]
    initial_stamp: Option<u64>,
    /// Incremented every time the initial score is computed.
    #[serde(skip)]
    initial_generation: u64,
    #[serde(skip)]
    final_stamp: Option<FinalStamp>,
}

impl ScoreState {
    /// The most recently computed initial risk score, or `0.0`.
    #[must_use]
    pub const fn initial(&self) -> f64 {
        self.initial
    }

    /// The most recently computed final risk score, or `0.0`.
    #[must_use]
    pub const fn final_score(&self) -> f64 {
        self.final_
    }

    /// Which scores have been computed.
    ///
    /// Computing the final score before the initial one still counts as
    /// [`Phase::Final`].
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match (self.initial_stamp, self.final_stamp) {
            (_, Some(_)) => Phase::Final,
            (Some(_), None) => Phase::Initial,
            (None, None) => Phase::Uncomputed,
        }
    }

    /// Whether the initial score was computed from hazards and events that
    /// have since changed.
    #[must_use]
    pub const fn initial_is_stale(&self, revisions: Revisions) -> bool {
        matches!(self.initial_stamp, Some(at) if at != revisions.initial_inputs)
    }

    /// Whether the final score was computed from measures that have since
    /// changed, or from an initial score that has since been replaced or gone
    /// stale.
    #[must_use]
    pub const fn final_is_stale(&self, revisions: Revisions) -> bool {
        match self.final_stamp {
            None => false,
            Some(stamp) => {
                stamp.measures != revisions.measures
                    || stamp.initial_generation != self.initial_generation
                    || self.initial_is_stale(revisions)
            }
        }
    }

    /// Whether either computed score no longer matches the selection.
    #[must_use]
    pub const fn is_stale(&self, revisions: Revisions) -> bool {
        self.initial_is_stale(revisions) || self.final_is_stale(revisions)
    }

    pub(crate) const fn set_initial(&mut self, value: f64, revisions: Revisions) {
        self.initial = value;
        self.initial_stamp = Some(revisions.initial_inputs);
        self.initial_generation += 1;
    }

    pub(crate) const fn set_final(&mut self, value: f64, revisions: Revisions) {
        self.final_ = value;
        self.final_stamp = Some(FinalStamp {
            measures: revisions.measures,
            initial_generation: self.initial_generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::Catalog;

    const EPSILON: f64 = 1e-12;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn initial_risk_sums_hazards_and_events() {
        let catalog = Catalog::builtin();
        let hazards = &catalog.hazards()[..2];
        let events = &catalog.fault_tree_events()[..1];

        assert_close(initial_risk(hazards, events), 0.035);
    }

    #[test]
    fn initial_risk_of_all_hazards_without_events() {
        let catalog = Catalog::builtin();

        assert_close(initial_risk(catalog.hazards(), []), 0.065);
    }

    #[test]
    fn initial_risk_of_nothing_is_zero() {
        assert_eq!(initial_risk([], []), 0.0);
    }

    #[test]
    fn final_risk_discounts_by_mean_effectiveness() {
        let measures = &Catalog::builtin().risk_control_measures()[..2];

        assert_close(final_risk(0.035, measures), 0.008_75);
    }

    #[test]
    fn final_risk_without_measures_equals_initial() {
        let result = final_risk(0.035, []);

        assert!(!result.is_nan());
        assert_close(result, 0.035);
    }

    #[test_case(&[0], 0.8; "single measure")]
    #[test_case(&[0, 1], 0.75; "two measures")]
    #[test_case(&[0, 1, 2], 0.8; "all measures")]
    fn mean_effectiveness_of_selected(indices: &[usize], expected: f64) {
        let measures = Catalog::builtin().risk_control_measures();
        let selected = indices.iter().map(|&i| &measures[i]);

        assert_close(mean_effectiveness(selected).unwrap(), expected);
    }

    #[test]
    fn mean_effectiveness_of_nothing_is_none() {
        assert!(mean_effectiveness([]).is_none());
    }

    const fn revisions(initial_inputs: u64, measures: u64) -> Revisions {
        Revisions {
            initial_inputs,
            measures,
        }
    }

    #[test]
    fn phase_follows_compute_order() {
        let mut scores = ScoreState::default();
        assert_eq!(scores.phase(), Phase::Uncomputed);

        scores.set_initial(0.1, Revisions::default());
        assert_eq!(scores.phase(), Phase::Initial);

        scores.set_final(0.05, Revisions::default());
        assert_eq!(scores.phase(), Phase::Final);
    }

    #[test]
    fn uncomputed_scores_are_never_stale() {
        let scores = ScoreState::default();
        assert!(!scores.is_stale(revisions(5, 5)));
    }

    #[test]
    fn initial_is_stale_once_hazards_or_events_change() {
        let mut scores = ScoreState::default();
        scores.set_initial(0.1, revisions(3, 0));

        assert!(!scores.initial_is_stale(revisions(3, 7)));
        assert!(scores.initial_is_stale(revisions(4, 0)));
    }

    #[test]
    fn final_is_stale_once_measures_change() {
        let mut scores = ScoreState::default();
        scores.set_initial(0.1, revisions(1, 1));
        scores.set_final(0.05, revisions(1, 1));

        assert!(!scores.final_is_stale(revisions(1, 1)));
        assert!(scores.final_is_stale(revisions(1, 2)));
    }

    #[test]
    fn final_is_stale_once_initial_is_recomputed() {
        let mut scores = ScoreState::default();
        scores.set_initial(0.1, revisions(1, 0));
        scores.set_final(0.05, revisions(1, 0));

        scores.set_initial(0.1, revisions(1, 0));

        assert!(!scores.initial_is_stale(revisions(1, 0)));
        assert!(scores.final_is_stale(revisions(1, 0)));
    }

    #[test]
    fn final_is_stale_when_its_initial_is_stale() {
        let mut scores = ScoreState::default();
        scores.set_initial(0.1, revisions(1, 0));
        scores.set_final(0.05, revisions(1, 0));

        assert!(scores.final_is_stale(revisions(2, 0)));
    }
}
