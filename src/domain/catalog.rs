use serde::Serialize;

use super::{
    Fraction, Record, RecordId,
    record::{Category, FaultTreeEventRecord, HazardRecord, RiskControlMeasureRecord, Severity},
};

/// The built-in catalog.
pub static BUILTIN: Catalog = Catalog {
    hazards: &[
        HazardRecord {
            id: 1,
            name: "Electrical Shock",
            severity: Severity::High,
            probability: Fraction::from_const(0.01),
        },
        HazardRecord {
            id: 2,
            name: "Fire",
            severity: Severity::High,
            probability: Fraction::from_const(0.005),
        },
        HazardRecord {
            id: 3,
            name: "Mechanical Failure",
            severity: Severity::Medium,
            probability: Fraction::from_const(0.05),
        },
    ],
    fault_tree_events: &[
        FaultTreeEventRecord {
            id: 1,
            name: "Power Supply Failure",
            probability: Fraction::from_const(0.02),
        },
        FaultTreeEventRecord {
            id: 2,
            name: "Component Failure",
            probability: Fraction::from_const(0.01),
        },
        FaultTreeEventRecord {
            id: 3,
            name: "Human Error",
            probability: Fraction::from_const(0.05),
        },
    ],
    risk_control_measures: &[
        RiskControlMeasureRecord {
            id: 1,
            name: "Regular Maintenance",
            effectiveness: Fraction::from_const(0.8),
        },
        RiskControlMeasureRecord {
            id: 2,
            name: "Operator Training",
            effectiveness: Fraction::from_const(0.7),
        },
        RiskControlMeasureRecord {
            id: 3,
            name: "Design Redundancy",
            effectiveness: Fraction::from_const(0.9),
        },
    ],
};

/// Three read-only, ordered lists of records.
///
/// A catalog is fixed when it is constructed. There are no operations which
/// add, modify or remove records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    hazards: &'static [HazardRecord],
    fault_tree_events: &'static [FaultTreeEventRecord],
    risk_control_measures: &'static [RiskControlMeasureRecord],
}

impl Catalog {
    /// The built-in catalog.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// The hazards, in catalog order.
    #[must_use]
    pub const fn hazards(&self) -> &'static [HazardRecord] {
        self.hazards
    }

    /// The fault tree events, in catalog order.
    #[must_use]
    pub const fn fault_tree_events(&self) -> &'static [FaultTreeEventRecord] {
        self.fault_tree_events
    }

    /// The risk control measures, in catalog order.
    #[must_use]
    pub const fn risk_control_measures(&self) -> &'static [RiskControlMeasureRecord] {
        self.risk_control_measures
    }

    /// Finds a hazard by id.
    #[must_use]
    pub fn hazard(&self, id: RecordId) -> Option<&'static HazardRecord> {
        find(self.hazards, id)
    }

    /// Finds a fault tree event by id.
    #[must_use]
    pub fn fault_tree_event(&self, id: RecordId) -> Option<&'static FaultTreeEventRecord> {
        find(self.fault_tree_events, id)
    }

    /// Finds a risk control measure by id.
    #[must_use]
    pub fn risk_control_measure(&self, id: RecordId) -> Option<&'static RiskControlMeasureRecord> {
        find(self.risk_control_measures, id)
    }
}

fn find<R: Record>(records: &'static [R], id: RecordId) -> Option<&'static R> {
    records.iter().find(|record| record.id() == id)
}

/// Returned when an id does not name a record in the catalog.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("No {category} with id {id} in the catalog")]
pub struct UnknownRecordError {
    /// The category that was searched.
    pub category: Category,
    /// The id that was not found.
    pub id: RecordId,
}
