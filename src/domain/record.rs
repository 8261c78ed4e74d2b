use std::fmt;

use serde::Serialize;

use super::Fraction;

/// Identifier of a record within its catalog.
///
/// Identifiers are unique within a catalog, not across catalogs.
pub type RecordId = u32;

/// Common behaviour of every catalog record.
pub trait Record {
    /// The category this record belongs to.
    const CATEGORY: Category;

    /// The identifier of the record within its catalog.
    fn id(&self) -> RecordId;

    /// The human-readable name of the record.
    fn name(&self) -> &str;
}

/// The three record categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Sources of potential harm.
    Hazard,
    /// Failure events from the fault tree.
    FaultTreeEvent,
    /// Mitigations applied to the initial risk.
    RiskControlMeasure,
}

impl Category {
    /// A human-readable label for the category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hazard => "hazard",
            Self::FaultTreeEvent => "fault tree event",
            Self::RiskControlMeasure => "risk control measure",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The severity of a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Minor harm.
    Low,
    /// Moderate harm.
    Medium,
    /// Serious harm.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(s)
    }
}

/// A cataloged source of potential harm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardRecord {
    /// Identifier within the hazard catalog.
    pub id: RecordId,
    /// Name of the hazard.
    pub name: &'static str,
    /// Severity of the harm.
    pub severity: Severity,
    /// Baseline probability of occurrence.
    pub probability: Fraction,
}

/// A cataloged failure event from the fault tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultTreeEventRecord {
    /// Identifier within the fault tree catalog.
    pub id: RecordId,
    /// Name of the event.
    pub name: &'static str,
    /// Probability of occurrence.
    pub probability: Fraction,
}

/// A cataloged mitigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskControlMeasureRecord {
    /// Identifier within the risk control catalog.
    pub id: RecordId,
    /// Name of the measure.
    pub name: &'static str,
    /// Fraction of risk removed by the measure.
    pub effectiveness: Fraction,
}

impl Record for HazardRecord {
    const CATEGORY: Category = Category::Hazard;

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl Record for FaultTreeEventRecord {
    const CATEGORY: Category = Category::FaultTreeEvent;

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl Record for RiskControlMeasureRecord {
    const CATEGORY: Category = Category::RiskControlMeasure;

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }
}
