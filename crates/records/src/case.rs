use serde::{Deserialize, Serialize};

/// Lightweight case entry held in the knowledge-base index.
///
/// Immutable for the duration of a query; owned by the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseSummary {
    /// Stable unique identifier
    pub case_id: String,

    /// Full address of the comparable property
    pub address: String,

    /// Administrative district
    pub district: String,

    /// Property usage (residential, commercial, ...)
    pub usage: String,

    /// Type of the appraisal report the case was extracted from
    pub report_type: String,

    /// Floor area in square meters (> 0)
    pub area: f64,

    /// Unit price (> 0)
    pub price: f64,

    /// Floor the unit sits on; `None` when unknown
    pub current_floor: Option<i32>,

    /// Year of construction; `None` when unknown
    pub build_year: Option<i32>,
}

/// A multiplicative adjustment applied during appraisal, tracked per case
/// for statistical reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CorrectionFactor {
    /// Correction coefficient; `None` when not recorded
    pub value: Option<f64>,

    /// Free-form justification for the coefficient
    pub basis: Option<String>,
}

impl CorrectionFactor {
    pub fn new(value: f64) -> Self {
        Self {
            value: Some(value),
            basis: None,
        }
    }
}

/// Fully hydrated case: the index summary plus correction factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseRecord {
    #[serde(flatten)]
    pub summary: CaseSummary,

    pub transaction_correction: Option<CorrectionFactor>,
    pub market_correction: Option<CorrectionFactor>,
    pub location_correction: Option<CorrectionFactor>,
    pub physical_correction: Option<CorrectionFactor>,
    pub rights_correction: Option<CorrectionFactor>,

    /// Appraiser remarks
    pub remarks: Option<String>,
}

impl From<CaseSummary> for CaseRecord {
    fn from(summary: CaseSummary) -> Self {
        Self {
            summary,
            transaction_correction: None,
            market_correction: None,
            location_correction: None,
            physical_correction: None,
            rights_correction: None,
            remarks: None,
        }
    }
}

/// A hydrated case paired with its relevance score.
///
/// Single-source scores are in [0, 1]; merged hybrid scores are a convex
/// combination of the two sources.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCase {
    pub record: CaseRecord,
    pub score: f32,
}
