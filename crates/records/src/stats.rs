use serde::{Deserialize, Serialize};

/// Min/max/average summary over a value pool.
///
/// An empty pool yields the all-zero value rather than an error.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RangeStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub count: usize,
}

impl RangeStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }

        Self {
            min,
            max,
            avg: sum / values.len() as f64,
            count: values.len(),
        }
    }
}

/// Per-kind statistics over the correction factors of a case population.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CorrectionStats {
    pub transaction: RangeStats,
    pub market: RangeStats,
    pub location: RangeStats,
    pub physical: RangeStats,
    pub rights: RangeStats,
}
