use appraisal_records::{CorrectionFactor, CorrectionStats, RangeStats};

use crate::engine::QueryEngine;

/// Aggregate statistics over a report-type-filtered slice of the index,
/// as reference data for drafting new appraisals. Empty populations yield
/// the zero-valued aggregate rather than an error.
impl QueryEngine {
    pub fn get_price_range(&self, report_type: Option<&str>) -> RangeStats {
        let prices: Vec<f64> = self
            .store()
            .case_index()
            .into_iter()
            .filter(|s| report_type.map_or(true, |rt| s.report_type == rt))
            .map(|s| s.price)
            .filter(|p| *p > 0.0)
            .collect();
        RangeStats::from_values(&prices)
    }

    pub fn get_area_range(&self, report_type: Option<&str>) -> RangeStats {
        let areas: Vec<f64> = self
            .store()
            .case_index()
            .into_iter()
            .filter(|s| report_type.map_or(true, |rt| s.report_type == rt))
            .map(|s| s.area)
            .filter(|a| *a > 0.0)
            .collect();
        RangeStats::from_values(&areas)
    }

    /// Correction-factor statistics require hydration: the factors live on
    /// the full record, not the index summary.
    pub fn get_correction_stats(&self, report_type: Option<&str>) -> CorrectionStats {
        let mut transaction = Vec::new();
        let mut market = Vec::new();
        let mut location = Vec::new();
        let mut physical = Vec::new();
        let mut rights = Vec::new();

        for summary in self.store().case_index() {
            if report_type.is_some_and(|rt| summary.report_type != rt) {
                continue;
            }
            let Some(record) = self.store().case(&summary.case_id) else {
                continue;
            };

            collect(&mut transaction, &record.transaction_correction);
            collect(&mut market, &record.market_correction);
            collect(&mut location, &record.location_correction);
            collect(&mut physical, &record.physical_correction);
            collect(&mut rights, &record.rights_correction);
        }

        CorrectionStats {
            transaction: RangeStats::from_values(&transaction),
            market: RangeStats::from_values(&market),
            location: RangeStats::from_values(&location),
            physical: RangeStats::from_values(&physical),
            rights: RangeStats::from_values(&rights),
        }
    }
}

fn collect(pool: &mut Vec<f64>, factor: &Option<CorrectionFactor>) {
    if let Some(value) = factor.as_ref().and_then(|f| f.value) {
        if value != 0.0 {
            pool.push(value);
        }
    }
}
