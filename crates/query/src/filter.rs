use appraisal_records::CaseSummary;
use serde::{Deserialize, Serialize};

/// Optional field predicates evaluated against a case summary.
///
/// Equality on report type and usage, case-preserving substring
/// containment on address/district keywords, inclusive numeric ranges on
/// price, area, floor and build year. An unset bound never excludes.
///
/// A candidate with an unknown floor or build year fails any actively
/// bounded range predicate on that attribute: unknown disqualifies when a
/// constraint is stated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseFilter {
    /// Address keyword, substring match
    pub keyword: Option<String>,

    /// Report type, exact match
    pub report_type: Option<String>,

    /// District keyword, substring match
    pub district: Option<String>,

    /// Usage, exact match
    pub usage: Option<String>,

    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub min_floor: Option<i32>,
    pub max_floor: Option<i32>,
    pub min_build_year: Option<i32>,
    pub max_build_year: Option<i32>,
}

impl CaseFilter {
    /// Whether no predicate is set at all.
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.report_type.is_none()
            && self.district.is_none()
            && self.usage.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_area.is_none()
            && self.max_area.is_none()
            && self.min_floor.is_none()
            && self.max_floor.is_none()
            && self.min_build_year.is_none()
            && self.max_build_year.is_none()
    }

    /// Evaluate every set predicate against the summary.
    pub fn matches(&self, case: &CaseSummary) -> bool {
        if let Some(report_type) = self.report_type.as_deref() {
            if case.report_type != report_type {
                return false;
            }
        }

        if let Some(keyword) = self.keyword.as_deref() {
            if !case.address.contains(keyword) {
                return false;
            }
        }

        if let Some(district) = self.district.as_deref() {
            if !case.district.contains(district) {
                return false;
            }
        }

        if let Some(usage) = self.usage.as_deref() {
            if case.usage != usage {
                return false;
            }
        }

        in_range(Some(case.price), self.min_price, self.max_price)
            && in_range(Some(case.area), self.min_area, self.max_area)
            && in_range(case.current_floor, self.min_floor, self.max_floor)
            && in_range(case.build_year, self.min_build_year, self.max_build_year)
    }
}

/// Inclusive range check. An unknown value fails as soon as either bound
/// is stated.
fn in_range<T: PartialOrd + Copy>(value: Option<T>, min: Option<T>, max: Option<T>) -> bool {
    match value {
        Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
        None => min.is_none() && max.is_none(),
    }
}
