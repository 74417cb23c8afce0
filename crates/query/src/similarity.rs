use appraisal_records::{CaseSummary, QueryProfile};

/// Factor weights. They sum to exactly 1.0, which bounds the additive
/// score in [0, 1] by construction.
pub const DISTRICT_WEIGHT: f32 = 0.25;
pub const USAGE_WEIGHT: f32 = 0.15;
pub const AREA_WEIGHT: f32 = 0.20;
pub const PRICE_WEIGHT: f32 = 0.15;
pub const FLOOR_WEIGHT: f32 = 0.10;
pub const BUILD_YEAR_WEIGHT: f32 = 0.10;
pub const ADDRESS_WEIGHT: f32 = 0.05;

/// Weighted multi-factor similarity between a query profile and a case
/// summary.
///
/// Each factor contributes 0 unless its profile field is present and the
/// candidate has a valid comparable attribute, and each is gated by a
/// relevance threshold (ratio > 0.5, diff within window) so dissimilar
/// attributes contribute exactly zero rather than a small nonzero value.
/// A deliberately simple linear model: appraisers must be able to justify
/// comparable-case selection factor by factor.
pub fn similarity(case: &CaseSummary, profile: &QueryProfile) -> f32 {
    let mut score = 0.0_f32;

    // District, the dominant factor
    if let Some(district) = profile.district.as_deref() {
        if !district.is_empty() && !case.district.is_empty() && case.district.contains(district) {
            score += DISTRICT_WEIGHT;
        }
    }

    if let Some(usage) = profile.usage.as_deref() {
        if !usage.is_empty() && case.usage == usage {
            score += USAGE_WEIGHT;
        }
    }

    if let Some(area) = profile.area.filter(|a| *a > 0.0) {
        score += ratio_factor(area, case.area, AREA_WEIGHT);
    }

    if let Some(price) = profile.price.filter(|p| *p > 0.0) {
        score += ratio_factor(price, case.price, PRICE_WEIGHT);
    }

    if let (Some(floor), Some(case_floor)) = (
        profile.floor.filter(|f| *f > 0),
        case.current_floor.filter(|f| *f > 0),
    ) {
        let diff = (floor - case_floor).abs();
        if diff <= 3 {
            score += (1.0 - diff as f32 / 10.0) * FLOOR_WEIGHT;
        }
    }

    if let (Some(year), Some(case_year)) = (
        profile.build_year.filter(|y| *y > 0),
        case.build_year.filter(|y| *y > 0),
    ) {
        let diff = (year - case_year).abs();
        if diff <= 10 {
            score += (1.0 - diff as f32 / 20.0) * BUILD_YEAR_WEIGHT;
        }
    }

    if let Some(address) = profile.address.as_deref() {
        if !case.address.is_empty() {
            let matches = keyword_char_overlap(address, &case.address);
            if matches > 0 {
                score += (matches as f32 * 0.01).min(ADDRESS_WEIGHT);
            }
        }
    }

    score
}

/// `min/max` closeness, counted only above the 0.5 relevance threshold.
fn ratio_factor(a: f64, b: f64, weight: f32) -> f32 {
    if b <= 0.0 {
        return 0.0;
    }
    let ratio = (a.min(b) / a.max(b)) as f32;
    if ratio > 0.5 {
        ratio * weight
    } else {
        0.0
    }
}

/// Naive character-level address overlap: characters of multi-character
/// whitespace tokens of the query that also occur in the candidate
/// address.
fn keyword_char_overlap(query: &str, address: &str) -> usize {
    query
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .flat_map(|token| token.chars())
        .filter(|c| address.contains(*c))
        .count()
}
