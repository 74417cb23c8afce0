use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Combine vector and rule rankings into one ordered list.
///
/// `vector_weight` is clamped to [0, 1] and the rule side gets the
/// complement. Over the union of ids, `merged = v * w + r * (1 - w)` with
/// a 0 default for the missing source, so an id present in only one
/// source carries no penalty beyond the implicit zero. Sorted descending
/// by merged score; exact ties order by ascending id so the ranking is
/// reproducible across index rebuilds.
///
/// Both inputs are expected in [0, 1]; vector scores arrive on whatever
/// scale the external index produces and are not rescaled here.
pub fn merge(
    vector_results: &[(String, f32)],
    rule_results: &[(String, f32)],
    vector_weight: f32,
) -> Vec<(String, f32)> {
    let vector_weight = vector_weight.clamp(0.0, 1.0);
    let rule_weight = 1.0 - vector_weight;

    let mut union: BTreeMap<&str, (f32, f32)> = BTreeMap::new();
    for (id, score) in vector_results {
        union.entry(id).or_insert((0.0, 0.0)).0 = *score;
    }
    for (id, score) in rule_results {
        union.entry(id).or_insert((0.0, 0.0)).1 = *score;
    }

    let mut merged: Vec<(String, f32)> = union
        .into_iter()
        .map(|(id, (v, r))| (id.to_string(), v * vector_weight + r * rule_weight))
        .collect();

    merged.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    merged
}
