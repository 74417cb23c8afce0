use std::sync::Arc;

use appraisal_query::{CaseFilter, QueryEngine, QueryProfile};
use appraisal_records::{CaseRecord, CaseSummary};
use appraisal_store::{MemoryStore, StaticVectorIndex};

fn case(case_id: &str, district: &str, area: f64, price: f64) -> CaseRecord {
    CaseRecord::from(CaseSummary {
        case_id: case_id.to_string(),
        address: format!("{district}某街道"),
        district: district.to_string(),
        usage: "住宅".to_string(),
        report_type: "市场价值".to_string(),
        area,
        price,
        current_floor: Some(8),
        build_year: Some(2012),
    })
}

fn knowledge_base() -> Arc<MemoryStore> {
    let mut store = MemoryStore::new();
    store.insert_case(case("case-a", "朝阳", 100.0, 20000.0));
    store.insert_case(case("case-b", "海淀", 90.0, 18000.0));
    Arc::new(store)
}

#[test]
fn rule_ranking_puts_the_closer_comparable_first() {
    let engine = QueryEngine::new(knowledge_base());

    let profile = QueryProfile::default()
        .district("朝阳")
        .area(100.0)
        .price(20000.0);
    let results = engine.find_similar_cases(&profile, None);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.summary.case_id, "case-a");
    assert!(results[0].score >= 0.25 + 0.20 + 0.15 - 1e-6);
    assert!(results[1].score < 0.60);
}

#[tokio::test]
async fn hybrid_merges_vector_and_rule_signals() {
    // Vector recall disagrees with the rules: it prefers case-b
    let index = StaticVectorIndex::new(vec![
        ("case-b".to_string(), 0.95),
        ("case-a".to_string(), 0.30),
    ]);
    let engine = QueryEngine::new(knowledge_base()).with_vector_index(Arc::new(index));

    let profile = QueryProfile::default()
        .district("朝阳")
        .area(100.0)
        .price(20000.0)
        .query("朝阳 住宅");

    // Vector-dominated weighting lets recall win
    let vector_heavy = engine
        .find_similar_cases_hybrid(&profile, Some(10), Some(0.9))
        .await;
    assert_eq!(vector_heavy[0].record.summary.case_id, "case-b");

    // Rule-dominated weighting restores the field-similarity order
    let rule_heavy = engine
        .find_similar_cases_hybrid(&profile, Some(10), Some(0.1))
        .await;
    assert_eq!(rule_heavy[0].record.summary.case_id, "case-a");
}

#[tokio::test]
async fn hybrid_without_vector_index_still_ranks_by_rules() {
    let engine = QueryEngine::new(knowledge_base());

    let profile = QueryProfile::default()
        .district("朝阳")
        .area(100.0)
        .price(20000.0);
    let results = engine
        .find_similar_cases_hybrid(&profile, Some(10), Some(0.6))
        .await;

    assert_eq!(results[0].record.summary.case_id, "case-a");
    // Rule score scaled by the rule weight
    assert!((results[0].score - 0.60 * 0.4).abs() < 1e-5);
}

#[tokio::test]
async fn vector_fallback_matches_direct_rule_search() {
    let store = knowledge_base();
    let degraded = QueryEngine::new(store.clone())
        .with_vector_index(Arc::new(StaticVectorIndex::disabled()));
    let rule_only = QueryEngine::new(store);

    let by_vector = degraded
        .find_similar_cases_by_vector("朝阳区", &CaseFilter::default(), Some(5))
        .await;
    let direct =
        rule_only.find_similar_cases(&QueryProfile::default().address("朝阳区"), Some(5));

    assert_eq!(by_vector, direct);
}

#[test]
fn aggregates_summarize_the_candidate_universe() {
    let engine = QueryEngine::new(knowledge_base());

    let prices = engine.get_price_range(Some("市场价值"));
    assert_eq!(prices.min, 18000.0);
    assert_eq!(prices.max, 20000.0);
    assert_eq!(prices.avg, 19000.0);
    assert_eq!(prices.count, 2);

    let empty = engine.get_price_range(Some("抵押价值"));
    assert_eq!(empty.count, 0);
    assert_eq!(empty.min, 0.0);
    assert_eq!(empty.max, 0.0);
    assert_eq!(empty.avg, 0.0);
}
