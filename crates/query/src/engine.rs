use std::sync::Arc;

use appraisal_records::{CaseRecord, QueryProfile, ReportRecord, ScoredCase};
use appraisal_store::{RecordStore, VectorIndex};

use crate::config::QueryConfig;
use crate::filter::CaseFilter;
use crate::merge::merge;
use crate::similarity::similarity;

/// Query façade over the knowledge store.
///
/// Explicitly constructed with its collaborators; holds no global state,
/// no caches and no locks. Rule-only operations are synchronous, vector
/// recall is the only await point. Every operation ends with hydration:
/// a summary whose full record can no longer be fetched is skipped, not
/// an error.
pub struct QueryEngine {
    store: Arc<dyn RecordStore>,
    vector: Option<Arc<dyn VectorIndex>>,
    config: QueryConfig,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            vector: None,
            config: QueryConfig::default(),
        }
    }

    pub fn with_vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.vector = Some(index);
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Field-filter pass over the index in index order, stopping once
    /// `limit` cases are hydrated.
    pub fn search_cases(&self, filter: &CaseFilter, limit: usize) -> Vec<CaseRecord> {
        let mut results = Vec::new();
        for summary in self.store.case_index() {
            if results.len() >= limit {
                break;
            }
            if !filter.matches(&summary) {
                continue;
            }
            if let Some(record) = self.store.case(&summary.case_id) {
                results.push(record);
            }
        }

        log::debug!("search_cases: {} results (limit {limit})", results.len());
        results
    }

    /// Report search: equality on report type, substring on address.
    pub fn search_reports(
        &self,
        keyword: Option<&str>,
        report_type: Option<&str>,
        limit: usize,
    ) -> Vec<ReportRecord> {
        let mut results = Vec::new();
        for summary in self.store.report_index() {
            if results.len() >= limit {
                break;
            }
            if report_type.is_some_and(|rt| summary.report_type != rt) {
                continue;
            }
            if keyword.is_some_and(|kw| !summary.address.contains(kw)) {
                continue;
            }
            if let Some(record) = self.store.report(&summary.doc_id) {
                results.push(record);
            }
        }
        results
    }

    /// Rule-based similarity ranking.
    ///
    /// Gates on report type only, scores every remaining candidate, drops
    /// zero scores, sorts descending and truncates to `top_k` after the
    /// full sort.
    pub fn find_similar_cases(
        &self,
        profile: &QueryProfile,
        top_k: Option<usize>,
    ) -> Vec<ScoredCase> {
        let top_k = top_k.unwrap_or(self.config.default_top_k);

        let mut candidates: Vec<(String, f32)> = Vec::new();
        for summary in self.store.case_index() {
            if let Some(report_type) = profile.report_type.as_deref() {
                if summary.report_type != report_type {
                    continue;
                }
            }
            let score = similarity(&summary, profile);
            if score > 0.0 {
                candidates.push((summary.case_id, score));
            }
        }

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(top_k);

        log::debug!("find_similar_cases: {} scored candidates", candidates.len());
        self.hydrate_scored(candidates)
    }

    /// Semantic recall over the external vector index.
    ///
    /// When recall is unavailable (no adapter, disabled, refresh or search
    /// failed) this transparently falls back to rule-based similarity with
    /// the query text as the address field. Field predicates, when set,
    /// restrict recall through a pre-computed id allow-list.
    pub async fn find_similar_cases_by_vector(
        &self,
        query: &str,
        filter: &CaseFilter,
        top_k: Option<usize>,
    ) -> Vec<ScoredCase> {
        let top_k = top_k.unwrap_or(self.config.default_top_k);

        let Some(index) = self.vector.as_ref().filter(|v| v.is_enabled()) else {
            log::warn!("Vector recall unavailable, falling back to rule matching");
            return self.find_similar_cases(&self.fallback_profile(query, filter), Some(top_k));
        };

        if let Err(e) = index.ensure_fresh().await {
            log::warn!("Vector index refresh failed: {e}, falling back to rule matching");
            return self.find_similar_cases(&self.fallback_profile(query, filter), Some(top_k));
        }

        let filter_ids: Option<Vec<String>> = (!filter.is_empty()).then(|| {
            self.store
                .case_index()
                .into_iter()
                .filter(|summary| filter.matches(summary))
                .map(|summary| summary.case_id)
                .collect()
        });

        let hits = match index.search(query, top_k, filter_ids.as_deref()).await {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("Vector recall failed: {e}, falling back to rule matching");
                return self.find_similar_cases(&self.fallback_profile(query, filter), Some(top_k));
            }
        };

        warn_on_out_of_range(&hits);
        log::debug!("find_similar_cases_by_vector: {} hits", hits.len());
        self.hydrate_scored(hits)
    }

    /// Hybrid ranking: vector recall and rule scoring merged into one
    /// ordered list.
    ///
    /// The free-text query comes from the profile or is synthesized from
    /// address/district/usage. The vector side over-fetches to improve
    /// post-merge coverage and degrades to empty on any recall failure;
    /// the rule side is gated on report type with zero scores dropped.
    pub async fn find_similar_cases_hybrid(
        &self,
        profile: &QueryProfile,
        top_k: Option<usize>,
        vector_weight: Option<f32>,
    ) -> Vec<ScoredCase> {
        let top_k = top_k.unwrap_or(self.config.default_top_k);
        let vector_weight = vector_weight.unwrap_or(self.config.default_vector_weight);

        let query = self.free_text_query(profile);

        let vector_results = match (&query, self.vector.as_ref().filter(|v| v.is_enabled())) {
            (Some(query), Some(index)) => {
                let fetch = top_k * self.config.recall_overfetch.max(1);
                match self.recall(index, query, fetch).await {
                    Ok(hits) => hits,
                    Err(e) => {
                        log::warn!("Vector recall failed: {e}, merging rule scores only");
                        Vec::new()
                    }
                }
            }
            (Some(_), None) => {
                log::warn!("Vector recall unavailable, merging rule scores only");
                Vec::new()
            }
            (None, _) => Vec::new(),
        };

        let mut rule_results: Vec<(String, f32)> = Vec::new();
        for summary in self.store.case_index() {
            if let Some(report_type) = profile.report_type.as_deref() {
                if summary.report_type != report_type {
                    continue;
                }
            }
            let score = similarity(&summary, profile);
            if score > 0.0 {
                rule_results.push((summary.case_id, score));
            }
        }

        log::debug!(
            "find_similar_cases_hybrid: {} vector hits, {} rule hits",
            vector_results.len(),
            rule_results.len()
        );

        let mut merged = merge(&vector_results, &rule_results, vector_weight);
        merged.truncate(top_k);
        self.hydrate_scored(merged)
    }

    async fn recall(
        &self,
        index: &Arc<dyn VectorIndex>,
        query: &str,
        top_k: usize,
    ) -> appraisal_store::Result<Vec<(String, f32)>> {
        index.ensure_fresh().await?;
        let hits = index.search(query, top_k, None).await?;
        warn_on_out_of_range(&hits);
        Ok(hits)
    }

    /// Single-space join of the non-empty profile text parts, in fixed
    /// address/district/usage order.
    fn free_text_query(&self, profile: &QueryProfile) -> Option<String> {
        if let Some(query) = profile.query.as_deref() {
            if !query.trim().is_empty() {
                return Some(query.to_string());
            }
        }

        let parts: Vec<&str> = [
            profile.address.as_deref(),
            profile.district.as_deref(),
            profile.usage.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();

        (!parts.is_empty()).then(|| parts.join(" "))
    }

    fn fallback_profile(&self, query: &str, filter: &CaseFilter) -> QueryProfile {
        QueryProfile {
            address: Some(query.to_string()),
            report_type: filter.report_type.clone(),
            district: filter.district.clone(),
            usage: filter.usage.clone(),
            ..QueryProfile::default()
        }
    }

    fn hydrate_scored(&self, scored: Vec<(String, f32)>) -> Vec<ScoredCase> {
        scored
            .into_iter()
            .filter_map(|(case_id, score)| {
                self.store
                    .case(&case_id)
                    .map(|record| ScoredCase { record, score })
            })
            .collect()
    }

    pub(crate) fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}

/// The merge step assumes recall scores share the rule scorer's [0, 1]
/// scale; an index that violates that skews the ranking, so make it
/// visible.
fn warn_on_out_of_range(hits: &[(String, f32)]) {
    if let Some((id, score)) = hits.iter().find(|(_, s)| !(0.0..=1.0).contains(s)) {
        log::warn!("Vector score {score} for case {id} is outside [0,1], hybrid ranking may be skewed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appraisal_records::{CaseRecord, CaseSummary, ReportRecord, ReportSummary};
    use appraisal_store::{MemoryStore, StaticVectorIndex, StoreError};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn summary(case_id: &str, district: &str, area: f64, price: f64) -> CaseSummary {
        CaseSummary {
            case_id: case_id.to_string(),
            address: format!("{district}某街道{case_id}"),
            district: district.to_string(),
            usage: "住宅".to_string(),
            report_type: "市场价值".to_string(),
            area,
            price,
            current_floor: Some(5),
            build_year: Some(2010),
        }
    }

    fn store_with(cases: Vec<CaseSummary>) -> Arc<MemoryStore> {
        let mut store = MemoryStore::new();
        for case in cases {
            store.insert_case(CaseRecord::from(case));
        }
        Arc::new(store)
    }

    fn ids(results: &[ScoredCase]) -> Vec<&str> {
        results
            .iter()
            .map(|r| r.record.summary.case_id.as_str())
            .collect()
    }

    /// Store whose hydration misses for a chosen id.
    struct LossyStore {
        inner: MemoryStore,
        missing: String,
    }

    impl RecordStore for LossyStore {
        fn case_index(&self) -> Vec<CaseSummary> {
            self.inner.case_index()
        }

        fn report_index(&self) -> Vec<ReportSummary> {
            self.inner.report_index()
        }

        fn case(&self, case_id: &str) -> Option<CaseRecord> {
            if case_id == self.missing {
                None
            } else {
                self.inner.case(case_id)
            }
        }

        fn report(&self, doc_id: &str) -> Option<ReportRecord> {
            self.inner.report(doc_id)
        }
    }

    /// Recall source that always errors.
    struct FailingIndex;

    #[async_trait]
    impl VectorIndex for FailingIndex {
        fn is_enabled(&self) -> bool {
            true
        }

        async fn ensure_fresh(&self) -> appraisal_store::Result<()> {
            Ok(())
        }

        async fn search(
            &self,
            _query: &str,
            _top_k: usize,
            _filter_ids: Option<&[String]>,
        ) -> appraisal_store::Result<Vec<(String, f32)>> {
            Err(StoreError::RecallError("index offline".to_string()))
        }
    }

    #[test]
    fn empty_filter_returns_index_order_up_to_limit() {
        let store = store_with(vec![
            summary("c1", "朝阳区", 100.0, 20000.0),
            summary("c2", "海淀区", 90.0, 18000.0),
            summary("c3", "西城区", 80.0, 30000.0),
        ]);
        let engine = QueryEngine::new(store);

        let results = engine.search_cases(&CaseFilter::default(), 2);
        let ids: Vec<&str> = results
            .iter()
            .map(|r| r.summary.case_id.as_str())
            .collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[test]
    fn search_cases_applies_predicates() {
        let store = store_with(vec![
            summary("c1", "朝阳区", 100.0, 20000.0),
            summary("c2", "海淀区", 90.0, 18000.0),
        ]);
        let engine = QueryEngine::new(store);

        let filter = CaseFilter {
            district: Some("海淀".to_string()),
            ..CaseFilter::default()
        };
        let results = engine.search_cases(&filter, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].summary.case_id, "c2");
    }

    #[test]
    fn zero_score_candidates_never_appear() {
        let store = store_with(vec![
            summary("c1", "朝阳区", 100.0, 20000.0),
            summary("c2", "海淀区", 30.0, 18000.0),
        ]);
        let engine = QueryEngine::new(store);

        // Only c1's district matches; c2 scores exactly zero
        let profile = QueryProfile::default().district("朝阳");
        let results = engine.find_similar_cases(&profile, None);
        assert_eq!(ids(&results), vec!["c1"]);
    }

    #[test]
    fn similar_cases_rank_by_score_descending() {
        let store = store_with(vec![
            summary("b-far", "海淀区", 90.0, 18000.0),
            summary("a-close", "朝阳区", 100.0, 20000.0),
        ]);
        let engine = QueryEngine::new(store);

        let profile = QueryProfile::default()
            .district("朝阳")
            .area(100.0)
            .price(20000.0);
        let results = engine.find_similar_cases(&profile, None);

        assert_eq!(ids(&results), vec!["a-close", "b-far"]);
        assert!(results[0].score >= 0.25 + 0.20 + 0.15 - 1e-6);
        assert!(results[1].score < 0.60);
    }

    #[test]
    fn truncation_happens_after_full_sort() {
        let store = store_with(vec![
            summary("low", "朝阳区", 60.0, 20000.0),
            summary("high", "朝阳区", 100.0, 20000.0),
        ]);
        let engine = QueryEngine::new(store);

        let profile = QueryProfile::default().area(100.0);
        let results = engine.find_similar_cases(&profile, Some(1));

        // "high" wins even though "low" comes first in index order
        assert_eq!(ids(&results), vec!["high"]);
    }

    #[test]
    fn hydration_miss_is_skipped_silently() {
        let mut inner = MemoryStore::new();
        inner.insert_case(CaseRecord::from(summary("c1", "朝阳区", 100.0, 20000.0)));
        inner.insert_case(CaseRecord::from(summary("c2", "朝阳区", 100.0, 20000.0)));
        let store = Arc::new(LossyStore {
            inner,
            missing: "c1".to_string(),
        });
        let engine = QueryEngine::new(store);

        let profile = QueryProfile::default().district("朝阳");
        let results = engine.find_similar_cases(&profile, None);
        assert_eq!(ids(&results), vec!["c2"]);

        let filtered = engine.search_cases(&CaseFilter::default(), 10);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].summary.case_id, "c2");
    }

    #[tokio::test]
    async fn disabled_vector_index_falls_back_to_rule_matching() {
        let store = store_with(vec![
            summary("c1", "朝阳区", 100.0, 20000.0),
            summary("c2", "海淀区", 90.0, 18000.0),
        ]);
        let engine = QueryEngine::new(store.clone())
            .with_vector_index(Arc::new(StaticVectorIndex::disabled()));

        let by_vector = engine
            .find_similar_cases_by_vector("朝阳区", &CaseFilter::default(), Some(5))
            .await;

        let rule_engine = QueryEngine::new(store);
        let profile = QueryProfile::default().address("朝阳区");
        let direct = rule_engine.find_similar_cases(&profile, Some(5));

        assert_eq!(by_vector, direct);
        assert!(!by_vector.is_empty());
    }

    #[tokio::test]
    async fn absent_vector_index_falls_back_too() {
        let store = store_with(vec![summary("c1", "朝阳区", 100.0, 20000.0)]);
        let engine = QueryEngine::new(store);

        let results = engine
            .find_similar_cases_by_vector("朝阳区", &CaseFilter::default(), Some(5))
            .await;
        assert_eq!(ids(&results), vec!["c1"]);
    }

    #[tokio::test]
    async fn failed_recall_falls_back_to_rule_matching() {
        let store = store_with(vec![summary("c1", "朝阳区", 100.0, 20000.0)]);
        let engine = QueryEngine::new(store).with_vector_index(Arc::new(FailingIndex));

        let results = engine
            .find_similar_cases_by_vector("朝阳区", &CaseFilter::default(), Some(5))
            .await;
        assert_eq!(ids(&results), vec!["c1"]);
    }

    #[tokio::test]
    async fn vector_search_respects_field_filter_ids() {
        let store = store_with(vec![
            summary("c1", "朝阳区", 100.0, 20000.0),
            summary("c2", "海淀区", 90.0, 18000.0),
        ]);
        let index = StaticVectorIndex::new(vec![
            ("c2".to_string(), 0.9),
            ("c1".to_string(), 0.8),
        ]);
        let engine = QueryEngine::new(store).with_vector_index(Arc::new(index));

        let filter = CaseFilter {
            district: Some("朝阳".to_string()),
            ..CaseFilter::default()
        };
        let results = engine
            .find_similar_cases_by_vector("无关", &filter, Some(5))
            .await;

        // c2 ranks higher in recall but is outside the allow-list
        assert_eq!(ids(&results), vec!["c1"]);
    }

    #[tokio::test]
    async fn by_vector_filter_carries_over_into_fallback() {
        let store = store_with(vec![
            summary("c1", "朝阳区", 100.0, 20000.0),
            summary("c2", "海淀区", 90.0, 18000.0),
        ]);
        let engine = QueryEngine::new(store);

        let filter = CaseFilter {
            usage: Some("住宅".to_string()),
            district: Some("海淀".to_string()),
            ..CaseFilter::default()
        };
        let results = engine
            .find_similar_cases_by_vector("某街道", &filter, Some(5))
            .await;

        // District is a scoring dimension in the fallback profile, not a
        // hard gate; the matching district must rank first
        assert_eq!(results[0].record.summary.case_id, "c2");
    }

    #[test]
    fn search_reports_filters_and_limits() {
        let mut store = MemoryStore::new();
        for (doc_id, address, report_type) in [
            ("r1", "朝阳区建国路", "市场价值"),
            ("r2", "海淀区学院路", "市场价值"),
            ("r3", "朝阳区望京", "抵押价值"),
        ] {
            store.insert_report(ReportRecord::from(ReportSummary {
                doc_id: doc_id.to_string(),
                address: address.to_string(),
                report_type: report_type.to_string(),
                create_time: None,
            }));
        }
        let engine = QueryEngine::new(Arc::new(store));

        let results = engine.search_reports(Some("朝阳区"), Some("市场价值"), 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].summary.doc_id, "r1");

        let limited = engine.search_reports(None, None, 2);
        assert_eq!(limited.len(), 2);
    }
}
