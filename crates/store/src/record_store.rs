use appraisal_records::{CaseRecord, CaseSummary, ReportRecord, ReportSummary};

/// Read-side contract over the knowledge store.
///
/// Index calls return an owned snapshot that stays consistent for the
/// duration of one query; concurrent writes/rebuilds must not hand back a
/// torn view. Hydration returns `None` for ids the store no longer holds —
/// callers skip such entries instead of failing.
pub trait RecordStore: Send + Sync {
    /// Ordered case index, cheapest-first representation of every case.
    fn case_index(&self) -> Vec<CaseSummary>;

    /// Ordered report index.
    fn report_index(&self) -> Vec<ReportSummary>;

    /// Hydrate a single case by id.
    fn case(&self, case_id: &str) -> Option<CaseRecord>;

    /// Hydrate a single report by id.
    fn report(&self, doc_id: &str) -> Option<ReportRecord>;
}
