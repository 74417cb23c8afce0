use std::collections::HashMap;
use std::path::Path;

use appraisal_records::{CaseRecord, CaseSummary, ReportRecord, ReportSummary};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record_store::RecordStore;

/// On-disk snapshot format: two ordered record collections.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    cases: Vec<CaseRecord>,
    #[serde(default)]
    reports: Vec<ReportRecord>,
}

/// In-memory record store with a JSON snapshot format.
///
/// Insertion order is the index order. Re-inserting an existing id
/// replaces the record in place, keeping its index position.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cases: Vec<CaseRecord>,
    case_ids: HashMap<String, usize>,
    reports: Vec<ReportRecord>,
    report_ids: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_case(&mut self, record: CaseRecord) {
        match self.case_ids.get(&record.summary.case_id) {
            Some(&idx) => self.cases[idx] = record,
            None => {
                self.case_ids
                    .insert(record.summary.case_id.clone(), self.cases.len());
                self.cases.push(record);
            }
        }
    }

    pub fn insert_report(&mut self, record: ReportRecord) {
        match self.report_ids.get(&record.summary.doc_id) {
            Some(&idx) => self.reports[idx] = record,
            None => {
                self.report_ids
                    .insert(record.summary.doc_id.clone(), self.reports.len());
                self.reports.push(record);
            }
        }
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty() && self.reports.is_empty()
    }

    /// Load a store from a JSON snapshot.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        log::info!("Loading record store from {:?}", path.as_ref());
        let data = tokio::fs::read_to_string(path.as_ref()).await?;
        let snapshot: Snapshot = serde_json::from_str(&data)?;

        let mut store = Self::new();
        for case in snapshot.cases {
            store.insert_case(case);
        }
        for report in snapshot.reports {
            store.insert_report(report);
        }

        log::info!(
            "Loaded {} cases, {} reports",
            store.case_count(),
            store.report_count()
        );
        Ok(store)
    }

    /// Save the store to a JSON snapshot.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        log::info!("Saving record store to {:?}", path.as_ref());
        let snapshot = Snapshot {
            cases: self.cases.clone(),
            reports: self.reports.clone(),
        };
        let data = serde_json::to_string_pretty(&snapshot)?;
        tokio::fs::write(path.as_ref(), data).await?;
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn case_index(&self) -> Vec<CaseSummary> {
        self.cases.iter().map(|c| c.summary.clone()).collect()
    }

    fn report_index(&self) -> Vec<ReportSummary> {
        self.reports.iter().map(|r| r.summary.clone()).collect()
    }

    fn case(&self, case_id: &str) -> Option<CaseRecord> {
        self.case_ids.get(case_id).map(|&idx| self.cases[idx].clone())
    }

    fn report(&self, doc_id: &str) -> Option<ReportRecord> {
        self.report_ids
            .get(doc_id)
            .map(|&idx| self.reports[idx].clone())
    }
}
