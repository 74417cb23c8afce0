use serde::{Deserialize, Serialize};

/// Lightweight report entry held in the knowledge-base index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    /// Stable unique document identifier
    pub doc_id: String,

    /// Address of the appraised property
    pub address: String,

    /// Report type
    pub report_type: String,

    /// Creation timestamp, `YYYY-MM-DD HH:MM:SS`
    pub create_time: Option<String>,
}

/// Fully hydrated appraisal report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRecord {
    #[serde(flatten)]
    pub summary: ReportSummary,

    /// Comparable cases extracted from this report
    #[serde(default)]
    pub case_ids: Vec<String>,
}

impl From<ReportSummary> for ReportRecord {
    fn from(summary: ReportSummary) -> Self {
        Self {
            summary,
            case_ids: Vec::new(),
        }
    }
}
