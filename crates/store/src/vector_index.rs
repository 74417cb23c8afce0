use async_trait::async_trait;

use crate::error::Result;

/// Contract around an external semantic vector index.
///
/// Scores are assumed to be in [0, 1] with higher meaning more similar;
/// the engine does not rescale them, so an index returning another range
/// will skew hybrid rankings (the engine logs a warning when it observes
/// an out-of-range score). `filter_ids` is a hard constraint on recall,
/// not a re-ranking hint.
///
/// Embedding computation and index maintenance are the implementation's
/// responsibility; a failed call means "recall unavailable for this
/// query" and must not be retried here.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Whether the index is available at all for this process.
    fn is_enabled(&self) -> bool;

    /// Refresh underlying embeddings if stale. Idempotent.
    async fn ensure_fresh(&self) -> Result<()>;

    /// Ranked `(case_id, score)` recall for a free-text query, restricted
    /// to `filter_ids` when given.
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        filter_ids: Option<&[String]>,
    ) -> Result<Vec<(String, f32)>>;
}

/// [`VectorIndex`] over a prebaked ranked hit list.
///
/// The query text is ignored; the fixed ranking is filtered and truncated.
/// Used by tests and as a stand-in when running without an embedding
/// backend.
pub struct StaticVectorIndex {
    hits: Vec<(String, f32)>,
    enabled: bool,
}

impl StaticVectorIndex {
    pub fn new(hits: Vec<(String, f32)>) -> Self {
        Self {
            hits,
            enabled: true,
        }
    }

    /// A disabled index, for exercising degradation paths.
    pub fn disabled() -> Self {
        Self {
            hits: Vec::new(),
            enabled: false,
        }
    }
}

#[async_trait]
impl VectorIndex for StaticVectorIndex {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn ensure_fresh(&self) -> Result<()> {
        Ok(())
    }

    async fn search(
        &self,
        _query: &str,
        top_k: usize,
        filter_ids: Option<&[String]>,
    ) -> Result<Vec<(String, f32)>> {
        let mut results: Vec<(String, f32)> = self
            .hits
            .iter()
            .filter(|(id, _)| filter_ids.map_or(true, |ids| ids.iter().any(|f| f == id)))
            .cloned()
            .collect();
        results.truncate(top_k);

        log::debug!("Static recall returned {} hits", results.len());
        Ok(results)
    }
}
