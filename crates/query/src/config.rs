use serde::{Deserialize, Serialize};

/// Tunables for the query engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Result count used when a caller passes no `top_k`
    pub default_top_k: usize,

    /// Vector share of the merged score when hybrid callers pass no weight
    pub default_vector_weight: f32,

    /// Vector recall over-fetch multiplier in hybrid search, to improve
    /// post-merge coverage
    pub recall_overfetch: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_k: 10,
            default_vector_weight: 0.6,
            recall_overfetch: 2,
        }
    }
}
