use chrono::{DateTime, Utc};
use relicboard_engine::Board;
use relicboard_search::SearchSeed;
use serde::Serialize;

/// Result of an `optimize` run, replayable from its seed.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResult {
    /// Seed the search drew its random moves from
    pub seed: SearchSeed,
    pub optimized_at: DateTime<Utc>,
    pub iterations: usize,
    pub score: f64,
    /// Score of the shuffled starting placement
    pub initial_score: f64,
    pub accepted_moves: usize,
    pub board: Board,
}

/// Response body of `POST /api/v1/optimize`.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    pub board: Board,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Number of artifact and slate definitions loaded
    pub items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
