//! Storage abstraction for recommendations
//!
//! The service layer only talks to `RecommendationStore`, so the SQLite
//! backend can be swapped for the in-memory one in tests.

use crate::error::AppError;
use crate::recommendations::models::{NewRecommendation, Recommendation, RecommendationId};
use async_trait::async_trait;

/// Score predicate used when partitioning recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreFilter {
    /// `score > n`
    GreaterThan(i64),
    /// `score <= n`
    LessOrEqual(i64),
}

impl ScoreFilter {
    /// Whether the given score satisfies this filter
    pub fn matches(&self, score: i64) -> bool {
        match *self {
            ScoreFilter::GreaterThan(n) => score > n,
            ScoreFilter::LessOrEqual(n) => score <= n,
        }
    }
}

/// Persistent collection of recommendations
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Insert a new row with score 0
    ///
    /// Returns `AppError::Conflict` if the name is already taken.
    async fn create(&self, recommendation: &NewRecommendation)
        -> Result<Recommendation, AppError>;

    /// Look up a row by ID
    async fn find(&self, id: RecommendationId) -> Result<Option<Recommendation>, AppError>;

    /// Look up a row by exact (case-sensitive) name
    async fn find_by_name(&self, name: &str) -> Result<Option<Recommendation>, AppError>;

    /// Most recently created rows first, at most `limit`
    async fn list_recent(&self, limit: usize) -> Result<Vec<Recommendation>, AppError>;

    /// Every row, in creation order
    async fn list_all(&self) -> Result<Vec<Recommendation>, AppError>;

    /// Every row whose score satisfies `filter`, in creation order
    async fn list_by_score(&self, filter: ScoreFilter) -> Result<Vec<Recommendation>, AppError>;

    /// Highest scores first, at most `limit`; ties by ID ascending
    async fn list_top(&self, limit: usize) -> Result<Vec<Recommendation>, AppError>;

    /// Add `delta` to the score and return the updated row, or `None` if absent
    async fn update_score(
        &self,
        id: RecommendationId,
        delta: i64,
    ) -> Result<Option<Recommendation>, AppError>;

    /// Delete a row (no-op if absent)
    async fn remove(&self, id: RecommendationId) -> Result<(), AppError>;

    /// Delete every row and restart ID assignment
    async fn reset(&self) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_filter_boundaries() {
        assert!(ScoreFilter::GreaterThan(10).matches(11));
        assert!(!ScoreFilter::GreaterThan(10).matches(10));
        assert!(ScoreFilter::LessOrEqual(10).matches(10));
        assert!(ScoreFilter::LessOrEqual(10).matches(-5));
        assert!(!ScoreFilter::LessOrEqual(10).matches(11));
    }
}
