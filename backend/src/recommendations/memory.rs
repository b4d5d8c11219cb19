//! In-memory recommendation store
//!
//! Mirrors the SQLite store's semantics (unique names, monotonic IDs) without
//! touching disk. Used by tests and ephemeral runs.

use crate::error::AppError;
use crate::recommendations::models::{NewRecommendation, Recommendation, RecommendationId};
use crate::recommendations::store::{RecommendationStore, ScoreFilter};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Table {
    /// Rows in creation order
    rows: Vec<Recommendation>,
    next_id: RecommendationId,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

/// Recommendation store held entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryRecommendationStore {
    table: RwLock<Table>,
}

impl InMemoryRecommendationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row with an explicit score, bypassing vote rules
    ///
    /// Test fixture helper; still enforces name uniqueness.
    pub async fn seed(
        &self,
        recommendation: &NewRecommendation,
        score: i64,
    ) -> Result<Recommendation, AppError> {
        let created = self.create(recommendation).await?;
        Ok(self
            .update_score(created.id, score)
            .await?
            .unwrap_or(created))
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the store holds no rows
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecommendationStore for InMemoryRecommendationStore {
    async fn create(
        &self,
        recommendation: &NewRecommendation,
    ) -> Result<Recommendation, AppError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|r| r.name == recommendation.name) {
            return Err(AppError::Conflict(
                "Recommendations names must be unique".to_string(),
            ));
        }

        let created = Recommendation {
            id: table.next_id,
            name: recommendation.name.clone(),
            youtube_link: recommendation.youtube_link.clone(),
            score: 0,
        };
        table.next_id += 1;
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn find(&self, id: RecommendationId) -> Result<Option<Recommendation>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Recommendation>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|r| r.name == name).cloned())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Recommendation>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().rev().take(limit).cloned().collect())
    }

    async fn list_all(&self) -> Result<Vec<Recommendation>, AppError> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn list_by_score(&self, filter: ScoreFilter) -> Result<Vec<Recommendation>, AppError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|r| filter.matches(r.score))
            .cloned()
            .collect())
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<Recommendation>, AppError> {
        let mut rows = self.table.read().await.rows.clone();
        // Stable sort keeps creation (id) order among equal scores
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn update_score(
        &self,
        id: RecommendationId,
        delta: i64,
    ) -> Result<Option<Recommendation>, AppError> {
        let mut table = self.table.write().await;
        Ok(table.rows.iter_mut().find(|r| r.id == id).map(|r| {
            r.score += delta;
            r.clone()
        }))
    }

    async fn remove(&self, id: RecommendationId) -> Result<(), AppError> {
        self.table.write().await.rows.retain(|r| r.id != id);
        Ok(())
    }

    async fn reset(&self) -> Result<(), AppError> {
        *self.table.write().await = Table::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_monotonic_after_remove() {
        let store = InMemoryRecommendationStore::new();
        let a = store.create(&NewRecommendation::new("A", "link")).await.unwrap();
        store.remove(a.id).await.unwrap();
        let b = store.create(&NewRecommendation::new("B", "link")).await.unwrap();
        assert_eq!(b.id, 2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_seed_sets_score() {
        let store = InMemoryRecommendationStore::new();
        let seeded = store
            .seed(&NewRecommendation::new("A", "link"), -5)
            .await
            .unwrap();
        assert_eq!(seeded.score, -5);
        assert_eq!(store.find(seeded.id).await.unwrap().unwrap().score, -5);
    }

    #[tokio::test]
    async fn test_top_breaks_ties_by_id() {
        let store = InMemoryRecommendationStore::new();
        store.seed(&NewRecommendation::new("A", "link"), 2).await.unwrap();
        store.seed(&NewRecommendation::new("B", "link"), 7).await.unwrap();
        store.seed(&NewRecommendation::new("C", "link"), 2).await.unwrap();

        let top: Vec<_> = store.list_top(3).await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(top, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_reset_clears_rows_and_ids() {
        let store = InMemoryRecommendationStore::new();
        store.create(&NewRecommendation::new("A", "link")).await.unwrap();
        store.reset().await.unwrap();
        assert!(store.is_empty().await);
        let again = store.create(&NewRecommendation::new("A", "link")).await.unwrap();
        assert_eq!(again.id, 1);
    }
}
