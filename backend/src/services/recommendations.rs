//! Recommendation service
//!
//! Business rules for the recommendation lifecycle: unique names on
//! submission, +1/-1 voting, removal once the score drops below the
//! threshold, and the weighted random pick.

use crate::error::AppError;
use crate::recommendations::{
    NewRecommendation, Recommendation, RecommendationId, RecommendationStore, ScoreFilter,
};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of recommendations returned by `get_all`
pub const RECENT_LIMIT: usize = 10;

/// Scores strictly above this count as "high" for the random pick
pub const HIGH_SCORE_THRESHOLD: i64 = 10;

/// Chance that the random pick draws from the high-score group
pub const HIGH_SCORE_PROBABILITY: f64 = 0.7;

/// A downvote leaving the score below this removes the recommendation
pub const REMOVAL_THRESHOLD: i64 = -5;

/// Recommendation service
///
/// Cheap to share: holds only a handle to the store.
pub struct RecommendationService {
    store: Arc<dyn RecommendationStore>,
}

impl RecommendationService {
    /// Create a service backed by the given store
    pub fn new(store: Arc<dyn RecommendationStore>) -> Self {
        Self { store }
    }

    /// Submit a new recommendation
    ///
    /// # Returns
    /// * `Ok(Recommendation)` - The stored row, score 0
    /// * `Err(AppError::Validation)` - Name or link missing
    /// * `Err(AppError::Conflict)` - Name already taken
    pub async fn insert(&self, payload: NewRecommendation) -> Result<Recommendation, AppError> {
        payload.validate()?;

        if self.store.find_by_name(&payload.name).await?.is_some() {
            return Err(AppError::Conflict(
                "Recommendations names must be unique".to_string(),
            ));
        }

        let created = self.store.create(&payload).await?;
        info!("New recommendation {}: {}", created.id, created.name);
        Ok(created)
    }

    /// Get a single recommendation
    pub async fn get_by_id(&self, id: RecommendationId) -> Result<Recommendation, AppError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Add one point to a recommendation's score
    pub async fn upvote(&self, id: RecommendationId) -> Result<Recommendation, AppError> {
        self.store
            .update_score(id, 1)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Take one point from a recommendation's score
    ///
    /// # Returns
    /// * `Ok(Some(Recommendation))` - The updated row
    /// * `Ok(None)` - The score fell below the threshold and the row was removed
    /// * `Err(AppError::NotFound)` - No such recommendation
    pub async fn downvote(
        &self,
        id: RecommendationId,
    ) -> Result<Option<Recommendation>, AppError> {
        let updated = self
            .store
            .update_score(id, -1)
            .await?
            .ok_or_else(|| not_found(id))?;

        if updated.score < REMOVAL_THRESHOLD {
            self.store.remove(id).await?;
            info!(
                "Removed recommendation {} after its score fell to {}",
                id, updated.score
            );
            return Ok(None);
        }

        Ok(Some(updated))
    }

    /// The most recent recommendations, newest first
    pub async fn get_all(&self) -> Result<Vec<Recommendation>, AppError> {
        self.store.list_recent(RECENT_LIMIT).await
    }

    /// The `amount` best scored recommendations, highest first
    pub async fn get_top(&self, amount: usize) -> Result<Vec<Recommendation>, AppError> {
        self.store.list_top(amount).await
    }

    /// Pick a random recommendation, favouring high scores
    pub async fn get_random(&self) -> Result<Recommendation, AppError> {
        let roll: f64 = rand::thread_rng().gen();
        self.get_random_with_roll(roll).await
    }

    /// Pick a random recommendation for a given roll in `[0, 1)`
    ///
    /// A roll below `HIGH_SCORE_PROBABILITY` draws from scores above
    /// `HIGH_SCORE_THRESHOLD`, anything else from the rest. An empty group
    /// falls back to every recommendation.
    pub async fn get_random_with_roll(&self, roll: f64) -> Result<Recommendation, AppError> {
        let filter = if roll < HIGH_SCORE_PROBABILITY {
            ScoreFilter::GreaterThan(HIGH_SCORE_THRESHOLD)
        } else {
            ScoreFilter::LessOrEqual(HIGH_SCORE_THRESHOLD)
        };

        let mut candidates = self.store.list_by_score(filter).await?;
        if candidates.is_empty() {
            debug!("No recommendations match {:?}, drawing from all", filter);
            candidates = self.store.list_all().await?;
        }
        if candidates.is_empty() {
            return Err(AppError::NotFound("No recommendations yet".to_string()));
        }

        let index = rand::thread_rng().gen_range(0..candidates.len());
        Ok(candidates.swap_remove(index))
    }

    /// Delete every recommendation
    pub async fn reset(&self) -> Result<(), AppError> {
        self.store.reset().await?;
        info!("All recommendations deleted");
        Ok(())
    }
}

fn not_found(id: RecommendationId) -> AppError {
    AppError::NotFound(format!("Recommendation {}", id))
}
