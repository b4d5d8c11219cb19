//! Recommendation API handlers
//!
//! Contains HTTP request handlers for submitting, voting on and listing
//! recommendations.

use crate::error::AppError;
use crate::recommendations::{NewRecommendation, Recommendation, RecommendationId};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};

/// POST /recommendations - Submit a new recommendation
pub async fn create_recommendation(
    State(state): State<AppState>,
    payload: Result<Json<NewRecommendation>, JsonRejection>,
) -> Result<(StatusCode, Json<Recommendation>), AppError> {
    let Json(payload) = payload?;
    let created = state.recommendations.insert(payload).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /recommendations - The ten most recent recommendations
pub async fn list_recommendations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    Ok(Json(state.recommendations.get_all().await?))
}

/// GET /recommendations/:id - Get a specific recommendation
pub async fn get_recommendation(
    State(state): State<AppState>,
    id: Result<Path<RecommendationId>, PathRejection>,
) -> Result<Json<Recommendation>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.recommendations.get_by_id(id).await?))
}

/// POST /recommendations/:id/upvote - Add a point
pub async fn upvote_recommendation(
    State(state): State<AppState>,
    id: Result<Path<RecommendationId>, PathRejection>,
) -> Result<Json<Recommendation>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.recommendations.upvote(id).await?))
}

/// POST /recommendations/:id/downvote - Take a point
///
/// Responds with `null` when the recommendation was removed.
pub async fn downvote_recommendation(
    State(state): State<AppState>,
    id: Result<Path<RecommendationId>, PathRejection>,
) -> Result<Json<Option<Recommendation>>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.recommendations.downvote(id).await?))
}

/// GET /recommendations/random - A weighted random recommendation
pub async fn random_recommendation(
    State(state): State<AppState>,
) -> Result<Json<Recommendation>, AppError> {
    Ok(Json(state.recommendations.get_random().await?))
}

/// GET /recommendations/top/:amount - Best scored recommendations
pub async fn top_recommendations(
    State(state): State<AppState>,
    amount: Result<Path<usize>, PathRejection>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let Path(amount) = amount?;
    Ok(Json(state.recommendations.get_top(amount).await?))
}

/// DELETE /reset-database - Remove every recommendation (test environment only)
pub async fn reset_database(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.recommendations.reset().await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::recommendations::InMemoryRecommendationStore;
    use std::sync::Arc;

    fn create_test_state() -> AppState {
        AppState::new(Arc::new(InMemoryRecommendationStore::new()), Config::default())
    }

    #[tokio::test]
    async fn test_list_recommendations_empty() {
        let state = create_test_state();
        let Json(list) = list_recommendations(State(state)).await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_create_recommendation() {
        let state = create_test_state();
        let payload = NewRecommendation::new("Song A", "www.youtube.com/abcdefghij");

        let (status, Json(created)) =
            create_recommendation(State(state.clone()), Ok(Json(payload)))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.name, "Song A");

        let Json(list) = list_recommendations(State(state)).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_upvote_not_found() {
        let state = create_test_state();
        let result = upvote_recommendation(State(state), Ok(Path(7))).await;
        match result {
            Err(AppError::NotFound(_)) => {}
            other => panic!("Expected NotFound error, got: {:?}", other.map(|j| j.0)),
        }
    }

    #[tokio::test]
    async fn test_downvote_returns_updated_row() {
        let state = create_test_state();
        let created = state
            .recommendations
            .insert(NewRecommendation::new("Song A", "link"))
            .await
            .unwrap();

        let Json(result) = downvote_recommendation(State(state), Ok(Path(created.id)))
            .await
            .unwrap();
        assert_eq!(result.map(|r| r.score), Some(-1));
    }
}
