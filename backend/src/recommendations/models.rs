//! Recommendation data models
//!
//! Defines the stored recommendation row and the payload used to create one.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Unique identifier for a recommendation
pub type RecommendationId = i64;

/// A stored music recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Monotonically assigned identifier
    pub id: RecommendationId,
    /// Song name, unique across all recommendations
    pub name: String,
    /// Link to the song video
    pub youtube_link: String,
    /// Net votes (upvotes minus downvotes)
    pub score: i64,
}

/// Payload for submitting a new recommendation
///
/// Missing fields deserialize as empty strings so that `validate` reports them
/// instead of the JSON extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendation {
    /// Song name
    #[serde(default)]
    pub name: String,
    /// Link to the song video
    #[serde(default)]
    pub youtube_link: String,
}

impl NewRecommendation {
    /// Create a new submission payload
    pub fn new(name: impl Into<String>, youtube_link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            youtube_link: youtube_link.into(),
        }
    }

    /// Check that both fields are present
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("\"name\" is required".to_string()));
        }
        if self.youtube_link.trim().is_empty() {
            return Err(AppError::Validation(
                "\"youtubeLink\" is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_in_column_order() {
        let recommendation = Recommendation {
            id: 1,
            name: "Falamansa - Xote dos Milagres".to_string(),
            youtube_link: "https://www.youtube.com/watch?v=chwyjJbcs1Y".to_string(),
            score: 0,
        };

        let json = serde_json::to_string(&recommendation).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"name":"Falamansa - Xote dos Milagres","youtubeLink":"https://www.youtube.com/watch?v=chwyjJbcs1Y","score":0}"#
        );
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let payload: NewRecommendation = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, NewRecommendation::default());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(NewRecommendation::new("Song", "www.youtube.com/abc")
            .validate()
            .is_ok());

        match NewRecommendation::new("  ", "www.youtube.com/abc").validate() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("name")),
            other => panic!("Expected Validation error, got: {:?}", other),
        }

        match NewRecommendation::new("Song", "").validate() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("youtubeLink")),
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }
}
