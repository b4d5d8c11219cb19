//! Recommendations module
//!
//! Recommendation data model and the storage backends behind it.

pub mod db;
pub mod memory;
pub mod models;
pub mod store;

pub use db::SqliteRecommendationStore;
pub use memory::InMemoryRecommendationStore;
pub use models::{NewRecommendation, Recommendation, RecommendationId};
pub use store::{RecommendationStore, ScoreFilter};
