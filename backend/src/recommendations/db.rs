//! SQLite-backed recommendation store
//!
//! Handles all database interactions for recommendations.

use crate::error::AppError;
use crate::recommendations::models::{NewRecommendation, Recommendation, RecommendationId};
use crate::recommendations::store::{RecommendationStore, ScoreFilter};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

const COLUMNS: &str = "id, name, youtube_link, score";

/// Database connection pool for recommendation operations
pub struct SqliteRecommendationStore {
    pool: SqlitePool,
}

impl SqliteRecommendationStore {
    /// Open (creating if missing) the database and run migrations
    ///
    /// # Arguments
    /// * `db_url` - SQLite file path or `sqlite:` connection string
    /// * `max_connections` - Pool size; forced to 1 for in-memory databases
    ///
    /// # Returns
    /// * `Ok(SqliteRecommendationStore)` if successful
    /// * `Err(AppError)` if connection or migration failed
    pub async fn open(db_url: &str, max_connections: u32) -> Result<Self, AppError> {
        // Ensure parent directory exists
        if let Some(parent) = database_file(db_url).as_ref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
        }

        // SQLite connection string format: sqlite://path/to/db.db
        let connection_string = if db_url.starts_with("sqlite:") {
            db_url.to_string()
        } else {
            format!("sqlite:{}", db_url)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        // Every connection to :memory: is a separate database
        let pool_options = if is_memory(&connection_string) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
        })?;

        info!("Connected to SQLite database at: {}", db_url);

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Open a private in-memory database
    pub async fn in_memory() -> Result<Self, AppError> {
        Self::open("sqlite::memory:", 1).await
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed SQLite connection pool");
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_recommendations.sql");

        // Strip comment lines and inline comments before splitting statements
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = match trimmed.find("--") {
                Some(comment_pos) => &trimmed[..comment_pos],
                None => trimmed,
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        let statements = cleaned_sql
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database pool (for advanced operations if needed)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecommendationStore for SqliteRecommendationStore {
    async fn create(
        &self,
        recommendation: &NewRecommendation,
    ) -> Result<Recommendation, AppError> {
        let created = sqlx::query_as::<_, Recommendation>(&format!(
            "INSERT INTO recommendations (name, youtube_link) VALUES (?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&recommendation.name)
        .bind(&recommendation.youtube_link)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Recommendations names must be unique".to_string())
            }
            e => AppError::Internal(anyhow::anyhow!("Failed to create recommendation: {}", e)),
        })?;

        debug!("Created recommendation {} ({})", created.id, created.name);
        Ok(created)
    }

    async fn find(&self, id: RecommendationId) -> Result<Option<Recommendation>, AppError> {
        let recommendation = sqlx::query_as::<_, Recommendation>(&format!(
            "SELECT {COLUMNS} FROM recommendations WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch recommendation: {}", e)))?;

        Ok(recommendation)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Recommendation>, AppError> {
        let recommendation = sqlx::query_as::<_, Recommendation>(&format!(
            "SELECT {COLUMNS} FROM recommendations WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch recommendation: {}", e)))?;

        Ok(recommendation)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Recommendation>, AppError> {
        let recommendations = sqlx::query_as::<_, Recommendation>(&format!(
            "SELECT {COLUMNS} FROM recommendations ORDER BY id DESC LIMIT ?"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to fetch recommendations: {}", e))
        })?;

        Ok(recommendations)
    }

    async fn list_all(&self) -> Result<Vec<Recommendation>, AppError> {
        let recommendations = sqlx::query_as::<_, Recommendation>(&format!(
            "SELECT {COLUMNS} FROM recommendations ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to fetch recommendations: {}", e))
        })?;

        Ok(recommendations)
    }

    async fn list_by_score(&self, filter: ScoreFilter) -> Result<Vec<Recommendation>, AppError> {
        let (operator, threshold) = match filter {
            ScoreFilter::GreaterThan(n) => (">", n),
            ScoreFilter::LessOrEqual(n) => ("<=", n),
        };

        let recommendations = sqlx::query_as::<_, Recommendation>(&format!(
            "SELECT {COLUMNS} FROM recommendations WHERE score {operator} ? ORDER BY id ASC"
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to fetch recommendations: {}", e))
        })?;

        Ok(recommendations)
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<Recommendation>, AppError> {
        let recommendations = sqlx::query_as::<_, Recommendation>(&format!(
            "SELECT {COLUMNS} FROM recommendations ORDER BY score DESC, id ASC LIMIT ?"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to fetch top recommendations: {}", e))
        })?;

        Ok(recommendations)
    }

    async fn update_score(
        &self,
        id: RecommendationId,
        delta: i64,
    ) -> Result<Option<Recommendation>, AppError> {
        let updated = sqlx::query_as::<_, Recommendation>(&format!(
            "UPDATE recommendations SET score = score + ? WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(delta)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to update score: {}", e)))?;

        if let Some(ref recommendation) = updated {
            debug!(
                "Updated score of recommendation {} by {} to {}",
                id, delta, recommendation.score
            );
        }
        Ok(updated)
    }

    async fn remove(&self, id: RecommendationId) -> Result<(), AppError> {
        sqlx::query("DELETE FROM recommendations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to delete recommendation: {}", e))
            })?;

        debug!("Deleted recommendation: {}", id);
        Ok(())
    }

    async fn reset(&self) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to begin reset: {}", e)))?;

        sqlx::query("DELETE FROM recommendations")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to truncate recommendations: {}", e))
            })?;

        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'recommendations'")
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to reset id sequence: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to commit reset: {}", e)))?;

        info!("Reset recommendations table");
        Ok(())
    }
}

fn is_memory(connection_string: &str) -> bool {
    connection_string.contains(":memory:") || connection_string.contains("mode=memory")
}

/// On-disk file behind a connection string, if any
fn database_file(db_url: &str) -> Option<PathBuf> {
    if is_memory(db_url) {
        return None;
    }
    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
