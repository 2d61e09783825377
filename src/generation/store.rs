//! Persistence of generated images

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{info, instrument};

use crate::models::Generation;
use crate::models::generation::is_local_image_url;
use crate::{IftarError, Result};

const CREATE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS generations (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    prompt TEXT NOT NULL,
    image_url VARCHAR(500) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    INDEX idx_generations_created_at (created_at)
) CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci";

/// Storage for `generations` rows
#[async_trait]
pub trait GenerationStore: Send + Sync {
    /// Insert a generation and return its id
    async fn insert(&self, prompt: &str, image_url: &str) -> Result<u64>;

    /// Most recent generations with a locally hosted image, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<Generation>>;
}

/// MySQL-backed store
#[derive(Clone)]
pub struct MySqlGenerationStore {
    pool: MySqlPool,
}

impl MySqlGenerationStore {
    /// Create a lazily connecting pool; connection errors surface per query
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Create the `generations` table when missing
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("generations table ready");
        Ok(())
    }
}

#[async_trait]
impl GenerationStore for MySqlGenerationStore {
    #[instrument(skip(self, prompt, image_url))]
    async fn insert(&self, prompt: &str, image_url: &str) -> Result<u64> {
        let result = sqlx::query("INSERT INTO generations (prompt, image_url) VALUES (?, ?)")
            .bind(prompt)
            .bind(image_url)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_id())
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: usize) -> Result<Vec<Generation>> {
        let rows = sqlx::query_as::<_, Generation>(
            r"
            SELECT id, prompt, image_url, created_at
            FROM generations
            WHERE image_url IS NOT NULL AND image_url != ''
              AND image_url NOT LIKE 'http://%' AND image_url NOT LIKE 'https://%'
            ORDER BY created_at DESC
            LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Process-local store for development and tests
#[derive(Default)]
pub struct InMemoryGenerationStore {
    rows: Mutex<Vec<Generation>>,
}

impl InMemoryGenerationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Generation>>> {
        self.rows
            .lock()
            .map_err(|_| IftarError::storage("generation store lock poisoned"))
    }
}

#[async_trait]
impl GenerationStore for InMemoryGenerationStore {
    async fn insert(&self, prompt: &str, image_url: &str) -> Result<u64> {
        let mut rows = self.lock()?;
        let id = rows.len() as u64 + 1;
        rows.push(Generation {
            id,
            prompt: prompt.to_string(),
            image_url: image_url.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Generation>> {
        let rows = self.lock()?;
        Ok(rows
            .iter()
            .rev()
            .filter(|g| is_local_image_url(&g.image_url))
            .take(limit)
            .cloned()
            .collect())
    }
}
