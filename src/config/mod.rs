//! SQLite-backed local state for assess-cli
//!
//! This module provides persistent storage for:
//! - Draft answer buffers, namespaced per assessment document, so a
//!   half-finished wizard session survives a process restart
//! - Key-value settings (API base URL)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub mod db;
pub mod repository;

use crate::api::constants::DEFAULT_BASE_URL;
use crate::wizard::answers::AnswerBuffer;

/// Settings key for the backend base URL
pub const API_BASE_URL_KEY: &str = "api.base-url";

/// Local state manager using a SQLite backend
pub struct Config {
    pub(crate) pool: sqlx::SqlitePool,
    config_path: PathBuf,
}

impl Config {
    /// Get the path to the SQLite database file
    pub fn get_db_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("assess-cli")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".assess-cli")
        };

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            log::info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("state.db"))
    }

    /// Load local state from the default location
    pub async fn load() -> Result<Self> {
        let db_path = Self::get_db_path()?;
        Self::load_at(&db_path).await
    }

    /// Load local state from an explicit database file
    pub async fn load_at(db_path: &Path) -> Result<Self> {
        log::debug!("Loading local state from: {:?}", db_path);

        let pool = db::connect(db_path).await?;
        db::run_migrations(&pool).await?;

        Ok(Self {
            pool,
            config_path: db_path.to_path_buf(),
        })
    }

    /// Create state for testing (in-memory database)
    pub async fn new_test() -> Result<Self> {
        let pool = db::connect_memory().await?;
        db::run_migrations(&pool).await?;

        Ok(Self {
            pool,
            config_path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    // Draft buffer methods
    pub async fn load_draft(&self, assessment_id: &str) -> Result<AnswerBuffer> {
        repository::drafts::load(&self.pool, assessment_id).await
    }

    pub async fn save_draft(&self, assessment_id: &str, buffer: &AnswerBuffer) -> Result<()> {
        repository::drafts::save(&self.pool, assessment_id, buffer).await
    }

    pub async fn clear_draft(&self, assessment_id: &str) -> Result<()> {
        repository::drafts::clear(&self.pool, assessment_id).await
    }

    // Settings methods
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        repository::settings::get(&self.pool, key).await
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        repository::settings::set(&self.pool, key, value).await
    }

    pub async fn list_settings(&self) -> Result<Vec<(String, String)>> {
        repository::settings::list(&self.pool).await
    }

    /// Base URL of the backend, defaulting to a locally running instance
    pub async fn api_base_url(&self) -> Result<String> {
        Ok(self
            .get_setting(API_BASE_URL_KEY)
            .await?
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
    }
}
