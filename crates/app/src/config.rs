//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Configuration for the template backend.
///
/// All optional fields have defaults suitable for local development; in
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Root directory for stored template documents
    /// (default: `data/templates`).
    pub storage_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration, reading a `.env` file first if present.
    ///
    /// | Env Var                | Default          |
    /// |------------------------|------------------|
    /// | `DATABASE_URL`         | (required)       |
    /// | `TEMPLATE_STORAGE_DIR` | `data/templates` |
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from already-set environment variables.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let storage_dir = std::env::var("TEMPLATE_STORAGE_DIR")
            .unwrap_or_else(|_| "data/templates".into())
            .into();

        Self {
            database_url,
            storage_dir,
        }
    }
}
