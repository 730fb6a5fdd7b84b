//! Server configuration read from the environment.

use playbook_core::config::PersistenceConfig;

use crate::error::AppError;

/// Settings for the API server process.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Connection settings for the snapshot store.
    pub persistence: PersistenceConfig,
}

impl ApiConfig {
    /// Reads the configuration from `DATABASE_URL`, `HOST` and `PORT`.
    /// `HOST` defaults to `0.0.0.0` and `PORT` to `3000`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when `DATABASE_URL` is missing or `PORT`
    /// is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_owned());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        Ok(Self {
            host,
            port,
            persistence: PersistenceConfig::new(database_url),
        })
    }
}
