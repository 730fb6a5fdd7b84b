//! Explicit configuration for the persistence collaborator.

/// Connection settings handed to a persistence collaborator at construction.
///
/// Populated from the environment by the binary that owns the process; the
/// engine itself never reads environment variables or global state.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Database connection string.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl PersistenceConfig {
    /// Creates a configuration with the default pool size.
    #[must_use]
    pub fn new(database_url: String) -> Self {
        Self {
            database_url,
            max_connections: 10,
        }
    }
}
