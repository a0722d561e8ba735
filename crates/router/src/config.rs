use model::env::TABLE_NAME;
use thiserror::Error;

/// Settings resolved once at startup and passed into the [`Router`](crate::Router).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub table_name: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {0} environment variable")]
    MissingVariable(&'static str),
}

impl RouterConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        RouterConfig {
            table_name: table_name.into(),
        }
    }

    /// Read the table name from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let table_name: String = std::env::var(TABLE_NAME)
            .ok()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingVariable(TABLE_NAME))?;

        Ok(RouterConfig { table_name })
    }
}
