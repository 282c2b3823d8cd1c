use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by the declarative widget configuration.
///
/// These indicate a broken configuration file rather than bad user input, so
/// the HTTP layer reports them as internal errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown option type '{type_tag}' for option '{option}'")]
    UnknownOptionType { option: String, type_tag: String },

    #[error("Unknown widget '{0}'")]
    UnknownWidget(String),

    #[error("Data provider for item '{item}' failed: {message}")]
    DataProvider { item: String, message: String },

    #[error("Failed to load widget configuration: {0}")]
    Load(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Load(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Load(err.to_string())
    }
}
