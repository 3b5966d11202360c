use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Live query failed: {0}")]
    Subscription(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WarehouseResult<T> = Result<T, WarehouseError>;

impl From<mongodb::error::Error> for WarehouseError {
    fn from(err: mongodb::error::Error) -> Self {
        WarehouseError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for WarehouseError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        WarehouseError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for WarehouseError {
    fn from(err: validator::ValidationErrors) -> Self {
        WarehouseError::Validation(err.to_string())
    }
}
