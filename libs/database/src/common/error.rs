/// Errors from deployment checks run after connecting
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The server did not answer the `hello` command
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Standalone server; live queries need a replica set or mongos
    #[error("Change streams unavailable: {0}")]
    ChangeStreamsUnavailable(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
