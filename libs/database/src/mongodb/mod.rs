//! MongoDB connector and deployment checks

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{
    MongoError, client_options, connect_from_config, connect_from_config_with_retry,
};
pub use health::{HealthStatus, check_health_detailed, ensure_change_streams, topology_name};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Database};
