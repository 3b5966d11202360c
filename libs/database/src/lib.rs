//! Database connectors for the warehouse services
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connection, health and change-stream checks
//! - `config` - `core_config::FromEnv` support for connection settings
//!
//! # Example
//!
//! ```ignore
//! use database::common::RetryConfig;
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry, ensure_change_streams};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "warehouse");
//! let client = connect_from_config_with_retry(&config, Some(RetryConfig::new())).await?;
//! let replica_set = ensure_change_streams(&client).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
