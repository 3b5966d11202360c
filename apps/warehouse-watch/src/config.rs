//! Configuration for the watch binary

use core_config::{Environment, FromEnv};
use database::common::RetryConfig;
use database::mongodb::MongoConfig;
use domain_warehouse::WarehouseConfig;
use eyre::{Result, WrapErr};

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub warehouse: WarehouseConfig,
    pub retry: RetryConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: Environment::from_env(),
            warehouse: WarehouseConfig::from_env()
                .wrap_err("Invalid warehouse configuration")?,
            retry: RetryConfig::from_env()
                .wrap_err("Invalid connection retry configuration")?,
        })
    }

    /// MongoDB settings are only required when the Mongo store is used
    pub fn mongo(&self) -> Result<MongoConfig> {
        let mut config = MongoConfig::from_env()
            .wrap_err("Invalid MongoDB configuration")?;
        if config.app_name.is_none() {
            config = config.with_app_name(env!("CARGO_PKG_NAME"));
        }
        Ok(config)
    }
}
