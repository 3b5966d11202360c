use core_config::{ConfigError, FromEnv, env_or_default};

use crate::query::{PRODUCTS_COLLECTION, TRANSACTIONS_COLLECTION};

/// Collection names the warehouse screen reads from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarehouseConfig {
    pub products_collection: String,
    pub transactions_collection: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            products_collection: PRODUCTS_COLLECTION.to_string(),
            transactions_collection: TRANSACTIONS_COLLECTION.to_string(),
        }
    }
}

impl FromEnv for WarehouseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let products_collection =
            env_or_default("WAREHOUSE_PRODUCTS_COLLECTION", PRODUCTS_COLLECTION);
        let transactions_collection =
            env_or_default("WAREHOUSE_TRANSACTIONS_COLLECTION", TRANSACTIONS_COLLECTION);

        for (key, value) in [
            ("WAREHOUSE_PRODUCTS_COLLECTION", &products_collection),
            ("WAREHOUSE_TRANSACTIONS_COLLECTION", &transactions_collection),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ParseError {
                    key: key.to_string(),
                    details: "collection name must not be empty".to_string(),
                });
            }
        }

        Ok(Self {
            products_collection,
            transactions_collection,
        })
    }
}
