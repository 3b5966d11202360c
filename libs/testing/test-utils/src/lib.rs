//! Shared test utilities for the warehouse crates
//!
//! - `TestDataBuilder`: deterministic product data (always available)
//! - `TestMongo`: single-node MongoDB replica set in a container (feature: "mongodb")
//! - `assertions`: assertion helpers (always available)
//!
//! The builder only produces plain values, so any crate can turn them into its
//! own document types without depending back on this one.
//!
//! # Usage
//!
//! ```rust
//! use test_utils::TestDataBuilder;
//!
//! let builder = TestDataBuilder::from_test_name("low_stock_filter");
//! let id = builder.product_id("bolt");
//! let name = builder.product_name("bolt");
//! assert!(name.contains("bolt"));
//! assert_eq!(id, builder.product_id("bolt"));
//! ```
//!
//! ## MongoDB
//!
//! Add `features = ["mongodb"]` to your dev-dependencies, then:
//!
//! ```rust,ignore
//! use test_utils::TestMongo;
//!
//! #[tokio::test]
//! #[ignore]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database("warehouse_test");
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongodb")]
mod mongo;

#[cfg(feature = "mongodb")]
pub use mongo::TestMongo;

/// Deterministic product data derived from a seed
#[derive(Debug, Clone, Copy)]
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name, so each test gets its own data
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Stable product key for `suffix` under this seed
    pub fn product_id(&self, suffix: &str) -> String {
        let name = format!("{}-{}", self.seed, suffix);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }

    pub fn product_name(&self, suffix: &str) -> String {
        format!("test-product-{}-{}", self.seed % 10_000, suffix)
    }

    /// Quantity in `0..=20` for the `index`-th product
    pub fn quantity(&self, index: u64) -> f64 {
        (self.mix(index) % 21) as f64
    }

    /// Price in `1.00..=100.00` with cent precision for the `index`-th product
    pub fn price(&self, index: u64) -> f64 {
        (self.mix(index.wrapping_add(0x9e37)) % 9_901 + 100) as f64 / 100.0
    }

    fn mix(&self, index: u64) -> u64 {
        // splitmix64 step
        let mut z = self
            .seed
            .wrapping_add(index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert two amounts are equal up to rounding noise
    pub fn assert_amount_eq(actual: f64, expected: f64, context: &str) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{}: expected {}, got {}",
            context,
            expected,
            actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
