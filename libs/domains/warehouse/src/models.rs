use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};
use validator::Validate;

/// Physical warehouse a product is stored in
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum WarehouseId {
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    Main,
    #[serde(rename = "2")]
    #[strum(serialize = "2")]
    Additional,
    #[serde(rename = "3")]
    #[strum(serialize = "3")]
    Reserve,
}

impl WarehouseId {
    pub const ALL: [WarehouseId; 3] = [
        WarehouseId::Main,
        WarehouseId::Additional,
        WarehouseId::Reserve,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WarehouseId::Main => "Warehouse 1",
            WarehouseId::Additional => "Warehouse 2",
            WarehouseId::Reserve => "Warehouse 3",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            WarehouseId::Main => "Main warehouse",
            WarehouseId::Additional => "Additional warehouse",
            WarehouseId::Reserve => "Reserve warehouse",
        }
    }
}

/// Warehouse selector of the screen: every warehouse, or exactly one.
///
/// Serialized as `"all"` or the warehouse id (`"1"`, `"2"`, `"3"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WarehouseSelector {
    #[default]
    All,
    Only(WarehouseId),
}

impl WarehouseSelector {
    /// Whether products stored in `warehouse` belong to this selection
    pub fn includes(&self, warehouse: WarehouseId) -> bool {
        match self {
            WarehouseSelector::All => true,
            WarehouseSelector::Only(selected) => *selected == warehouse,
        }
    }

    pub fn warehouse(&self) -> Option<WarehouseId> {
        match self {
            WarehouseSelector::All => None,
            WarehouseSelector::Only(id) => Some(*id),
        }
    }
}

impl fmt::Display for WarehouseSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarehouseSelector::All => f.write_str("all"),
            WarehouseSelector::Only(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for WarehouseSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(WarehouseSelector::All);
        }
        WarehouseId::from_str(s)
            .map(WarehouseSelector::Only)
            .map_err(|_| format!("unknown warehouse '{s}', expected all, 1, 2 or 3"))
    }
}

impl TryFrom<String> for WarehouseSelector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WarehouseSelector> for String {
    fn from(value: WarehouseSelector) -> Self {
        value.to_string()
    }
}

/// Product fields as stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub warehouse: WarehouseId,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub average_purchase_price: Option<f64>,
    /// Ordering key maintained by the store. Documents without one never
    /// match a live query.
    #[serde(deserialize_with = "deserialize_order")]
    pub order: i64,
}

/// Accept an integer or a double for `order`; other writers store numbers as
/// doubles. Fractional keys are truncated.
fn deserialize_order<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderVisitor;

    impl Visitor<'_> for OrderVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer or finite floating point ordering key")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            if value.is_finite() {
                Ok(value as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(OrderVisitor)
}

/// A stored product: opaque key plus document body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProduct {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub data: ProductDocument,
}

/// Read-only projection of a product as shown on the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub warehouse: WarehouseId,
    pub quantity: Option<f64>,
    pub average_purchase_price: Option<f64>,
    /// 1-based position in the most recent snapshot
    pub order: usize,
}

impl ProductRecord {
    /// Project a stored product at the given display rank
    pub fn from_stored(stored: StoredProduct, rank: usize) -> Self {
        let StoredProduct { id, data } = stored;
        Self {
            id,
            name: data.name,
            category: data.category,
            warehouse: data.warehouse,
            quantity: data.quantity,
            average_purchase_price: data.average_purchase_price,
            order: rank,
        }
    }

    /// Quantity times average purchase price, missing values count as zero
    pub fn stock_value(&self) -> f64 {
        self.quantity.unwrap_or(0.0) * self.average_purchase_price.unwrap_or(0.0)
    }
}

/// Add/edit form contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub category: Option<String>,
    pub warehouse: WarehouseId,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub quantity: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub average_purchase_price: f64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, warehouse: WarehouseId) -> Self {
        Self {
            name: name.into(),
            category: None,
            warehouse,
            quantity: 0.0,
            average_purchase_price: 0.0,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_stock(mut self, quantity: f64, average_purchase_price: f64) -> Self {
        self.quantity = quantity;
        self.average_purchase_price = average_purchase_price;
        self
    }

    /// Build the stored body for this draft at `order`
    pub fn into_document(self, order: i64) -> ProductDocument {
        ProductDocument {
            name: self.name,
            category: self.category.filter(|c| !c.trim().is_empty()),
            warehouse: self.warehouse,
            quantity: Some(self.quantity),
            average_purchase_price: Some(self.average_purchase_price),
            order,
        }
    }
}

impl From<&ProductRecord> for ProductDraft {
    fn from(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category.clone(),
            warehouse: record.warehouse,
            quantity: record.quantity.unwrap_or(0.0),
            average_purchase_price: record.average_purchase_price.unwrap_or(0.0),
        }
    }
}

/// Kind of stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Move,
}

/// Entry of a product's transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTransaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_id: String,
    pub kind: TransactionKind,
    pub quantity: f64,
    #[serde(default)]
    pub price: Option<f64>,
    pub date: DateTime<Utc>,
    /// Income/expense document the movement was recorded by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}
