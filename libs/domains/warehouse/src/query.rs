//! Live-query composition
//!
//! Turns the screen's filter inputs into the ordered constraint list sent to the
//! document store. The order of constraints is dictated by the store's composite
//! index requirements: the low-stock range filter goes first, then the ordering
//! clause, then the warehouse equality.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::models::{ProductDocument, WarehouseSelector};

pub const PRODUCTS_COLLECTION: &str = "products";
pub const TRANSACTIONS_COLLECTION: &str = "transactions";

/// Products with at most this quantity count as low stock
pub const LOW_STOCK_THRESHOLD: f64 = 5.0;

/// Queryable product field, displayed as its stored name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    Warehouse,
    Quantity,
    Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    LessOrEqual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

/// A single filter or ordering clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    Where {
        field: Field,
        op: Comparison,
        value: FieldValue,
    },
    OrderAscending {
        field: Field,
    },
}

impl Constraint {
    pub fn equal(field: Field, value: FieldValue) -> Self {
        Constraint::Where {
            field,
            op: Comparison::Equal,
            value,
        }
    }

    pub fn at_most(field: Field, value: f64) -> Self {
        Constraint::Where {
            field,
            op: Comparison::LessOrEqual,
            value: FieldValue::Number(value),
        }
    }

    pub fn order_by(field: Field) -> Self {
        Constraint::OrderAscending { field }
    }

    pub fn is_equality(&self) -> bool {
        matches!(
            self,
            Constraint::Where {
                op: Comparison::Equal,
                ..
            }
        )
    }

    pub fn is_inequality(&self) -> bool {
        matches!(
            self,
            Constraint::Where {
                op: Comparison::LessOrEqual,
                ..
            }
        )
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, Constraint::OrderAscending { .. })
    }

    /// Whether a stored document passes this clause. Ordering clauses admit
    /// everything; a filter on a missing field admits nothing.
    pub fn admits(&self, doc: &ProductDocument) -> bool {
        let Constraint::Where { field, op, value } = self else {
            return true;
        };

        match (field_value(doc, *field), op, value) {
            (None, _, _) => false,
            (Some(actual), Comparison::Equal, expected) => actual == *expected,
            (
                Some(FieldValue::Number(actual)),
                Comparison::LessOrEqual,
                FieldValue::Number(max),
            ) => actual <= *max,
            (Some(_), Comparison::LessOrEqual, _) => false,
        }
    }
}

fn field_value(doc: &ProductDocument, field: Field) -> Option<FieldValue> {
    match field {
        Field::Warehouse => Some(FieldValue::Text(doc.warehouse.to_string())),
        Field::Quantity => doc.quantity.map(FieldValue::Number),
        Field::Order => Some(FieldValue::Number(doc.order as f64)),
    }
}

/// Inputs that determine the live query; one subscription exists per distinct key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryKey {
    pub warehouse: WarehouseSelector,
    pub low_stock: bool,
}

impl QueryKey {
    pub fn new(warehouse: WarehouseSelector, low_stock: bool) -> Self {
        Self {
            warehouse,
            low_stock,
        }
    }
}

/// A composed query against one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub collection: String,
    pub constraints: Vec<Constraint>,
}

impl ProductQuery {
    /// Compose the constraint list for `key` against the default collection
    pub fn compose(key: QueryKey) -> Self {
        let mut constraints = vec![Constraint::order_by(Field::Order)];

        if let Some(warehouse) = key.warehouse.warehouse() {
            constraints.push(Constraint::equal(
                Field::Warehouse,
                FieldValue::Text(warehouse.to_string()),
            ));
        }

        if key.low_stock {
            constraints.insert(0, Constraint::at_most(Field::Quantity, LOW_STOCK_THRESHOLD));
        }

        Self {
            collection: PRODUCTS_COLLECTION.to_string(),
            constraints,
        }
    }

    pub fn in_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn filters(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| !c.is_ordering())
    }

    /// Fields to sort by, in priority order
    pub fn ordering(&self) -> impl Iterator<Item = Field> + '_ {
        self.constraints.iter().filter_map(|c| match c {
            Constraint::OrderAscending { field } => Some(*field),
            Constraint::Where { .. } => None,
        })
    }

    pub fn matches(&self, doc: &ProductDocument) -> bool {
        self.constraints.iter().all(|c| c.admits(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WarehouseId;

    fn all_keys() -> Vec<QueryKey> {
        let mut keys = Vec::new();
        for low_stock in [false, true] {
            keys.push(QueryKey::new(WarehouseSelector::All, low_stock));
            for id in WarehouseId::ALL {
                keys.push(QueryKey::new(WarehouseSelector::Only(id), low_stock));
            }
        }
        keys
    }

    fn doc(warehouse: WarehouseId, quantity: Option<f64>) -> ProductDocument {
        ProductDocument {
            name: "Steel Bolt".to_string(),
            category: None,
            warehouse,
            quantity,
            average_purchase_price: Some(1.0),
            order: 1,
        }
    }

    #[test]
    fn test_compose_default_only_orders() {
        let query = ProductQuery::compose(QueryKey::default());
        assert_eq!(query.collection, "products");
        assert_eq!(query.constraints, vec![Constraint::order_by(Field::Order)]);
    }

    #[test]
    fn test_compose_warehouse_appends_equality() {
        let query = ProductQuery::compose(QueryKey::new(
            WarehouseSelector::Only(WarehouseId::Additional),
            false,
        ));
        assert_eq!(
            query.constraints,
            vec![
                Constraint::order_by(Field::Order),
                Constraint::equal(Field::Warehouse, FieldValue::Text("2".to_string())),
            ]
        );
    }

    #[test]
    fn test_compose_low_stock_goes_first() {
        let query = ProductQuery::compose(QueryKey::new(
            WarehouseSelector::Only(WarehouseId::Main),
            true,
        ));
        assert_eq!(
            query.constraints,
            vec![
                Constraint::at_most(Field::Quantity, 5.0),
                Constraint::order_by(Field::Order),
                Constraint::equal(Field::Warehouse, FieldValue::Text("1".to_string())),
            ]
        );
    }

    #[test]
    fn test_constraint_counts_for_every_key() {
        for key in all_keys() {
            let query = ProductQuery::compose(key);
            let ordering = query.constraints.iter().filter(|c| c.is_ordering()).count();
            let equality = query.constraints.iter().filter(|c| c.is_equality()).count();
            let inequality = query
                .constraints
                .iter()
                .filter(|c| c.is_inequality())
                .count();

            assert_eq!(ordering, 1, "{key:?}");
            assert!(equality <= 1, "{key:?}");
            assert!(inequality <= 1, "{key:?}");
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        for key in all_keys() {
            assert_eq!(ProductQuery::compose(key), ProductQuery::compose(key));
        }
    }

    #[test]
    fn test_matches_low_stock_in_warehouse() {
        let query = ProductQuery::compose(QueryKey::new(
            WarehouseSelector::Only(WarehouseId::Additional),
            true,
        ));

        assert!(query.matches(&doc(WarehouseId::Additional, Some(3.0))));
        assert!(query.matches(&doc(WarehouseId::Additional, Some(5.0))));
        assert!(!query.matches(&doc(WarehouseId::Additional, Some(6.0))));
        assert!(!query.matches(&doc(WarehouseId::Main, Some(2.0))));
        assert!(!query.matches(&doc(WarehouseId::Additional, None)));
    }

    #[test]
    fn test_ordering_fields() {
        let query = ProductQuery::compose(QueryKey::new(WarehouseSelector::All, true));
        assert_eq!(query.ordering().collect::<Vec<_>>(), vec![Field::Order]);
        assert_eq!(query.filters().count(), 1);
    }

    #[test]
    fn test_field_display_uses_stored_names() {
        assert_eq!(Field::Warehouse.to_string(), "warehouse");
        assert_eq!(Field::Quantity.to_string(), "quantity");
        assert_eq!(Field::Order.to_string(), "order");
    }
}
