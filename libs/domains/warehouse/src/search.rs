//! Client-side text search over the live record list

use crate::models::ProductRecord;

/// Case-insensitive substring search over product name and category
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// An empty query matches every record
    pub fn matches(&self, record: &ProductRecord) -> bool {
        record.name.to_lowercase().contains(&self.needle)
            || record
                .category
                .as_deref()
                .is_some_and(|category| category.to_lowercase().contains(&self.needle))
    }

    /// Records matching the query, in their original order
    pub fn filter(&self, records: &[ProductRecord]) -> Vec<ProductRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WarehouseId;

    fn record(id: &str, name: &str, category: Option<&str>) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            name: name.to_string(),
            category: category.map(str::to_string),
            warehouse: WarehouseId::Main,
            quantity: Some(1.0),
            average_purchase_price: Some(1.0),
            order: 1,
        }
    }

    fn catalog() -> Vec<ProductRecord> {
        vec![
            record("1", "Steel Bolt", Some("fasteners")),
            record("2", "Washer", Some("general")),
            record("3", "Hex Nut", None),
        ]
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        let query = SearchQuery::new("bolt");
        let records = catalog();

        assert!(query.matches(&records[0]));
        assert!(!query.matches(&records[1]));
    }

    #[test]
    fn test_matches_category() {
        let query = SearchQuery::new("GENERAL");
        let ids: Vec<_> = query
            .filter(&catalog())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn test_missing_category_only_checks_name() {
        let query = SearchQuery::new("fasten");
        let records = catalog();
        assert!(query.matches(&records[0]));
        assert!(!query.matches(&records[2]));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = SearchQuery::new("");
        assert!(query.is_empty());
        assert_eq!(query.filter(&catalog()).len(), 3);
    }

    #[test]
    fn test_filter_is_idempotent() {
        for text in ["", "bolt", "e", "nothing"] {
            let query = SearchQuery::new(text);
            let once = query.filter(&catalog());
            let twice = query.filter(&once);
            assert_eq!(once, twice, "query {text:?}");
        }
    }
}
