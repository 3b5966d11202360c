//! Grouping of the filtered list into warehouse sections

use serde::Serialize;
use std::collections::HashSet;

use crate::models::{ProductRecord, WarehouseId, WarehouseSelector};
use crate::search::SearchQuery;

pub const ALL_SECTION_TITLE: &str = "Products from all warehouses";
pub const ALL_SECTION_SUBTITLE: &str = "Combined list";

/// A titled group of records; `scope` doubles as the collapse key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub scope: WarehouseSelector,
    pub title: String,
    pub subtitle: String,
    pub count: usize,
    pub collapsed: bool,
    /// Empty while collapsed
    pub records: Vec<ProductRecord>,
}

impl Section {
    fn new(
        scope: WarehouseSelector,
        title: &str,
        subtitle: &str,
        records: Vec<ProductRecord>,
        collapsed: bool,
    ) -> Self {
        Self {
            scope,
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            count: records.len(),
            collapsed,
            records: if collapsed { Vec::new() } else { records },
        }
    }
}

/// Build the combined section followed by the warehouse sections the selector
/// admits, in warehouse order.
pub fn build_sections(
    filtered: &[ProductRecord],
    selected: WarehouseSelector,
    collapsed: &HashSet<WarehouseSelector>,
) -> Vec<Section> {
    let mut sections = Vec::with_capacity(WarehouseId::ALL.len() + 1);

    sections.push(Section::new(
        WarehouseSelector::All,
        ALL_SECTION_TITLE,
        ALL_SECTION_SUBTITLE,
        filtered.to_vec(),
        collapsed.contains(&WarehouseSelector::All),
    ));

    for warehouse in WarehouseId::ALL {
        if !selected.includes(warehouse) {
            continue;
        }
        let scope = WarehouseSelector::Only(warehouse);
        let records = filtered
            .iter()
            .filter(|record| record.warehouse == warehouse)
            .cloned()
            .collect();
        sections.push(Section::new(
            scope,
            warehouse.title(),
            warehouse.subtitle(),
            records,
            collapsed.contains(&scope),
        ));
    }

    sections
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub hint: &'static str,
}

impl EmptyState {
    pub fn for_search(search: &SearchQuery) -> Self {
        let hint = if search.is_empty() {
            "Add your first product"
        } else {
            "Nothing matches your search"
        };
        Self {
            title: "No products",
            hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, warehouse: WarehouseId) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            name: format!("Product {id}"),
            category: None,
            warehouse,
            quantity: Some(1.0),
            average_purchase_price: Some(1.0),
            order: 1,
        }
    }

    fn sample() -> Vec<ProductRecord> {
        vec![
            record("a", WarehouseId::Main),
            record("b", WarehouseId::Reserve),
            record("c", WarehouseId::Main),
        ]
    }

    #[test]
    fn test_all_selector_builds_every_section() {
        let sections = build_sections(&sample(), WarehouseSelector::All, &HashSet::new());

        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![ALL_SECTION_TITLE, "Warehouse 1", "Warehouse 2", "Warehouse 3"]
        );
        let counts: Vec<_> = sections.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![3, 2, 0, 1]);
    }

    #[test]
    fn test_single_warehouse_keeps_combined_section() {
        let selected = WarehouseSelector::Only(WarehouseId::Reserve);
        let sections = build_sections(&sample(), selected, &HashSet::new());

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].scope, WarehouseSelector::All);
        assert_eq!(sections[1].scope, selected);
        assert_eq!(sections[1].subtitle, "Reserve warehouse");
    }

    #[test]
    fn test_collapsed_section_keeps_count_without_rows() {
        let collapsed = HashSet::from([WarehouseSelector::Only(WarehouseId::Main)]);
        let sections = build_sections(&sample(), WarehouseSelector::All, &collapsed);

        let main = &sections[1];
        assert!(main.collapsed);
        assert_eq!(main.count, 2);
        assert!(main.records.is_empty());
        assert!(!sections[0].collapsed);
        assert_eq!(sections[0].records.len(), 3);
    }

    #[test]
    fn test_empty_state_hint_depends_on_search() {
        assert_eq!(
            EmptyState::for_search(&SearchQuery::default()).hint,
            "Add your first product"
        );
        assert_eq!(
            EmptyState::for_search(&SearchQuery::new("bolt")).hint,
            "Nothing matches your search"
        );
    }
}
