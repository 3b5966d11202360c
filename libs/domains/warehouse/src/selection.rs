//! Selection and view-mode state machine
//!
//! At most one record is active at a time, and the active record always comes
//! with exactly one view mode. Entering a mode replaces whatever was open
//! before; closing returns to `Idle` and forgets the record.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::models::{ProductRecord, StockTransaction};

/// Cursor position the context menu was requested at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuPosition {
    pub x: i32,
    pub y: i32,
}

impl MenuPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Discriminant of [`Selection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewMode {
    Idle,
    ContextMenu,
    Details,
    History,
    QrCode,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    Idle,
    ContextMenu {
        record: ProductRecord,
        position: MenuPosition,
    },
    Details {
        record: ProductRecord,
    },
    History {
        record: ProductRecord,
        transactions: Vec<StockTransaction>,
    },
    QrCode {
        record: ProductRecord,
    },
    /// Add form when `record` is `None`, edit form otherwise
    Editor {
        record: Option<ProductRecord>,
    },
}

impl Selection {
    pub fn mode(&self) -> ViewMode {
        match self {
            Selection::Idle => ViewMode::Idle,
            Selection::ContextMenu { .. } => ViewMode::ContextMenu,
            Selection::Details { .. } => ViewMode::Details,
            Selection::History { .. } => ViewMode::History,
            Selection::QrCode { .. } => ViewMode::QrCode,
            Selection::Editor { .. } => ViewMode::Editor,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }

    pub fn active_record(&self) -> Option<&ProductRecord> {
        match self {
            Selection::Idle => None,
            Selection::ContextMenu { record, .. }
            | Selection::Details { record }
            | Selection::History { record, .. }
            | Selection::QrCode { record } => Some(record),
            Selection::Editor { record } => record.as_ref(),
        }
    }

    /// History and QR views open from the list, with or without the menu shown
    pub fn accepts_list_action(&self) -> bool {
        matches!(self, Selection::Idle | Selection::ContextMenu { .. })
    }

    /// Allowed from any state
    pub fn open_context_menu(&mut self, record: ProductRecord, position: MenuPosition) {
        *self = Selection::ContextMenu { record, position };
    }

    /// Allowed from any state
    pub fn open_details(&mut self, record: ProductRecord) {
        *self = Selection::Details { record };
    }

    pub fn open_history(
        &mut self,
        record: ProductRecord,
        transactions: Vec<StockTransaction>,
    ) -> bool {
        if !self.accepts_list_action() {
            return false;
        }
        *self = Selection::History {
            record,
            transactions,
        };
        true
    }

    pub fn open_qr_code(&mut self, record: ProductRecord) -> bool {
        if !self.accepts_list_action() {
            return false;
        }
        *self = Selection::QrCode { record };
        true
    }

    /// Open the empty add form; only from `Idle`
    pub fn begin_add(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Selection::Editor { record: None };
        true
    }

    /// Open the edit form for the record the context menu was opened on
    pub fn begin_edit(&mut self) -> bool {
        let Selection::ContextMenu { record, .. } = self else {
            return false;
        };
        let record = record.clone();
        *self = Selection::Editor {
            record: Some(record),
        };
        true
    }

    pub fn close(&mut self) {
        *self = Selection::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WarehouseId;

    fn record(id: &str) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            name: format!("Product {id}"),
            category: None,
            warehouse: WarehouseId::Main,
            quantity: Some(1.0),
            average_purchase_price: Some(1.0),
            order: 1,
        }
    }

    fn every_state() -> Vec<Selection> {
        vec![
            Selection::Idle,
            Selection::ContextMenu {
                record: record("a"),
                position: MenuPosition::new(10, 20),
            },
            Selection::Details {
                record: record("a"),
            },
            Selection::History {
                record: record("a"),
                transactions: Vec::new(),
            },
            Selection::QrCode {
                record: record("a"),
            },
            Selection::Editor { record: None },
            Selection::Editor {
                record: Some(record("a")),
            },
        ]
    }

    #[test]
    fn test_initial_state_is_idle() {
        let selection = Selection::default();
        assert!(selection.is_idle());
        assert_eq!(selection.mode(), ViewMode::Idle);
        assert!(selection.active_record().is_none());
    }

    #[test]
    fn test_close_from_any_state_is_idle() {
        for mut selection in every_state() {
            selection.close();
            assert_eq!(selection, Selection::Idle);
            assert!(selection.active_record().is_none());
        }
    }

    #[test]
    fn test_context_menu_from_any_state() {
        for mut selection in every_state() {
            selection.open_context_menu(record("b"), MenuPosition::new(3, 4));
            assert_eq!(selection.mode(), ViewMode::ContextMenu);
            assert_eq!(selection.active_record().unwrap().id, "b");
        }
    }

    #[test]
    fn test_details_from_any_state() {
        for mut selection in every_state() {
            selection.open_details(record("b"));
            assert_eq!(selection.mode(), ViewMode::Details);
            assert_eq!(selection.active_record().unwrap().id, "b");
        }
    }

    #[test]
    fn test_history_and_qr_only_from_list() {
        for selection in every_state() {
            let allowed = selection.accepts_list_action();

            let mut history = selection.clone();
            assert_eq!(history.open_history(record("b"), Vec::new()), allowed);

            let mut qr = selection.clone();
            assert_eq!(qr.open_qr_code(record("b")), allowed);

            if !allowed {
                assert_eq!(history, selection);
                assert_eq!(qr, selection);
            }
        }
    }

    #[test]
    fn test_begin_add_only_from_idle() {
        let mut selection = Selection::Idle;
        assert!(selection.begin_add());
        assert_eq!(selection, Selection::Editor { record: None });

        let mut details = Selection::Details {
            record: record("a"),
        };
        assert!(!details.begin_add());
        assert_eq!(details.mode(), ViewMode::Details);
    }

    #[test]
    fn test_begin_edit_takes_menu_record() {
        let mut selection = Selection::Idle;
        assert!(!selection.begin_edit());

        selection.open_context_menu(record("a"), MenuPosition::default());
        assert!(selection.begin_edit());
        assert_eq!(selection.mode(), ViewMode::Editor);
        assert_eq!(selection.active_record().unwrap().id, "a");
    }

    #[test]
    fn test_selection_serializes_with_mode_tag() {
        let selection = Selection::QrCode {
            record: record("a"),
        };
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["mode"], "qr_code");
        assert_eq!(json["record"]["id"], "a");
    }
}
