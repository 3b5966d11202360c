use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Screens reachable from the inventory header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NavigationTarget {
    RecordIncome,
    RecordExpense,
    Documents,
}

impl NavigationTarget {
    pub fn route(&self) -> &'static str {
        match self {
            NavigationTarget::RecordIncome => "/warehouse/income/new",
            NavigationTarget::RecordExpense => "/warehouse/expense/new",
            NavigationTarget::Documents => "/warehouse/documents",
        }
    }
}

/// Receives navigation intents; routing itself happens elsewhere
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: NavigationTarget);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        assert_eq!(
            NavigationTarget::RecordIncome.route(),
            "/warehouse/income/new"
        );
        assert_eq!(
            NavigationTarget::RecordExpense.route(),
            "/warehouse/expense/new"
        );
        assert_eq!(NavigationTarget::Documents.route(), "/warehouse/documents");
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(
            "record_income".parse::<NavigationTarget>().unwrap(),
            NavigationTarget::RecordIncome
        );
        assert!("checkout".parse::<NavigationTarget>().is_err());
    }
}
