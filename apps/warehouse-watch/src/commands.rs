//! Line commands read from stdin

use domain_warehouse::{
    MenuAction, MenuPosition, NavigationTarget, ProductDraft, WarehouseId, WarehouseSelector,
};
use eyre::{Result, bail, eyre};

pub const HELP: &str = "\
commands:
  wh <all|1|2|3>              select warehouse
  low <on|off>                toggle low-stock filter
  search [text]               client-side search (empty clears)
  collapse <all|1|2|3>        collapse/expand a section
  menu <id> [x y]             open context menu
  details <id>                open details
  history <id>                show transaction history
  qr <id>                     show QR code
  add                         open the add form
  edit | delete | move <1|2|3>  context menu actions
  save <wh> <qty> <price> <name> [/ category]
  close                       close the open view
  go <income|expense|documents>
  reload | view | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Warehouse(WarehouseSelector),
    LowStock(bool),
    Search(String),
    Collapse(WarehouseSelector),
    Menu(String, MenuPosition),
    Details(String),
    History(String),
    QrCode(String),
    Add,
    Action(MenuAction),
    Save(ProductDraft),
    Close,
    Go(NavigationTarget),
    Reload,
    View,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word {
            "wh" => Command::Warehouse(selector(rest)?),
            "low" => Command::LowStock(switch(rest)?),
            "search" => Command::Search(rest.to_string()),
            "collapse" => Command::Collapse(selector(rest)?),
            "menu" => menu(rest)?,
            "details" => Command::Details(id(rest)?),
            "history" => Command::History(id(rest)?),
            "qr" => Command::QrCode(id(rest)?),
            "add" => Command::Add,
            "edit" => Command::Action(MenuAction::Edit),
            "delete" => Command::Action(MenuAction::Delete),
            "move" => Command::Action(MenuAction::Move(warehouse(rest)?)),
            "save" => Command::Save(draft(rest)?),
            "close" => Command::Close,
            "go" => Command::Go(target(rest)?),
            "reload" => Command::Reload,
            "view" | "" => Command::View,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("unknown command '{other}', try 'help'"),
        };
        Ok(command)
    }
}

fn selector(arg: &str) -> Result<WarehouseSelector> {
    arg.parse::<WarehouseSelector>().map_err(|e| eyre!(e))
}

fn warehouse(arg: &str) -> Result<WarehouseId> {
    arg.parse::<WarehouseId>()
        .map_err(|_| eyre!("unknown warehouse '{arg}', expected 1, 2 or 3"))
}

fn switch(arg: &str) -> Result<bool> {
    match arg {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => bail!("expected on or off, got '{arg}'"),
    }
}

fn id(arg: &str) -> Result<String> {
    match arg.split_whitespace().next() {
        Some(id) => Ok(id.to_string()),
        None => bail!("missing product id"),
    }
}

fn menu(rest: &str) -> Result<Command> {
    let mut parts = rest.split_whitespace();
    let id = id(parts.next().unwrap_or_default())?;
    let position = match (parts.next(), parts.next()) {
        (Some(x), Some(y)) => MenuPosition::new(x.parse()?, y.parse()?),
        _ => MenuPosition::default(),
    };
    Ok(Command::Menu(id, position))
}

fn target(arg: &str) -> Result<NavigationTarget> {
    Ok(match arg {
        "income" => NavigationTarget::RecordIncome,
        "expense" => NavigationTarget::RecordExpense,
        "documents" | "docs" => NavigationTarget::Documents,
        _ => bail!("unknown destination '{arg}'"),
    })
}

/// `<wh> <qty> <price> <name> [/ category]`
fn draft(rest: &str) -> Result<ProductDraft> {
    let (fields, category) = match rest.split_once('/') {
        Some((fields, category)) => (fields, Some(category.trim())),
        None => (rest, None),
    };

    let mut parts = fields.split_whitespace();
    let (Some(wh), Some(quantity), Some(price)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("usage: save <wh> <qty> <price> <name> [/ category]");
    };
    let name = parts.collect::<Vec<_>>().join(" ");

    let mut draft =
        ProductDraft::new(name, warehouse(wh)?).with_stock(quantity.parse()?, price.parse()?);
    if let Some(category) = category.filter(|c| !c.is_empty()) {
        draft = draft.with_category(category);
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filters() {
        assert_eq!(
            Command::parse("wh 2").unwrap(),
            Command::Warehouse(WarehouseSelector::Only(WarehouseId::Additional))
        );
        assert_eq!(Command::parse("low on").unwrap(), Command::LowStock(true));
        assert_eq!(
            Command::parse("search steel bolt").unwrap(),
            Command::Search("steel bolt".to_string())
        );
        assert_eq!(
            Command::parse("search").unwrap(),
            Command::Search(String::new())
        );
    }

    #[test]
    fn test_parse_menu_with_position() {
        assert_eq!(
            Command::parse("menu p1 120 48").unwrap(),
            Command::Menu("p1".to_string(), MenuPosition::new(120, 48))
        );
        assert_eq!(
            Command::parse("menu p1").unwrap(),
            Command::Menu("p1".to_string(), MenuPosition::default())
        );
        assert!(Command::parse("menu").is_err());
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            Command::parse("move 3").unwrap(),
            Command::Action(MenuAction::Move(WarehouseId::Reserve))
        );
        assert!(Command::parse("move 4").is_err());
        assert_eq!(
            Command::parse("go docs").unwrap(),
            Command::Go(NavigationTarget::Documents)
        );
    }

    #[test]
    fn test_parse_save() {
        let command = Command::parse("save 1 12 2.5 Steel Bolt M8 / fasteners").unwrap();
        let Command::Save(draft) = command else {
            panic!("expected save");
        };
        assert_eq!(draft.name, "Steel Bolt M8");
        assert_eq!(draft.warehouse, WarehouseId::Main);
        assert_eq!(draft.quantity, 12.0);
        assert_eq!(draft.average_purchase_price, 2.5);
        assert_eq!(draft.category.as_deref(), Some("fasteners"));
    }

    #[test]
    fn test_parse_save_requires_numbers() {
        assert!(Command::parse("save 1 many 2.5 Bolt").is_err());
        assert!(Command::parse("save 1 2").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::parse("explode").unwrap_err();
        assert!(err.to_string().contains("explode"));
    }
}
