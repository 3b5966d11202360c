//! Plain-text rendering of the screen view

use std::fmt::Write;

use domain_warehouse::{ProductRecord, ScreenView, Selection, StockTransaction};

fn amount(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn row(record: &ProductRecord) -> String {
    let category = record
        .category
        .as_deref()
        .map(|c| format!(" [{c}]"))
        .unwrap_or_default();
    format!(
        "  {:>3}. {}{}  qty {}  avg {}  value {:.2}  ({})",
        record.order,
        record.name,
        category,
        amount(record.quantity),
        amount(record.average_purchase_price),
        record.stock_value(),
        record.id,
    )
}

fn transaction(entry: &StockTransaction) -> String {
    let document = entry
        .document
        .as_deref()
        .map(|d| format!("  doc {d}"))
        .unwrap_or_default();
    format!(
        "    {}  {:<7} {:>8.2} @ {}{}",
        entry.date.format("%Y-%m-%d %H:%M"),
        entry.kind,
        entry.quantity,
        amount(entry.price),
        document
    )
}

fn selection(out: &mut String, selection: &Selection) {
    match selection {
        Selection::Idle => {}
        Selection::ContextMenu { record, position } => {
            let _ = writeln!(
                out,
                "> menu for {} at ({}, {}): edit | delete | move <1|2|3>",
                record.name, position.x, position.y
            );
        }
        Selection::Details { record } => {
            let _ = writeln!(out, "> details\n{}", row(record));
        }
        Selection::History {
            record,
            transactions,
        } => {
            let _ = writeln!(
                out,
                "> history of {} ({} entries)",
                record.name,
                transactions.len()
            );
            for entry in transactions {
                let _ = writeln!(out, "{}", transaction(entry));
            }
        }
        Selection::QrCode { record } => {
            let _ = writeln!(out, "> QR code payload: {}", record.id);
        }
        Selection::Editor { record: None } => {
            let usage = "save <wh> <qty> <price> <name> [/ category]";
            let _ = writeln!(out, "> new product: {usage}");
        }
        Selection::Editor {
            record: Some(record),
        } => {
            let _ = writeln!(
                out,
                "> editing {}: save <wh> <qty> <price> <name> [/ category]",
                record.name
            );
        }
    }
}

pub fn render(view: &ScreenView) -> String {
    let mut out = String::new();

    let search = if view.filter.search.is_empty() {
        String::new()
    } else {
        format!("  search \"{}\"", view.filter.search)
    };
    let _ = writeln!(
        out,
        "== warehouse {}  low stock {}{}  total {:.2}",
        view.filter.warehouse,
        if view.filter.low_stock { "on" } else { "off" },
        search,
        view.total_value
    );

    if view.loading {
        let _ = writeln!(out, "loading...");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error} (type 'reload' to retry)");
    }

    if let Some(empty) = &view.empty {
        let _ = writeln!(out, "{}: {}", empty.title, empty.hint);
    } else {
        for section in &view.sections {
            let marker = if section.collapsed { "+" } else { "-" };
            let _ = writeln!(
                out,
                "{marker} {} / {} ({})",
                section.title, section.subtitle, section.count
            );
            for record in &section.records {
                let _ = writeln!(out, "{}", row(record));
            }
        }
    }

    selection(&mut out, &view.selection);
    out
}
