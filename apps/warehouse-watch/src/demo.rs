//! Sample data for running without a database (`--memory`)

use chrono::{Duration, Utc};
use domain_warehouse::{
    InMemoryProductStore, ProductDocument, StockTransaction, TransactionKind, WarehouseId,
};

struct Sample {
    id: &'static str,
    name: &'static str,
    category: Option<&'static str>,
    warehouse: WarehouseId,
    quantity: f64,
    price: f64,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "p-001",
        name: "Steel Bolt M8",
        category: Some("fasteners"),
        warehouse: WarehouseId::Main,
        quantity: 240.0,
        price: 0.35,
    },
    Sample {
        id: "p-002",
        name: "Washer 8mm",
        category: Some("fasteners"),
        warehouse: WarehouseId::Main,
        quantity: 4.0,
        price: 0.05,
    },
    Sample {
        id: "p-003",
        name: "Hex Nut M8",
        category: None,
        warehouse: WarehouseId::Additional,
        quantity: 3.0,
        price: 0.12,
    },
    Sample {
        id: "p-004",
        name: "Cable Tie 200mm",
        category: Some("general"),
        warehouse: WarehouseId::Additional,
        quantity: 1200.0,
        price: 0.02,
    },
    Sample {
        id: "p-005",
        name: "Angle Grinder Disc",
        category: Some("abrasives"),
        warehouse: WarehouseId::Reserve,
        quantity: 0.0,
        price: 2.40,
    },
];

pub async fn seed(store: &InMemoryProductStore) {
    for (index, sample) in SAMPLES.iter().enumerate() {
        store
            .put(
                sample.id,
                ProductDocument {
                    name: sample.name.to_string(),
                    category: sample.category.map(str::to_string),
                    warehouse: sample.warehouse,
                    quantity: Some(sample.quantity),
                    average_purchase_price: Some(sample.price),
                    order: index as i64 + 1,
                },
            )
            .await;
    }

    let now = Utc::now();
    let movements = [
        ("p-001", TransactionKind::Income, 300.0, Some(0.34), 9, Some("IN-0041")),
        ("p-001", TransactionKind::Expense, 60.0, None, 2, Some("EX-0107")),
        ("p-002", TransactionKind::Income, 50.0, Some(0.05), 20, Some("IN-0033")),
        ("p-002", TransactionKind::Expense, 46.0, None, 1, None),
        ("p-003", TransactionKind::Move, 3.0, None, 4, None),
    ];
    for (index, (product_id, kind, quantity, price, days_ago, document)) in
        movements.into_iter().enumerate()
    {
        store
            .record_transaction(StockTransaction {
                id: format!("t-{:03}", index + 1),
                product_id: product_id.to_string(),
                kind,
                quantity,
                price,
                date: now - Duration::days(days_ago),
                document: document.map(str::to_string),
            })
            .await;
    }
}
