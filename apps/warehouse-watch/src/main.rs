//! Warehouse Watch
//!
//! Terminal front-end for the inventory screen. Opens a live query against
//! MongoDB (or a seeded in-memory store with `--memory`), prints the screen
//! after every update and reads line commands from stdin.

use std::sync::Arc;

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{connect_from_config_with_retry, ensure_change_streams};
use domain_warehouse::{
    FilterState, InMemoryProductStore, MongoWarehouseStore, NavigationTarget, Navigator,
    ProductStore, TracingNotifier, TransactionLog, WarehouseScreen, WarehouseSelector,
};
use eyre::{Result, WrapErr};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod commands;
mod config;
mod demo;
mod render;

use commands::{Command, HELP};
use config::Config;

#[derive(Parser)]
#[command(name = "warehouse-watch")]
#[command(about = "Watch warehouse stock live and manage products from the terminal")]
struct Cli {
    /// Warehouse to show: all, 1, 2 or 3
    #[arg(short, long, default_value = "all")]
    warehouse: WarehouseSelector,

    /// Only products with quantity of 5 or less
    #[arg(short, long)]
    low_stock: bool,

    /// Initial client-side search text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Print each view as a JSON line instead of text
    #[arg(long)]
    json: bool,

    /// Use a seeded in-memory store instead of MongoDB
    #[arg(long)]
    memory: bool,
}

/// Navigation has no router here; the intent is printed
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, target: NavigationTarget) {
        info!(route = target.route(), "Navigation requested");
        println!("-> {}", target.route());
    }
}

async fn open_stores(
    cli: &Cli,
    config: &Config,
) -> Result<(Arc<dyn ProductStore>, Arc<dyn TransactionLog>)> {
    if cli.memory {
        let store = Arc::new(InMemoryProductStore::new());
        demo::seed(&store).await;
        info!("Using seeded in-memory store");
        let products: Arc<dyn ProductStore> = store.clone();
        let transactions: Arc<dyn TransactionLog> = store;
        return Ok((products, transactions));
    }

    let mongo = config.mongo()?;
    let client = connect_from_config_with_retry(&mongo, Some(config.retry.clone()))
        .await
        .wrap_err("MongoDB connection failed")?;

    match ensure_change_streams(&client).await {
        Ok(topology) => info!(%topology, "Change streams available"),
        Err(e) => warn!(error = %e, "Live updates will fail on this deployment"),
    }

    let db = client.database(mongo.database());
    let store = Arc::new(MongoWarehouseStore::with_collections(
        &db,
        &config.warehouse.products_collection,
        &config.warehouse.transactions_collection,
    ));
    store
        .init_indexes()
        .await
        .wrap_err("Failed to create indexes")?;

    let products: Arc<dyn ProductStore> = store.clone();
    let transactions: Arc<dyn TransactionLog> = store;
    Ok((products, transactions))
}

fn print_view(screen: &WarehouseScreen, json: bool) -> Result<()> {
    let view = screen.view();
    if json {
        println!("{}", serde_json::to_string(&view)?);
    } else {
        print!("{}", render::render(&view));
    }
    Ok(())
}

/// Apply one command; returns `false` to quit
async fn execute(screen: &mut WarehouseScreen, command: Command) -> bool {
    match command {
        Command::Warehouse(selector) => screen.set_warehouse(selector),
        Command::LowStock(on) => screen.set_low_stock(on),
        Command::Search(text) => screen.set_search(text),
        Command::Collapse(scope) => screen.toggle_section(scope),
        Command::Menu(id, position) => {
            if !screen.open_context_menu(&id, position) {
                println!("no product '{id}' in the current list");
            }
        }
        Command::Details(id) => {
            if !screen.open_details(&id) {
                println!("no product '{id}' in the current list");
            }
        }
        Command::History(id) => {
            screen.view_history(&id).await;
        }
        Command::QrCode(id) => {
            screen.view_qr_code(&id);
        }
        Command::Add => {
            if !screen.begin_add() {
                println!("close the open view first");
            }
        }
        Command::Action(action) => {
            screen.context_action(action).await;
        }
        Command::Save(draft) => {
            screen.save(draft).await;
        }
        Command::Close => screen.close(),
        Command::Go(target) => screen.navigate(target),
        Command::Reload => screen.reload(),
        Command::View => {}
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let cli = Cli::parse();
    let (store, transactions) = open_stores(&cli, &config).await?;

    let filter = FilterState {
        warehouse: cli.warehouse,
        low_stock: cli.low_stock,
        search: cli.search.clone(),
    };
    let mut screen = WarehouseScreen::new(
        store,
        transactions,
        Arc::new(TracingNotifier),
        Arc::new(PrintNavigator),
    )
    .with_filter(filter)
    .with_products_collection(config.warehouse.products_collection.clone());

    screen.start();
    print_view(&screen, cli.json)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            update = screen.next_update() => {
                if update.is_none() {
                    break;
                }
                screen.drain_updates();
                print_view(&screen, cli.json)?;
            }
            line = lines.next_line() => {
                let Some(line) = line.wrap_err("Failed to read stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(command) => {
                        if !execute(&mut screen, command).await {
                            break;
                        }
                        print_view(&screen, cli.json)?;
                    }
                    Err(e) => println!("{e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Shutting down");
    Ok(())
}
