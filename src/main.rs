use anyhow::{Context, Result, anyhow};
use chrono::Local;
use futures::StreamExt;
use pantry_pricing::config::{AppConfig, DEFAULT_CONFIG_PATH};
use pantry_pricing::fetcher::HttpTransport;
use pantry_pricing::models::ProviderId;
use pantry_pricing::pipeline::PriceOrchestrator;
use pantry_pricing::shopping::{InventoryItem, ShoppingPlanner};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let config_path = flag_value(&args, "--config").unwrap_or(DEFAULT_CONFIG_PATH);

    let config = AppConfig::load(config_path).context("Failed to load price resolution configuration")?;
    info!(
        "Loaded configuration from {} (concurrency window {})",
        config_path, config.batch.concurrency
    );

    let transport = Arc::new(HttpTransport::new(config.http.clone()).context("Failed to build HTTP client")?);
    let orchestrator = PriceOrchestrator::from_config(&config, transport);

    if let Some(inventory_path) = flag_value(&args, "--inventory") {
        price_shopping_list(&config, &orchestrator, inventory_path).await
    } else {
        let names = positional_names(&args);
        if names.is_empty() {
            return Err(anyhow!(
                "Usage: pantry-pricing [--config <file>] (--inventory <items.json> | <item name>...)"
            ));
        }
        price_names(&orchestrator, names).await
    }
}

/// Stream one JSON line per item as both providers answer
async fn price_names(orchestrator: &PriceOrchestrator, names: Vec<String>) -> Result<()> {
    info!("🚀 Resolving prices for {} items", names.len());

    let mut stream = orchestrator.resolve_prices(names);
    while let Some(item) = stream.next().await {
        println!("{}", serde_json::to_string(&item)?);
    }

    Ok(())
}

async fn price_shopping_list(config: &AppConfig, orchestrator: &PriceOrchestrator, path: &str) -> Result<()> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read inventory file: {}", path))?;
    let items: Vec<InventoryItem> =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse inventory file: {}", path))?;

    let planner = ShoppingPlanner::new(config.shopping.clone());
    let mut list = planner.plan(&items, Local::now().date_naive());

    let names = list.item_names();
    if names.is_empty() {
        warn!("⚠️ Nothing is low or expiring, shopping list is empty");
    }

    let mut stream = orchestrator.resolve_prices(names);
    while let Some(update) = stream.next().await {
        if list.apply_prices(&update) == 0 {
            warn!("Price update for unknown item: {}", update.name);
        }
    }

    let summary = serde_json::json!({
        "list": list,
        "totals": {
            "ml": list.estimated_total(ProviderId::MercadoLibre),
            "sams": list.estimated_total(ProviderId::Sams),
        }
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("🎉 Shopping list priced: {} main, {} recommended", list.main.len(), list.recommended.len());
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn positional_names(args: &[String]) -> Vec<String> {
    let mut names = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
            continue;
        }
        names.push(arg.clone());
    }
    names
}
