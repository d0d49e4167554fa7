//! hydro — discover compute processes and hydrate them to a verified
//! checkpoint across their serving nodes.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, info};

use hydrosync_coordinator::{
    CategorySummary, Coordinator, HttpNodeClient, HydrationPolicy, SchedulerClient,
};
use hydrosync_core::{Catalog, CategoryFilter, SyncConfig};
use hydrosync_discovery::{DiscoveryCache, GatewayClient, discover_with_cache};
use hydrosync_registry::{ErrorLedger, HydrationRegistry};

#[derive(Parser)]
#[command(
    name = "hydro",
    about = "Hydrosync — process discovery and hydration synchronizer",
    version
)]
struct Cli {
    /// Category keys to process, comma- or space-delimited.
    #[arg(value_delimiter = ',')]
    categories: Vec<String>,

    /// Path to the configuration file.
    #[arg(short, long, default_value = "hydro.toml")]
    config: PathBuf,

    /// Override the configured state directory.
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let keys = split_keys(&cli.categories);
    if keys.is_empty() {
        bail!("no category keys supplied");
    }

    let config = SyncConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let state_dir = cli.state_dir.unwrap_or_else(|| config.state_dir.clone());
    std::fs::create_dir_all(&state_dir)
        .with_context(|| format!("failed to create state dir {}", state_dir.display()))?;

    let catalog = Catalog::from_config(&config);

    // Validate every key up front: one unknown key aborts the whole
    // invocation before any network traffic.
    let mut selected: Vec<(String, CategoryFilter)> = Vec::new();
    for key in &keys {
        let filter = catalog.resolve(key)?;
        selected.push((key.clone(), filter.clone()));
    }

    let gateway = GatewayClient::new(&config.gateway.url);
    let cache = DiscoveryCache::new(&state_dir);
    let coordinator = Coordinator::new(
        HttpNodeClient::new(),
        SchedulerClient::new(&config.scheduler.url),
        HydrationPolicy::default(),
    );

    // Strictly sequential, in invocation order. A failed category is
    // reported and the remaining categories still run.
    for (key, filter) in &selected {
        info!(category = %key, "processing category");
        match run_category(&coordinator, &gateway, &cache, &state_dir, key, filter).await {
            Ok(summary) => {
                println!(
                    "{key}: {} candidates, {} skipped, {} hydrated, {} failed",
                    summary.total, summary.skipped, summary.succeeded, summary.failed
                );
            }
            Err(e) => {
                error!(category = %key, error = %e, "category aborted");
                println!("{key}: aborted ({e})");
            }
        }
    }

    Ok(())
}

async fn run_category(
    coordinator: &Coordinator<HttpNodeClient, SchedulerClient>,
    gateway: &GatewayClient,
    cache: &DiscoveryCache,
    state_dir: &Path,
    key: &str,
    filter: &CategoryFilter,
) -> anyhow::Result<CategorySummary> {
    let records = discover_with_cache(gateway, cache, key, filter).await?;
    let mut registry = HydrationRegistry::load(state_dir, key)?;
    let mut ledger = ErrorLedger::load(state_dir, key)?;
    let summary = coordinator
        .run_category(key, filter, &records, &mut registry, &mut ledger)
        .await?;
    Ok(summary)
}

/// Normalize the positional arguments into category keys.
///
/// clap already splits on commas; this additionally splits keys that arrive
/// space-delimited inside a single (quoted) argument and drops empties.
fn split_keys(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split([',', ' ']))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
