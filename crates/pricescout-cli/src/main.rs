mod report;
mod search;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use pricescout_core::AppConfig;
use pricescout_scraper::AdapterRegistry;
use tracing_subscriber::EnvFilter;

use crate::search::SearchOptions;

#[derive(Debug, Parser)]
#[command(name = "pricescout")]
#[command(about = "Compare product prices across Brazilian marketplaces")]
struct Cli {
    /// Site registry YAML replacing the built-in marketplace list.
    #[arg(long, global = true)]
    sites: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the marketplaces for a product and rank the cheapest offers.
    Search {
        /// Product to search for; prompted on stdin when omitted.
        product: Vec<String>,

        /// Number of offers to keep after ranking.
        #[arg(long, value_parser = parse_positive)]
        top: Option<usize>,

        /// Maximum candidate links taken from the search results.
        #[arg(long, value_parser = parse_positive)]
        max_links: Option<usize>,

        #[arg(long, default_value = "price_comparison.html")]
        html: PathBuf,

        #[arg(long, default_value = "price_comparison.csv")]
        csv: PathBuf,

        /// Print the ranked offers as JSON instead of text lines.
        #[arg(long)]
        json: bool,
    },
    /// List the marketplaces and the price lookup used for each.
    Sites,
}

fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = pricescout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let registry = load_registry(cli.sites.as_deref(), &config)?;

    match command {
        Commands::Search {
            product,
            top,
            max_links,
            html,
            csv,
            json,
        } => {
            let options =
                SearchOptions::from_flags(&config, &product, top, max_links, html, csv, json);
            search::run_search(&config, &registry, options).await?;
        }
        Commands::Sites => print_sites(&registry),
    }

    Ok(())
}

/// Builds the adapter registry from `--sites`, then `PRICESCOUT_SITES_PATH`,
/// then the built-in list.
fn load_registry(sites_path: Option<&Path>, config: &AppConfig) -> anyhow::Result<AdapterRegistry> {
    let sites = match sites_path.or(config.sites_path.as_deref()) {
        Some(path) => pricescout_core::load_sites(path)
            .with_context(|| format!("failed to load site registry {}", path.display()))?,
        None => pricescout_core::default_sites(),
    };
    tracing::debug!(sites = sites.sites.len(), "site registry loaded");
    AdapterRegistry::new(sites).context("invalid site registry")
}

fn print_sites(registry: &AdapterRegistry) {
    for (domain, strategy) in registry.entries() {
        println!(
            "{domain:<24} {:<15} {}",
            strategy.kind(),
            strategy.selectors().join(" | ")
        );
    }
}
