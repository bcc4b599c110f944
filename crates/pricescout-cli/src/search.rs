//! The `search` command: discover → collect → rank → report.
//!
//! Per-URL failures never abort the run. A Ctrl-C during collection stops
//! loading pages and reports whatever was collected so far.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use pricescout_core::{AppConfig, Offer};
use pricescout_scraper::{
    rank, AdapterRegistry, DuckDuckGoDiscovery, HttpPageLoader, LinkDiscovery, PageLoader,
    PriceCollector,
};

use crate::report;

#[derive(Debug)]
pub(crate) struct SearchOptions {
    pub product: Option<String>,
    pub top_n: usize,
    pub max_links: usize,
    pub html_path: PathBuf,
    pub csv_path: PathBuf,
    pub json: bool,
}

impl SearchOptions {
    /// Command-line flags win over `config`.
    pub(crate) fn from_flags(
        config: &AppConfig,
        product: &[String],
        top: Option<usize>,
        max_links: Option<usize>,
        html_path: PathBuf,
        csv_path: PathBuf,
        json: bool,
    ) -> Self {
        Self {
            product: (!product.is_empty()).then(|| product.join(" ")),
            top_n: top.unwrap_or(config.top_n),
            max_links: max_links.unwrap_or(config.max_links),
            html_path,
            csv_path,
            json,
        }
    }
}

/// Runs one product search end to end against the live web.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, the HTTP clients cannot be
/// built, the search request itself fails, or a report cannot be written.
/// Individual product pages that fail are logged and skipped.
pub(crate) async fn run_search(
    config: &AppConfig,
    registry: &AdapterRegistry,
    options: SearchOptions,
) -> anyhow::Result<()> {
    let product = match &options.product {
        Some(product) => product.trim().to_owned(),
        None => prompt_product().context("failed to read product from stdin")?,
    };
    if product.is_empty() {
        println!("empty product, aborting");
        return Ok(());
    }

    let discovery = DuckDuckGoDiscovery::from_config(config, registry.classifier())
        .context("failed to build search client")?;
    let loader = HttpPageLoader::from_config(config).context("failed to build page loader")?;

    search_and_report(
        &discovery,
        &loader,
        registry,
        &product,
        &options,
        &mut io::stdout(),
    )
    .await?;
    Ok(())
}

/// Discovers, collects, ranks, prints to `out`, and writes the file
/// reports. Returns the ranked offers.
///
/// With `options.json` set, `out` receives only the JSON array; report
/// notices go to the log instead.
pub(crate) async fn search_and_report<D, L, W>(
    discovery: &D,
    loader: &L,
    registry: &AdapterRegistry,
    product: &str,
    options: &SearchOptions,
    out: &mut W,
) -> anyhow::Result<Vec<Offer>>
where
    D: LinkDiscovery,
    L: PageLoader,
    W: Write,
{
    let urls = discovery
        .discover(product, options.max_links)
        .await
        .with_context(|| format!("search for \"{product}\" failed"))?;
    tracing::info!(product, candidates = urls.len(), "candidate links discovered");

    let collector = PriceCollector::new(loader, registry);
    let mut offers = Vec::new();
    let interrupted = tokio::select! {
        _ = collector.collect_into(&urls, &mut offers) => false,
        () = ctrl_c() => true,
    };
    if interrupted {
        tracing::warn!(
            collected = offers.len(),
            "interrupted, reporting partial results"
        );
    }

    let ranked = rank(offers, options.top_n);

    if options.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&ranked)?)?;
    } else if ranked.is_empty() {
        writeln!(out, "no prices found")?;
    } else {
        for offer in &ranked {
            writeln!(out, "{}", report::terminal_line(offer))?;
        }
    }

    let generated_at = chrono::Local::now().naive_local();
    report::write_html(&options.html_path, &ranked, product, generated_at)?;
    let html_notice = format!("HTML report saved to {}", options.html_path.display());
    notify(out, options.json, &html_notice)?;

    if report::write_csv(&options.csv_path, &ranked)? {
        let csv_notice = format!("CSV report saved to {}", options.csv_path.display());
        notify(out, options.json, &csv_notice)?;
    } else {
        notify(out, options.json, "no results to export as CSV")?;
    }

    Ok(ranked)
}

/// Keeps stdout machine-readable in JSON mode.
fn notify<W: Write>(out: &mut W, json: bool, message: &str) -> io::Result<()> {
    if json {
        tracing::info!("{message}");
        Ok(())
    } else {
        writeln!(out, "{message}")
    }
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed the run
/// simply cannot be interrupted.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn prompt_product() -> io::Result<String> {
    print!("Product to search: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
