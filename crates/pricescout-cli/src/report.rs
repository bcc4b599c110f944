//! Terminal, HTML, and CSV renderings of a ranked offer list.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;
use pricescout_core::{CanonicalPrice, Offer};
use pricescout_scraper::{best_price, is_best};

const STYLE: &str = "table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:4px 10px}\
td.price{text-align:right}\
tr.best{background:#d9f7d9;font-weight:bold}";

/// `site: R$ 1234.56 | link`
pub(crate) fn terminal_line(offer: &Offer) -> String {
    format!("{}: R$ {} | {}", offer.domain, offer.price, offer.source_url)
}

/// Brazilian currency formatting: `R$ 1.234,56`.
pub(crate) fn format_brl(price: CanonicalPrice) -> String {
    // CanonicalPrice is finite and non-negative.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = (price.value() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("R$ {grouped},{:02}", cents % 100)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the comparison table. Every offer at the minimum price gets
/// `class="best"`; an empty list renders a "No results found" page.
pub(crate) fn render_html(offers: &[Offer], product: &str, generated_at: NaiveDateTime) -> String {
    let product = escape_html(product);
    let timestamp = generated_at.format("%Y-%m-%d %H:%M:%S");

    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Price comparison: {product}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"
    );

    if offers.is_empty() {
        let _ = write!(
            html,
            "<h2>No results found</h2>\n<p>Search: {product}</p>\n<p>Generated {timestamp}</p>\n"
        );
    } else {
        let best = best_price(offers);
        let _ = write!(
            html,
            "<h2>Price comparison: {product}</h2>\n<p>Generated {timestamp}</p>\n<table>\n\
             <thead><tr><th>Site</th><th>Price</th><th>Link</th></tr></thead>\n<tbody>\n"
        );
        for offer in offers {
            let class = if is_best(offer, best) { " class=\"best\"" } else { "" };
            let _ = writeln!(
                html,
                "<tr{class}><td>{}</td><td class=\"price\">{}</td>\
                 <td><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Open</a></td></tr>",
                escape_html(offer.domain.as_str()),
                format_brl(offer.price),
                escape_html(&offer.source_url),
            );
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Writes the HTML report, including the empty-result page.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub(crate) fn write_html(
    path: &Path,
    offers: &[Offer],
    product: &str,
    generated_at: NaiveDateTime,
) -> anyhow::Result<()> {
    std::fs::write(path, render_html(offers, product, generated_at))
        .with_context(|| format!("failed to write HTML report {}", path.display()))
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}

/// `site,link,price` rows with CRLF line endings.
pub(crate) fn render_csv(offers: &[Offer]) -> String {
    let mut csv = String::from("site,link,price\r\n");
    for offer in offers {
        let _ = write!(
            csv,
            "{},{},{}\r\n",
            csv_field(offer.domain.as_str()),
            csv_field(&offer.source_url),
            offer.price
        );
    }
    csv
}

/// Writes the CSV report. Returns `false` without touching the file when
/// there is nothing to export.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub(crate) fn write_csv(path: &Path, offers: &[Offer]) -> anyhow::Result<bool> {
    if offers.is_empty() {
        return Ok(false);
    }
    std::fs::write(path, render_csv(offers))
        .with_context(|| format!("failed to write CSV report {}", path.display()))?;
    Ok(true)
}
