//! Marketplace registry configuration.
//!
//! The ordered site list doubles as the known-domain list: classification
//! walks it first-match-wins, and each entry names the price extraction
//! strategy for that marketplace's product pages.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a marketplace's product page exposes its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceStrategy {
    /// Integer part and cents live in separate elements; missing cents
    /// default to `"00"`.
    FractionCents { whole: String, cents: String },
    /// Ordered selector candidates; the first one present wins.
    FirstMatch { selectors: Vec<String> },
    /// Visible text of a single element.
    Text { selector: String },
    /// A named attribute of a single element, e.g. a `<meta>` price field.
    Attribute { selector: String, attribute: String },
}

impl PriceStrategy {
    /// Every CSS selector this strategy may query, in lookup order.
    #[must_use]
    pub fn selectors(&self) -> Vec<&str> {
        match self {
            PriceStrategy::FractionCents { whole, cents } => vec![whole.as_str(), cents.as_str()],
            PriceStrategy::FirstMatch { selectors } => {
                selectors.iter().map(String::as_str).collect()
            }
            PriceStrategy::Text { selector } | PriceStrategy::Attribute { selector, .. } => {
                vec![selector.as_str()]
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PriceStrategy::FractionCents { .. } => "fraction_cents",
            PriceStrategy::FirstMatch { .. } => "first_match",
            PriceStrategy::Text { .. } => "text",
            PriceStrategy::Attribute { .. } => "attribute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Lower-case host fragment matched against URL hosts, e.g. `"amazon.com.br"`.
    pub domain: String,
    pub price: PriceStrategy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SitesFile {
    pub sites: Vec<SiteConfig>,
}

impl SitesFile {
    /// The configured domains in classification order.
    #[must_use]
    pub fn domains(&self) -> Vec<String> {
        self.sites.iter().map(|s| s.domain.clone()).collect()
    }
}

fn text(selector: &str) -> PriceStrategy {
    PriceStrategy::Text {
        selector: selector.to_string(),
    }
}

/// The built-in Brazilian marketplace registry.
#[must_use]
pub fn default_sites() -> SitesFile {
    let site = |domain: &str, price: PriceStrategy| SiteConfig {
        domain: domain.to_string(),
        price,
    };

    SitesFile {
        sites: vec![
            site(
                "mercadolivre.com.br",
                PriceStrategy::FractionCents {
                    whole: "span.price-tag-fraction".to_string(),
                    cents: "span.price-tag-cents".to_string(),
                },
            ),
            site(
                "amazon.com.br",
                PriceStrategy::FirstMatch {
                    selectors: vec![
                        "#priceblock_ourprice".to_string(),
                        "#priceblock_dealprice".to_string(),
                        ".a-price .a-offscreen".to_string(),
                    ],
                },
            ),
            site("americanas.com.br", text("span#price-value")),
            site(
                "magazineluiza.com.br",
                text("[data-testid='product-price']"),
            ),
            site("submarino.com.br", text("span#price-value")),
            site(
                "shopee.com.br",
                PriceStrategy::Attribute {
                    selector: "meta[property='product:price:amount']".to_string(),
                    attribute: "content".to_string(),
                },
            ),
            site("casasbahia.com.br", text("[data-testid='product-price']")),
        ],
    }
}

/// Load and validate a site registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sites(path: &Path) -> Result<SitesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SitesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sites_file: SitesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::SitesFileParse)?;

    validate_sites(&sites_file)?;

    Ok(sites_file)
}

/// Checks the structural rules every registry must satisfy.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] describing the first violation.
pub fn validate_sites(sites_file: &SitesFile) -> Result<(), ConfigError> {
    if sites_file.sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one site must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for site in &sites_file.sites {
        let domain = site.domain.trim();
        if domain.is_empty() {
            return Err(ConfigError::Validation(
                "site domain must be non-empty".to_string(),
            ));
        }
        if domain != site.domain || domain.to_lowercase() != domain {
            return Err(ConfigError::Validation(format!(
                "site domain '{}' must be lower-case without surrounding whitespace",
                site.domain
            )));
        }
        if !seen.insert(domain) {
            return Err(ConfigError::Validation(format!(
                "duplicate site domain: '{domain}'"
            )));
        }

        if let PriceStrategy::FirstMatch { selectors } = &site.price {
            if selectors.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site '{domain}' uses first_match with no selectors"
                )));
            }
        }
        if let PriceStrategy::Attribute { attribute, .. } = &site.price {
            if attribute.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site '{domain}' has an empty attribute name"
                )));
            }
        }
        if site.price.selectors().iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "site '{domain}' has an empty selector"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sites_test.rs"]
mod tests;
