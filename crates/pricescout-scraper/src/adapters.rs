//! Per-marketplace price extraction.
//!
//! Each configured site carries a [`PriceStrategy`]; the registry looks the
//! strategy up by classified [`Domain`] and runs it against a loaded page.
//! Adding a marketplace means adding one registry entry, not new code.

use std::collections::HashMap;

use pricescout_core::sites::validate_sites;
use pricescout_core::{ConfigError, Domain, PriceStrategy, SitesFile};
use thiserror::Error;

use crate::classify::DomainClassifier;
use crate::page::LoadedPage;

/// Why no raw price text could be read for a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The page lacks the element(s) the strategy expects.
    #[error("no price element found on {domain} page")]
    NoElementFound { domain: String },

    /// No strategy is registered for the domain; the page was not queried.
    #[error("no price adapter registered for {domain}")]
    UnknownDomain { domain: String },
}

/// Locates the raw price text on a page.
pub trait PriceAdapter {
    /// Returns the unprocessed price text, or `None` when the expected
    /// structure is absent.
    fn locate_price(&self, page: &dyn LoadedPage) -> Option<String>;
}

impl PriceAdapter for PriceStrategy {
    fn locate_price(&self, page: &dyn LoadedPage) -> Option<String> {
        match self {
            PriceStrategy::FractionCents { whole, cents } => {
                let whole = page.select_text(whole)?;
                let cents = page
                    .select_text(cents)
                    .unwrap_or_else(|| "00".to_string());
                Some(format!("{whole},{cents}"))
            }
            PriceStrategy::FirstMatch { selectors } => selectors
                .iter()
                .find_map(|selector| page.select_text(selector)),
            PriceStrategy::Text { selector } => page.select_text(selector),
            PriceStrategy::Attribute {
                selector,
                attribute,
            } => page.select_attr(selector, attribute),
        }
    }
}

/// Domain → strategy lookup, built from a validated site list.
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    order: Vec<String>,
    strategies: HashMap<String, PriceStrategy>,
}

impl AdapterRegistry {
    /// Builds a registry, rejecting structurally invalid site lists and
    /// selectors that are not valid CSS.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for the first problem found.
    pub fn new(sites: SitesFile) -> Result<Self, ConfigError> {
        validate_sites(&sites)?;

        let mut order = Vec::with_capacity(sites.sites.len());
        let mut strategies = HashMap::with_capacity(sites.sites.len());

        for site in sites.sites {
            for selector in site.price.selectors() {
                if let Err(e) = scraper::Selector::parse(selector) {
                    return Err(ConfigError::Validation(format!(
                        "site '{}' has invalid selector \"{selector}\": {e}",
                        site.domain
                    )));
                }
            }
            order.push(site.domain.clone());
            strategies.insert(site.domain, site.price);
        }

        Ok(Self { order, strategies })
    }

    /// Registry of the built-in marketplaces.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in list itself is broken.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(pricescout_core::default_sites())
    }

    /// A classifier over the registered domains, in registration order.
    #[must_use]
    pub fn classifier(&self) -> DomainClassifier {
        DomainClassifier::new(self.order.iter().cloned())
    }

    /// Registered domains with their strategies, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PriceStrategy)> {
        self.order
            .iter()
            .filter_map(|d| self.strategies.get(d).map(|s| (d.as_str(), s)))
    }

    #[must_use]
    pub fn adapter_for(&self, domain: &Domain) -> Option<&PriceStrategy> {
        match domain {
            Domain::Known(host) => self.strategies.get(host),
            Domain::Unknown(_) => None,
        }
    }

    /// Reads the raw price text for `domain` from `page`.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::UnknownDomain`] if no strategy is registered; the
    ///   page is not queried.
    /// - [`ExtractError::NoElementFound`] if the strategy's elements are absent.
    pub fn extract_price(
        &self,
        page: &dyn LoadedPage,
        domain: &Domain,
    ) -> Result<String, ExtractError> {
        let adapter = self
            .adapter_for(domain)
            .ok_or_else(|| ExtractError::UnknownDomain {
                domain: domain.to_string(),
            })?;

        adapter
            .locate_price(page)
            .ok_or_else(|| ExtractError::NoElementFound {
                domain: domain.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "adapters_test.rs"]
mod tests;
