//! Per-URL price collection.
//!
//! Every candidate URL is loaded, classified, run through its marketplace
//! adapter, and normalized. Any failure skips that URL only; the batch
//! always runs to completion.

use pricescout_core::Offer;
use thiserror::Error;

use crate::adapters::{AdapterRegistry, ExtractError};
use crate::classify::DomainClassifier;
use crate::error::ScraperError;
use crate::loader::PageLoader;
use crate::normalize::normalize_price;

/// Why a URL produced no offer.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("page load failed: {0}")]
    PageLoad(#[from] ScraperError),

    #[error("no price adapter registered for {domain}")]
    UnknownDomain { domain: String },

    #[error("no price element found on {domain} page")]
    NoElementFound { domain: String },

    #[error("unparseable price text {text:?}")]
    NoPrice { text: String },

    #[error("zero price on {domain} page")]
    ZeroPrice { domain: String },
}

impl From<ExtractError> for SkipReason {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NoElementFound { domain } => SkipReason::NoElementFound { domain },
            ExtractError::UnknownDomain { domain } => SkipReason::UnknownDomain { domain },
        }
    }
}

/// Per-batch counters, one bucket per [`SkipReason`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectSummary {
    pub attempted: usize,
    pub collected: usize,
    pub page_load_failures: usize,
    pub unknown_domains: usize,
    pub missing_elements: usize,
    pub unparseable_prices: usize,
    pub zero_prices: usize,
}

impl CollectSummary {
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.attempted - self.collected
    }

    fn record_skip(&mut self, reason: &SkipReason) {
        let bucket = match reason {
            SkipReason::PageLoad(_) => &mut self.page_load_failures,
            SkipReason::UnknownDomain { .. } => &mut self.unknown_domains,
            SkipReason::NoElementFound { .. } => &mut self.missing_elements,
            SkipReason::NoPrice { .. } => &mut self.unparseable_prices,
            SkipReason::ZeroPrice { .. } => &mut self.zero_prices,
        };
        *bucket += 1;
    }
}

/// Turns candidate URLs into offers, one sequential page load per URL.
pub struct PriceCollector<'a, L> {
    loader: &'a L,
    classifier: DomainClassifier,
    registry: &'a AdapterRegistry,
}

impl<'a, L: PageLoader> PriceCollector<'a, L> {
    /// Classifies against exactly the domains `registry` knows.
    pub fn new(loader: &'a L, registry: &'a AdapterRegistry) -> Self {
        Self {
            loader,
            classifier: registry.classifier(),
            registry,
        }
    }

    /// Uses a separately configured classifier, e.g. one built from a
    /// wider site list than the registry serves.
    pub fn with_classifier(
        loader: &'a L,
        classifier: DomainClassifier,
        registry: &'a AdapterRegistry,
    ) -> Self {
        Self {
            loader,
            classifier,
            registry,
        }
    }

    /// Collects offers for `urls`, in order, unsorted and untruncated.
    ///
    /// Takes no result limit: keeping the cheapest `top_n` is
    /// [`rank`](crate::rank::rank)'s job, applied to this output.
    ///
    /// Never fails: URLs that cannot be priced are skipped. A URL listed
    /// twice is loaded twice.
    pub async fn collect(&self, urls: &[String]) -> Vec<Offer> {
        let mut offers = Vec::new();
        self.collect_into(urls, &mut offers).await;
        offers
    }

    /// Cancellation-safe form of [`collect`](Self::collect).
    ///
    /// Each offer is pushed onto `offers` as soon as it is built, so if this
    /// future is dropped mid-batch every completed offer is already in the
    /// caller's vector.
    pub async fn collect_into(&self, urls: &[String], offers: &mut Vec<Offer>) -> CollectSummary {
        let mut summary = CollectSummary::default();

        for url in urls {
            summary.attempted += 1;
            match self.collect_one(url).await {
                Ok(offer) => {
                    tracing::debug!(
                        url,
                        domain = %offer.domain,
                        price = %offer.price,
                        "offer collected"
                    );
                    offers.push(offer);
                    summary.collected += 1;
                }
                Err(reason) => {
                    if matches!(reason, SkipReason::PageLoad(_)) {
                        tracing::warn!(url, reason = %reason, "skipping URL");
                    } else {
                        tracing::debug!(url, reason = %reason, "skipping URL");
                    }
                    summary.record_skip(&reason);
                }
            }
        }

        tracing::info!(
            attempted = summary.attempted,
            collected = summary.collected,
            skipped = summary.skipped(),
            "price collection finished"
        );
        summary
    }

    async fn collect_one(&self, url: &str) -> Result<Offer, SkipReason> {
        let page = self.loader.load(url).await?;
        let domain = self.classifier.classify(url);
        let raw = self.registry.extract_price(&page, &domain)?;

        let Some(price) = normalize_price(Some(&raw)) else {
            return Err(SkipReason::NoPrice { text: raw });
        };
        if price.is_zero() {
            return Err(SkipReason::ZeroPrice {
                domain: domain.to_string(),
            });
        }

        Ok(Offer::new(domain, url, price))
    }
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod tests;
