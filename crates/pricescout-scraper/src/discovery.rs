//! Candidate product URL discovery via web search.

use std::future::Future;

use pricescout_core::AppConfig;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::classify::DomainClassifier;
use crate::client::{build_client, get_html, validate_url};
use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Produces candidate listing URLs for a product query.
pub trait LinkDiscovery {
    /// Returns at most `max_links` URLs, each on a known marketplace.
    ///
    /// # Errors
    ///
    /// Returns a [`ScraperError`] when the search itself fails.
    fn discover(
        &self,
        query: &str,
        max_links: usize,
    ) -> impl Future<Output = Result<Vec<String>, ScraperError>>;
}

/// Searches DuckDuckGo's HTML endpoint and keeps marketplace results.
pub struct DuckDuckGoDiscovery {
    client: Client,
    search_url: String,
    classifier: DomainClassifier,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl DuckDuckGoDiscovery {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] for an unusable `search_url`, or
    /// [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(
        search_url: &str,
        classifier: DomainClassifier,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        validate_url(search_url)?;
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            search_url: search_url.to_owned(),
            classifier,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// # Errors
    ///
    /// See [`DuckDuckGoDiscovery::new`].
    pub fn from_config(
        config: &AppConfig,
        classifier: DomainClassifier,
    ) -> Result<Self, ScraperError> {
        let mut discovery = Self::new(
            &config.search_url,
            classifier,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        discovery.max_retries = config.max_retries;
        discovery.backoff_base_ms = config.retry_backoff_base_ms;
        Ok(discovery)
    }
}

impl LinkDiscovery for DuckDuckGoDiscovery {
    async fn discover(&self, query: &str, max_links: usize) -> Result<Vec<String>, ScraperError> {
        let params = [("q", query)];
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            get_html(&self.client, &self.search_url, &params)
        })
        .await?;

        let links = extract_result_links(&body, &self.classifier, max_links);
        tracing::info!(query, found = links.len(), "search results collected");
        Ok(links)
    }
}

/// Pulls marketplace URLs out of a DuckDuckGo HTML results page, in result
/// order, stopping at `max_links`.
#[must_use]
pub fn extract_result_links(
    html: &str,
    classifier: &DomainClassifier,
    max_links: usize,
) -> Vec<String> {
    let Ok(selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(resolve_result_href)
        .filter(|url| classifier.classify(url).is_known())
        .take(max_links)
        .collect()
}

/// Unwraps DuckDuckGo's `/l/?uddg=<target>` redirect links; passes direct
/// `http(s)` links through unchanged.
fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_owned()
    };
    let parsed = reqwest::Url::parse(&absolute).ok()?;

    if parsed.path() == "/l/" {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }

    matches!(parsed.scheme(), "http" | "https").then_some(absolute)
}
