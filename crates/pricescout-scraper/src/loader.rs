//! Page loading.
//!
//! [`PageLoader`] is the seam between the collector and whatever renders
//! product pages. [`HttpPageLoader`] is the default: a single sequential
//! HTTP session that paces itself between loads.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pricescout_core::{AppConfig, Pacing};
use rand::Rng;
use reqwest::Client;

use crate::client::{build_client, get_html, validate_url};
use crate::error::ScraperError;
use crate::page::{HtmlPage, LoadedPage};
use crate::rate_limit::retry_with_backoff;

/// Navigates to a URL and exposes the resulting page for querying.
///
/// Implementations own pacing and per-page timeouts; callers treat every
/// load as an arbitrarily slow suspension point.
pub trait PageLoader {
    type Page: LoadedPage;

    /// # Errors
    ///
    /// Returns a [`ScraperError`] when the page cannot be loaded.
    fn load(&self, url: &str) -> impl Future<Output = Result<Self::Page, ScraperError>>;
}

/// Loads pages over HTTP and parses them as static HTML.
///
/// Transient failures (429, network errors, 5xx) are retried with
/// exponential backoff. Every load after the first is preceded by a random
/// delay drawn from the configured [`Pacing`] bounds.
pub struct HttpPageLoader {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
    pacing: Pacing,
    has_loaded: AtomicBool,
}

impl HttpPageLoader {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        pacing: Pacing,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            max_retries,
            backoff_base_ms,
            pacing,
            has_loaded: AtomicBool::new(false),
        })
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
            config.pacing,
        )
    }

    async fn pace(&self) {
        if !self.has_loaded.swap(true, Ordering::SeqCst) {
            return;
        }
        let delay = pacing_delay(self.pacing);
        if !delay.is_zero() {
            tracing::debug!(delay = ?delay, "pacing before next page load");
            tokio::time::sleep(delay).await;
        }
    }
}

impl PageLoader for HttpPageLoader {
    type Page = HtmlPage;

    async fn load(&self, url: &str) -> Result<HtmlPage, ScraperError> {
        validate_url(url)?;
        self.pace().await;

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            get_html(&self.client, url, &[])
        })
        .await?;

        tracing::debug!(url, bytes = body.len(), "page loaded");
        Ok(HtmlPage::parse(url, &body))
    }
}

/// Draws a delay uniformly from `[min_ms, max_ms]`.
pub(crate) fn pacing_delay(pacing: Pacing) -> Duration {
    if pacing.is_disabled() {
        return Duration::ZERO;
    }
    if pacing.min_ms >= pacing.max_ms {
        return pacing.min();
    }
    Duration::from_millis(rand::rng().random_range(pacing.min_ms..=pacing.max_ms))
}
