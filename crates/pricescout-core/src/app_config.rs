use std::path::PathBuf;
use std::time::Duration;

/// Bounds for the randomized delay inserted between consecutive page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Pacing {
    /// No delay at all. Used by tests and by callers that pace externally.
    pub const NONE: Pacing = Pacing {
        min_ms: 0,
        max_ms: 0,
    };

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.max_ms == 0
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub sites_path: Option<PathBuf>,
    pub top_n: usize,
    pub max_links: usize,
    pub search_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub pacing: Pacing,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}
