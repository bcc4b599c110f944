pub mod adapters;
pub mod classify;
mod client;
pub mod collector;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod page;
mod rate_limit;
pub mod rank;

pub use adapters::{AdapterRegistry, ExtractError, PriceAdapter};
pub use classify::{extract_host, DomainClassifier};
pub use collector::{CollectSummary, PriceCollector, SkipReason};
pub use discovery::{DuckDuckGoDiscovery, LinkDiscovery};
pub use error::ScraperError;
pub use loader::{HttpPageLoader, PageLoader};
pub use normalize::normalize_price;
pub use page::{HtmlPage, LoadedPage};
pub use rank::{best_price, is_best, rank};
