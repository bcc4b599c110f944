pub mod app_config;
pub mod config;
pub mod offers;
pub mod sites;

pub use app_config::{AppConfig, Pacing};
pub use config::{load_app_config, load_app_config_from_env};
pub use offers::{CanonicalPrice, Domain, InvalidPrice, Offer};
pub use sites::{default_sites, load_sites, PriceStrategy, SiteConfig, SitesFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sites file {path}: {source}")]
    SitesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sites file: {0}")]
    SitesFileParse(#[from] serde_yaml::Error),

    #[error("sites validation failed: {0}")]
    Validation(String),
}
