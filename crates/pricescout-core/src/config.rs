use crate::app_config::{AppConfig, Pacing};
use crate::ConfigError;

pub const DEFAULT_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_USER_AGENT: &str = "pricescout/0.1 (price-comparison)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed or is
/// out of range.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed or is
/// out of range.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment yields a usable
/// config. Decoupled from the real environment so tests can pass a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let log_level = or_default("PRICESCOUT_LOG_LEVEL", "info");
    let sites_path = lookup("PRICESCOUT_SITES_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let top_n = parse_positive("PRICESCOUT_TOP_N", "5")?;
    let max_links = parse_positive("PRICESCOUT_MAX_LINKS", "50")?;
    let search_url = or_default("PRICESCOUT_SEARCH_URL", DEFAULT_SEARCH_URL);

    let request_timeout_secs = parse_positive_u64("PRICESCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PRICESCOUT_USER_AGENT", DEFAULT_USER_AGENT);

    let pacing_min_ms = parse_u64("PRICESCOUT_PACING_MIN_MS", "2000")?;
    let pacing_max_ms = parse_u64("PRICESCOUT_PACING_MAX_MS", "5000")?;
    if pacing_min_ms > pacing_max_ms {
        return Err(invalid(
            "PRICESCOUT_PACING_MIN_MS",
            format!("{pacing_min_ms} exceeds PRICESCOUT_PACING_MAX_MS ({pacing_max_ms})"),
        ));
    }

    let max_retries = parse_u32("PRICESCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("PRICESCOUT_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        log_level,
        sites_path,
        top_n,
        max_links,
        search_url,
        request_timeout_secs,
        user_agent,
        pacing: Pacing {
            min_ms: pacing_min_ms,
            max_ms: pacing_max_ms,
        },
        max_retries,
        retry_backoff_base_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
