//! Shared data model: classified domains, canonical prices, and offers.

use serde::{Serialize, Serializer};

/// The marketplace a URL belongs to.
///
/// `Known` carries a configured marketplace host (e.g. `"amazon.com.br"`);
/// `Unknown` carries the lower-cased host of a URL that matched none of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Domain {
    Known(String),
    Unknown(String),
}

impl Domain {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Domain::Known(host) | Domain::Unknown(host) => host,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Domain::Known(_))
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Domain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("price must be finite and non-negative, got {0}")]
pub struct InvalidPrice(pub f64);

/// A locale-independent monetary amount, e.g. `199.90`.
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CanonicalPrice(f64);

impl CanonicalPrice {
    /// # Errors
    ///
    /// Returns [`InvalidPrice`] for negative, NaN, or infinite values.
    pub fn new(value: f64) -> Result<Self, InvalidPrice> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(InvalidPrice(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Total ordering; values are always finite so this agrees with `<`.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for CanonicalPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// One successfully scraped listing.
///
/// Serialized with the `site` / `link` / `price` field names used by the
/// CSV and JSON reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    #[serde(rename = "site")]
    pub domain: Domain,
    #[serde(rename = "link")]
    pub source_url: String,
    pub price: CanonicalPrice,
}

impl Offer {
    #[must_use]
    pub fn new(domain: Domain, source_url: impl Into<String>, price: CanonicalPrice) -> Self {
        Self {
            domain,
            source_url: source_url.into(),
            price,
        }
    }
}
