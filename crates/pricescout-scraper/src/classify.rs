//! URL → marketplace classification.

use pricescout_core::{Domain, SitesFile};

/// Maps URLs onto a fixed, ordered list of known marketplace domains.
///
/// Classification is total: a URL whose host contains none of the known
/// domains is returned as [`Domain::Unknown`] carrying its lower-cased host.
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    known: Vec<String>,
}

impl DomainClassifier {
    /// Builds a classifier over `known`, checked in the given order.
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known
                .into_iter()
                .map(|d| d.into().to_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn from_sites(sites: &SitesFile) -> Self {
        Self::new(sites.domains())
    }

    #[must_use]
    pub fn known_domains(&self) -> &[String] {
        &self.known
    }

    /// Returns the first known domain contained in the URL's host.
    #[must_use]
    pub fn classify(&self, url: &str) -> Domain {
        let host = extract_host(url);
        match self.known.iter().find(|known| host.contains(known.as_str())) {
            Some(known) => Domain::Known(known.clone()),
            None => Domain::Unknown(host),
        }
    }
}

/// Extracts the lower-cased host from a URL.
///
/// Falls back to string splitting when the URL cannot be parsed (e.g. it
/// has no scheme), so this never fails; the worst case is an empty string.
#[must_use]
pub fn extract_host(url: &str) -> String {
    if let Some(host) = reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
    {
        return host.to_lowercase();
    }

    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    let host = host_port.split(':').next().unwrap_or_default();
    host.trim().to_lowercase()
}
