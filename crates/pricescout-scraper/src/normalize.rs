//! Price text normalization.
//!
//! Scraped price strings mix Brazilian (`1.234,56`) and US (`1234.56`)
//! conventions and carry currency symbols, labels, and whitespace. This
//! module reduces them to a [`CanonicalPrice`] or reports that no price
//! could be read.

use std::sync::LazyLock;

use pricescout_core::CanonicalPrice;
use regex::Regex;

/// Everything that is not an ASCII digit, comma, or dot.
static NON_PRICE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9,.]").expect("valid regex"));

/// Normalizes raw price text into a [`CanonicalPrice`].
///
/// Rules, applied in order after stripping every character other than
/// digits, commas, and dots:
///
/// 1. Exactly one comma and no dot: the comma is the decimal separator
///    (`"199,90"` → `199.90`).
/// 2. Otherwise, if there is more than one dot, or a single dot followed
///    later by a comma, the dots are thousands grouping and are removed
///    (`"1.234.567,89"`, `"1.234,56"`).
/// 3. Any remaining comma becomes the decimal point.
/// 4. The result is parsed as a float.
///
/// Returns `None` for absent or empty input and for anything that does not
/// parse, e.g. `"abc"` or `"1,234.56"` (a comma before the dot is left
/// alone by rule 2 and yields two dots). `"1.234.567"` is read as the
/// integer `1234567`.
#[must_use]
pub fn normalize_price(text: Option<&str>) -> Option<CanonicalPrice> {
    let text = text?;
    if text.trim().is_empty() {
        return None;
    }

    let mut cleaned = NON_PRICE_CHARS.replace_all(text, "").into_owned();
    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    if commas == 1 && dots == 0 {
        cleaned = cleaned.replace(',', ".");
    } else if dots > 1 || (dots == 1 && comma_follows_dot(&cleaned)) {
        cleaned = cleaned.replace('.', "");
    }
    let cleaned = cleaned.replace(',', ".");

    let value = cleaned.parse::<f64>().ok()?;
    CanonicalPrice::new(value).ok()
}

fn comma_follows_dot(cleaned: &str) -> bool {
    match (cleaned.find('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => comma > dot,
        _ => false,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
