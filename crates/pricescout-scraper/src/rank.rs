//! Top-K ranking of collected offers.

use pricescout_core::{CanonicalPrice, Offer};

/// Sorts offers by ascending price and keeps the first `top_n`.
///
/// The sort is stable: offers with equal prices keep their input order.
#[must_use]
pub fn rank(mut offers: Vec<Offer>, top_n: usize) -> Vec<Offer> {
    offers.sort_by(|a, b| a.price.total_cmp(&b.price));
    offers.truncate(top_n);
    offers
}

/// The lowest price among `offers`, if any.
#[must_use]
pub fn best_price(offers: &[Offer]) -> Option<CanonicalPrice> {
    offers
        .iter()
        .map(|o| o.price)
        .min_by(CanonicalPrice::total_cmp)
}

/// Whether `offer` is tied for the lowest price. Every tied offer is best.
#[must_use]
pub fn is_best(offer: &Offer, best: Option<CanonicalPrice>) -> bool {
    best.is_some_and(|b| offer.price.total_cmp(&b).is_eq())
}
