use crate::models::{ArbitrageOpportunity, ScoredCandidate};

/// Default minimum discount rate for an opportunity (30%)
pub const DEFAULT_DISCOUNT_THRESHOLD: f64 = 0.3;

/// Filter ranked matches down to arbitrage opportunities
///
/// Keeps candidates priced at least `discount_threshold` below the source
/// price, sorted by discount rate descending. This layers on top of the
/// similarity ranking and never alters it. A non-positive source price
/// yields no opportunities.
pub fn find_opportunities(
    source_price: f64,
    matches: &[ScoredCandidate],
    discount_threshold: f64,
) -> Vec<ArbitrageOpportunity> {
    if source_price <= 0.0 || !source_price.is_finite() {
        return Vec::new();
    }

    let mut opportunities: Vec<ArbitrageOpportunity> = matches
        .iter()
        .filter_map(|scored| {
            let candidate_price = scored.product.price;
            let discount_rate = (source_price - candidate_price) / source_price;
            if discount_rate >= discount_threshold {
                Some(ArbitrageOpportunity {
                    candidate: scored.clone(),
                    source_price,
                    candidate_price,
                    discount_rate,
                    price_diff: source_price - candidate_price,
                })
            } else {
                None
            }
        })
        .collect();

    opportunities.sort_by(|a, b| {
        b.discount_rate
            .partial_cmp(&a.discount_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    opportunities
}
