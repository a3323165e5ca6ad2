use crate::models::{AdvancedWeights, MatchWeights, ScoredCandidate};

/// Clamp a similarity to the unit interval; non-finite values become 0
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Weighted blend of text and image similarity for the gated pipeline
#[inline]
pub fn composite_score(text: f64, image: f64, weights: &MatchWeights) -> f64 {
    clamp_unit(weights.text * clamp_unit(text) + weights.image * clamp_unit(image))
}

/// Weighted blend of text similarity and feature match fraction for the
/// ungated pipeline
#[inline]
pub fn advanced_composite(text: f64, fraction: f64, weights: &AdvancedWeights) -> f64 {
    clamp_unit(weights.text * clamp_unit(text) + weights.features * clamp_unit(fraction))
}

/// Sort candidates by composite score, highest first
///
/// Stable, so equal scores keep their input order.
pub fn sort_descending(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
