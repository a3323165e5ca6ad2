//! Shopmatch - cross-marketplace product matching engine
//!
//! This library scores candidate products from a discount marketplace
//! against one source product, blending title similarity (TF-IDF +
//! cosine over segmented tokens) with image similarity (perceptual hash
//! or keypoint feature matching), and returns a ranked, threshold-gated
//! list for price-arbitrage decisions.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{
    find_opportunities, text_similarity, MatchError, Matcher, DEFAULT_DISCOUNT_THRESHOLD,
    DEFAULT_TEXT_THRESHOLD,
};
pub use self::models::{
    ArbitrageOpportunity, ImageStrategy, MatchOutcome, MatchWeights, Product, ScoredCandidate,
};
pub use self::services::ImageFetcher;
