// Core algorithm exports
pub mod arbitrage;
pub mod image;
pub mod matcher;
pub mod scoring;
pub mod text;

pub use arbitrage::{find_opportunities, DEFAULT_DISCOUNT_THRESHOLD};
pub use matcher::{MatchError, Matcher, DEFAULT_TEXT_THRESHOLD};
pub use scoring::{advanced_composite, composite_score};
pub use text::text_similarity;
