use serde::{Deserialize, Serialize};

/// A product listing from either marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(rename = "imageUrl", alias = "image_url", default)]
    pub image_url: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub url: Option<String>,
}

/// A candidate scored against the source product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub product: Product,
    #[serde(rename = "textSimilarity")]
    pub text_similarity: f64,
    #[serde(rename = "imageSimilarity")]
    pub image_similarity: f64,
    #[serde(rename = "compositeScore")]
    pub composite_score: f64,
}

/// Result of one matching run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub matches: Vec<ScoredCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// A matched candidate whose price undercuts the source product by at
/// least the discount threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub candidate: ScoredCandidate,
    #[serde(rename = "sourcePrice")]
    pub source_price: f64,
    #[serde(rename = "candidatePrice")]
    pub candidate_price: f64,
    #[serde(rename = "discountRate")]
    pub discount_rate: f64,
    #[serde(rename = "priceDiff")]
    pub price_diff: f64,
}

/// Image similarity strategy
///
/// `PerceptualHash` is the default, gated pipeline. `FeatureMatching` is a
/// best-effort, ungated mode for visually similar-but-distinct products;
/// the two pipelines are deliberately not unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStrategy {
    PerceptualHash,
    FeatureMatching,
}

impl Default for ImageStrategy {
    fn default() -> Self {
        ImageStrategy::PerceptualHash
    }
}

/// Weights for the gated (perceptual hash) composite score
#[derive(Debug, Clone, Copy)]
pub struct MatchWeights {
    pub text: f64,
    pub image: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            text: 0.7,
            image: 0.3,
        }
    }
}

/// Weights for the ungated (feature matching) composite score
#[derive(Debug, Clone, Copy)]
pub struct AdvancedWeights {
    pub text: f64,
    pub features: f64,
}

impl Default for AdvancedWeights {
    fn default() -> Self {
        Self {
            text: 0.6,
            features: 0.4,
        }
    }
}
