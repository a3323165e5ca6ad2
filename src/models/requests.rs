use crate::models::domain::{ImageStrategy, Product};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to rank candidates against a source product
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    pub source: Product,
    #[serde(default)]
    pub candidates: Vec<Product>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(alias = "text_threshold", rename = "textThreshold", default)]
    pub text_threshold: Option<f64>,
    #[serde(default)]
    pub strategy: Option<ImageStrategy>,
}

/// Request to rank candidates and surface arbitrage opportunities
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompareRequest {
    pub source: Product,
    #[serde(default)]
    pub candidates: Vec<Product>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(alias = "text_threshold", rename = "textThreshold", default)]
    pub text_threshold: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(alias = "discount_threshold", rename = "discountThreshold", default)]
    pub discount_threshold: Option<f64>,
}
