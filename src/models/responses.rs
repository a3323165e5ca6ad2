use crate::models::domain::{ArbitrageOpportunity, ScoredCandidate};
use serde::{Deserialize, Serialize};

/// Response for the rank endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<ScoredCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Response for the compare endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub opportunities: Vec<ArbitrageOpportunity>,
    #[serde(rename = "matchedCandidates")]
    pub matched_candidates: usize,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
