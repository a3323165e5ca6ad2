// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AdvancedWeights, ArbitrageOpportunity, ImageStrategy, MatchOutcome, MatchWeights, Product,
    ScoredCandidate,
};
pub use requests::{CompareRequest, MatchRequest};
pub use responses::{CompareResponse, ErrorResponse, HealthResponse, MatchResponse};
