use crate::core::{arbitrage, MatchError, Matcher};
use crate::models::{
    CompareRequest, CompareResponse, ErrorResponse, HealthResponse, ImageStrategy, MatchRequest,
    MatchResponse,
};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<Matcher>,
    pub text_threshold: f64,
    pub strategy: ImageStrategy,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/matches/compare", web::post().to(compare_prices));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn match_error_response(err: MatchError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "invalid_source".to_string(),
        message: err.to_string(),
        status_code: 400,
    })
}

/// Rank candidates against a source product
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "source": {"title": "...", "imageUrl": null, "price": 128.0},
///   "candidates": [{"title": "...", "price": 59.0}],
///   "textThreshold": 0.6,
///   "strategy": "perceptual_hash"
/// }
/// ```
async fn rank_matches(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let threshold = req.text_threshold.unwrap_or(state.text_threshold);
    let strategy = req.strategy.unwrap_or(state.strategy);

    tracing::info!(
        "Ranking {} candidates against '{}' (threshold: {}, strategy: {:?})",
        req.candidates.len(),
        req.source.title,
        threshold,
        strategy
    );

    let outcome = match state
        .matcher
        .rank(strategy, &req.source, req.candidates, threshold)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return match_error_response(e),
    };

    tracing::info!(
        "Returning {} matches (from {} candidates)",
        outcome.matches.len(),
        outcome.total_candidates
    );

    HttpResponse::Ok().json(MatchResponse {
        matches: outcome.matches,
        total_candidates: outcome.total_candidates,
        timestamp: chrono::Utc::now(),
    })
}

/// Rank candidates and surface arbitrage opportunities
///
/// POST /api/v1/matches/compare
///
/// Runs the gated matching pipeline, then keeps matches whose price
/// undercuts the source by at least the discount threshold (default 30%).
async fn compare_prices(
    state: web::Data<AppState>,
    req: web::Json<CompareRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for compare request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let threshold = req.text_threshold.unwrap_or(state.text_threshold);
    let discount_threshold = req
        .discount_threshold
        .unwrap_or(arbitrage::DEFAULT_DISCOUNT_THRESHOLD);

    let outcome = match state
        .matcher
        .match_products(&req.source, req.candidates, threshold)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return match_error_response(e),
    };

    let opportunities =
        arbitrage::find_opportunities(req.source.price, &outcome.matches, discount_threshold);

    tracing::info!(
        "Found {} opportunities among {} matches (discount threshold: {})",
        opportunities.len(),
        outcome.matches.len(),
        discount_threshold
    );

    HttpResponse::Ok().json(CompareResponse {
        opportunities,
        matched_candidates: outcome.matches.len(),
        total_candidates: outcome.total_candidates,
        timestamp: chrono::Utc::now(),
    })
}
