use crate::core::{image as visual, scoring, text};
use crate::models::{
    AdvancedWeights, ImageStrategy, MatchOutcome, MatchWeights, Product, ScoredCandidate,
};
use crate::services::ImageFetcher;
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;

/// Default minimum text similarity for a candidate to be included
pub const DEFAULT_TEXT_THRESHOLD: f64 = 0.6;

/// Errors surfaced to the caller of a match run
///
/// Per-candidate failures are absorbed inside the matcher; only
/// input-level problems surface here.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("source product title must not be empty")]
    EmptyTitle,
}

/// Ranks candidate products against one source product
///
/// Text similarity gates inclusion; image similarity only affects the
/// ranking. Candidates are scored independently and concurrently, and no
/// candidate failure may abort or skew the rest of the batch.
pub struct Matcher {
    weights: MatchWeights,
    advanced_weights: AdvancedWeights,
    concurrency: usize,
    fetcher: Arc<ImageFetcher>,
}

impl Matcher {
    pub fn new(
        weights: MatchWeights,
        advanced_weights: AdvancedWeights,
        concurrency: usize,
        fetcher: Arc<ImageFetcher>,
    ) -> Self {
        Self {
            weights,
            advanced_weights,
            concurrency: concurrency.max(1),
            fetcher,
        }
    }

    pub fn with_defaults(fetcher: Arc<ImageFetcher>) -> Self {
        Self::new(
            MatchWeights::default(),
            AdvancedWeights::default(),
            8,
            fetcher,
        )
    }

    /// Dispatch to the pipeline selected by `strategy`
    ///
    /// `FeatureMatching` ignores `text_threshold`: that pipeline is
    /// best-effort and ungated.
    pub async fn rank(
        &self,
        strategy: ImageStrategy,
        source: &Product,
        candidates: Vec<Product>,
        text_threshold: f64,
    ) -> Result<MatchOutcome, MatchError> {
        match strategy {
            ImageStrategy::PerceptualHash => {
                self.match_products(source, candidates, text_threshold).await
            }
            ImageStrategy::FeatureMatching => self.advanced_match(source, candidates).await,
        }
    }

    /// Score and rank candidates with the gated perceptual-hash pipeline
    ///
    /// A candidate appears in the result iff its text similarity clears
    /// `text_threshold`. Image download or decode failures degrade that
    /// candidate's image similarity to 0 and never abort the batch.
    pub async fn match_products(
        &self,
        source: &Product,
        candidates: Vec<Product>,
        text_threshold: f64,
    ) -> Result<MatchOutcome, MatchError> {
        if source.title.trim().is_empty() {
            return Err(MatchError::EmptyTitle);
        }

        let total_candidates = candidates.len();

        // Only touch the network when an image comparison can actually
        // happen on at least one candidate.
        let any_candidate_image = candidates.iter().any(|c| c.image_url.is_some());
        let source_image = match (&source.image_url, any_candidate_image) {
            (Some(url), true) => match self.fetcher.fetch(url).await {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::debug!("source image unavailable ({}): {}", url, e);
                    None
                }
            },
            _ => None,
        };

        let mut matches: Vec<ScoredCandidate> = stream::iter(candidates)
            .map(|candidate| {
                let source_image = source_image.clone();
                async move { self.score_candidate(source, source_image, candidate).await }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        matches.retain(|c| c.text_similarity >= text_threshold);
        scoring::sort_descending(&mut matches);

        tracing::debug!(
            "ranked {} of {} candidates above threshold {}",
            matches.len(),
            total_candidates,
            text_threshold
        );

        Ok(MatchOutcome {
            matches,
            total_candidates,
        })
    }

    async fn score_candidate(
        &self,
        source: &Product,
        source_image: Option<Arc<DynamicImage>>,
        candidate: Product,
    ) -> ScoredCandidate {
        let text_similarity = scoring::clamp_unit(text::text_similarity(&source.title, &candidate.title));

        let image_similarity = match (&source_image, &candidate.image_url) {
            (Some(source_image), Some(url)) => match self.fetcher.fetch(url).await {
                Ok(image) => visual::phash_similarity(source_image, &image),
                Err(e) => {
                    tracing::debug!("candidate image unavailable ({}): {}", url, e);
                    0.0
                }
            },
            _ => 0.0,
        };
        let image_similarity = scoring::clamp_unit(image_similarity);

        let composite_score = scoring::composite_score(text_similarity, image_similarity, &self.weights);

        ScoredCandidate {
            product: candidate,
            text_similarity,
            image_similarity,
            composite_score,
        }
    }

    /// Score and rank candidates with the ungated feature-matching pipeline
    ///
    /// The source image is mandatory here: without it there is nothing to
    /// match against and the outcome is empty. Candidates whose images are
    /// unfetchable or featureless are skipped rather than scored at 0, and
    /// no text threshold applies.
    pub async fn advanced_match(
        &self,
        source: &Product,
        candidates: Vec<Product>,
    ) -> Result<MatchOutcome, MatchError> {
        if source.title.trim().is_empty() {
            return Err(MatchError::EmptyTitle);
        }

        let total_candidates = candidates.len();
        let empty = MatchOutcome {
            matches: Vec::new(),
            total_candidates,
        };

        let source_url = match &source.image_url {
            Some(url) => url,
            None => return Ok(empty),
        };
        let source_image = match self.fetcher.fetch(source_url).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("source image unavailable ({}): {}", source_url, e);
                return Ok(empty);
            }
        };

        let source_descriptors = visual::extract_descriptors(&source_image);
        if source_descriptors.is_empty() {
            return Ok(empty);
        }
        let source_descriptors = &source_descriptors;

        let scored: Vec<Option<ScoredCandidate>> = stream::iter(candidates)
            .map(|candidate| async move {
                let url = candidate.image_url.clone()?;
                let image = self.fetcher.fetch(&url).await.ok()?;
                let descriptors = visual::extract_descriptors(&image);
                let fraction = visual::match_fraction(source_descriptors, &descriptors)?;

                let text_similarity =
                    scoring::clamp_unit(text::text_similarity(&source.title, &candidate.title));
                let image_similarity = scoring::clamp_unit(fraction);
                let composite_score = scoring::advanced_composite(
                    text_similarity,
                    image_similarity,
                    &self.advanced_weights,
                );

                Some(ScoredCandidate {
                    product: candidate,
                    text_similarity,
                    image_similarity,
                    composite_score,
                })
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut matches: Vec<ScoredCandidate> = scored.into_iter().flatten().collect();
        scoring::sort_descending(&mut matches);

        Ok(MatchOutcome {
            matches,
            total_candidates,
        })
    }
}
