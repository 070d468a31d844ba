pub mod content;
pub mod feature_cache;
pub mod hybrid;
pub mod neighborhood;
pub mod predictor;
pub mod prefilter;
pub mod scorer;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineSettings;
use crate::error::{AppError, AppResult};
use crate::models::{
    Algorithm, Dataset, MovieId, RecommendationRequest, Recommendations, SimilarityMetric,
};
use crate::similarity::tokenize;

pub use feature_cache::FeatureCache;
pub use scorer::CandidateScorer;

/// Occurrence count of every tag token a movie received, over all contributors
pub type TagCounts = HashMap<String, u32>;

/// Recommendation engine over an immutable dataset.
///
/// Holds the process-lifetime feature caches, so one instance should be shared
/// (behind an `Arc`) by every request.
pub struct Recommender {
    dataset: Arc<Dataset>,
    settings: EngineSettings,
    tag_counts: FeatureCache<MovieId, TagCounts>,
    title_tokens: FeatureCache<MovieId, Vec<String>>,
}

impl Recommender {
    pub fn new(dataset: Arc<Dataset>, settings: EngineSettings) -> Self {
        Self {
            dataset,
            settings,
            tag_counts: FeatureCache::new(),
            title_tokens: FeatureCache::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Builds a request using the configured concurrency and neighbour bound
    pub fn request(
        &self,
        input: u32,
        algorithm: Algorithm,
        similarity: SimilarityMetric,
        recommendations: usize,
    ) -> RecommendationRequest {
        RecommendationRequest {
            input,
            algorithm,
            similarity,
            recommendations,
            concurrency: self.settings.num_threads,
            top_k: self.settings.top_k,
        }
    }

    /// Checks that the request can be answered from the loaded dataset
    pub fn check_feasibility(&self, request: &RecommendationRequest) -> AppResult<()> {
        if request.recommendations == 0 {
            return Err(AppError::InvalidInput(
                "Number of recommendations must be at least 1".to_string(),
            ));
        }
        if request.concurrency == 0 || request.top_k == 0 {
            return Err(AppError::InvalidInput(
                "Concurrency and top_k must be at least 1".to_string(),
            ));
        }

        let dataset = &self.dataset;
        let present = match request.algorithm {
            Algorithm::User | Algorithm::Item => dataset.user_ratings.contains_key(&request.input),
            Algorithm::Tag => dataset.tags.contains_key(&request.input),
            Algorithm::Title => dataset.titles.contains_key(&request.input),
            Algorithm::Hybrid => dataset.movie_ratings.contains_key(&request.input),
        };
        if !present {
            let kind = if request.algorithm.queries_user() {
                "User"
            } else {
                "Movie"
            };
            return Err(AppError::NotFound(format!(
                "{} ID {} not found in current dataset. Please try with another ID.",
                kind, request.input
            )));
        }
        Ok(())
    }

    /// Runs one recommendation request end to end.
    ///
    /// An empty result is not an error: nothing survived scoring, or the hybrid
    /// lists had no movie in common.
    #[tracing::instrument(
        skip(self, request),
        fields(
            algorithm = %request.algorithm,
            similarity = %request.similarity,
            input = request.input
        )
    )]
    pub fn recommend(&self, request: &RecommendationRequest) -> AppResult<Recommendations> {
        self.check_feasibility(request)?;
        let start = Instant::now();

        let recommendations = match request.algorithm {
            Algorithm::User => Recommendations::Forecasts(self.recommend_by_user(request)),
            Algorithm::Item => Recommendations::Forecasts(self.recommend_by_item(request)),
            Algorithm::Tag => Recommendations::Similar(self.recommend_by_tag(request)),
            Algorithm::Title => Recommendations::Similar(self.recommend_by_title(request)),
            Algorithm::Hybrid => Recommendations::Similar(self.recommend_hybrid(request)),
        };

        tracing::info!(
            results = recommendations.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendation completed"
        );

        Ok(recommendations)
    }

    /// Occurrence counts of the movie's tag tokens (cached)
    pub fn tag_counts(&self, movie_id: MovieId) -> Arc<TagCounts> {
        self.tag_counts.get_or_compute(movie_id, || {
            let mut counts = TagCounts::new();
            if let Some(profile) = self.dataset.tags.get(&movie_id) {
                for token in profile.values().flatten() {
                    *counts.entry(token.clone()).or_insert(0) += 1;
                }
            }
            counts
        })
    }

    /// Tokens of the movie's title, duplicates kept (cached)
    pub fn title_tokens(&self, movie_id: MovieId) -> Arc<Vec<String>> {
        self.title_tokens.get_or_compute(movie_id, || {
            self.dataset
                .title(movie_id)
                .map(tokenize)
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Small dataset shared by the engine unit tests.
    ///
    /// Users 1–4 rate movies 1–5; movies 1–4 carry titles and tags.
    pub fn dataset() -> Dataset {
        let mut dataset = Dataset::new();
        for (user, movie, rating) in [
            (1, 1, 5.0),
            (1, 2, 4.0),
            (1, 3, 1.0),
            (2, 1, 5.0),
            (2, 2, 4.5),
            (2, 4, 5.0),
            (3, 1, 1.0),
            (3, 3, 5.0),
            (3, 5, 2.0),
            (4, 5, 3.0),
        ] {
            dataset.add_rating(user, movie, rating);
        }

        dataset.add_title(1, "Toy Story (1995)");
        dataset.add_title(2, "Toy Story 2 (1999)");
        dataset.add_title(3, "Heat (1995)");
        dataset.add_title(4, "The Story of Us (1999)");
        dataset.add_title(5, "Casino (1995)");

        dataset.add_tags(1, 1, ["pixar", "animation"]);
        dataset.add_tags(1, 2, ["pixar", "funny"]);
        dataset.add_tags(2, 1, ["pixar", "sequel"]);
        dataset.add_tags(3, 3, ["heist", "crime"]);
        dataset.add_tags(4, 2, ["funny", "romance"]);
        dataset
    }

    pub fn recommender() -> Recommender {
        Recommender::new(Arc::new(dataset()), EngineSettings::default())
    }
}
