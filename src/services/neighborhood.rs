//! Collaborative filtering: user-user and item-item neighbourhoods over the
//! rating matrix.

use std::collections::{HashMap, HashSet};

use crate::models::{MovieId, RatingForecast, RecommendationRequest, SimilarityMetric, SimilarityResult};
use crate::similarity::{cosine_by, dice, dot_f32, jaccard, pearson, vectors::rating_vectors};

use super::predictor::{forecast_from_similar_items, forecast_from_similar_users, rank_forecasts};
use super::prefilter::{prefilter, shares_feature};
use super::scorer::{self, CandidateScorer};
use super::Recommender;

/// Similarity of two keyed rating profiles (a user's ratings by movie, or a
/// movie's ratings by user)
pub fn compare_ratings(a: &HashMap<u32, f32>, b: &HashMap<u32, f32>, metric: SimilarityMetric) -> f64 {
    if metric.is_set_based() {
        let left: Vec<u32> = a.keys().copied().collect();
        let right: Vec<u32> = b.keys().copied().collect();
        return match metric {
            SimilarityMetric::Jaccard => jaccard(&left, &right),
            _ => dice(&left, &right),
        };
    }

    let (left, right) = rating_vectors(a, b);
    match metric {
        SimilarityMetric::Pearson => pearson(&left, &right),
        _ => cosine_by(&left, &right, dot_f32),
    }
}

struct RatingProfileScorer<'a> {
    query: &'a HashMap<u32, f32>,
    profiles: &'a HashMap<u32, HashMap<u32, f32>>,
    metric: SimilarityMetric,
}

impl CandidateScorer for RatingProfileScorer<'_> {
    fn score(&self, candidate: u32) -> Option<f64> {
        let profile = self.profiles.get(&candidate)?;
        Some(compare_ratings(self.query, profile, self.metric))
    }
}

impl Recommender {
    /// The `top_k` users most similar to the request's user, best first.
    ///
    /// Only users with at least one movie in common with the query user are scored.
    pub fn similar_users(&self, request: &RecommendationRequest) -> Vec<SimilarityResult> {
        let profiles = &self.dataset.user_ratings;
        let Some(query) = profiles.get(&request.input) else {
            return Vec::new();
        };

        let rated: HashSet<MovieId> = query.keys().copied().collect();
        let candidates = prefilter(request.input, profiles.keys().copied(), |id| {
            profiles
                .get(&id)
                .is_some_and(|ratings| shares_feature(&rated, ratings.keys()))
        });

        let scorer = RatingProfileScorer {
            query,
            profiles,
            metric: request.similarity,
        };
        scorer::score(&scorer, &candidates, request.concurrency, Some(request.top_k))
    }

    /// Movies among `candidates` most similar to `query` by their raters.
    ///
    /// `top_k = None` keeps every scored movie. Movies nobody rated are never
    /// scored; a query without ratings yields nothing.
    pub fn similar_movies<I>(
        &self,
        query: MovieId,
        candidates: I,
        metric: SimilarityMetric,
        concurrency: usize,
        top_k: Option<usize>,
    ) -> Vec<SimilarityResult>
    where
        I: IntoIterator<Item = MovieId>,
    {
        let profiles = &self.dataset.movie_ratings;
        let Some(query_ratings) = profiles.get(&query) else {
            return Vec::new();
        };

        let raters: HashSet<u32> = query_ratings.keys().copied().collect();
        let candidates = prefilter(query, candidates, |id| {
            profiles
                .get(&id)
                .is_some_and(|ratings| shares_feature(&raters, ratings.keys()))
        });

        let scorer = RatingProfileScorer {
            query: query_ratings,
            profiles,
            metric,
        };
        scorer::score(&scorer, &candidates, concurrency, top_k)
    }

    pub(crate) fn recommend_by_user(&self, request: &RecommendationRequest) -> Vec<RatingForecast> {
        let Some(query) = self.dataset.user_ratings.get(&request.input) else {
            return Vec::new();
        };

        let neighbours = self.similar_users(request);
        tracing::debug!(neighbours = neighbours.len(), "Found similar users");

        let forecasts = forecast_from_similar_users(query, &neighbours, &self.dataset.user_ratings);
        rank_forecasts(forecasts, request.recommendations)
    }

    pub(crate) fn recommend_by_item(&self, request: &RecommendationRequest) -> Vec<RatingForecast> {
        let Some(user_ratings) = self.dataset.user_ratings.get(&request.input) else {
            return Vec::new();
        };

        let mut seeds: Vec<MovieId> = user_ratings
            .iter()
            .filter(|(_, rating)| **rating >= self.settings.liked_threshold)
            .map(|(movie_id, _)| *movie_id)
            .collect();
        seeds.sort_unstable();
        tracing::debug!(seeds = seeds.len(), "Scoring neighbours of liked movies");

        let similar_by_seed: Vec<(MovieId, Vec<SimilarityResult>)> = seeds
            .into_iter()
            .map(|seed| {
                let similar = self.similar_movies(
                    seed,
                    self.dataset.movie_ratings.keys().copied(),
                    request.similarity,
                    request.concurrency,
                    Some(request.top_k),
                );
                (seed, similar)
            })
            .collect();

        let forecasts = forecast_from_similar_items(user_ratings, &similar_by_seed);
        rank_forecasts(forecasts, request.recommendations)
    }
}
