use std::collections::{BTreeSet, HashMap};

use crate::models::{MovieId, RatingForecast, SimilarityResult, UserId};

/// Weighted average Σ(rating·score) / Σ(score) over `(score, rating)` pairs.
///
/// `None` when there is nothing to average (no pairs, or scores summing to zero).
pub fn weighted_average<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (numerator, denominator) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(num, den), (score, rating)| {
            (num + rating * score, den + score)
        });
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

/// User-based forecasts: every movie some neighbour rated and the query user did not,
/// predicted from the neighbours that rated it
pub fn forecast_from_similar_users(
    query_ratings: &HashMap<MovieId, f32>,
    neighbours: &[SimilarityResult],
    user_ratings: &HashMap<UserId, HashMap<MovieId, f32>>,
) -> Vec<RatingForecast> {
    let profiles: Vec<(f64, &HashMap<MovieId, f32>)> = neighbours
        .iter()
        .filter_map(|n| user_ratings.get(&n.id).map(|ratings| (n.score, ratings)))
        .collect();

    let targets: BTreeSet<MovieId> = profiles
        .iter()
        .flat_map(|(_, ratings)| ratings.keys().copied())
        .filter(|movie_id| !query_ratings.contains_key(movie_id))
        .collect();

    targets
        .into_iter()
        .filter_map(|movie_id| {
            let pairs = profiles.iter().filter_map(|(score, ratings)| {
                ratings
                    .get(&movie_id)
                    .map(|rating| (*score, f64::from(*rating)))
            });
            weighted_average(pairs).map(|rating| RatingForecast { movie_id, rating })
        })
        .collect()
}

/// Item-based forecasts.
///
/// `similar_by_seed` holds, for each movie the user rated (the seed), the movies
/// most similar to it. A movie is forecast from the user's ratings of every seed
/// whose neighbour list contains it, weighted by that similarity.
pub fn forecast_from_similar_items(
    user_ratings: &HashMap<MovieId, f32>,
    similar_by_seed: &[(MovieId, Vec<SimilarityResult>)],
) -> Vec<RatingForecast> {
    let seeds: Vec<(f64, HashMap<MovieId, f64>)> = similar_by_seed
        .iter()
        .filter_map(|(seed, similar)| {
            let rating = f64::from(*user_ratings.get(seed)?);
            let scores = similar.iter().map(|s| (s.id, s.score)).collect();
            Some((rating, scores))
        })
        .collect();

    let targets: BTreeSet<MovieId> = seeds
        .iter()
        .flat_map(|(_, scores)| scores.keys().copied())
        .filter(|movie_id| !user_ratings.contains_key(movie_id))
        .collect();

    targets
        .into_iter()
        .filter_map(|movie_id| {
            let pairs = seeds
                .iter()
                .filter_map(|(rating, scores)| scores.get(&movie_id).map(|score| (*score, *rating)));
            weighted_average(pairs).map(|rating| RatingForecast { movie_id, rating })
        })
        .collect()
}

/// Best forecasts first, at most `count`; ties keep ascending movie order
pub fn rank_forecasts(mut forecasts: Vec<RatingForecast>, count: usize) -> Vec<RatingForecast> {
    forecasts.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    forecasts.truncate(count);
    forecasts
}
