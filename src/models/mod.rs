use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

mod dataset;

pub use dataset::{Dataset, TagProfile};

pub type UserId = u32;
pub type MovieId = u32;

/// Recommendation algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// User-user collaborative filtering; forecasts ratings
    User,
    /// Item-item collaborative filtering; forecasts ratings
    Item,
    /// Movies with similar tags
    Tag,
    /// Movies with similar titles
    Title,
    /// Weighted blend of item, title and tag similarity
    Hybrid,
}

impl Algorithm {
    /// Whether the query id names a user (otherwise a movie)
    pub fn queries_user(&self) -> bool {
        matches!(self, Algorithm::User | Algorithm::Item)
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::User => "user",
            Algorithm::Item => "item",
            Algorithm::Tag => "tag",
            Algorithm::Title => "title",
            Algorithm::Hybrid => "hybrid",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Algorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Algorithm::User),
            "item" => Ok(Algorithm::Item),
            "tag" => Ok(Algorithm::Tag),
            "title" => Ok(Algorithm::Title),
            "hybrid" => Ok(Algorithm::Hybrid),
            other => Err(AppError::InvalidInput(format!(
                "Unknown algorithm '{}'. Allowed: 'user', 'item', 'tag', 'title', 'hybrid'",
                other
            ))),
        }
    }
}

/// Similarity metric used to compare two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    Jaccard,
    Dice,
    Cosine,
    Pearson,
}

impl SimilarityMetric {
    /// Set-overlap metrics compare discrete feature sets; the others compare numeric vectors
    pub fn is_set_based(&self) -> bool {
        matches!(self, SimilarityMetric::Jaccard | SimilarityMetric::Dice)
    }
}

impl Display for SimilarityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SimilarityMetric::Jaccard => "jaccard",
            SimilarityMetric::Dice => "dice",
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Pearson => "pearson",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SimilarityMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jaccard" => Ok(SimilarityMetric::Jaccard),
            "dice" => Ok(SimilarityMetric::Dice),
            "cosine" => Ok(SimilarityMetric::Cosine),
            "pearson" => Ok(SimilarityMetric::Pearson),
            other => Err(AppError::InvalidInput(format!(
                "Unknown similarity metric '{}'. Allowed: 'jaccard', 'dice', 'cosine', 'pearson'",
                other
            ))),
        }
    }
}

/// Similarity of one entity to the query entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub id: u32,
    pub score: f64,
}

impl SimilarityResult {
    pub fn new(id: u32, score: f64) -> Self {
        Self { id, score }
    }
}

/// Predicted rating of a movie the query user has not rated yet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingForecast {
    pub movie_id: MovieId,
    pub rating: f64,
}

/// A single recommendation request, already parsed and validated by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    /// User id for `user`/`item`, movie id for the others
    pub input: u32,
    pub algorithm: Algorithm,
    pub similarity: SimilarityMetric,
    /// Maximum number of results returned
    pub recommendations: usize,
    /// Number of parallel scoring chunks
    pub concurrency: usize,
    /// Neighbour bound for the neighbourhood algorithms
    pub top_k: usize,
}

/// Output of a recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendations {
    /// Rating forecasts, best first (user and item algorithms)
    Forecasts(Vec<RatingForecast>),
    /// Similar movies, most similar first (tag, title and hybrid algorithms)
    Similar(Vec<SimilarityResult>),
}

impl Recommendations {
    pub fn len(&self) -> usize {
        match self {
            Recommendations::Forecasts(forecasts) => forecasts.len(),
            Recommendations::Similar(similar) => similar.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("user".parse::<Algorithm>().unwrap(), Algorithm::User);
        assert_eq!("Hybrid".parse::<Algorithm>().unwrap(), Algorithm::Hybrid);
        let err = "matrix".parse::<Algorithm>().unwrap_err();
        assert!(err.to_string().contains("Unknown algorithm"));
    }

    #[test]
    fn test_set_based_metrics() {
        assert!(SimilarityMetric::Jaccard.is_set_based());
        assert!(SimilarityMetric::Dice.is_set_based());
        assert!(!SimilarityMetric::Cosine.is_set_based());
        assert!(!SimilarityMetric::Pearson.is_set_based());
    }

    #[test]
    fn test_similarity_metric_round_trips_through_display() {
        for metric in [
            SimilarityMetric::Jaccard,
            SimilarityMetric::Dice,
            SimilarityMetric::Cosine,
            SimilarityMetric::Pearson,
        ] {
            assert_eq!(metric.to_string().parse::<SimilarityMetric>().unwrap(), metric);
        }
        assert!("euclid".parse::<SimilarityMetric>().is_err());
    }

    #[test]
    fn test_queries_user() {
        assert!(Algorithm::User.queries_user());
        assert!(Algorithm::Item.queries_user());
        assert!(!Algorithm::Tag.queries_user());
        assert!(!Algorithm::Hybrid.queries_user());
    }

    #[test]
    fn test_recommendations_len() {
        let similar = Recommendations::Similar(vec![SimilarityResult::new(1, 0.5)]);
        assert_eq!(similar.len(), 1);
        assert!(Recommendations::Forecasts(vec![]).is_empty());
    }
}
