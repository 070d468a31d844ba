//! Content-based similarity: tag tokens, title TF-IDF, and the hybrid pipeline
//! that blends both with item-item similarity.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::{MovieId, RecommendationRequest, SimilarityMetric, SimilarityResult};
use crate::similarity::{
    cosine_by, dice, dot_f64, dot_u32, jaccard, pearson,
    tfidf::{idf_from_tokens, tf_from_tokens},
    vectors::{occurrence_vectors, tf_idf_vectors},
};

use super::hybrid;
use super::prefilter::{prefilter, shares_feature};
use super::scorer::{self, CandidateScorer};
use super::{Recommender, TagCounts};

/// Similarity of two movies' tag-occurrence counts.
///
/// Set metrics look at the distinct tokens only; vector metrics at the counts.
/// Pearson is mapped from [-1, 1] onto [0, 1], so 0.5 means uncorrelated.
pub fn compare_tags(a: &TagCounts, b: &TagCounts, metric: SimilarityMetric) -> f64 {
    if metric.is_set_based() {
        let (left, right) = (token_keys(a), token_keys(b));
        return match metric {
            SimilarityMetric::Jaccard => jaccard(&left, &right),
            _ => dice(&left, &right),
        };
    }

    let (left, right) = occurrence_vectors(a, b);
    match metric {
        SimilarityMetric::Pearson => ((pearson(&left, &right) + 1.0) / 2.0).clamp(0.0, 1.0),
        _ => cosine_by(&left, &right, dot_u32),
    }
}

/// Similarity of two tokenized titles, weighting tokens by `idf` for the vector metrics
pub fn compare_titles(
    query: &[String],
    candidate: &[String],
    idf: &HashMap<String, f64>,
    metric: SimilarityMetric,
) -> f64 {
    match metric {
        SimilarityMetric::Jaccard => jaccard(query, candidate),
        SimilarityMetric::Dice => dice(query, candidate),
        SimilarityMetric::Cosine | SimilarityMetric::Pearson => {
            let (left, right) =
                tf_idf_vectors(idf, &tf_from_tokens(query), &tf_from_tokens(candidate));
            if metric == SimilarityMetric::Cosine {
                cosine_by(&left, &right, dot_f64)
            } else {
                pearson(&left, &right)
            }
        }
    }
}

fn token_keys(counts: &TagCounts) -> Vec<&str> {
    counts.keys().map(String::as_str).collect()
}

struct TagScorer<'a> {
    engine: &'a Recommender,
    query: Arc<TagCounts>,
    metric: SimilarityMetric,
}

impl CandidateScorer for TagScorer<'_> {
    fn score(&self, candidate: u32) -> Option<f64> {
        let counts = self.engine.tag_counts(candidate);
        if counts.is_empty() {
            return None;
        }
        Some(compare_tags(&self.query, &counts, self.metric))
    }
}

struct TitleScorer<'a> {
    engine: &'a Recommender,
    query_tokens: Arc<Vec<String>>,
    idf: HashMap<String, f64>,
    metric: SimilarityMetric,
}

impl CandidateScorer for TitleScorer<'_> {
    fn score(&self, candidate: u32) -> Option<f64> {
        let tokens = self.engine.title_tokens(candidate);
        if tokens.is_empty() {
            return None;
        }
        Some(compare_titles(&self.query_tokens, &tokens, &self.idf, self.metric))
    }
}

impl Recommender {
    /// Tagged movies sharing at least one tag token with `query`, most similar first
    pub fn similar_by_tags(
        &self,
        query: MovieId,
        metric: SimilarityMetric,
        concurrency: usize,
        top_k: Option<usize>,
    ) -> Vec<SimilarityResult> {
        let query_counts = self.tag_counts(query);
        if query_counts.is_empty() {
            return Vec::new();
        }

        let tokens: HashSet<String> = query_counts.keys().cloned().collect();
        let candidates = prefilter(query, self.dataset.tags.keys().copied(), |id| {
            shares_feature(&tokens, self.tag_counts(id).keys())
        });

        let scorer = TagScorer {
            engine: self,
            query: query_counts,
            metric,
        };
        scorer::score(&scorer, &candidates, concurrency, top_k)
    }

    /// Titled movies sharing at least one title token with `query`, most similar first.
    ///
    /// Token IDF is computed over `universe` (every titled movie when `None`);
    /// candidates are drawn from the same universe.
    pub fn similar_by_title(
        &self,
        query: MovieId,
        universe: Option<&[MovieId]>,
        metric: SimilarityMetric,
        concurrency: usize,
        top_k: Option<usize>,
    ) -> Vec<SimilarityResult> {
        let query_tokens = self.title_tokens(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let universe: Vec<MovieId> = match universe {
            Some(ids) => ids
                .iter()
                .copied()
                .filter(|id| self.dataset.titles.contains_key(id))
                .collect(),
            None => self.dataset.titles.keys().copied().collect(),
        };

        let documents: Vec<Arc<Vec<String>>> =
            universe.iter().map(|id| self.title_tokens(*id)).collect();
        let idf = idf_from_tokens(documents.iter().map(|tokens| tokens.as_slice()));

        let distinct: HashSet<String> = query_tokens.iter().cloned().collect();
        let candidates = prefilter(query, universe.iter().copied(), |id| {
            shares_feature(&distinct, self.title_tokens(id).iter())
        });

        let scorer = TitleScorer {
            engine: self,
            query_tokens,
            idf,
            metric,
        };
        scorer::score(&scorer, &candidates, concurrency, top_k)
    }

    pub(crate) fn recommend_by_tag(&self, request: &RecommendationRequest) -> Vec<SimilarityResult> {
        self.similar_by_tags(
            request.input,
            request.similarity,
            request.concurrency,
            Some(request.recommendations),
        )
    }

    pub(crate) fn recommend_by_title(&self, request: &RecommendationRequest) -> Vec<SimilarityResult> {
        self.similar_by_title(
            request.input,
            None,
            request.similarity,
            request.concurrency,
            Some(request.recommendations),
        )
    }

    /// Tag matches narrow the title universe, title matches narrow the item-item
    /// candidates; the three lists are then blended.
    pub(crate) fn recommend_hybrid(&self, request: &RecommendationRequest) -> Vec<SimilarityResult> {
        let query = request.input;
        let (metric, concurrency) = (request.similarity, request.concurrency);

        let by_tag = self.similar_by_tags(query, metric, concurrency, None);

        let mut universe: Vec<MovieId> = by_tag.iter().map(|r| r.id).collect();
        universe.push(query);
        let by_title =
            self.similar_by_title(query, Some(universe.as_slice()), metric, concurrency, None);

        let by_item = self.similar_movies(
            query,
            by_title.iter().map(|r| r.id),
            metric,
            concurrency,
            None,
        );

        tracing::debug!(
            by_tag = by_tag.len(),
            by_title = by_title.len(),
            by_item = by_item.len(),
            "Combining hybrid similarity lists"
        );
        hybrid::combine(by_item, by_title, by_tag, request.recommendations)
    }
}
