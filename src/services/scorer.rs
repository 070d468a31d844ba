//! Parallel fan-out/fan-in similarity scoring with exact top-K retention.
//!
//! Candidates are split into contiguous chunks, one scoped worker task per chunk.
//! Each worker keeps only its own top-K before handing its list over, which is
//! exact: an entity in the global top-K has fewer than K better-ranked entities in
//! the whole candidate list, so it has fewer than K in its own chunk as well.
//!
//! Ranking is descending by score with ties left in candidate order (stable sort).
//! Chunk outputs are re-assembled in chunk order after the join, so that order does
//! not depend on which worker finished first.

use parking_lot::Mutex;

use crate::models::SimilarityResult;

/// Computes the similarity of one candidate to a fixed query
pub trait CandidateScorer: Sync {
    /// Score of `candidate`, or `None` when it should not be ranked at all
    fn score(&self, candidate: u32) -> Option<f64>;
}

impl<F> CandidateScorer for F
where
    F: Fn(u32) -> Option<f64> + Sync,
{
    fn score(&self, candidate: u32) -> Option<f64> {
        self(candidate)
    }
}

/// Splits `items` into `min(parts, items.len())` contiguous chunks of equal size,
/// the last one absorbing the remainder
pub fn partition<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }
    let parts = parts.clamp(1, items.len());
    let size = items.len() / parts;

    let mut chunks = Vec::with_capacity(parts);
    for index in 0..parts {
        let start = index * size;
        let end = if index + 1 == parts {
            items.len()
        } else {
            start + size
        };
        chunks.push(&items[start..end]);
    }
    chunks
}

/// Stable-sorts `results` by descending score and keeps at most `top_k` of them
pub fn retain_top(results: &mut Vec<SimilarityResult>, top_k: Option<usize>) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(k) = top_k {
        results.truncate(k);
    }
}

/// Scores every candidate in parallel and returns the best `top_k`, best first.
///
/// `top_k = None` keeps every scored candidate. Blocks until all workers finish;
/// there is no cancellation.
pub fn score<S>(
    scorer: &S,
    candidates: &[u32],
    concurrency: usize,
    top_k: Option<usize>,
) -> Vec<SimilarityResult>
where
    S: CandidateScorer + ?Sized,
{
    let chunks = partition(candidates, concurrency);
    let collected: Mutex<Vec<(usize, Vec<SimilarityResult>)>> =
        Mutex::new(Vec::with_capacity(chunks.len()));

    rayon::scope(|scope| {
        for (index, chunk) in chunks.iter().enumerate() {
            let collected = &collected;
            scope.spawn(move |_| {
                let mut local: Vec<SimilarityResult> = chunk
                    .iter()
                    .filter_map(|&id| scorer.score(id).map(|score| SimilarityResult::new(id, score)))
                    .collect();
                retain_top(&mut local, top_k);
                collected.lock().push((index, local));
            });
        }
    });

    let mut per_chunk = collected.into_inner();
    per_chunk.sort_unstable_by_key(|(index, _)| *index);

    let mut merged: Vec<SimilarityResult> = per_chunk
        .into_iter()
        .flat_map(|(_, results)| results)
        .collect();
    retain_top(&mut merged, top_k);

    tracing::debug!(
        candidates = candidates.len(),
        chunks = chunks.len(),
        retained = merged.len(),
        "Scored candidates"
    );

    merged
}
