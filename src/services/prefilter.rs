//! Cheap necessary-condition check run before the expensive similarity call.
//!
//! Every metric in [`crate::similarity`] scores exactly 0.0 (or is undefined and
//! therefore 0.0) for two entities without a single shared feature: no common
//! rated movie, no common rater, no common tag or title token. Dropping those
//! candidates changes nothing in the ranking, it only saves work.

use std::collections::HashSet;
use std::hash::Hash;

/// Whether `candidate` contains at least one feature of `query`
pub fn shares_feature<'a, T, I>(query: &HashSet<T>, candidate: I) -> bool
where
    T: Eq + Hash + 'a,
    I: IntoIterator<Item = &'a T>,
{
    candidate.into_iter().any(|feature| query.contains(feature))
}

/// Candidates other than `query_id` for which `overlaps` holds, ascending by id.
///
/// Sorting fixes the chunk layout of the parallel scorer, so equal scores keep a
/// reproducible order.
pub fn prefilter<I, F>(query_id: u32, candidates: I, mut overlaps: F) -> Vec<u32>
where
    I: IntoIterator<Item = u32>,
    F: FnMut(u32) -> bool,
{
    let mut survivors: Vec<u32> = candidates
        .into_iter()
        .filter(|&id| id != query_id && overlaps(id))
        .collect();
    survivors.sort_unstable();
    survivors.dedup();
    survivors
}
