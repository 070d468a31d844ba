//! Builders that align two sparse feature maps into equal-length dense vectors.
//!
//! Position `i` of both outputs always refers to the same key. Keys are visited in
//! ascending order so repeated calls produce identical vectors.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

fn sorted_union<'a, K: Ord + 'a>(
    left: impl Iterator<Item = &'a K>,
    right: impl Iterator<Item = &'a K>,
) -> BTreeSet<&'a K> {
    left.chain(right).collect()
}

/// Aligns two keyed rating maps over the union of their keys, missing ratings as 0
pub fn rating_vectors<K: Ord + Hash>(
    a: &HashMap<K, f32>,
    b: &HashMap<K, f32>,
) -> (Vec<f32>, Vec<f32>) {
    sorted_union(a.keys(), b.keys())
        .into_iter()
        .map(|key| {
            (
                a.get(key).copied().unwrap_or(0.0),
                b.get(key).copied().unwrap_or(0.0),
            )
        })
        .unzip()
}

/// Aligns two token-count maps over the union of their tokens
pub fn occurrence_vectors(
    a: &HashMap<String, u32>,
    b: &HashMap<String, u32>,
) -> (Vec<u32>, Vec<u32>) {
    sorted_union(a.keys(), b.keys())
        .into_iter()
        .map(|token| {
            (
                a.get(token).copied().unwrap_or(0),
                b.get(token).copied().unwrap_or(0),
            )
        })
        .unzip()
}

/// TF·IDF weights for every token present in at least one of the two TF maps.
///
/// Tokens absent from `idf` weigh 0.
pub fn tf_idf_vectors(
    idf: &HashMap<String, f64>,
    tf_a: &HashMap<String, f64>,
    tf_b: &HashMap<String, f64>,
) -> (Vec<f64>, Vec<f64>) {
    sorted_union(tf_a.keys(), tf_b.keys())
        .into_iter()
        .map(|token| {
            let weight = idf.get(token).copied().unwrap_or(0.0);
            (
                tf_a.get(token).map_or(0.0, |tf| tf * weight),
                tf_b.get(token).map_or(0.0, |tf| tf * weight),
            )
        })
        .unzip()
}

/// Presence vectors of two sets over their union
pub fn presence_vectors<T: Ord + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> (Vec<bool>, Vec<bool>) {
    sorted_union(a.iter(), b.iter())
        .into_iter()
        .map(|value| (a.contains(value), b.contains(value)))
        .unzip()
}
