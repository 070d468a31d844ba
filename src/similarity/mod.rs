//! Stateless similarity metrics.
//!
//! Every function here is a pure function of its inputs. Degenerate comparisons
//! (empty sets, mismatched lengths, zero magnitude, zero variance) return exactly
//! `0.0` instead of an error or `NaN`, so callers can rank the output without
//! special cases.

use std::collections::HashSet;
use std::hash::Hash;

pub mod tfidf;
pub mod vectors;

pub use tfidf::{idf, tf, tokenize};

/// Element types that can take part in a numeric vector comparison
pub trait Feature: Copy {
    fn to_f64(self) -> f64;
}

impl Feature for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl Feature for f32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Feature for u32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Feature for i32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Feature for bool {
    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}

/// Distinct values present in both slices, in the order they appear in `b`
pub fn intersection<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let left: HashSet<&T> = a.iter().collect();
    let mut seen = HashSet::new();
    b.iter()
        .filter(|value| left.contains(value) && seen.insert(*value))
        .cloned()
        .collect()
}

/// Distinct values present in either slice, `a` first then the new ones from `b`
pub fn union<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    a.iter()
        .chain(b.iter())
        .filter(|value| seen.insert(*value))
        .cloned()
        .collect()
}

/// Sizes of (|A|, |B|, |A∩B|) after deduplication
fn overlap_counts<T: Eq + Hash>(a: &[T], b: &[T]) -> (usize, usize, usize) {
    let left: HashSet<&T> = a.iter().collect();
    let right: HashSet<&T> = b.iter().collect();
    let common = left.iter().filter(|value| right.contains(*value)).count();
    (left.len(), right.len(), common)
}

/// Jaccard index: |A∩B| / |A∪B|
///
/// Inputs are treated as sets; duplicates are ignored. Two empty sets score 0.0.
pub fn jaccard<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let (left, right, common) = overlap_counts(a, b);
    let union = left + right - common;
    if union == 0 {
        return 0.0;
    }
    common as f64 / union as f64
}

/// Sørensen–Dice coefficient: 2·|A∩B| / (|A| + |B|)
///
/// Two empty sets score 0.0.
pub fn dice<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let (left, right, common) = overlap_counts(a, b);
    if left + right == 0 {
        return 0.0;
    }
    (2 * common) as f64 / (left + right) as f64
}

pub fn dot_f64(x: &f64, y: &f64) -> f64 {
    x * y
}

pub fn dot_f32(x: &f32, y: &f32) -> f64 {
    f64::from(*x) * f64::from(*y)
}

pub fn dot_u32(x: &u32, y: &u32) -> f64 {
    f64::from(*x) * f64::from(*y)
}

/// Boolean product: 1.0 iff both are set
pub fn dot_bool(x: &bool, y: &bool) -> f64 {
    if *x && *y {
        1.0
    } else {
        0.0
    }
}

/// Cosine similarity with a pluggable element-pair product.
///
/// The same `dot` is used for the magnitudes, so `dot(x, x)` must be the squared
/// contribution of `x`. Mismatched lengths or a zero magnitude score 0.0.
pub fn cosine_by<T, F>(a: &[T], b: &[T], dot: F) -> f64
where
    F: Fn(&T, &T) -> f64,
{
    if a.len() != b.len() {
        return 0.0;
    }

    let mut product = 0.0;
    let mut magnitude_a = 0.0;
    let mut magnitude_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        product += dot(x, y);
        magnitude_a += dot(x, x);
        magnitude_b += dot(y, y);
    }

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }
    product / (magnitude_a.sqrt() * magnitude_b.sqrt())
}

/// Cosine similarity using the numeric value of each element
pub fn cosine<T: Feature>(a: &[T], b: &[T]) -> f64 {
    cosine_by(a, b, |x, y| x.to_f64() * y.to_f64())
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// Sample Pearson correlation coefficient.
///
/// Returns 0.0 for mismatched lengths, empty input, or a constant vector on
/// either side.
pub fn pearson<T: Feature>(a: &[T], b: &[T]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let xs: Vec<f64> = a.iter().map(|x| x.to_f64()).collect();
    let ys: Vec<f64> = b.iter().map(|y| y.to_f64()).collect();
    // rounding in the mean would otherwise leave a tiny non-zero variance
    if is_constant(&xs) || is_constant(&ys) {
        return 0.0;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut spread_x = 0.0;
    let mut spread_y = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        spread_x += dx * dx;
        spread_y += dy * dy;
    }

    let denominator = spread_x.sqrt() * spread_y.sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    covariance / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn test_jaccard_reference_sets() {
        let a = [1, 2, 3, 7, 10, 20, 100];
        let b = [2, 3, 4, 17, 20];
        assert!((jaccard(&a, &b) - 0.333333).abs() < TOLERANCE);
    }

    #[test]
    fn test_jaccard_empty_sets() {
        let empty: [u32; 0] = [];
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&[1u32], &empty), 0.0);
    }

    #[test]
    fn test_jaccard_ignores_duplicates() {
        assert_eq!(jaccard(&["a", "a", "b"], &["a", "b", "b"]), 1.0);
    }

    #[test]
    fn test_dice_reference_sets() {
        let a = [1, 2, 3, 7, 10, 20, 100];
        let b = [2, 3, 4, 17, 20];
        assert!((dice(&a, &b) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_dice_empty_sets_are_neutral() {
        let empty: [&str; 0] = [];
        assert_eq!(dice(&empty, &empty), 0.0);
    }

    #[test]
    fn test_cosine_reference_vectors() {
        let a = [3.4f32, 4.7, 1.5, 2.0, 5.0];
        let b = [4.0f32, 5.0, 1.4, 2.5, 4.0];
        assert!((cosine_by(&a, &b, dot_f32) - 0.986860).abs() < TOLERANCE);
        assert!((cosine(&a, &b) - 0.986860).abs() < TOLERANCE);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine(&[1.0], &[1.0, 2.0]), 0.0);
        let empty: [f64; 0] = [];
        assert_eq!(cosine(&empty, &empty), 0.0);
    }

    #[test]
    fn test_cosine_boolean_vectors() {
        let a = [true, true, false, true];
        let b = [true, false, true, true];
        // 2 / (sqrt(3) * sqrt(3))
        assert!((cosine_by(&a, &b, dot_bool) - 2.0 / 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_cosine_integer_vectors() {
        let a = [1u32, 2, 0];
        let b = [2u32, 4, 0];
        assert!((cosine_by(&a, &b, dot_u32) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_pearson_reference_vectors() {
        let a = [3.4f32, 4.7, 1.5, 2.0, 5.0];
        let b = [4.0f32, 5.0, 1.4, 2.5, 4.0];
        assert!((pearson(&a, &b) - 0.909470).abs() < TOLERANCE);
    }

    #[test]
    fn test_pearson_constant_vectors_score_zero() {
        assert_eq!(pearson(&[0.1, 0.1, 0.1], &[0.1, 0.1, 0.1]), 0.0);
        assert_eq!(pearson(&[3.0, 3.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_pearson_mismatched_and_empty() {
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
        let empty: [f64; 0] = [];
        assert_eq!(pearson(&empty, &empty), 0.0);
    }

    #[test]
    fn test_pearson_perfect_negative_correlation() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_intersection_and_union() {
        assert_eq!(intersection(&[1, 2, 3], &[3, 2, 2, 5]), vec![3, 2]);
        assert_eq!(union(&[1, 2, 2], &[2, 4]), vec![1, 2, 4]);
    }

    proptest! {
        #[test]
        fn prop_jaccard_symmetric(a in prop::collection::vec(0u32..20, 0..15), b in prop::collection::vec(0u32..20, 0..15)) {
            prop_assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        }

        #[test]
        fn prop_jaccard_self_is_one(a in prop::collection::vec(0u32..50, 1..15)) {
            prop_assert_eq!(jaccard(&a, &a), 1.0);
        }

        #[test]
        fn prop_dice_bounded_and_above_jaccard(a in prop::collection::vec(0u32..20, 0..15), b in prop::collection::vec(0u32..20, 0..15)) {
            let d = dice(&a, &b);
            prop_assert!((0.0..=1.0).contains(&d));
            if !intersection(&a, &b).is_empty() {
                prop_assert!(d >= jaccard(&a, &b));
            }
        }

        #[test]
        fn prop_cosine_and_pearson_symmetric(pairs in prop::collection::vec((0.0f64..5.0, 0.0f64..5.0), 0..12)) {
            let a: Vec<f64> = pairs.iter().map(|p| p.0).collect();
            let b: Vec<f64> = pairs.iter().map(|p| p.1).collect();
            prop_assert!((cosine(&a, &b) - cosine(&b, &a)).abs() < 1e-12);
            prop_assert!((pearson(&a, &b) - pearson(&b, &a)).abs() < 1e-12);
            let p = pearson(&a, &b);
            prop_assert!(!p.is_nan() && (-1.0 - 1e-9..=1.0 + 1e-9).contains(&p));
        }
    }
}
