use crate::models::SimilarityResult;

use super::scorer::retain_top;

pub const ITEM_WEIGHT: f64 = 0.2;
pub const TITLE_WEIGHT: f64 = 0.4;
pub const TAG_WEIGHT: f64 = 0.4;

/// Blends item-item, title and tag similarity lists for the same query movie.
///
/// Only movies present in all three lists are kept; each gets
/// `0.2·item + 0.4·title + 0.4·tag`. The lists are merge-joined on ascending id,
/// and the blend is returned best first, at most `count` entries.
pub fn combine(
    mut by_item: Vec<SimilarityResult>,
    mut by_title: Vec<SimilarityResult>,
    mut by_tag: Vec<SimilarityResult>,
    count: usize,
) -> Vec<SimilarityResult> {
    for list in [&mut by_item, &mut by_title, &mut by_tag] {
        list.sort_by_key(|result| result.id);
    }

    let mut combined = Vec::new();
    let (mut i, mut t, mut g) = (0, 0, 0);
    while i < by_item.len() && t < by_title.len() && g < by_tag.len() {
        let (item, title, tag) = (by_item[i], by_title[t], by_tag[g]);

        if item.id == title.id && item.id == tag.id {
            let score = ITEM_WEIGHT * item.score + TITLE_WEIGHT * title.score + TAG_WEIGHT * tag.score;
            combined.push(SimilarityResult::new(item.id, score));
            i += 1;
            t += 1;
            g += 1;
            continue;
        }

        let smallest = item.id.min(title.id).min(tag.id);
        if item.id == smallest {
            i += 1;
        }
        if title.id == smallest {
            t += 1;
        }
        if tag.id == smallest {
            g += 1;
        }
    }

    retain_top(&mut combined, Some(count));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[(u32, f64)]) -> Vec<SimilarityResult> {
        entries
            .iter()
            .map(|&(id, score)| SimilarityResult::new(id, score))
            .collect()
    }

    #[test]
    fn test_combine_reference_example() {
        let combined = combine(
            list(&[(1, 0.9), (2, 0.5)]),
            list(&[(1, 0.8), (3, 0.4)]),
            list(&[(1, 0.7), (2, 0.3)]),
            10,
        );

        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id, 1);
        assert!((combined[0].score - 0.78).abs() < 1e-9);
    }

    #[test]
    fn test_combine_accepts_score_ordered_input() {
        let combined = combine(
            list(&[(5, 0.9), (2, 0.6), (9, 0.1)]),
            list(&[(9, 1.0), (2, 0.5), (5, 0.4)]),
            list(&[(2, 0.9), (9, 0.5), (5, 0.2)]),
            10,
        );

        let ids: Vec<u32> = combined.iter().map(|r| r.id).collect();
        // 2: 0.12+0.2+0.36=0.68, 9: 0.02+0.4+0.2=0.62, 5: 0.18+0.16+0.08=0.42
        assert_eq!(ids, vec![2, 9, 5]);
    }

    #[test]
    fn test_combine_truncates_to_count() {
        let entries = [(1, 0.5), (2, 0.6), (3, 0.7)];
        let combined = combine(list(&entries), list(&entries), list(&entries), 2);
        let ids: Vec<u32> = combined.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_combine_empty_intersection() {
        let combined = combine(
            list(&[(1, 0.9)]),
            list(&[(2, 0.9)]),
            list(&[(3, 0.9)]),
            10,
        );
        assert!(combined.is_empty());
        assert!(combine(vec![], list(&[(1, 1.0)]), list(&[(1, 1.0)]), 5).is_empty());
    }
}
