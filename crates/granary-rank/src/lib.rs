//! # granary-rank
//!
//! Top-N ranking over a completed harvest.
//!
//! [`top_n`] is the contract: descending by key, stable on ties (input order
//! preserved), length `min(n, len)`. [`Leaderboards`] layers the named
//! projections of the analysis stage on top, memoizing each ranked order per
//! `(projection, n)` for the life of the value. The cache is keyed by
//! projection identity, not by content, which is why the collections are
//! owned and never mutated after construction; a fresh `Leaderboards` per
//! harvest run is the invalidation strategy.

mod leaderboard;

pub use leaderboard::{Leaderboards, TaxonomyRow};

use std::cmp::Ordering;

/// Indices of the top `n` items, descending by `key`, stable on ties.
///
/// Incomparable keys (NaN) compare equal, so ordering stays deterministic.
/// `None` keys rank below every present value.
pub(crate) fn top_indices<T, K, F>(items: &[T], n: usize, key: F) -> Vec<usize>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut order: Vec<usize> = (0..items.len()).collect();
    // A stable sort with a reversed comparator keeps input order on ties.
    order.sort_by(|&a, &b| {
        key(&items[b])
            .partial_cmp(&key(&items[a]))
            .unwrap_or(Ordering::Equal)
    });
    order.truncate(n);
    order
}

/// The top `n` items of `collection`, descending by `key`.
///
/// Returns `min(n, collection.len())` references, stable on ties: among equal
/// keys, the collection's own order is preserved, so leaderboard output is
/// deterministic across runs with identical data.
pub fn top_n<T, K, F>(collection: &[T], n: usize, key: F) -> Vec<&T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    top_indices(collection, n, key)
        .into_iter()
        .map(|index| &collection[index])
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        label: &'static str,
        score: Option<u64>,
    }

    const fn item(label: &'static str, score: u64) -> Item {
        Item {
            label,
            score: Some(score),
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(4, 4)]
    #[case(10, 4)]
    fn length_is_min_of_n_and_collection_size(#[case] n: usize, #[case] expected: usize) {
        let items = [item("a", 1), item("b", 2), item("c", 3), item("d", 4)];
        assert_eq!(top_n(&items, n, |i| i.score).len(), expected);
    }

    #[test]
    fn sorted_descending_by_key() {
        let items = [item("low", 10), item("high", 500), item("mid", 300)];
        let top: Vec<&str> = top_n(&items, 3, |i| i.score)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(top, vec!["high", "mid", "low"]);
    }

    #[test]
    fn ties_preserve_collection_order() {
        let items = [
            item("first", 7),
            item("second", 7),
            item("third", 7),
            item("winner", 9),
        ];
        let top: Vec<&str> = top_n(&items, 4, |i| i.score)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(top, vec!["winner", "first", "second", "third"]);
    }

    #[test]
    fn missing_keys_rank_below_all_present_values() {
        let items = [
            Item {
                label: "unknown",
                score: None,
            },
            item("small", 1),
            item("big", 2),
        ];
        let top: Vec<&str> = top_n(&items, 3, |i| i.score)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(top, vec!["big", "small", "unknown"]);
    }

    #[test]
    fn nan_keys_do_not_panic_or_reorder() {
        let items = [("a", f64::NAN), ("b", 2.0), ("c", 1.0)];
        let top: Vec<&str> = top_n(&items, 3, |i| i.1).into_iter().map(|i| i.0).collect();
        // NaN comparisons tie; sort stability keeps "a" in place.
        assert_eq!(top.len(), 3);
        assert_eq!(top[0], "a");
    }
}
