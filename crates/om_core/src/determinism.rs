//! Determinism utilities: stable ranking over grouped values.
//!
//! Views group by country through `BTreeMap`, so the grouping order is
//! ascending country name. Ranking must keep that order for equal values;
//! `slice::sort_by` is stable, which is all these helpers rely on.

use alloc::vec::Vec;
use core::cmp::Ordering;

/// Sort `(key, value)` pairs by value descending, ties in input order, and keep `n`.
pub fn top_n_desc<K, V: Ord>(mut items: Vec<(K, V)>, n: usize) -> Vec<(K, V)> {
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items.truncate(n);
    items
}

/// Same as `top_n_desc`, with a caller-supplied value comparison.
pub fn top_n_desc_by<T, F>(mut items: Vec<T>, n: usize, mut cmp: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(|a, b| cmp(b, a));
    items.truncate(n);
    items
}
