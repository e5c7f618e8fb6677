//! In-memory aggregation stages
//!
//! Small building blocks the analytics functions chain together:
//! unwind (flatten line items), group + sum, average, lookup by reference,
//! and percentage share.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::ops::AddAssign;

use crate::models::{LineItem, Order};

/// Flatten orders into their line items
pub fn unwind_items(orders: &[Order]) -> impl Iterator<Item = &LineItem> {
    orders.iter().flat_map(|o| o.order_items.iter())
}

/// Group rows by key and sum a value per group
pub fn sum_by<T, K, V>(
    rows: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> V,
) -> HashMap<K, V>
where
    K: Eq + Hash,
    V: AddAssign + Default,
{
    let mut groups: HashMap<K, V> = HashMap::new();
    for row in rows {
        *groups.entry(key(&row)).or_default() += value(&row);
    }
    groups
}

/// Like [`sum_by`], with groups kept in ascending key order
pub fn sum_by_ordered<T, K, V>(
    rows: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> V,
) -> BTreeMap<K, V>
where
    K: Ord,
    V: AddAssign + Default,
{
    let mut groups: BTreeMap<K, V> = BTreeMap::new();
    for row in rows {
        *groups.entry(key(&row)).or_default() += value(&row);
    }
    groups
}

/// Arithmetic mean, `None` for an empty input
pub fn average(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Index documents by reference for joins
pub fn index_by<'a, T, K>(rows: &'a [T], key: impl Fn(&'a T) -> K) -> HashMap<K, &'a T>
where
    K: Eq + Hash,
{
    rows.iter().map(|row| (key(row), row)).collect()
}

/// `part` as a percentage of `total`, `0` when `total` is not positive
pub fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Round to the nearest integer, halves toward positive infinity
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_by_groups_and_sums() {
        let rows = vec![("a", 1u64), ("b", 2), ("a", 3)];
        let groups = sum_by(rows, |r| r.0, |r| r.1);
        assert_eq!(groups["a"], 4);
        assert_eq!(groups["b"], 2);
    }

    #[test]
    fn test_sum_by_ordered_sorts_keys() {
        let rows = vec![("2024-03-02", 1.0), ("2024-03-01", 2.0), ("2024-03-02", 0.5)];
        let groups: Vec<_> = sum_by_ordered(rows, |r| r.0, |r| r.1).into_iter().collect();
        assert_eq!(groups, vec![("2024-03-01", 2.0), ("2024-03-02", 1.5)]);
    }

    #[test]
    fn test_average_empty_is_none() {
        assert_eq!(average(Vec::<f64>::new()), None);
        assert_eq!(average(vec![2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_share_guards_zero_total() {
        assert_eq!(share(5.0, 0.0), 0.0);
        assert_eq!(share(5.0, 20.0), 25.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(-12.5), -12);
        assert_eq!(round_half_up(12.5), 13);
        assert_eq!(round_half_up(-12.6), -13);
        assert_eq!(round_half_up(33.3), 33);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.005_1), 2.01);
    }
}
