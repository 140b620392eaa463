//! Two-phase condition deduplication.
//!
//! Phase one drops structurally identical records; phase two keeps at
//! most one record per `(class_name, parameter)` pair. Both phases use
//! insertion-ordered containers so "first wins" means first in document
//! order — an explicit, testable policy rather than an artifact of hash
//! ordering.

use std::hash::Hash;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::resolve::ResolvedCondition;

/// Drop exact duplicates, keeping first occurrences in order.
pub fn dedup_structural<T: Hash + Eq>(items: Vec<T>) -> Vec<T> {
    items.into_iter().collect::<IndexSet<T>>().into_iter().collect()
}

/// Collapse to at most one condition per `(class_name, parameter)`.
///
/// A class may guard the same attribute from several transitions with
/// different thresholds; only the first-encountered condition feeds
/// domain synthesis, because a second threshold would double-count the
/// same logical dimension in the Cartesian product. The later thresholds
/// are dropped by design.
pub fn dedup_by_attribute(conditions: Vec<ResolvedCondition>) -> Vec<ResolvedCondition> {
    let mut by_key: IndexMap<(Arc<str>, Arc<str>), ResolvedCondition> = IndexMap::new();
    for condition in conditions {
        let key = (condition.class_name.clone(), condition.parameter.clone());
        by_key.entry(key).or_insert(condition);
    }
    by_key.into_values().collect()
}
