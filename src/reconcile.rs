//! Keyed reconciliation between retained elements and new data.
//!
//! Computes the enter/update/exit partition that brings a retained
//! visual-element collection in line with an incoming data collection,
//! pairing by key. The plan is a plain value: the rendering layer
//! decides how entering elements are initialized and how transitions
//! are driven (see [`crate::render`]).

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{Error, Result};

/// The disjoint enter/update/exit partition for one render pass.
///
/// `entering` and `updating` follow the data collection's order,
/// `exiting` follows the element collection's order. Together they
/// cover every data item and every prior element exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationPlan<E, D> {
    /// Data items with no prior element; a fresh element is created
    /// for each, initialized to a caller-defined start state.
    pub entering: Vec<D>,
    /// Prior elements paired with their matching data item; the
    /// element's accumulated rendering state is preserved.
    pub updating: Vec<(E, D)>,
    /// Prior elements whose key no longer appears in the data.
    pub exiting: Vec<E>,
}

impl<E, D> ReconciliationPlan<E, D> {
    /// True when nothing enters, updates, or exits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.updating.is_empty() && self.exiting.is_empty()
    }
}

/// Partition `current` elements against `next` data items by key.
///
/// Given identical inputs the plan is identical every call: ordering
/// comes from the input slices, never from hash iteration. Duplicate
/// keys among `current` pair the first occurrence and retire the rest
/// through `exiting`.
///
/// # Errors
///
/// Returns [`Error::DuplicateKey`] if `next_key` produces a repeated
/// key within `next`, since the pairing would be ambiguous.
pub fn plan<E, D, K>(
    current: Vec<E>,
    next: Vec<D>,
    current_key: impl Fn(&E) -> K,
    next_key: impl Fn(&D) -> K,
) -> Result<ReconciliationPlan<E, D>>
where
    K: Eq + Hash + Clone + Display,
{
    let next_keys: Vec<K> = next.iter().map(&next_key).collect();
    let mut seen: HashSet<&K> = HashSet::with_capacity(next_keys.len());
    for key in &next_keys {
        if !seen.insert(key) {
            return Err(Error::DuplicateKey { key: key.to_string() });
        }
    }

    // First unclaimed current element per key; claims remove entries,
    // so output order still comes from the input slices.
    let mut by_key: HashMap<K, usize> = HashMap::with_capacity(current.len());
    for (i, element) in current.iter().enumerate() {
        by_key.entry(current_key(element)).or_insert(i);
    }

    let paired: Vec<Option<usize>> =
        next_keys.iter().map(|key| by_key.remove(key)).collect();

    let mut slots: Vec<Option<E>> = current.into_iter().map(Some).collect();
    let mut entering = Vec::new();
    let mut updating = Vec::new();

    for (item, pair) in next.into_iter().zip(paired) {
        match pair {
            Some(i) => {
                let element = slots[i].take().expect("element claimed exactly once");
                updating.push((element, item));
            }
            None => entering.push(item),
        }
    }

    let exiting: Vec<E> = slots.into_iter().flatten().collect();

    Ok(ReconciliationPlan { entering, updating, exiting })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_partition() {
        let current = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let next = vec!["b".to_string(), "c".to_string(), "d".to_string()];
        let plan = plan(current, next, Clone::clone, Clone::clone).unwrap();

        assert_eq!(plan.entering, vec!["d"]);
        assert_eq!(
            plan.updating,
            vec![
                ("b".to_string(), "b".to_string()),
                ("c".to_string(), "c".to_string())
            ]
        );
        assert_eq!(plan.exiting, vec!["a"]);
    }

    #[test]
    fn test_plan_orders_follow_inputs() {
        let current = vec!["z".to_string(), "a".to_string(), "m".to_string()];
        let next = vec!["m".to_string(), "q".to_string(), "a".to_string()];
        let plan = plan(current, next, Clone::clone, Clone::clone).unwrap();

        // updating in next order, exiting in current order
        let updated: Vec<&str> = plan.updating.iter().map(|(_, d)| d.as_str()).collect();
        assert_eq!(updated, vec!["m", "a"]);
        assert_eq!(plan.exiting, vec!["z"]);
        assert_eq!(plan.entering, vec!["q"]);
    }

    #[test]
    fn test_plan_all_entering() {
        let plan =
            plan(Vec::<String>::new(), vec![1, 2, 3], Clone::clone, |d| d.to_string())
                .unwrap();
        assert_eq!(plan.entering, vec![1, 2, 3]);
        assert!(plan.updating.is_empty());
        assert!(plan.exiting.is_empty());
    }

    #[test]
    fn test_plan_all_exiting() {
        let current = vec!["a".to_string(), "b".to_string()];
        let plan = plan(current, Vec::<String>::new(), Clone::clone, Clone::clone).unwrap();
        assert!(plan.entering.is_empty());
        assert!(plan.updating.is_empty());
        assert_eq!(plan.exiting, vec!["a", "b"]);
    }

    #[test]
    fn test_plan_empty_both() {
        let plan =
            plan(Vec::<String>::new(), Vec::<String>::new(), Clone::clone, Clone::clone)
                .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plan_duplicate_next_key() {
        let next = vec!["a".to_string(), "a".to_string()];
        let result = plan(Vec::<String>::new(), next, Clone::clone, Clone::clone);
        assert_eq!(result, Err(Error::DuplicateKey { key: "a".to_string() }));
    }

    #[test]
    fn test_plan_duplicate_current_pairs_first() {
        // Two stale elements share a key: the first pairs, the second exits.
        let current = vec![("a", 1), ("a", 2), ("b", 3)];
        let next = vec!["a".to_string()];
        let plan = plan(current, next, |e| e.0.to_string(), Clone::clone).unwrap();

        assert_eq!(plan.updating, vec![(("a", 1), "a".to_string())]);
        assert_eq!(plan.exiting, vec![("a", 2), ("b", 3)]);
    }

    #[test]
    fn test_plan_completeness() {
        let current: Vec<String> = ["a", "b", "c", "d"].iter().map(ToString::to_string).collect();
        let next: Vec<String> = ["c", "e", "a"].iter().map(ToString::to_string).collect();
        let plan = plan(current.clone(), next.clone(), Clone::clone, Clone::clone).unwrap();

        let mut next_covered: Vec<String> = plan.entering.clone();
        next_covered.extend(plan.updating.iter().map(|(_, d)| d.clone()));
        next_covered.sort();
        let mut expected_next = next;
        expected_next.sort();
        assert_eq!(next_covered, expected_next);

        let mut current_covered: Vec<String> = plan.exiting.clone();
        current_covered.extend(plan.updating.iter().map(|(e, _)| e.clone()));
        current_covered.sort();
        let mut expected_current = current;
        expected_current.sort();
        assert_eq!(current_covered, expected_current);
    }
}
