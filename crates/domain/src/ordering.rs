// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dense `1..=N` display ordering for shifts and assignments.
//!
//! Stored orders can drift (gaps, duplicates) after deletes or concurrent
//! edits, so every reorder first renormalizes and then shifts neighbours.
//! All functions return only the entries whose order changes.

use crate::error::DomainError;

/// An ordered row: a sort key (the tie-break after display order) and its order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEntry<K> {
    pub key: K,
    pub display_order: i64,
}

impl<K> OrderedEntry<K> {
    /// Creates an entry.
    #[must_use]
    pub const fn new(key: K, display_order: i64) -> Self {
        Self { key, display_order }
    }
}

/// Sorts by `(display_order, key)` and assigns `1..=N`.
///
/// Returns the full dense list in order.
#[must_use]
pub fn renormalize<K: Ord + Clone>(entries: &[OrderedEntry<K>]) -> Vec<OrderedEntry<K>> {
    let mut sorted: Vec<&OrderedEntry<K>> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.key.cmp(&b.key))
    });
    sorted
        .into_iter()
        .zip(1_i64..)
        .map(|(entry, position)| OrderedEntry::new(entry.key.clone(), position))
        .collect()
}

/// Entries whose order differs between `before` and `after` (matched by key).
#[must_use]
pub fn changed_entries<K: Eq + Clone>(
    before: &[OrderedEntry<K>],
    after: &[OrderedEntry<K>],
) -> Vec<OrderedEntry<K>> {
    after
        .iter()
        .filter(|entry| {
            before
                .iter()
                .find(|old| old.key == entry.key)
                .is_none_or(|old| old.display_order != entry.display_order)
        })
        .cloned()
        .collect()
}

/// Resolves the position for a new entry among `count` existing ones.
///
/// Defaults to the end (`count + 1`).
///
/// # Errors
///
/// Returns an error if the requested position is outside `1..=count + 1`.
pub fn resolve_insert_position(count: usize, requested: Option<i64>) -> Result<i64, DomainError> {
    let max: usize = count + 1;
    let max_i64: i64 = i64::try_from(max).unwrap_or(i64::MAX);
    let target: i64 = requested.unwrap_or(max_i64);
    if target < 1 || target > max_i64 {
        return Err(DomainError::InvalidDisplayPosition {
            requested: target,
            max,
        });
    }
    Ok(target)
}

/// Resolves a move target among `count` entries, defaulting to `current`.
///
/// # Errors
///
/// Returns an error if the requested position is outside `1..=max(count, 1)`.
pub fn resolve_move_position(
    count: usize,
    current: i64,
    requested: Option<i64>,
) -> Result<i64, DomainError> {
    let max: usize = count.max(1);
    let max_i64: i64 = i64::try_from(max).unwrap_or(i64::MAX);
    let target: i64 = requested.unwrap_or(current);
    if target < 1 || target > max_i64 {
        return Err(DomainError::InvalidDisplayPosition {
            requested: target,
            max,
        });
    }
    Ok(target)
}

/// Makes room at `target` in a dense list: entries at or after it move down one.
#[must_use]
pub fn plan_insert<K: Clone>(dense: &[OrderedEntry<K>], target: i64) -> Vec<OrderedEntry<K>> {
    dense
        .iter()
        .filter(|entry| entry.display_order >= target)
        .map(|entry| OrderedEntry::new(entry.key.clone(), entry.display_order + 1))
        .collect()
}

/// Moves `key` to `target` in a dense list.
///
/// Moving up shifts `[target, current)` down by one; moving down shifts
/// `(current, target]` up by one. The moved entry itself is included.
/// Unknown keys produce no changes.
#[must_use]
pub fn plan_move<K: Clone + Eq>(
    dense: &[OrderedEntry<K>],
    key: &K,
    target: i64,
) -> Vec<OrderedEntry<K>> {
    let Some(current) = dense
        .iter()
        .find(|entry| entry.key == *key)
        .map(|entry| entry.display_order)
    else {
        return Vec::new();
    };
    if current == target {
        return Vec::new();
    }

    let mut changes: Vec<OrderedEntry<K>> = dense
        .iter()
        .filter(|entry| entry.key != *key)
        .filter_map(|entry| {
            let order: i64 = entry.display_order;
            if target < current && (target..current).contains(&order) {
                Some(OrderedEntry::new(entry.key.clone(), order + 1))
            } else if target > current && order > current && order <= target {
                Some(OrderedEntry::new(entry.key.clone(), order - 1))
            } else {
                None
            }
        })
        .collect();
    changes.push(OrderedEntry::new(key.clone(), target));
    changes
}
