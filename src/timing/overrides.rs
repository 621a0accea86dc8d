use std::collections::BTreeMap;

/// Sparse per-position duration overrides, in seconds.
///
/// Keys are indices into the current flow. Every structural edit of the flow must be
/// followed by the matching `reindex_*` call so keys keep pointing at the same poses.
/// Values are stored as given; [`crate::apply_overrides`] decides which are usable.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DurationOverrides(BTreeMap<usize, f64>);

impl DurationOverrides {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override at `index`, if any.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(&index).copied()
    }

    /// Set the override at `index`, returning the previous value.
    pub fn insert(&mut self, index: usize, seconds: f64) -> Option<f64> {
        self.0.insert(index, seconds)
    }

    /// Clear the override at `index`.
    pub fn remove(&mut self, index: usize) -> Option<f64> {
        self.0.remove(&index)
    }

    /// Entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when no override is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-key after the pose at `removed` was deleted.
    ///
    /// Keys below `removed` stay, the key at `removed` is dropped, keys above shift down
    /// by one.
    pub fn reindex_after_removal(&self, removed: usize) -> Self {
        self.iter()
            .filter_map(|(i, v)| match i.cmp(&removed) {
                std::cmp::Ordering::Less => Some((i, v)),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some((i - 1, v)),
            })
            .collect()
    }

    /// Re-key after a pose was inserted at `at`. Keys at or above `at` shift up by one.
    pub fn reindex_after_insert(&self, at: usize) -> Self {
        self.iter()
            .map(|(i, v)| if i >= at { (i + 1, v) } else { (i, v) })
            .collect()
    }

    /// Re-key after the pose at `from` was moved to `to`, the poses in between closing
    /// the gap.
    ///
    /// The mapping is a permutation of indices, so `reindex_after_move(to, from)` undoes
    /// `reindex_after_move(from, to)`.
    pub fn reindex_after_move(&self, from: usize, to: usize) -> Self {
        self.iter()
            .map(|(i, v)| (moved_index(i, from, to), v))
            .collect()
    }

    /// Drop keys that do not index into a flow of length `len`.
    pub fn retain_in_bounds(&self, len: usize) -> Self {
        self.iter().filter(|&(i, _)| i < len).collect()
    }
}

fn moved_index(i: usize, from: usize, to: usize) -> usize {
    if i == from {
        to
    } else if from < to && from < i && i <= to {
        i - 1
    } else if to < from && to <= i && i < from {
        i + 1
    } else {
        i
    }
}

impl FromIterator<(usize, f64)> for DurationOverrides {
    fn from_iter<T: IntoIterator<Item = (usize, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(usize, f64); N]> for DurationOverrides {
    fn from(value: [(usize, f64); N]) -> Self {
        value.into_iter().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/overrides.rs"]
mod tests;
