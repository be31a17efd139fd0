//! Change detection between the previous tick's residual entries and the
//! current tick's fresh entries.

/// Result of diffing two sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<T> {
    /// In the previous sequence only, in previous order.
    pub removed: Vec<T>,
    /// In both, in previous order. Holds the current sequence's element.
    pub remained: Vec<T>,
    /// In the current sequence only, in current order.
    pub added: Vec<T>,
}

impl<T> Diff<T> {
    /// The authoritative worklist: carried-over entries first, then new
    /// ones. Removed entries are dropped.
    pub fn into_worklist(self) -> Vec<T> {
        let mut worklist = self.remained;
        worklist.extend(self.added);
        worklist
    }

    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Partition `previous` and `current` by the equivalence `same`.
///
/// Each previous entry claims the earliest equivalent current entry not
/// yet claimed, so repeated identical entries are matched one-to-one.
pub fn diff<T, F>(previous: Vec<T>, current: Vec<T>, same: F) -> Diff<T>
where
    F: Fn(&T, &T) -> bool,
{
    let mut added = current;
    let mut removed = Vec::new();
    let mut remained = Vec::new();

    for old in previous {
        match added.iter().position(|new| same(&old, new)) {
            Some(index) => remained.push(added.remove(index)),
            None => removed.push(old),
        }
    }

    Diff {
        removed,
        remained,
        added,
    }
}
