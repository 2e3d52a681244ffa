//! Order-preserving set difference between two lists.

use std::collections::HashSet;
use std::hash::Hash;

/// Partition of two lists by membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<T> {
    /// In `old` but not in `new`, in `old` order.
    pub deleted: Vec<T>,
    /// In both, in `old` order.
    pub retained: Vec<T>,
    /// In `new` but not in `old`, in `new` order.
    pub created: Vec<T>,
}

impl<T> Diff<T> {
    /// True when nothing has to be added or removed.
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.created.is_empty()
    }
}

/// Split `old` and `new` into deleted, retained and created elements.
///
/// One pass over each input, probing a hash set built from the other side.
/// Membership is by equality only, so repeated elements are not counted:
/// callers that care about multiplicity must dedupe upstream.
pub fn diff_lists<T>(old: &[T], new: &[T]) -> Diff<T>
where
    T: Eq + Hash + Clone,
{
    let old_set: HashSet<&T> = old.iter().collect();
    let new_set: HashSet<&T> = new.iter().collect();

    let mut deleted = Vec::new();
    let mut retained = Vec::new();
    for elem in old {
        if new_set.contains(elem) {
            retained.push(elem.clone());
        } else {
            deleted.push(elem.clone());
        }
    }

    let created = new
        .iter()
        .filter(|elem| !old_set.contains(elem))
        .cloned()
        .collect();

    Diff {
        deleted,
        retained,
        created,
    }
}
