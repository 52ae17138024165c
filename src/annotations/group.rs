use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, Sub};

use crate::annotations::GeneId;

/// A set of [`GeneId`]s
///
/// The ids are kept sorted, which allows linear-time set operations.
/// All operators (`|`, `&`, `-`) are implemented on references and
/// return a new [`GeneGroup`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeneGroup {
    ids: Vec<GeneId>,
}

impl GeneGroup {
    /// Constructs a new, empty [`GeneGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`GeneGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`GeneId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`GeneId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`GeneId`] to the group
    ///
    /// Returns whether the `GeneId` was newly inserted.
    pub fn insert(&mut self, id: GeneId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Returns `true` if the group contains the [`GeneId`]
    pub fn contains(&self, id: &GeneId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Adds all [`GeneId`]s of `other` to `self`
    ///
    /// Returns the number of newly added ids
    pub fn union_with(&mut self, other: &GeneGroup) -> usize {
        let before = self.len();
        if other.is_empty() {
            return 0;
        }
        let merged = &*self | other;
        *self = merged;
        self.len() - before
    }

    /// Returns `true` if all ids of `self` are contained in `other`
    pub fn is_subset(&self, other: &GeneGroup) -> bool {
        self.iter().all(|id| other.contains(&id))
    }

    /// Returns an Iterator of the [`GeneId`]s inside the group
    pub fn iter(&self) -> GeneIds<'_> {
        GeneIds {
            inner: self.ids.iter(),
        }
    }
}

impl FromIterator<GeneId> for GeneGroup {
    fn from_iter<T: IntoIterator<Item = GeneId>>(iter: T) -> Self {
        let mut ids: Vec<GeneId> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}

impl<'a> IntoIterator for &'a GeneGroup {
    type Item = GeneId;
    type IntoIter = GeneIds<'a>;

    fn into_iter(self) -> GeneIds<'a> {
        self.iter()
    }
}

/// An iterator over [`GeneId`]s
pub struct GeneIds<'a> {
    inner: std::slice::Iter<'a, GeneId>,
}

impl Iterator for GeneIds<'_> {
    type Item = GeneId;
    fn next(&mut self) -> Option<GeneId> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for GeneIds<'_> {}

/// Walks two sorted id slices at once and collects the ids
/// for which `keep(in_left, in_right)` is true
fn merge(left: &[GeneId], right: &[GeneId], keep: fn(bool, bool) -> bool) -> GeneGroup {
    let mut ids = Vec::with_capacity(left.len().max(right.len()));
    let mut l = left.iter().peekable();
    let mut r = right.iter().peekable();
    loop {
        let (id, in_left, in_right) = match (l.peek(), r.peek()) {
            (Some(&&a), Some(&&b)) => match a.cmp(&b) {
                Ordering::Less => {
                    l.next();
                    (a, true, false)
                }
                Ordering::Greater => {
                    r.next();
                    (b, false, true)
                }
                Ordering::Equal => {
                    l.next();
                    r.next();
                    (a, true, true)
                }
            },
            (Some(&&a), None) => {
                l.next();
                (a, true, false)
            }
            (None, Some(&&b)) => {
                r.next();
                (b, false, true)
            }
            (None, None) => break,
        };
        if keep(in_left, in_right) {
            ids.push(id);
        }
    }
    GeneGroup { ids }
}

impl BitOr for &GeneGroup {
    type Output = GeneGroup;

    fn bitor(self, rhs: &GeneGroup) -> GeneGroup {
        merge(&self.ids, &rhs.ids, |_, _| true)
    }
}

impl BitAnd for &GeneGroup {
    type Output = GeneGroup;

    fn bitand(self, rhs: &GeneGroup) -> GeneGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        small.iter().filter(|id| large.contains(id)).collect()
    }
}

impl Sub for &GeneGroup {
    type Output = GeneGroup;

    fn sub(self, rhs: &GeneGroup) -> GeneGroup {
        merge(&self.ids, &rhs.ids, |in_left, in_right| in_left && !in_right)
    }
}
