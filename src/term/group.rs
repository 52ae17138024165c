use smallvec::SmallVec;

use crate::term::GoTermId;
use crate::DEFAULT_NUM_PARENTS;

/// A set of [`GoTermId`]s, e.g. the parents or children of a term
///
/// Each term can occur only once in the group. The ids are kept sorted,
/// most terms only have a handful of parents, so they are stored inline.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermGroup {
    ids: SmallVec<[GoTermId; DEFAULT_NUM_PARENTS]>,
}

impl TermGroup {
    /// Constructs a new, empty [`TermGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the group contains no [`GoTermId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`GoTermId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`GoTermId`] to the group
    ///
    /// Returns whether the `GoTermId` was newly inserted.
    pub fn insert(&mut self, id: GoTermId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Removes all [`GoTermId`]s for which `keep` returns `false`
    pub fn retain<F: FnMut(&GoTermId) -> bool>(&mut self, mut keep: F) {
        self.ids.retain(|id| keep(id));
    }

    /// Returns `true` if the group contains the [`GoTermId`]
    pub fn contains(&self, id: &GoTermId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an Iterator of the [`GoTermId`]s inside the group
    pub fn iter(&self) -> TermIds<'_> {
        TermIds {
            inner: self.ids.iter(),
        }
    }
}

impl FromIterator<GoTermId> for TermGroup {
    fn from_iter<T: IntoIterator<Item = GoTermId>>(iter: T) -> Self {
        let mut group = TermGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = GoTermId;
    type IntoIter = TermIds<'a>;

    fn into_iter(self) -> TermIds<'a> {
        self.iter()
    }
}

/// An iterator over [`GoTermId`]s
pub struct TermIds<'a> {
    inner: std::slice::Iter<'a, GoTermId>,
}

impl Iterator for TermIds<'_> {
    type Item = GoTermId;
    fn next(&mut self) -> Option<GoTermId> {
        self.inner.next().copied()
    }
}
