use std::collections::HashMap;

use crate::term::internal::GoTermInternal;
use crate::term::GoTermId;
use crate::{GoError, GoResult, DEFAULT_NUM_TERMS};

/// Owns all terms, indexed by their [`GoTermId`]
///
/// Ids are assigned in declaration order and stay valid after terms are
/// removed. Removed slots are left empty.
pub(crate) struct Arena {
    terms: Vec<Option<GoTermInternal>>,
    ids: HashMap<String, GoTermId>,
    live: usize,
}

impl Arena {
    /// Number of terms that are present
    pub fn len(&self) -> usize {
        self.live
    }

    /// Number of ids ever assigned, including removed terms
    pub fn slots(&self) -> usize {
        self.terms.len()
    }

    /// Adds a new term and returns its id
    ///
    /// Declaring an already existing term is a no-op and returns the
    /// existing id.
    ///
    /// # Errors
    ///
    /// [`GoError::TooManyIds`] if more than `u32::MAX` terms are declared
    pub fn insert(&mut self, name: &str) -> GoResult<GoTermId> {
        if let Some(id) = self.ids.get(name) {
            return Ok(*id);
        }
        let id = term_id(self.terms.len())?;
        self.terms.push(Some(GoTermInternal::new(name.to_string(), id)));
        self.ids.insert(name.to_string(), id);
        self.live += 1;
        Ok(id)
    }

    pub fn get(&self, id: GoTermId) -> Option<&GoTermInternal> {
        self.terms.get(id.as_usize()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: GoTermId) -> Option<&mut GoTermInternal> {
        self.terms.get_mut(id.as_usize()).and_then(Option::as_mut)
    }

    /// Returns the id of a present term by its name
    pub fn id(&self, name: &str) -> Option<GoTermId> {
        self.ids
            .get(name)
            .copied()
            .filter(|id| self.get(*id).is_some())
    }

    pub fn remove(&mut self, id: GoTermId) -> Option<GoTermInternal> {
        let removed = self.terms.get_mut(id.as_usize()).and_then(Option::take);
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    /// Iterates all present terms in declaration order
    pub fn values(&self) -> impl Iterator<Item = &GoTermInternal> {
        self.terms.iter().flatten()
    }

    /// Iterates all present terms mutably in declaration order
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut GoTermInternal> {
        self.terms.iter_mut().flatten()
    }

    /// Returns the ids of all present terms in declaration order
    pub fn keys(&self) -> Vec<GoTermId> {
        self.values().map(|term| *term.id()).collect()
    }
}

/// Converts an arena index into a [`GoTermId`]
fn term_id(idx: usize) -> GoResult<GoTermId> {
    u32::try_from(idx)
        .map(GoTermId::from)
        .map_err(|_| GoError::TooManyIds("terms"))
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: Vec::with_capacity(DEFAULT_NUM_TERMS),
            ids: HashMap::with_capacity(DEFAULT_NUM_TERMS),
            live: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn redeclaration_is_noop() {
        let mut arena = Arena::default();
        let a = arena.insert("GO:1").unwrap();
        let b = arena.insert("GO:2").unwrap();
        assert_eq!(arena.insert("GO:1").unwrap(), a);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.keys(), vec![a, b]);
    }

    #[test]
    fn term_ids_are_limited_to_u32() {
        assert_eq!(term_id(7).unwrap(), GoTermId::from(7u32));
        assert_eq!(term_id(u32::MAX as usize).unwrap().as_u32(), u32::MAX);
        assert!(matches!(
            term_id(u32::MAX as usize + 1),
            Err(GoError::TooManyIds(_))
        ));
    }

    #[test]
    fn remove_keeps_ids() {
        let mut arena = Arena::default();
        let a = arena.insert("GO:1").unwrap();
        let b = arena.insert("GO:2").unwrap();
        assert!(arena.remove(a).is_some());
        assert!(arena.remove(a).is_none());
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.slots(), 2);
        assert!(arena.id("GO:1").is_none());
        assert_eq!(arena.id("GO:2"), Some(b));
        assert_eq!(arena.get(b).unwrap().name(), "GO:2");
    }
}
