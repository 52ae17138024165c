//! [`GoTerm`]s are the nodes of the Gene Ontology DAG
//!
//! Terms are identified by a [`GoTermId`], a dense index that is assigned
//! in the order in which terms are declared. The textual identifier
//! (e.g. `GO:0008150`) is available via [`GoTerm::name`].

use core::fmt::Debug;
use std::fmt::Display;

use crate::annotations::GeneGroup;
use crate::ontology::Ontology;

pub(crate) mod group;
pub(crate) mod internal;

pub use group::{TermGroup, TermIds};

/// Identifier of a term inside one [`Ontology`]
///
/// `GoTermId`s are only meaningful for the ontology that created them.
#[derive(Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GoTermId {
    inner: u32,
}

impl GoTermId {
    /// Returns the index of the term inside the term arena
    pub fn as_usize(&self) -> usize {
        self.inner as usize
    }

    /// Returns the `u32` representation of the term id
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl From<u32> for GoTermId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Debug for GoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoTermId({})", self.inner)
    }
}

impl Display for GoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.inner)
    }
}

/// A single term of the [`Ontology`], borrowed from it
///
/// The term gives access to its gene annotations and its position in the DAG.
/// Parents are the more general terms this term has an edge *to*.
#[derive(Debug, Clone, Copy)]
pub struct GoTerm<'a> {
    id: GoTermId,
    name: &'a str,
    parents: &'a TermGroup,
    children: &'a TermGroup,
    genes: &'a GeneGroup,
    ontology: &'a Ontology,
}

impl<'a> GoTerm<'a> {
    pub(crate) fn new(ontology: &'a Ontology, term: &'a internal::GoTermInternal) -> GoTerm<'a> {
        GoTerm {
            id: *term.id(),
            name: term.name(),
            parents: term.parents(),
            children: term.children(),
            genes: term.genes(),
            ontology,
        }
    }

    /// Returns the [`GoTermId`] of the term
    pub fn id(&self) -> GoTermId {
        self.id
    }

    /// Returns the textual identifier of the term
    ///
    /// e.g.: `GO:0008150`
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the genes annotated to this term or any of its descendants
    pub fn genes(&self) -> &'a GeneGroup {
        self.genes
    }

    /// Returns the [`GoTermId`]s of the direct parents
    pub fn parent_ids(&self) -> &'a TermGroup {
        self.parents
    }

    /// Returns the [`GoTermId`]s of the direct children
    pub fn children_ids(&self) -> &'a TermGroup {
        self.children
    }

    /// Returns an iterator of the direct parents of the term
    pub fn parents(&self) -> impl Iterator<Item = GoTerm<'a>> + 'a {
        let ontology = self.ontology;
        self.parents.iter().filter_map(move |id| ontology.term(id))
    }

    /// Returns an iterator of the direct children of the term
    pub fn children(&self) -> impl Iterator<Item = GoTerm<'a>> + 'a {
        let ontology = self.ontology;
        self.children.iter().filter_map(move |id| ontology.term(id))
    }

    /// Returns `true` if the term does not have any parents
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

impl PartialEq for GoTerm<'_> {
    fn eq(&self, other: &GoTerm) -> bool {
        self.id == other.id
    }
}

impl Eq for GoTerm<'_> {}
