use core::fmt::Debug;

use tracing::warn;

use crate::annotations::{Background, GeneGroup};
use crate::term::{GoTerm, GoTermId, TermGroup};

pub mod builder;
mod termarena;
pub use builder::Builder;
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` is the read-only DAG of GO terms used for enrichment testing
///
/// It is created by the [`Builder`] after all genes were propagated
/// and small terms were pruned. From then on, the ontology is never
/// mutated again and can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use go_enrich::ontology::Builder;
///
/// let mut builder = Builder::with_background(["g1", "g2", "g3"]).unwrap();
/// for term in ["root", "left", "right"] {
///     builder.add_term(term).unwrap();
/// }
/// let mut builder = builder.terms_complete();
/// builder.add_edge("left", "root");
/// builder.add_edge("right", "root");
/// let mut builder = builder.edges_complete();
/// builder.annotate("g1", "left");
/// builder.annotate("g2", "right");
///
/// let ontology = builder.propagate_genes().unwrap().prune(1);
///
/// assert_eq!(ontology.len(), 3);
/// let root = ontology.term_by_name("root").unwrap();
/// assert_eq!(root.genes().len(), 2);
/// assert_eq!(root.children().count(), 2);
///
/// for term in &ontology {
///     println!("{}\t{}", term.name(), term.genes().len());
/// }
/// ```
///
/// # Layout
///
/// Edges point from the more specific term (child) to the more general
/// term (parent). Genes flow along the edges during propagation, so every
/// term holds the genes of all of its descendants.
///
/// ```mermaid
/// graph BT
///     D["D<br>genes: g1"] --> B["B<br>genes: g1, g2"]
///     D --> C["C<br>genes: g1, g3"]
///     B --> A["A<br>genes: g1, g2, g3"]
///     C --> A
/// ```
#[derive(Default)]
pub struct Ontology {
    go_terms: Arena,
    background: Background,
    all_genes: GeneGroup,
    order: Vec<GoTermId>,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ontology with {} terms", self.go_terms.len())
    }
}

impl Ontology {
    pub(crate) fn new(go_terms: Arena, background: Background, order: Vec<GoTermId>) -> Self {
        let all_genes = background.genes();
        Self {
            go_terms,
            background,
            all_genes,
            order,
        }
    }

    /// Returns the number of terms in the ontology
    pub fn len(&self) -> usize {
        self.go_terms.len()
    }

    /// Returns `true` if the ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.go_terms.len() == 0
    }

    /// Returns the [`GoTerm`] of the provided [`GoTermId`]
    ///
    /// If no such term is present (or it was pruned), `None` is returned
    pub fn term(&self, id: GoTermId) -> Option<GoTerm<'_>> {
        self.go_terms.get(id).map(|term| GoTerm::new(self, term))
    }

    /// Returns the [`GoTerm`] with the given textual identifier
    pub fn term_by_name(&self, name: &str) -> Option<GoTerm<'_>> {
        self.go_terms.id(name).and_then(|id| self.term(id))
    }

    /// Returns an iterator of all [`GoTerm`]s, in declaration order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: Box::new(self.go_terms.values()),
            ontology: self,
        }
    }

    /// Returns the [`GoTermId`]s of all terms, in declaration order
    pub fn term_ids(&self) -> Vec<GoTermId> {
        self.go_terms.keys()
    }

    /// Returns the background gene set
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Returns all genes of the background as a [`GeneGroup`]
    pub fn all_genes(&self) -> &GeneGroup {
        &self.all_genes
    }

    /// Returns the term ids ordered so that every term comes before its parents
    pub fn topological_order(&self) -> &[GoTermId] {
        &self.order
    }

    /// Returns all direct and indirect parents of a term
    ///
    /// The term itself is not included
    pub fn ancestors(&self, id: GoTermId) -> TermGroup {
        let mut res = TermGroup::new();
        let mut stack: Vec<GoTermId> = self
            .term(id)
            .map(|term| term.parent_ids().iter().collect())
            .unwrap_or_default();
        while let Some(parent) = stack.pop() {
            if res.insert(parent) {
                if let Some(term) = self.term(parent) {
                    stack.extend(term.parent_ids());
                }
            }
        }
        res
    }

    /// Converts gene names into a [`GeneGroup`], e.g. for the target gene set
    ///
    /// Genes that are not part of the background can never be annotated
    /// to any term. They are dropped with a warning.
    pub fn study_set<I, S>(&self, genes: I) -> GeneGroup
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut missing = 0usize;
        let study: GeneGroup = genes
            .into_iter()
            .filter_map(|name| {
                let id = self.background.get(name.as_ref());
                if id.is_none() {
                    missing += 1;
                }
                id
            })
            .collect();
        if missing > 0 {
            warn!(
                "{} target genes are not part of the background and are ignored",
                missing
            );
        }
        study
    }
}

/// An iterator of [`GoTerm`]s
pub struct Iter<'a> {
    inner: Box<dyn Iterator<Item = &'a crate::term::internal::GoTermInternal> + 'a>,
    ontology: &'a Ontology,
}

impl<'a> Iterator for Iter<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|term| GoTerm::new(self.ontology, term))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = GoTerm<'a>;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn diamond() -> Ontology {
        let mut builder = Builder::with_background(["g1", "g2", "g3", "g4"]).unwrap();
        for term in ["A", "B", "C", "D"] {
            builder.add_term(term).unwrap();
        }
        let mut builder = builder.terms_complete();
        builder.add_edge("D", "B");
        builder.add_edge("D", "C");
        builder.add_edge("B", "A");
        builder.add_edge("C", "A");
        let mut builder = builder.edges_complete();
        builder.annotate("g1", "D");
        builder.annotate("g2", "B");
        builder.annotate("g3", "C");
        builder.propagate_genes().unwrap().prune(1)
    }

    #[test]
    fn iterate_in_declaration_order() {
        let ontology = diamond();
        let names: Vec<&str> = ontology.iter().map(|term| term.name()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn ancestors() {
        let ontology = diamond();
        let d = ontology.term_by_name("D").unwrap();
        let ancestors = ontology.ancestors(d.id());
        assert_eq!(ancestors.len(), 3);
        assert!(!ancestors.contains(&d.id()));

        let a = ontology.term_by_name("A").unwrap();
        assert!(ontology.ancestors(a.id()).is_empty());
        assert!(a.is_root());
    }

    #[test]
    fn study_set_ignores_unknown_genes() {
        let ontology = diamond();
        let study = ontology.study_set(["g1", "g2", "gX", "g1"]);
        assert_eq!(study.len(), 2);
        assert!(study.is_subset(ontology.all_genes()));
    }

    #[test]
    fn parents_and_children() {
        let ontology = diamond();
        let b = ontology.term_by_name("B").unwrap();
        let parents: Vec<&str> = b.parents().map(|term| term.name()).collect();
        assert_eq!(parents, vec!["A"]);
        let children: Vec<&str> = b.children().map(|term| term.name()).collect();
        assert_eq!(children, vec!["D"]);
    }

    #[test]
    fn direct_annotations_are_kept() {
        let ontology = diamond();
        let bg = ontology.background();
        for (gene, term) in [("g1", "D"), ("g2", "B"), ("g3", "C")] {
            let term = ontology.term_by_name(term).unwrap();
            assert!(term.genes().contains(&bg.get(gene).unwrap()));
        }
        // every term holds at least the genes of its children
        for term in &ontology {
            for child in term.children() {
                assert!(child.genes().is_subset(term.genes()));
            }
        }
    }

    #[test]
    fn unannotated_background_gene_absent() {
        let ontology = diamond();
        let bg = ontology.background();
        let a = ontology.term_by_name("A").unwrap();
        // g4 is part of the background but never annotated
        assert_eq!(a.genes().len(), 3);
        assert!(!a.genes().contains(&bg.get("g4").unwrap()));
        assert_eq!(ontology.all_genes().len(), 4);
    }
}
