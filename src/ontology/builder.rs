//! Step-wise construction of an [`Ontology`]
//!
//! The [`Builder`] uses type-states to enforce the order of construction:
//!
//! 1. [`LooseCollection`]: declare the background genes and all terms
//! 2. [`AllTerms`]: connect terms with edges (child → parent)
//! 3. [`ConnectedTerms`]: annotate genes to terms
//! 4. [`FullyAnnotated`]: genes are propagated to all ancestors, terms
//!    with too few genes can be pruned to produce the final [`Ontology`]

use std::collections::VecDeque;
use std::marker::PhantomData;

use tracing::{debug, info, warn};

use crate::annotations::{Background, GeneId};
use crate::ontology::termarena::Arena;
use crate::ontology::Ontology;
use crate::term::GoTermId;
use crate::{GoError, GoResult};

/// Terms and background genes can be added
pub struct LooseCollection;
/// All terms are declared, edges can be added
pub struct AllTerms;
/// All edges are added, genes can be annotated
pub struct ConnectedTerms;
/// Genes are propagated through the DAG, ready for pruning
pub struct FullyAnnotated;

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        go_terms: builder.go_terms,
        background: builder.background,
        order: builder.order,
        state: PhantomData,
    }
}

/// Builds an [`Ontology`] from terms, edges and gene annotations
///
/// # Examples
///
/// ```
/// use go_enrich::ontology::Builder;
///
/// let mut builder = Builder::with_background(["gene1", "gene2"]).unwrap();
/// builder.add_term("A").unwrap();
/// builder.add_term("B").unwrap();
///
/// let mut builder = builder.terms_complete();
/// // B is a child of A
/// assert!(builder.add_edge("B", "A"));
/// // edges to undeclared terms are dropped
/// assert!(!builder.add_edge("B", "C"));
///
/// let mut builder = builder.edges_complete();
/// assert!(builder.annotate("gene1", "B"));
///
/// let ontology = builder.propagate_genes().unwrap().prune(1);
///
/// let a = ontology.term_by_name("A").unwrap();
/// assert_eq!(a.genes().len(), 1);
/// ```
pub struct Builder<T> {
    go_terms: Arena,
    background: Background,
    order: Vec<GoTermId>,
    state: PhantomData<T>,
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<T> Builder<T> {
    /// Returns the number of declared terms
    pub fn len(&self) -> usize {
        self.go_terms.len()
    }

    /// Returns `true` if no terms are declared
    pub fn is_empty(&self) -> bool {
        self.go_terms.len() == 0
    }
}

impl Builder<LooseCollection> {
    /// Constructs a new, empty builder without any background genes
    pub fn new() -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            go_terms: Arena::default(),
            background: Background::new(),
            order: Vec::new(),
            state: PhantomData,
        }
    }

    /// Constructs a new builder with the given background genes
    ///
    /// # Errors
    ///
    /// [`GoError::TooManyIds`] if there are more than `u32::MAX` genes
    pub fn with_background<I, S>(genes: I) -> GoResult<Builder<LooseCollection>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Builder::new();
        for gene in genes {
            builder.add_background_gene(gene.as_ref())?;
        }
        Ok(builder)
    }

    /// Adds a gene to the background set
    ///
    /// # Errors
    ///
    /// [`GoError::TooManyIds`] if the background is full
    pub fn add_background_gene(&mut self, name: &str) -> GoResult<GeneId> {
        self.background.insert(name)
    }

    /// Declares a term
    ///
    /// Declaring the same term multiple times is a no-op.
    ///
    /// # Errors
    ///
    /// [`GoError::TooManyIds`] if more than `u32::MAX` terms are declared
    pub fn add_term(&mut self, name: &str) -> GoResult<GoTermId> {
        self.go_terms.insert(name)
    }

    /// Finishes the declaration of terms
    #[must_use]
    pub fn terms_complete(self) -> Builder<AllTerms> {
        info!(
            "Declared {} terms and {} background genes",
            self.go_terms.len(),
            self.background.len()
        );
        transition_state(self)
    }
}

impl Builder<AllTerms> {
    /// Adds an edge from `child` to its `parent` term
    ///
    /// Returns `false` if either term was not declared. Such edges are dropped.
    pub fn add_edge(&mut self, child: &str, parent: &str) -> bool {
        let (Some(child_id), Some(parent_id)) = (self.go_terms.id(child), self.go_terms.id(parent))
        else {
            debug!("Dropping edge {} -> {}", child, parent);
            return false;
        };
        self.add_parent(parent_id, child_id);
        true
    }

    /// Connects two declared terms
    fn add_parent(&mut self, parent_id: GoTermId, child_id: GoTermId) {
        if let Some(child) = self.go_terms.get_mut(child_id) {
            child.add_parent(parent_id);
        }
        if let Some(parent) = self.go_terms.get_mut(parent_id) {
            parent.add_child(child_id);
        }
    }

    /// Finishes adding edges
    #[must_use]
    pub fn edges_complete(self) -> Builder<ConnectedTerms> {
        transition_state(self)
    }
}

impl Builder<ConnectedTerms> {
    /// Annotates a gene to a term
    ///
    /// Returns `false` and skips the annotation if the gene is not part of
    /// the background or the term was not declared.
    pub fn annotate(&mut self, gene: &str, term: &str) -> bool {
        let Some(gene_id) = self.background.get(gene) else {
            return false;
        };
        let Some(term) = self.go_terms.id(term).and_then(|id| self.go_terms.get_mut(id)) else {
            return false;
        };
        term.add_gene(gene_id);
        true
    }

    /// Orders all terms so that every term comes before all of its parents
    ///
    /// Uses Kahn's algorithm, starting from the terms without children.
    ///
    /// # Errors
    ///
    /// [`GoError::CycleDetected`] if the edges contain a cycle
    fn topological_order(&self) -> GoResult<Vec<GoTermId>> {
        let mut pending_children = vec![0usize; self.go_terms.slots()];
        let mut queue = VecDeque::new();
        for term in self.go_terms.values() {
            let n_children = term.children().len();
            pending_children[term.id().as_usize()] = n_children;
            if n_children == 0 {
                queue.push_back(*term.id());
            }
        }

        let mut order = Vec::with_capacity(self.go_terms.len());
        while let Some(id) = queue.pop_front() {
            order.push(id);
            let Some(term) = self.go_terms.get(id) else {
                continue;
            };
            for parent in term.parents() {
                let pending = &mut pending_children[parent.as_usize()];
                *pending -= 1;
                if *pending == 0 {
                    queue.push_back(parent);
                }
            }
        }

        if order.len() < self.go_terms.len() {
            let example = self
                .go_terms
                .values()
                .find(|term| pending_children[term.id().as_usize()] > 0)
                .map(|term| term.name().to_string())
                .unwrap_or_default();
            return Err(GoError::CycleDetected {
                unresolved: self.go_terms.len() - order.len(),
                example,
            });
        }
        Ok(order)
    }

    /// Propagates the genes of every term to all of its ancestors
    ///
    /// Afterwards, every term holds the genes of its whole descendant subgraph.
    ///
    /// # Errors
    ///
    /// [`GoError::CycleDetected`] if the edges contain a cycle. Nothing is
    /// propagated in that case.
    pub fn propagate_genes(mut self) -> GoResult<Builder<FullyAnnotated>> {
        let order = self.topological_order()?;
        for id in &order {
            let Some(term) = self.go_terms.get(*id) else {
                continue;
            };
            if term.genes().is_empty() {
                continue;
            }
            let genes = term.genes().clone();
            let parents = term.parents().clone();
            for parent in &parents {
                if let Some(parent) = self.go_terms.get_mut(parent) {
                    parent.genes_mut().union_with(&genes);
                }
            }
        }
        self.order = order;
        Ok(transition_state(self))
    }
}

impl Builder<FullyAnnotated> {
    /// Removes all terms with fewer than `min_genes` genes and
    /// returns the final [`Ontology`]
    ///
    /// Edges of removed terms are discarded; the remaining terms are not re-linked.
    pub fn prune(mut self, min_genes: usize) -> Ontology {
        let to_remove: Vec<GoTermId> = self
            .go_terms
            .values()
            .filter(|term| term.genes().len() < min_genes)
            .map(|term| *term.id())
            .collect();

        for id in &to_remove {
            self.go_terms.remove(*id);
        }

        if !to_remove.is_empty() {
            let arena = &self.go_terms;
            let present: Vec<bool> = (0..arena.slots())
                .map(|idx| {
                    u32::try_from(idx)
                        .ok()
                        .and_then(|idx| arena.get(GoTermId::from(idx)))
                        .is_some()
                })
                .collect();
            let is_present = |id: &GoTermId| present.get(id.as_usize()).copied().unwrap_or(false);
            for term in self.go_terms.values_mut() {
                term.parents_mut().retain(is_present);
                term.children_mut().retain(is_present);
            }
            self.order.retain(is_present);
        }

        if self.go_terms.len() == 0 {
            warn!("All terms were pruned (minimum {} genes per term)", min_genes);
        }
        info!(
            "Pruned {} terms with fewer than {} genes, {} terms remain",
            to_remove.len(),
            min_genes,
            self.go_terms.len()
        );
        Ontology::new(self.go_terms, self.background, self.order)
    }
}
