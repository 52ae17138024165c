//! Elimination analysis
//!
//! Terms are tested from the most specific to the most general ones. Once a
//! term is significant, its genes are removed from all of its ancestors
//! before those are tested. This prevents general terms from appearing
//! significant only because one of their descendants is.
//!
//! Significance is decided with a Bonferroni threshold of `alpha / m`,
//! with `m` the number of terms in the ontology.

use tracing::{debug, info};

use crate::annotations::GeneGroup;
use crate::ontology::Ontology;
use crate::stats::{ContingencyTable, Enrichment};
use crate::term::GoTermId;
use crate::GoResult;

/// Runs the elimination analysis and returns all significant terms
///
/// The result is sorted ascending by p-value.
///
/// # Errors
///
/// [`crate::GoError::Statistics`] if a contingency table cannot be tested
///
/// # Examples
///
/// ```
/// use go_enrich::pipeline::EnrichmentInput;
/// use go_enrich::stats::elim::elim_enrichment;
///
/// let input = EnrichmentInput::from_files(
///     "tests/data/target.txt",
///     "tests/data/background.txt",
///     "tests/data/go_terms.txt",
///     "tests/data/go_edges.txt",
///     "tests/data/gene_to_go.txt",
/// ).unwrap();
/// let ontology = input.ontology(1).unwrap();
/// let study = ontology.study_set(&input.target);
///
/// for enrichment in elim_enrichment(&ontology, &study, 0.05).unwrap() {
///     let term = ontology.term(*enrichment.id()).unwrap();
///     println!("{}\t{}", term.name(), enrichment.pvalue());
/// }
/// ```
pub fn elim_enrichment(
    ontology: &Ontology,
    study: &GeneGroup,
    alpha: f64,
) -> GoResult<Vec<Enrichment<GoTermId>>> {
    if ontology.is_empty() {
        return Ok(Vec::new());
    }
    #[allow(clippy::cast_precision_loss)]
    let threshold = alpha / ontology.len() as f64;
    let non_study = ontology.all_genes() - study;

    // genes claimed by significant descendants, indexed by topological position
    let mut removed: Vec<GeneGroup> = vec![GeneGroup::new(); ontology.topological_order().len()];
    let n_slots = ontology
        .term_ids()
        .last()
        .map_or(0, |id| id.as_usize() + 1);
    let mut slot_of = vec![usize::MAX; n_slots];
    for (slot, id) in ontology.topological_order().iter().enumerate() {
        slot_of[id.as_usize()] = slot;
    }

    let mut res = Vec::new();
    for (slot, id) in ontology.topological_order().iter().enumerate() {
        let Some(term) = ontology.term(*id) else {
            continue;
        };
        let genes = term.genes() - &removed[slot];
        let table = ContingencyTable::from_groups(&genes, study, &non_study);
        let enrichment = Enrichment::from_table(*id, &table)?;

        if enrichment.pvalue() <= threshold {
            debug!(
                "{} is significant ({}), removing {} genes from its ancestors",
                term.name(),
                enrichment.pvalue(),
                genes.len()
            );
            for ancestor in &ontology.ancestors(*id) {
                if let Some(ancestor_slot) = slot_of.get(ancestor.as_usize()) {
                    if let Some(group) = removed.get_mut(*ancestor_slot) {
                        group.union_with(&genes);
                    }
                }
            }
            res.push(enrichment);
        }
    }

    res.sort_by(|a, b| a.pvalue().total_cmp(&b.pvalue()));
    info!("{} significant terms after elimination", res.len());
    Ok(res)
}
