//! Statistical analyses of GO term enrichment
//!
//! Every term of the [`Ontology`] is scored by building a 2×2
//! [`ContingencyTable`] of gene counts and applying a one-sided
//! Fisher's exact test. Which genes go into the table is decided by the
//! [`EnrichmentMethod`].
//!
//! The raw p-values are then corrected for multiple testing with a
//! step-up false discovery rate procedure, see [`fdr`].
//!
//! In addition, [`elim`] provides the order-dependent elimination analysis,
//! which decorrelates the scores of terms and their ancestors.

use statrs::distribution::{DiscreteCDF, Hypergeometric};
use tracing::debug;

use crate::annotations::GeneGroup;
use crate::ontology::Ontology;
use crate::term::GoTermId;
use crate::{GoError, GoResult};

pub mod elim;
pub mod fdr;
mod method;
pub use method::EnrichmentMethod;

/// The p-value and fold enrichment of a scored GO term
///
/// [`Enrichment`]s are returned from [`score_terms`] and the
/// corrections in [`fdr`].
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment<T> {
    annotation: T,
    pvalue: f64,
    count: u64,
    enrichment: f64,
}

impl<T> Enrichment<T> {
    /// Constructs a new `Enrichment`
    pub fn new(annotation: T, pvalue: f64, count: u64, enrichment: f64) -> Self {
        Self {
            annotation,
            pvalue,
            count,
            enrichment,
        }
    }

    /// Returns the p-value of the enrichment
    ///
    /// The p-value indicates the probability that the enrichment
    /// occured by chance
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// Returns the fold enrichment over the tested population
    pub fn enrichment(&self) -> f64 {
        self.enrichment
    }

    /// Returns the ID of the enriched item, most likely a [`GoTermId`]
    pub fn id(&self) -> &T {
        &self.annotation
    }

    /// Returns the number of study genes that are annotated to the term
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Enrichment<GoTermId> {
    /// Constructs an `Enrichment` of a GO term from its contingency table
    ///
    /// # Errors
    ///
    /// [`GoError::Statistics`] if the table cannot be tested
    pub fn from_table(term: GoTermId, table: &ContingencyTable) -> GoResult<Self> {
        Ok(Self::new(
            term,
            table.pvalue()?,
            table.study_in_term(),
            table.fold_enrichment(),
        ))
    }

    /// Constructs an `Enrichment` for a term that was not tested
    pub fn untested(term: GoTermId) -> Self {
        Self::new(term, 1.0, 0, 0.0)
    }
}

/// A 2×2 table of gene counts
///
/// ```text
///                  | study genes | other genes |
/// -----------------+-------------+-------------|
/// in term          |      a      |      b      |
/// not in term      |      c      |      d      |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    table: [[u64; 2]; 2],
}

impl ContingencyTable {
    /// Constructs a new table from its four cells, row by row
    pub fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        Self {
            table: [[a, b], [c, d]],
        }
    }

    /// Builds the table from the term genes, study genes and other genes
    ///
    /// ```text
    /// [ |study ∩ term|,  |other ∩ term| ]
    /// [ |study - term|,  |other - term| ]
    /// ```
    pub fn from_groups(term: &GeneGroup, study: &GeneGroup, other: &GeneGroup) -> Self {
        Self::new(
            len(&(study & term)),
            len(&(other & term)),
            len(&(study - term)),
            len(&(other - term)),
        )
    }

    /// Returns the four cells of the table
    pub fn cells(&self) -> [[u64; 2]; 2] {
        self.table
    }

    /// Returns the total number of genes in the table
    pub fn total(&self) -> u64 {
        self.table.iter().flatten().sum()
    }

    /// Number of study genes in the term (upper left cell)
    pub fn study_in_term(&self) -> u64 {
        self.table[0][0]
    }

    fn has_empty_margin(&self) -> bool {
        let [[a, b], [c, d]] = self.table;
        a + b == 0 || c + d == 0 || a + c == 0 || b + d == 0
    }

    /// One-sided (greater) Fisher's exact test
    ///
    /// Returns the probability to observe `a` or more study genes in the
    /// term under the hypergeometric null distribution with fixed margins.
    /// Tables with an empty row or column return `1.0`.
    ///
    /// # Errors
    ///
    /// [`GoError::Statistics`] if the distribution cannot be constructed
    ///
    /// # Examples
    ///
    /// ```
    /// use go_enrich::stats::ContingencyTable;
    ///
    /// let table = ContingencyTable::new(1, 0, 0, 9);
    /// assert!((table.pvalue().unwrap() - 0.1).abs() < 1e-12);
    /// ```
    pub fn pvalue(&self) -> GoResult<f64> {
        let [[a, b], [c, _]] = self.table;
        if a == 0 || self.has_empty_margin() {
            return Ok(1.0);
        }
        let hyper = Hypergeometric::new(
            // all genes in the table
            // ==> population
            self.total(),
            // genes in the term
            // ==> successes
            a + b,
            // study genes
            // ==> draws
            a + c,
        )
        .map_err(|err| GoError::Statistics(err.to_string()))?;

        // subtracting 1, because we want to test including `a`
        // e.g. "7 or more", but sf by default calculates "more than 7"
        Ok(hyper.sf(a - 1).clamp(0.0, 1.0))
    }

    /// Ratio of the study fraction in the term to the population fraction in the term
    ///
    /// Returns `0.0` if any of the fractions is undefined
    pub fn fold_enrichment(&self) -> f64 {
        let [[a, b], [c, _]] = self.table;
        let total = self.total();
        if a + c == 0 || a + b == 0 || total == 0 {
            return 0.0;
        }
        (f64_from_u64(a) / f64_from_u64(a + c)) / (f64_from_u64(a + b) / f64_from_u64(total))
    }
}

/// Calculates the enrichment of every term of the ontology
///
/// The result contains one [`Enrichment`] per term, in declaration order.
/// With the `parallel` feature, the terms are scored on the rayon thread pool.
///
/// # Errors
///
/// [`GoError::Statistics`] if a contingency table cannot be tested
///
/// # Examples
///
/// ```
/// use go_enrich::pipeline::EnrichmentInput;
/// use go_enrich::stats::{score_terms, EnrichmentMethod};
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
/// let enrichments = score_terms(&ontology, &study, EnrichmentMethod::Independent).unwrap();
/// assert_eq!(enrichments.len(), ontology.len());
/// for enrichment in &enrichments {
///     assert!((0.0..=1.0).contains(&enrichment.pvalue()));
/// }
/// ```
pub fn score_terms(
    ontology: &Ontology,
    study: &GeneGroup,
    method: EnrichmentMethod,
) -> GoResult<Vec<Enrichment<GoTermId>>> {
    let ids = ontology.term_ids();
    let non_study = ontology.all_genes() - study;
    let score = |id: &GoTermId| method.enrichment_within(ontology, *id, study, &non_study);

    #[cfg(feature = "parallel")]
    let res = {
        use rayon::prelude::*;
        ids.par_iter().map(score).collect::<GoResult<Vec<_>>>()
    };
    #[cfg(not(feature = "parallel"))]
    let res = ids.iter().map(score).collect::<GoResult<Vec<_>>>();

    if let Ok(enrichments) = &res {
        debug!("Scored {} terms with {}", enrichments.len(), method);
    }
    res
}

fn len(group: &GeneGroup) -> u64 {
    group.len() as u64
}

/// We have to frequently do divisions starting with u64 values
/// and need to return f64 values. Gene counts are far below the
/// precision limit of f64.
#[allow(clippy::cast_precision_loss)]
fn f64_from_u64(n: u64) -> f64 {
    n as f64
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::GeneId;

    fn group(ids: &[u32]) -> GeneGroup {
        ids.iter().copied().map(GeneId::from).collect()
    }

    fn assert_close(x: f64, expected: f64) {
        assert!((x - expected).abs() < 1e-12, "{x} != {expected}");
    }

    #[test]
    fn pvalue_known_values() {
        assert_close(ContingencyTable::new(2, 1, 3, 2).pvalue().unwrap(), 5.0 / 7.0);
        assert_close(ContingencyTable::new(2, 2, 1, 1).pvalue().unwrap(), 0.8);
        assert_close(ContingencyTable::new(2, 0, 1, 1).pvalue().unwrap(), 0.5);
        assert_close(ContingencyTable::new(1, 0, 0, 9).pvalue().unwrap(), 0.1);
    }

    #[test]
    fn pvalue_larger_table() {
        // population 50, 25 in term, 13 study genes, 8 or more observed
        let table = ContingencyTable::new(8, 17, 5, 20);
        assert!((table.pvalue().unwrap() - 0.260_097_374_777_385_37).abs() < 1e-10);
    }

    #[test]
    fn empty_term_row() {
        let table = ContingencyTable::new(0, 0, 3, 5);
        assert_close(table.pvalue().unwrap(), 1.0);
        assert_close(table.fold_enrichment(), 0.0);
    }

    #[test]
    fn full_margins_are_not_enriched() {
        // every gene is in the term
        assert_close(ContingencyTable::new(3, 2, 0, 0).pvalue().unwrap(), 1.0);
        // every gene is a study gene
        assert_close(ContingencyTable::new(3, 0, 2, 0).pvalue().unwrap(), 1.0);
        assert_close(ContingencyTable::new(0, 0, 0, 0).pvalue().unwrap(), 1.0);
    }

    #[test]
    fn pvalues_are_probabilities() {
        for a in 0..6 {
            for b in 0..6 {
                for c in 0..6 {
                    let p = ContingencyTable::new(a, b, c, 4).pvalue().unwrap();
                    assert!((0.0..=1.0).contains(&p), "{a} {b} {c}: {p}");
                }
            }
        }
    }

    #[test]
    fn table_from_groups() {
        let term = group(&[1, 2, 3]);
        let study = group(&[1, 2, 4, 6, 7]);
        let other = group(&[3, 5, 8]);
        let table = ContingencyTable::from_groups(&term, &study, &other);
        assert_eq!(table.cells(), [[2, 1], [3, 2]]);
        assert_eq!(table.total(), 8);
    }

    #[test]
    fn scoring_is_thread_independent() {
        use crate::pipeline::EnrichmentInput;
        use rayon::prelude::*;

        let input = EnrichmentInput::from_files(
            "tests/data/target.txt",
            "tests/data/background.txt",
            "tests/data/go_terms.txt",
            "tests/data/go_edges.txt",
            "tests/data/gene_to_go.txt",
        )
        .unwrap();
        let ontology = input.ontology(1).unwrap();
        let study = ontology.study_set(&input.target);

        for method in EnrichmentMethod::all() {
            let sequential = score_terms(&ontology, &study, method).unwrap();
            let mut ids = ontology.term_ids();
            ids.reverse();
            let mut parallel: Vec<Enrichment<GoTermId>> = ids
                .par_iter()
                .map(|id| method.enrichment(&ontology, *id, &study).unwrap())
                .collect();
            parallel.reverse();
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn fold_enrichment() {
        // 2 of 5 study genes vs 3 of 8 genes overall
        let table = ContingencyTable::new(2, 1, 3, 2);
        assert_close(table.fold_enrichment(), (2.0 / 5.0) / (3.0 / 8.0));
    }
}
