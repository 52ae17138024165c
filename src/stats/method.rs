use std::fmt::Display;
use std::str::FromStr;

use tracing::debug;

use crate::annotations::GeneGroup;
use crate::ontology::Ontology;
use crate::stats::{len, ContingencyTable, Enrichment};
use crate::term::{GoTerm, GoTermId};
use crate::{GoError, GoResult};

/// The method to build the contingency table of a term
///
/// All methods are pure functions of the term, the ontology and the study
/// genes, so terms can be scored in any order and in parallel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrichmentMethod {
    /// Tests every term on its own against the whole background
    ///
    /// ```text
    /// [ |S ∩ genes|,  |NS ∩ genes| ]
    /// [ |S - genes|,  |NS - genes| ]
    /// ```
    ///
    /// with `S` the study genes and `NS` all other background genes.
    #[default]
    Independent,
    /// Tests a term against the union of the genes of its direct parents
    ParentChildUnion,
    /// Tests a term against the intersection of the genes of its direct parents
    ParentChildIntersection,
}

impl EnrichmentMethod {
    /// Returns all available methods
    pub fn all() -> [EnrichmentMethod; 3] {
        [
            EnrichmentMethod::Independent,
            EnrichmentMethod::ParentChildUnion,
            EnrichmentMethod::ParentChildIntersection,
        ]
    }

    /// Builds the contingency table of a term
    ///
    /// Returns `None` if the parent-child methods have nothing to test:
    /// the term has no parents, the parents' genes are empty or
    /// they do not contain any study genes.
    ///
    /// # Examples
    ///
    /// ```
    /// use go_enrich::ontology::Builder;
    /// use go_enrich::EnrichmentMethod;
    ///
    /// let mut builder = Builder::with_background(["g1", "g2", "g3"]).unwrap();
    /// builder.add_term("root").unwrap();
    /// builder.add_term("leaf").unwrap();
    /// let mut builder = builder.terms_complete();
    /// builder.add_edge("leaf", "root");
    /// let mut builder = builder.edges_complete();
    /// builder.annotate("g1", "leaf");
    /// builder.annotate("g2", "root");
    /// let ontology = builder.propagate_genes().unwrap().prune(1);
    /// let study = ontology.study_set(["g1"]);
    ///
    /// let root = ontology.term_by_name("root").unwrap();
    /// let leaf = ontology.term_by_name("leaf").unwrap();
    ///
    /// let table = EnrichmentMethod::Independent.contingency_table(&ontology, root, &study);
    /// assert_eq!(table.unwrap().cells(), [[1, 1], [0, 1]]);
    ///
    /// // the root term has no parents to compare against
    /// assert!(EnrichmentMethod::ParentChildUnion.contingency_table(&ontology, root, &study).is_none());
    ///
    /// let table = EnrichmentMethod::ParentChildUnion.contingency_table(&ontology, leaf, &study);
    /// assert_eq!(table.unwrap().cells(), [[1, 0], [0, 1]]);
    /// ```
    pub fn contingency_table(
        &self,
        ontology: &Ontology,
        term: GoTerm<'_>,
        study: &GeneGroup,
    ) -> Option<ContingencyTable> {
        let non_study = match self {
            EnrichmentMethod::Independent => ontology.all_genes() - study,
            _ => GeneGroup::new(),
        };
        self.table(ontology, term, study, &non_study)
    }

    /// Builds the contingency table with a precomputed set of non-study genes
    fn table(
        &self,
        ontology: &Ontology,
        term: GoTerm<'_>,
        study: &GeneGroup,
        non_study: &GeneGroup,
    ) -> Option<ContingencyTable> {
        match self {
            EnrichmentMethod::Independent => Some(ContingencyTable::from_groups(
                term.genes(),
                study,
                non_study,
            )),
            EnrichmentMethod::ParentChildUnion => {
                parent_child(ontology, term, study, |group, parent| {
                    group.union_with(parent);
                })
            }
            EnrichmentMethod::ParentChildIntersection => {
                parent_child(ontology, term, study, |group, parent| {
                    *group = &*group & parent;
                })
            }
        }
    }

    /// Calculates the p-value of a term
    ///
    /// Terms without a contingency table score `1.0`.
    ///
    /// # Errors
    ///
    /// - [`GoError::DoesNotExist`] if the term is not part of the ontology
    /// - [`GoError::Statistics`] if the table cannot be tested
    pub fn score(&self, ontology: &Ontology, term: GoTermId, study: &GeneGroup) -> GoResult<f64> {
        self.enrichment(ontology, term, study)
            .map(|enrichment| enrichment.pvalue())
    }

    /// Calculates the [`Enrichment`] of a term
    ///
    /// # Errors
    ///
    /// - [`GoError::DoesNotExist`] if the term is not part of the ontology
    /// - [`GoError::Statistics`] if the table cannot be tested
    pub fn enrichment(
        &self,
        ontology: &Ontology,
        term: GoTermId,
        study: &GeneGroup,
    ) -> GoResult<Enrichment<GoTermId>> {
        let non_study = ontology.all_genes() - study;
        self.enrichment_within(ontology, term, study, &non_study)
    }

    /// Calculates the [`Enrichment`] of a term
    ///
    /// `non_study` must be all genes of the ontology that are not part of `study`.
    pub(crate) fn enrichment_within(
        &self,
        ontology: &Ontology,
        term: GoTermId,
        study: &GeneGroup,
        non_study: &GeneGroup,
    ) -> GoResult<Enrichment<GoTermId>> {
        let go_term = ontology.term(term).ok_or(GoError::DoesNotExist)?;
        match self.table(ontology, go_term, study, non_study) {
            Some(table) => {
                debug!("{}\t{:?}", go_term.name(), table.cells());
                Enrichment::from_table(term, &table)
            }
            None => {
                debug!("{}\tnot tested", go_term.name());
                Ok(Enrichment::untested(term))
            }
        }
    }
}

/// Tests the term within the genes of its parents
///
/// `combine` merges the genes of one more parent into the accumulated parent genes.
///
/// ```text
/// [ |sig ∩ child|,                  |sig - child|                  ]
/// [ |(parent - sig) ∩ child|,       |(parent - sig) - child|       ]
/// ```
fn parent_child<F>(
    ontology: &Ontology,
    term: GoTerm<'_>,
    study: &GeneGroup,
    combine: F,
) -> Option<ContingencyTable>
where
    F: Fn(&mut GeneGroup, &GeneGroup),
{
    let mut parents = term.parents();
    let mut parent_genes = parents.next()?.genes().clone();
    for parent in parents {
        combine(&mut parent_genes, parent.genes());
    }

    let parent_genes = &parent_genes & ontology.all_genes();
    if parent_genes.is_empty() {
        return None;
    }

    let sig_in_parent = study & &parent_genes;
    if sig_in_parent.is_empty() {
        return None;
    }

    let child_genes = term.genes() & &parent_genes;
    let non_sig_in_parent = &parent_genes - &sig_in_parent;

    Some(ContingencyTable::new(
        len(&(&sig_in_parent & &child_genes)),
        len(&(&sig_in_parent - &child_genes)),
        len(&(&non_sig_in_parent & &child_genes)),
        len(&(&non_sig_in_parent - &child_genes)),
    ))
}

impl Display for EnrichmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentMethod::Independent => write!(f, "independent"),
            EnrichmentMethod::ParentChildUnion => write!(f, "parent-child-union"),
            EnrichmentMethod::ParentChildIntersection => write!(f, "parent-child-intersection"),
        }
    }
}

impl FromStr for EnrichmentMethod {
    type Err = GoError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "independent" => Ok(EnrichmentMethod::Independent),
            "parent-child-union" => Ok(EnrichmentMethod::ParentChildUnion),
            "parent-child-intersection" => Ok(EnrichmentMethod::ParentChildIntersection),
            _ => Err(GoError::InvalidConfig(format!("unknown enrichment method {s}"))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ontology::Builder;

    /// ```text
    ///  P1 (g4, g5)      P2 (g5, g6)
    ///        \            /
    ///         C (g1, g2, g3)
    /// ```
    /// background: g1 .. g8, study: g1, g2, g4, g6, g7
    fn two_parents() -> (Ontology, GeneGroup) {
        let genes: Vec<String> = (1..=8).map(|i| format!("g{i}")).collect();
        let mut builder = Builder::with_background(&genes).unwrap();
        for term in ["P1", "P2", "C"] {
            builder.add_term(term).unwrap();
        }
        let mut builder = builder.terms_complete();
        builder.add_edge("C", "P1");
        builder.add_edge("C", "P2");
        let mut builder = builder.edges_complete();
        for (gene, term) in [
            ("g1", "C"),
            ("g2", "C"),
            ("g3", "C"),
            ("g4", "P1"),
            ("g5", "P1"),
            ("g5", "P2"),
            ("g6", "P2"),
        ] {
            builder.annotate(gene, term);
        }
        let ontology = builder.propagate_genes().unwrap().prune(1);
        let study = ontology.study_set(["g1", "g2", "g4", "g6", "g7"]);
        (ontology, study)
    }

    fn table(
        method: EnrichmentMethod,
        ontology: &Ontology,
        study: &GeneGroup,
        name: &str,
    ) -> Option<[[u64; 2]; 2]> {
        let term = ontology.term_by_name(name).unwrap();
        method
            .contingency_table(ontology, term, study)
            .map(|table| table.cells())
    }

    #[test]
    fn independent_table() {
        let (ontology, study) = two_parents();
        assert_eq!(
            table(EnrichmentMethod::Independent, &ontology, &study, "C"),
            Some([[2, 1], [3, 2]])
        );
        let c = ontology.term_by_name("C").unwrap().id();
        let p = EnrichmentMethod::Independent.score(&ontology, c, &study).unwrap();
        assert!((p - 5.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn parent_child_union_table() {
        // parent genes: g1 .. g6, sig_in_parent: g1, g2, g4, g6
        // child genes: g1, g2, g3, (parent - sig): g3, g5
        let (ontology, study) = two_parents();
        assert_eq!(
            table(EnrichmentMethod::ParentChildUnion, &ontology, &study, "C"),
            Some([[2, 2], [1, 1]])
        );
        let c = ontology.term_by_name("C").unwrap().id();
        let p = EnrichmentMethod::ParentChildUnion
            .score(&ontology, c, &study)
            .unwrap();
        assert!((p - 0.8).abs() < 1e-12);
    }

    #[test]
    fn parent_child_intersection_table() {
        // parent genes: g1, g2, g3, g5, sig_in_parent: g1, g2
        // (parent - sig): g3, g5
        let (ontology, study) = two_parents();
        assert_eq!(
            table(EnrichmentMethod::ParentChildIntersection, &ontology, &study, "C"),
            Some([[2, 0], [1, 1]])
        );
        let c = ontology.term_by_name("C").unwrap().id();
        let p = EnrichmentMethod::ParentChildIntersection
            .score(&ontology, c, &study)
            .unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn roots_score_one_with_parent_child() {
        let (ontology, study) = two_parents();
        for method in [
            EnrichmentMethod::ParentChildUnion,
            EnrichmentMethod::ParentChildIntersection,
        ] {
            for name in ["P1", "P2"] {
                assert!(table(method, &ontology, &study, name).is_none());
                let id = ontology.term_by_name(name).unwrap().id();
                let score = method.score(&ontology, id, &study).unwrap();
                assert!((score - 1.0).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn no_study_genes_in_parent() {
        let (ontology, _) = two_parents();
        let study = ontology.study_set(["g7", "g8"]);
        assert!(table(EnrichmentMethod::ParentChildUnion, &ontology, &study, "C").is_none());
        assert!(table(EnrichmentMethod::ParentChildIntersection, &ontology, &study, "C").is_none());
    }

    #[test]
    fn unknown_term() {
        let (ontology, study) = two_parents();
        let res = EnrichmentMethod::Independent.score(&ontology, 99u32.into(), &study);
        assert!(matches!(res, Err(GoError::DoesNotExist)));
    }

    #[test]
    fn shared_non_study_genes() {
        let (ontology, study) = two_parents();
        let non_study = ontology.all_genes() - &study;
        for method in EnrichmentMethod::all() {
            for id in ontology.term_ids() {
                assert_eq!(
                    method
                        .enrichment_within(&ontology, id, &study, &non_study)
                        .unwrap(),
                    method.enrichment(&ontology, id, &study).unwrap()
                );
            }
        }
    }

    #[test]
    fn parse_and_display() {
        for method in EnrichmentMethod::all() {
            assert_eq!(method.to_string().parse::<EnrichmentMethod>().unwrap(), method);
        }
        assert!("elim".parse::<EnrichmentMethod>().is_err());
        assert_eq!(EnrichmentMethod::default(), EnrichmentMethod::Independent);
    }
}
