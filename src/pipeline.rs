//! A complete enrichment run, from input files to significant terms
//!
//! ```text
//! files ──▶ EnrichmentInput ──▶ Builder ──▶ Ontology ──▶ score_terms ──▶ fdr::correct
//! ```

use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::ontology::{Builder, Ontology};
use crate::stats::{fdr, score_terms, Enrichment};
use crate::{parser, EnrichmentConfig, GoError, GoResult};

/// All inputs of an enrichment run, as raw identifiers
#[derive(Debug, Default, Clone)]
pub struct EnrichmentInput {
    /// The genes of interest
    pub target: Vec<String>,
    /// The universe of all tested genes
    pub background: Vec<String>,
    /// All GO term identifiers
    pub terms: Vec<String>,
    /// `(child, parent)` pairs of GO terms
    pub edges: Vec<(String, String)>,
    /// `(gene, term)` annotations
    pub annotations: Vec<(String, String)>,
}

impl EnrichmentInput {
    /// Reads all five input files
    ///
    /// # Errors
    ///
    /// - [`GoError::CannotOpenFile`] if one of the files cannot be read
    /// - [`GoError::MalformedLine`] if an edge or annotation line does not
    ///   have exactly two columns
    pub fn from_files<P: AsRef<Path>>(
        target: P,
        background: P,
        terms: P,
        edges: P,
        annotations: P,
    ) -> GoResult<Self> {
        Ok(Self {
            target: parser::id_list_from_path(target)?,
            background: parser::id_list_from_path(background)?,
            terms: parser::id_list_from_path(terms)?,
            edges: parser::pair_list_from_path(edges)?,
            annotations: parser::pair_list_from_path(annotations)?,
        })
    }

    /// Builds the pruned [`Ontology`]
    ///
    /// Edges between undeclared terms and annotations of unknown genes or
    /// terms are skipped.
    ///
    /// # Errors
    ///
    /// - [`GoError::CycleDetected`] if the edges do not form a DAG
    /// - [`GoError::TooManyIds`] if the genes or terms exceed `u32` ids
    pub fn ontology(&self, min_genes_per_node: usize) -> GoResult<Ontology> {
        let mut builder = Builder::with_background(&self.background)?;
        for term in &self.terms {
            builder.add_term(term)?;
        }

        let mut builder = builder.terms_complete();
        let dropped_edges = self
            .edges
            .iter()
            .filter(|(child, parent)| !builder.add_edge(child, parent))
            .count();
        if dropped_edges > 0 {
            warn!("{} edges reference undeclared terms", dropped_edges);
        }
        info!("Added {} edges", self.edges.len() - dropped_edges);

        let mut builder = builder.edges_complete();
        let dropped_annotations = self
            .annotations
            .iter()
            .filter(|(gene, term)| !builder.annotate(gene, term))
            .count();
        if dropped_annotations > 0 {
            info!(
                "Skipped {} annotations of genes outside the background or unknown terms",
                dropped_annotations
            );
        }

        Ok(builder.propagate_genes()?.prune(min_genes_per_node))
    }
}

/// Runs the full enrichment analysis
///
/// Returns the significant terms after FDR correction, ascending by p-value.
/// The annotation of every [`Enrichment`] is the term's identifier.
///
/// # Errors
///
/// - [`GoError::InvalidConfig`] if the config does not validate
/// - [`GoError::CycleDetected`] if the edges do not form a DAG
/// - [`GoError::NoSignificantTerms`] if the correction cannot select any term
///
/// # Examples
///
/// ```
/// use go_enrich::pipeline::{go_enrichment, EnrichmentInput};
/// use go_enrich::EnrichmentConfig;
///
/// let input = EnrichmentInput::from_files(
///     "tests/data/target.txt",
///     "tests/data/background.txt",
///     "tests/data/go_terms.txt",
///     "tests/data/go_edges.txt",
///     "tests/data/gene_to_go.txt",
/// ).unwrap();
///
/// let significant = go_enrichment(&input, &EnrichmentConfig::default()).unwrap();
/// assert_eq!(significant[0].id(), "GO:0044237");
/// ```
pub fn go_enrichment(
    input: &EnrichmentInput,
    config: &EnrichmentConfig,
) -> GoResult<Vec<Enrichment<String>>> {
    config.validate()?;
    let ontology = input.ontology(config.min_genes_per_node())?;
    let study = ontology.study_set(&input.target);
    info!(
        "Testing {} terms for {} study genes with {}",
        ontology.len(),
        study.len(),
        config.method()
    );

    let enrichments = score_terms(&ontology, &study, config.method())?;
    let significant = fdr::correct(&enrichments, config.base_fdr())?;
    info!("{} significant terms", significant.len());

    significant
        .into_iter()
        .map(|enrichment| {
            let term = ontology
                .term(*enrichment.id())
                .ok_or(GoError::DoesNotExist)?;
            Ok(Enrichment::new(
                term.name().to_string(),
                enrichment.pvalue(),
                enrichment.count(),
                enrichment.enrichment(),
            ))
        })
        .collect()
}

/// Writes one term identifier per line
///
/// # Errors
///
/// [`GoError::CannotWrite`] if the writer fails
///
/// # Examples
///
/// ```
/// use go_enrich::pipeline::write_terms;
/// use go_enrich::Enrichment;
///
/// let terms = vec![
///     Enrichment::new("GO:0044237".to_string(), 0.0001, 5, 4.0),
///     Enrichment::new("GO:0009987".to_string(), 0.001, 5, 2.8),
/// ];
/// let mut out = Vec::new();
/// write_terms(&terms, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "GO:0044237\nGO:0009987\n");
/// ```
pub fn write_terms<W: Write>(terms: &[Enrichment<String>], mut writer: W) -> GoResult<()> {
    for term in terms {
        writeln!(writer, "{}", term.id()).map_err(|err| GoError::CannotWrite(err.to_string()))?;
    }
    writer
        .flush()
        .map_err(|err| GoError::CannotWrite(err.to_string()))
}
