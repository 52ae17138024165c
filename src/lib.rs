#![doc = include_str!("../README.md")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use thiserror::Error;

pub mod annotations;
pub mod config;
pub mod ontology;
pub mod parser;
pub mod pipeline;
pub mod stats;
pub mod term;

pub use annotations::{GeneGroup, GeneId};
pub use config::EnrichmentConfig;
pub use ontology::{Builder, Ontology};
pub use stats::{Enrichment, EnrichmentMethod};
pub use term::{GoTerm, GoTermId, TermGroup};

const DEFAULT_NUM_PARENTS: usize = 4;
const DEFAULT_NUM_GENES: usize = 16;
const DEFAULT_NUM_TERMS: usize = 50_000;

/// Default false discovery rate for the step-up correction
pub const DEFAULT_FDR: f64 = 0.01;

/// Default minimum number of (propagated) genes a term needs to be tested
pub const DEFAULT_MIN_GENES_PER_NODE: usize = 1;

/// Main Error type for this crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GoError {
    /// The term is not part of the ontology, or was pruned
    #[error("term does not exist")]
    DoesNotExist,
    /// A line of an input file does not have the expected format
    #[error("invalid line {line_number} in {source_name}: {line:?}")]
    MalformedLine {
        /// Name (or path) of the input
        source_name: String,
        /// 1-based line number
        line_number: usize,
        /// Raw content of the offending line
        line: String,
    },
    /// Failed to open or read a file
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// The file was opened, but a line could not be read (e.g. invalid UTF-8)
    #[error("cannot read {source_name} at line {line_number}: {reason}")]
    CannotReadLine {
        /// Name (or path) of the input
        source_name: String,
        /// 1-based line number
        line_number: usize,
        /// Underlying I/O error
        reason: String,
    },
    /// Failed to write the results
    #[error("cannot write output: {0}")]
    CannotWrite(String),
    /// The term-to-term edges do not form a DAG
    #[error("ontology contains a cycle: {unresolved} terms cannot be ordered (e.g. {example})")]
    CycleDetected {
        /// Number of terms left over after the topological sort
        unresolved: usize,
        /// Name of one of those terms
        example: String,
    },
    /// The FDR correction did not find any term below its critical value
    #[error("no significant terms found")]
    NoSignificantTerms,
    /// More genes or terms than `u32` ids can address
    #[error("too many {0}")]
    TooManyIds(&'static str),
    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The statistical distribution could not be constructed
    #[error("statistics error: {0}")]
    Statistics(String),
}

/// Shortcut for `Result<T, GoError>`
pub type GoResult<T> = Result<T, GoError>;
