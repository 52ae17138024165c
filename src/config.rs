//! Settings of an enrichment run

use crate::stats::EnrichmentMethod;
use crate::{GoError, GoResult, DEFAULT_FDR, DEFAULT_MIN_GENES_PER_NODE};

/// Configuration of [`crate::pipeline::go_enrichment`]
///
/// # Examples
///
/// ```
/// use go_enrich::{EnrichmentConfig, EnrichmentMethod};
///
/// let config = EnrichmentConfig::default()
///     .with_method(EnrichmentMethod::ParentChildUnion)
///     .with_base_fdr(0.05);
///
/// assert_eq!(config.method(), EnrichmentMethod::ParentChildUnion);
/// assert_eq!(config.min_genes_per_node(), 1);
/// assert!(config.validate().is_ok());
///
/// assert!(config.with_base_fdr(1.5).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichmentConfig {
    method: EnrichmentMethod,
    base_fdr: f64,
    min_genes_per_node: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            method: EnrichmentMethod::default(),
            base_fdr: DEFAULT_FDR,
            min_genes_per_node: DEFAULT_MIN_GENES_PER_NODE,
        }
    }
}

impl EnrichmentConfig {
    /// Sets the method used to build the contingency tables
    #[must_use]
    pub fn with_method(mut self, method: EnrichmentMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the false discovery rate of the step-up correction
    #[must_use]
    pub fn with_base_fdr(mut self, base_fdr: f64) -> Self {
        self.base_fdr = base_fdr;
        self
    }

    /// Sets the minimum number of genes a term needs after propagation
    #[must_use]
    pub fn with_min_genes_per_node(mut self, min_genes_per_node: usize) -> Self {
        self.min_genes_per_node = min_genes_per_node;
        self
    }

    /// Returns the method used to build the contingency tables
    pub fn method(&self) -> EnrichmentMethod {
        self.method
    }

    /// Returns the false discovery rate of the step-up correction
    pub fn base_fdr(&self) -> f64 {
        self.base_fdr
    }

    /// Returns the minimum number of genes a term needs after propagation
    pub fn min_genes_per_node(&self) -> usize {
        self.min_genes_per_node
    }

    /// Checks that all values are usable
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidConfig`] if the FDR is not within `(0, 1)`
    /// or the minimum number of genes is `0`
    pub fn validate(&self) -> GoResult<()> {
        if !(self.base_fdr > 0.0 && self.base_fdr < 1.0) {
            return Err(GoError::InvalidConfig(format!(
                "base FDR must be between 0 and 1, got {}",
                self.base_fdr
            )));
        }
        if self.min_genes_per_node < 1 {
            return Err(GoError::InvalidConfig(
                "minimum genes per node must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
