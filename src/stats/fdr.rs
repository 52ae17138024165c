//! Correction for multiple testing
//!
//! The step-up procedure ranks all p-values in ascending order (rank 1 is the
//! smallest p-value, ties keep the input order). Every p-value is compared to
//! its own critical value `rank / m * fdr`. Among all p-values that are
//! strictly smaller than their critical value, the largest one defines the
//! cutoff rank `R`, and all terms with rank `≤ R` are significant, even if
//! their own p-value is above its critical value.
//!
//! If no p-value is below its critical value, the procedure cannot select a
//! cutoff at all and returns [`GoError::NoSignificantTerms`].

use tracing::debug;

use crate::stats::Enrichment;
use crate::{GoError, GoResult};

/// Returns the indices of all significant p-values, sorted ascending by p-value
///
/// # Errors
///
/// [`GoError::NoSignificantTerms`] if no p-value is below its critical value
fn significant_indices(pvalues: &[f64], fdr: f64) -> GoResult<Vec<usize>> {
    let mut ranked: Vec<usize> = (0..pvalues.len()).collect();
    // `sort_by` is stable, so ties keep their input order
    ranked.sort_by(|a, b| pvalues[*a].total_cmp(&pvalues[*b]));

    let mut ranks = vec![0usize; pvalues.len()];
    for (rank, idx) in ranked.iter().enumerate() {
        ranks[*idx] = rank + 1;
    }

    let m = f64_from_usize(pvalues.len());
    let mut cutoff: Option<usize> = None;
    for (idx, pvalue) in pvalues.iter().enumerate() {
        let critical = f64_from_usize(ranks[idx]) / m * fdr;
        if *pvalue >= critical || pvalue.is_nan() {
            continue;
        }
        // the first of several equally large p-values wins
        match cutoff {
            Some(current) if pvalues[current] >= *pvalue => {}
            _ => cutoff = Some(idx),
        }
    }

    let cutoff = cutoff.ok_or(GoError::NoSignificantTerms)?;
    let max_rank = ranks[cutoff];
    debug!(
        "FDR cutoff at rank {} of {} (p-value {})",
        max_rank,
        pvalues.len(),
        pvalues[cutoff]
    );
    ranked.truncate(max_rank);
    Ok(ranked)
}

/// Selects the significant items of `(item, p-value)` pairs
///
/// The input order is used to break ties between equal p-values.
/// The result is sorted ascending by p-value.
///
/// # Errors
///
/// [`GoError::NoSignificantTerms`] if no p-value is below its critical value
///
/// # Examples
///
/// ```
/// use go_enrich::stats::fdr::step_up;
///
/// let pvalues = [("a", 0.01), ("b", 0.06), ("c", 0.07), ("d", 0.9)];
///
/// // "b" is above its critical value of 0.05, but below the cutoff set by "c"
/// let significant = step_up(&pvalues, 0.1).unwrap();
/// assert_eq!(significant, vec!["a", "b", "c"]);
///
/// assert!(step_up(&pvalues, 0.0001).is_err());
/// ```
pub fn step_up<T: Clone>(pvalues: &[(T, f64)], fdr: f64) -> GoResult<Vec<T>> {
    let raw: Vec<f64> = pvalues.iter().map(|(_, pvalue)| *pvalue).collect();
    Ok(significant_indices(&raw, fdr)?
        .into_iter()
        .map(|idx| pvalues[idx].0.clone())
        .collect())
}

/// Selects the significant [`Enrichment`]s, sorted ascending by p-value
///
/// # Errors
///
/// [`GoError::NoSignificantTerms`] if no p-value is below its critical value
pub fn correct<T: Clone>(
    enrichments: &[Enrichment<T>],
    fdr: f64,
) -> GoResult<Vec<Enrichment<T>>> {
    let raw: Vec<f64> = enrichments.iter().map(Enrichment::pvalue).collect();
    Ok(significant_indices(&raw, fdr)?
        .into_iter()
        .map(|idx| enrichments[idx].clone())
        .collect())
}

#[allow(clippy::cast_precision_loss)]
fn f64_from_usize(n: usize) -> f64 {
    n as f64
}
