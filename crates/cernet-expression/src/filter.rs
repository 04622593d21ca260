//! Restrict an expression matrix to network genes with any signal.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::matrix::ExpressionMatrix;

/// Rows removed at each step of [`filter_expression`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub not_in_network: usize,
    pub zero_expression: usize,
    pub remaining: usize,
}

/// Keep genes present in `network_genes`, then drop genes whose values sum to
/// exactly zero (`NaN` counts as zero). Row order is preserved.
pub fn filter_expression(
    mut matrix: ExpressionMatrix,
    network_genes: &HashSet<String>,
) -> (ExpressionMatrix, FilterReport) {
    let not_in_network = matrix.retain_rows(|gene, _| network_genes.contains(gene));
    info!(removed = not_in_network, "Genes removed (not in network)");

    let zero_expression = matrix.retain_rows(|_, values| {
        let total: f64 = values.iter().filter(|v| !v.is_nan()).sum();
        total != 0.0
    });
    info!(removed = zero_expression, "Genes removed (zero expression)");

    let report = FilterReport { not_in_network, zero_expression, remaining: matrix.n_genes() };
    info!(remaining = report.remaining, "Genes remaining after filtering");
    (matrix, report)
}
