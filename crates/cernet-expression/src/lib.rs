//! Single-cell expression preprocessing against a ceRNA network.
//! - Expression matrix I/O (tab or comma delimited)
//! - Network node loading
//! - Network membership and zero-expression filtering

pub mod matrix;
pub mod network;
pub mod filter;

use std::path::Path;

use cernet_common::Result;

pub use filter::{filter_expression, FilterReport};
pub use matrix::ExpressionMatrix;
pub use network::load_network_genes;

/// Load the network and the matrix, filter, and write the result to `out`.
pub fn preprocess(expr: &Path, network: &Path, out: &Path) -> Result<FilterReport> {
    let network_genes = load_network_genes(network)?;
    let matrix = ExpressionMatrix::from_path(expr)?;
    let (filtered, report) = filter_expression(matrix, &network_genes);
    filtered.write_tsv(out)?;
    Ok(report)
}
