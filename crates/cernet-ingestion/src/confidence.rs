//! Global confidence cutoff.
//!
//! The cutoff is the q-th quantile of a numeric column under linear
//! interpolation: with the n values sorted ascending, rank = q·(n−1) and the
//! result interpolates between the values at floor(rank) and ceil(rank).
//! Rows whose value is at or above the cutoff survive.

use cernet_common::{CernetError, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::table::RecordSet;

/// What to do with rows that have no numeric value in the cutoff column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscoredPolicy {
    /// Unscored rows never meet the cutoff.
    #[default]
    Drop,
    /// Unscored rows are kept unconditionally.
    Keep,
}

/// Linear-interpolation quantile of an ascending slice.
/// Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let rank = q * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = (rank.ceil() as usize).min(n - 1);
            let frac = rank - lower as f64;
            Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
        }
    }
}

/// Result of a quantile filter.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileFilterOutcome {
    pub edges: RecordSet,
    /// `None` when the column held no numeric values.
    pub cutoff: Option<f64>,
    pub removed: usize,
}

/// Keep rows whose `column` value is at or above its q-th quantile.
/// Rows without a numeric value are dropped.
pub fn filter_by_quantile(edges: RecordSet, column: &str, q: f64) -> Result<QuantileFilterOutcome> {
    filter_by_quantile_with(edges, column, q, UnscoredPolicy::Drop)
}

pub fn filter_by_quantile_with(
    mut edges: RecordSet,
    column: &str,
    q: f64,
    unscored: UnscoredPolicy,
) -> Result<QuantileFilterOutcome> {
    if !(0.0..=1.0).contains(&q) {
        return Err(CernetError::Config(format!("quantile must be in [0, 1], got {q}")));
    }
    if !edges.has_column(column) {
        return Err(CernetError::missing_column(column, "merged network"));
    }

    let scores: Vec<Option<f64>> = edges
        .records()
        .iter()
        .map(|r| {
            edges
                .value(r, column)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| !v.is_nan())
        })
        .collect();

    let mut sorted: Vec<f64> = scores.iter().flatten().copied().collect();
    sorted.sort_by(f64::total_cmp);
    let cutoff = quantile(&sorted, q);

    let before = edges.len();
    let mut scores = scores.into_iter();
    match cutoff {
        Some(cutoff) => edges.retain(|_| match scores.next().flatten() {
            Some(v) => v >= cutoff,
            None => unscored == UnscoredPolicy::Keep,
        }),
        None => {
            warn!(column, "No numeric values in cutoff column");
            edges.retain(|_| scores.next().flatten().is_none() && unscored == UnscoredPolicy::Keep);
        }
    }
    let removed = before - edges.len();

    info!(column, quantile = q, ?cutoff, removed, retained = edges.len(), "Applied global confidence cutoff");
    Ok(QuantileFilterOutcome { edges, cutoff, removed })
}
