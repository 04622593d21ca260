//! End-to-end interaction integration.
//!
//! Stages, all run in registry order and awaited one after another:
//! 1. Create the data directories
//! 2. Fetch every source table (cached by presence)
//! 3. Load the identifier map once
//! 4. Per source: load + confidence filter, then harmonise identifiers
//! 5. Merge and write the merged network
//! 6. Optionally apply the global quantile cutoff and write the final network
//!
//! Any error aborts the whole run; there is no partial-success mode.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use cernet_common::{PipelineConfig, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::confidence::{filter_by_quantile_with, UnscoredPolicy};
use crate::io::write_records;
use crate::loader::{load_source, LoadStats};
use crate::merge::{merge, SourceTable};
use crate::normalise::{harmonise, IdentifierMap};
use crate::sources::{FetchStatus, Fetcher};

/// Per-source summary.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub path: PathBuf,
    /// Bytes fetched this run; `None` when the file was already present.
    pub downloaded_bytes: Option<u64>,
    pub load: LoadStats,
}

/// Summary of one integration run.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub sources: Vec<SourceReport>,
    pub merged_edges: usize,
    pub merged_output: PathBuf,
    pub cutoff: Option<f64>,
    pub final_edges: Option<usize>,
    pub final_output: Option<PathBuf>,
}

fn ensure_data_dirs(config: &PipelineConfig) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    if let Some(parent) = config.id_mapping_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Run the whole integration. `apply_global_filter = false` stops after the
/// merged network is written, even if `global_quantile` is configured.
pub async fn run_integration(config: &PipelineConfig, apply_global_filter: bool) -> Result<IntegrationReport> {
    config.validate()?;
    let started_at = Utc::now();
    let clock = Instant::now();

    ensure_data_dirs(config)?;

    // ── 1. Download raw tables ───────────────────────────────────────────────
    let fetcher = Fetcher::new(&config.data_dir, Duration::from_secs(config.http_timeout_secs))?;
    let mut fetched = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let (path, status) = fetcher.ensure_local(source).await?;
        fetched.push((source, path, status));
    }

    // ── 2. Load, filter and harmonise each source ───────────────────────────
    let id_map = IdentifierMap::from_path(&config.id_mapping_file)?;
    let mut tables = Vec::with_capacity(fetched.len());
    let mut reports = Vec::with_capacity(fetched.len());
    for (source, path, status) in fetched {
        info!(source = %source.name, "Processing source");
        let (records, load) = load_source(&path, source)?;
        let records = harmonise(records, &id_map);
        tables.push(SourceTable::new(source, records));
        reports.push(SourceReport {
            name: source.name.clone(),
            path,
            downloaded_bytes: match status {
                FetchStatus::Cached => None,
                FetchStatus::Downloaded { bytes } => Some(bytes),
            },
            load,
        });
    }

    // ── 3. Merge ─────────────────────────────────────────────────────────────
    let merged = merge(tables);
    write_records(&config.merged_output, &merged)?;
    info!(path = %config.merged_output.display(), n_edges = merged.len(), "Merged interactions saved");
    let merged_edges = merged.len();

    // ── 4. Global confidence cutoff ─────────────────────────────────────────
    let (cutoff, final_edges, final_output) = match config.global_quantile {
        Some(q) if apply_global_filter => {
            let policy = if config.keep_unscored_edges { UnscoredPolicy::Keep } else { UnscoredPolicy::Drop };
            let outcome = filter_by_quantile_with(merged, &config.confidence_column, q, policy)?;
            write_records(&config.final_output, &outcome.edges)?;
            info!(path = %config.final_output.display(), n_edges = outcome.edges.len(), "Final network saved");
            (outcome.cutoff, Some(outcome.edges.len()), Some(config.final_output.clone()))
        }
        _ => (None, None, None),
    };

    Ok(IntegrationReport {
        started_at,
        duration_ms: clock.elapsed().as_millis() as u64,
        sources: reports,
        merged_edges,
        merged_output: config.merged_output.clone(),
        cutoff,
        final_edges,
        final_output,
    })
}

impl IntegrationReport {
    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        crate::io::write_atomic(path, |out| {
            out.write_all(json.as_bytes())?;
            Ok(())
        })
    }
}
