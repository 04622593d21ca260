//! Official-symbol harmonisation.
//!
//! The mapping file is a two-column TSV with header `raw_id`,
//! `official_symbol`. Several raw ids may map to one symbol; if a raw id is
//! listed twice the later row wins. Lookups are exact (case-sensitive),
//! because miRNA names such as `hsa-miR-21` and `hsa-mir-21` denote
//! different molecules.

use std::collections::HashMap;
use std::path::Path;

use cernet_common::{CernetError, Result};
use tracing::info;

use crate::io::read_table;
use crate::table::RecordSet;

pub const RAW_ID_COLUMN: &str = "raw_id";
pub const OFFICIAL_SYMBOL_COLUMN: &str = "official_symbol";

/// In-memory raw id → official symbol table.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    lookup: HashMap<String, String>,
}

impl IdentifierMap {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Load the mapping TSV from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "Loading ID mapping");
        let table = read_table(path, b'\t')?;

        let raw_idx = table
            .headers
            .iter()
            .position(|h| h == RAW_ID_COLUMN)
            .ok_or_else(|| CernetError::missing_column(RAW_ID_COLUMN, path.display().to_string()))?;
        let symbol_idx = table
            .headers
            .iter()
            .position(|h| h == OFFICIAL_SYMBOL_COLUMN)
            .ok_or_else(|| CernetError::missing_column(OFFICIAL_SYMBOL_COLUMN, path.display().to_string()))?;

        let pairs = table.rows.into_iter().filter_map(|mut row| {
            match (row[raw_idx].take(), row[symbol_idx].take()) {
                (Some(raw), Some(symbol)) => Some((raw, symbol)),
                _ => None,
            }
        });
        let map: Self = pairs.collect();
        info!(n_entries = map.len(), "ID mapping ready");
        Ok(map)
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    pub fn get(&self, raw_id: &str) -> Option<&str> {
        self.lookup.get(raw_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

impl FromIterator<(String, String)> for IdentifierMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { lookup: iter.into_iter().collect() }
    }
}

/// Rewrite every record's source and target through `map`.
/// Never fails and never drops rows.
pub fn harmonise(mut records: RecordSet, map: &IdentifierMap) -> RecordSet {
    let mut rewritten = 0usize;
    for record in records.records_mut() {
        if let Some(symbol) = map.get(&record.source) {
            if symbol != record.source {
                record.source = symbol.to_string();
                rewritten += 1;
            }
        }
        if let Some(symbol) = map.get(&record.target) {
            if symbol != record.target {
                record.target = symbol.to_string();
                rewritten += 1;
            }
        }
    }
    info!(rewritten, n_records = records.len(), "Harmonised identifiers");
    records
}

// ── Tests ─────────────────────────────────────────────────────────────────────
