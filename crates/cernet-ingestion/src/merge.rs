//! Cross-database merge.
//!
//! Each per-source table is tagged with its database name and, when the
//! database carries a numeric score, a `confidence_score` copied from it.
//! Tables are then stacked in the order given, columns unioned in
//! first-seen order, and duplicate edges resolved in favour of the earliest
//! table. Callers pass tables in registry order so the result is stable
//! from run to run.

use cernet_common::SourceDescriptor;
use tracing::info;

use crate::dedup::dedup_edges;
use crate::table::{InteractionRecord, RecordSet, SOURCE_DB_COLUMN};

pub const CONFIDENCE_SCORE_COLUMN: &str = "confidence_score";

/// A per-source table ready to merge.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub name: String,
    pub score_column: Option<String>,
    pub records: RecordSet,
}

impl SourceTable {
    pub fn new(source: &SourceDescriptor, records: RecordSet) -> Self {
        Self {
            name: source.name.clone(),
            score_column: source.score_column.clone(),
            records,
        }
    }
}

/// Add `source_db` and, when `score_column` is set, `confidence_score`.
///
/// Only finite numeric scores are copied; categorical evidence labels and
/// missing values leave `confidence_score` null.
pub fn tag_source(records: RecordSet, name: &str, score_column: Option<&str>) -> RecordSet {
    let records = records.with_column(SOURCE_DB_COLUMN, |_| Some(name.to_string()));
    let Some(column) = score_column else {
        return records;
    };
    let Some(idx) = records.column_index(column) else {
        return records;
    };
    records.with_column(CONFIDENCE_SCORE_COLUMN, |r| {
        r.fields[idx]
            .as_deref()
            .filter(|v| v.trim().parse::<f64>().is_ok_and(f64::is_finite))
            .map(str::to_string)
    })
}

/// Tag, stack and deduplicate per-source tables.
pub fn merge(tables: Vec<SourceTable>) -> RecordSet {
    let tagged: Vec<RecordSet> = tables
        .into_iter()
        .map(|t| tag_source(t.records, &t.name, t.score_column.as_deref()))
        .collect();

    let mut columns: Vec<String> = Vec::new();
    for set in &tagged {
        for column in set.columns() {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }

    let mut stacked = RecordSet::new(columns.clone());
    for set in tagged {
        let positions: Vec<usize> = set
            .columns()
            .iter()
            .map(|c| columns.iter().position(|u| u == c).unwrap_or_default())
            .collect();
        let (_, records) = set.into_parts();
        for record in records {
            let mut fields = vec![None; columns.len()];
            for (value, &pos) in record.fields.into_iter().zip(&positions) {
                fields[pos] = value;
            }
            stacked.push(InteractionRecord {
                source: record.source,
                target: record.target,
                fields,
            });
        }
    }

    let total = stacked.len();
    let (merged, duplicates) = dedup_edges(stacked);
    info!(
        total,
        duplicates,
        unique = merged.len(),
        "Total unique interactions across all databases"
    );
    merged
}
