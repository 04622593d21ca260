//! Per-source loading and confidence filtering.
//!
//! Every database names its identifier columns differently. Tables that use
//! the `miRNA` / `target_gene` pair are mapped by name; anything else falls
//! back to treating the first two columns as source and target. The fallback
//! is logged as a warning with the column names it picked, since nothing
//! checks that those columns really hold identifiers.

use std::path::Path;

use cernet_common::{CernetError, Result, SourceDescriptor};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dedup::dedup_edges;
use crate::io::read_table;
use crate::table::{InteractionRecord, RecordSet};

/// Column pair recognised by name.
pub const NAMED_SOURCE_COLUMN: &str = "miRNA";
pub const NAMED_TARGET_COLUMN: &str = "target_gene";

/// How the source/target columns of a raw table were identified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnResolution {
    /// `miRNA` and `target_gene` were both present.
    Named,
    /// The first two columns were used.
    Positional { source: String, target: String },
}

/// Row counts from one load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub below_threshold: usize,
    pub missing_ids: usize,
    pub duplicates: usize,
    pub retained: usize,
    pub resolution: ColumnResolution,
}

/// Locate the source and target columns of a header.
pub fn resolve_columns(headers: &[String]) -> Result<(usize, usize, ColumnResolution)> {
    let named = (
        headers.iter().position(|h| h == NAMED_SOURCE_COLUMN),
        headers.iter().position(|h| h == NAMED_TARGET_COLUMN),
    );
    if let (Some(s), Some(t)) = named {
        return Ok((s, t, ColumnResolution::Named));
    }
    if headers.len() < 2 {
        return Err(CernetError::missing_column(
            "target",
            format!("table with {} column(s); need at least two identifier columns", headers.len()),
        ));
    }
    Ok((
        0,
        1,
        ColumnResolution::Positional {
            source: headers[0].clone(),
            target: headers[1].clone(),
        },
    ))
}

/// Load a raw interaction table and reduce it to unique, confident edges.
///
/// Steps: resolve identifier columns, drop rows scoring below `threshold`
/// (only when both the score column and the threshold are given and the
/// column exists), drop rows missing an identifier, then keep the first
/// row of every (source, target) pair.
pub fn load_and_filter(
    path: &Path,
    separator: u8,
    score_column: Option<&str>,
    threshold: Option<f64>,
) -> Result<RecordSet> {
    load_and_filter_with_stats(path, separator, score_column, threshold).map(|(set, _)| set)
}

/// [`load_and_filter`] driven by a source descriptor.
pub fn load_source(path: &Path, source: &SourceDescriptor) -> Result<(RecordSet, LoadStats)> {
    load_and_filter_with_stats(
        path,
        source.separator_byte(),
        source.score_column.as_deref(),
        source.score_threshold,
    )
}

pub fn load_and_filter_with_stats(
    path: &Path,
    separator: u8,
    score_column: Option<&str>,
    threshold: Option<f64>,
) -> Result<(RecordSet, LoadStats)> {
    info!(path = %path.display(), "Loading interaction table");
    let table = read_table(path, separator)?;
    let rows_read = table.rows.len();

    let (source_idx, target_idx, resolution) = resolve_columns(&table.headers)?;
    match &resolution {
        ColumnResolution::Named => {
            debug!(path = %path.display(), "Identifier columns matched by name");
        }
        ColumnResolution::Positional { source, target } => {
            warn!(
                path = %path.display(),
                source_column = %source,
                target_column = %target,
                "No miRNA/target_gene columns; using the first two columns as source/target"
            );
        }
    }

    let score_filter = match (score_column, threshold) {
        (Some(column), Some(min)) => match table.headers.iter().position(|h| h == column) {
            Some(idx) => Some((idx, min)),
            None => {
                debug!(column, "Score column absent; confidence filter skipped");
                None
            }
        },
        _ => None,
    };

    let extra_idx: Vec<usize> = (0..table.headers.len())
        .filter(|&i| i != source_idx && i != target_idx)
        .collect();
    let columns = extra_idx.iter().map(|&i| table.headers[i].clone()).collect();
    let mut set = RecordSet::new(columns);

    let mut below_threshold = 0usize;
    let mut missing_ids = 0usize;

    for (row_no, mut row) in table.rows.into_iter().enumerate() {
        if let Some((idx, min)) = score_filter {
            let keep = match row[idx].as_deref() {
                None => false,
                Some(raw) => {
                    let score: f64 = raw.trim().parse().map_err(|_| {
                        CernetError::parse(
                            path,
                            format!("row {row_no}: score '{raw}' in column '{}' is not numeric", table.headers[idx]),
                        )
                    })?;
                    score >= min
                }
            };
            if !keep {
                below_threshold += 1;
                continue;
            }
        }

        let (Some(source), Some(target)) = (row[source_idx].take(), row[target_idx].take()) else {
            missing_ids += 1;
            continue;
        };
        let fields = extra_idx.iter().map(|&i| row[i].take()).collect();
        set.push(InteractionRecord { source, target, fields });
    }

    if let Some((_, min)) = score_filter {
        info!(removed = below_threshold, threshold = min, "Filtered low-confidence edges");
    }

    let (set, duplicates) = dedup_edges(set);
    info!(
        retained = set.len(),
        missing_ids,
        duplicates,
        "Interactions retained after filtering"
    );

    let stats = LoadStats {
        rows_read,
        below_threshold,
        missing_ids,
        duplicates,
        retained: set.len(),
        resolution,
    };
    Ok((set, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cernet_test_utils::{tsv, TestDir, LNCBASE_TSV, MIRCODE_TSV, STARBASE_TSV};
    use pretty_assertions::assert_eq;

    use crate::dedup::is_edge_unique;

    fn edges(set: &RecordSet) -> Vec<(String, String)> {
        set.records().iter().map(|r| (r.source.clone(), r.target.clone())).collect()
    }

    #[test]
    fn test_named_columns_threshold_and_dedup() {
        let dir = TestDir::new();
        let path = dir.write("starbase.tsv", STARBASE_TSV);
        let (set, stats) = load_and_filter_with_stats(&path, b'\t', Some("clip_score"), Some(0.5)).unwrap();

        assert_eq!(stats.resolution, ColumnResolution::Named);
        assert_eq!(stats.rows_read, 5);
        assert_eq!(stats.below_threshold, 1);
        assert_eq!(stats.missing_ids, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(
            edges(&set),
            vec![
                ("hsa-miR-21-5p".to_string(), "PTEN".to_string()),
                ("hsa-let-7a-5p".to_string(), "KRAS".to_string()),
            ]
        );
        // First PTEN row (0.9) wins over the later 0.8 duplicate
        assert_eq!(set.value(&set.records()[0], "clip_score"), Some("0.9"));
        assert_eq!(set.header(), vec!["source", "target", "clip_score", "geneType"]);
    }

    #[test]
    fn test_positional_fallback() {
        let dir = TestDir::new();
        let path = dir.write("lncbase.tsv", LNCBASE_TSV);
        let (set, stats) = load_and_filter_with_stats(&path, b'\t', Some("lncbase_confidence"), Some(0.7)).unwrap();

        assert_eq!(
            stats.resolution,
            ColumnResolution::Positional { source: "mirna_name".into(), target: "gene_name".into() }
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.header(), vec!["source", "target", "lncbase_confidence", "tissue"]);
    }

    #[test]
    fn test_named_columns_not_first() {
        let dir = TestDir::new();
        let path = dir.write(
            "t.tsv",
            &tsv(&[&["id", "target_gene", "miRNA"], &["1", "PTEN", "miR-21"]]),
        );
        let set = load_and_filter(&path, b'\t', None, None).unwrap();
        assert_eq!(edges(&set), vec![("miR-21".to_string(), "PTEN".to_string())]);
        assert_eq!(set.header(), vec!["source", "target", "id"]);
    }

    #[test]
    fn test_missing_score_column_skips_filter() {
        let dir = TestDir::new();
        let path = dir.write("mircode.tsv", MIRCODE_TSV);
        let set = load_and_filter(&path, b'\t', Some("clip_score"), Some(0.99)).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_no_threshold_means_no_filter() {
        let dir = TestDir::new();
        let path = dir.write("starbase.tsv", STARBASE_TSV);
        let set = load_and_filter(&path, b'\t', Some("clip_score"), None).unwrap();
        // 5 rows - 1 missing target - 1 duplicate
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let dir = TestDir::new();
        let path = dir.write("t.tsv", &tsv(&[&["a", "b", "s"], &["x", "y", "0.5"], &["x", "z", "0.49"]]));
        let set = load_and_filter(&path, b'\t', Some("s"), Some(0.5)).unwrap();
        assert_eq!(edges(&set), vec![("x".to_string(), "y".to_string())]);
    }

    #[test]
    fn test_non_numeric_score_is_parse_error() {
        let dir = TestDir::new();
        let path = dir.write("t.tsv", &tsv(&[&["a", "b", "s"], &["x", "y", "high"]]));
        let err = load_and_filter(&path, b'\t', Some("s"), Some(0.5)).unwrap_err();
        assert!(matches!(err, CernetError::Parse { .. }));
    }

    #[test]
    fn test_null_score_is_dropped() {
        let dir = TestDir::new();
        let path = dir.write("t.tsv", &tsv(&[&["a", "b", "s"], &["x", "y", "NA"], &["x", "z", "1"]]));
        let set = load_and_filter(&path, b'\t', Some("s"), Some(0.0)).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_single_column_table_is_missing_column() {
        let dir = TestDir::new();
        let path = dir.write("t.tsv", "only\nx\n");
        let err = load_and_filter(&path, b'\t', None, None).unwrap_err();
        assert!(matches!(err, CernetError::MissingColumn { .. }));
    }

    #[test]
    fn test_gzip_and_comma_separator() {
        let dir = TestDir::new();
        let path = dir.write_gz("t.csv.gz", "miRNA,target_gene,score\nm1,g1,1\nm2,g2,2\n");
        let set = load_and_filter(&path, b',', Some("score"), Some(1.5)).unwrap();
        assert_eq!(edges(&set), vec![("m2".to_string(), "g2".to_string())]);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let dir = TestDir::new();
        let mut rows: Vec<Vec<String>> = vec![vec!["miRNA".into(), "target_gene".into(), "s".into()]];
        for i in 0..50 {
            rows.push(vec![format!("m{}", i % 7), format!("g{}", i % 11), format!("{}", (i * 37 % 100) as f64 / 100.0)]);
        }
        let text: String = rows.iter().map(|r| r.join("\t") + "\n").collect();
        let path = dir.write("t.tsv", &text);

        let mut previous = usize::MAX;
        for step in 0..=10 {
            let threshold = step as f64 / 10.0;
            let set = load_and_filter(&path, b'\t', Some("s"), Some(threshold)).unwrap();
            assert!(set.len() <= previous, "threshold {threshold} kept more rows than a lower one");
            assert!(is_edge_unique(&set));
            previous = set.len();
        }
    }
}
