//! Edge deduplication.
//!
//! An edge is identified by its (source, target) pair alone; the first
//! record seen for a pair wins and later ones are discarded whatever their
//! extra columns say.

use std::collections::HashSet;

use crate::table::RecordSet;

/// Keep the first record of every (source, target) pair, preserving order.
/// Returns the deduplicated set and how many records were dropped.
pub fn dedup_edges(set: RecordSet) -> (RecordSet, usize) {
    let before = set.len();
    let (columns, records) = set.into_parts();

    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());
    let mut out = RecordSet::new(columns);
    for record in records {
        if seen.insert((record.source.clone(), record.target.clone())) {
            out.push(record);
        }
    }

    let removed = before - out.len();
    (out, removed)
}

/// True if no two records share a (source, target) pair.
pub fn is_edge_unique(set: &RecordSet) -> bool {
    let mut seen = HashSet::with_capacity(set.len());
    set.records().iter().all(|r| seen.insert(r.edge()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::InteractionRecord;

    fn set(rows: &[(&str, &str, &str)]) -> RecordSet {
        let mut s = RecordSet::new(vec!["note".into()]);
        for (a, b, n) in rows {
            s.push(InteractionRecord {
                source: a.to_string(),
                target: b.to_string(),
                fields: vec![Some(n.to_string())],
            });
        }
        s
    }

    #[test]
    fn test_keeps_first_occurrence() {
        let (out, removed) = dedup_edges(set(&[("a", "b", "1"), ("a", "c", "2"), ("a", "b", "3")]));
        assert_eq!(removed, 1);
        assert_eq!(out.len(), 2);
        assert_eq!(out.records()[0].fields[0].as_deref(), Some("1"));
        assert!(is_edge_unique(&out));
    }

    #[test]
    fn test_direction_matters() {
        let (out, removed) = dedup_edges(set(&[("a", "b", "1"), ("b", "a", "2")]));
        assert_eq!(removed, 0);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_empty_set() {
        let (out, removed) = dedup_edges(RecordSet::default());
        assert!(out.is_empty());
        assert_eq!(removed, 0);
    }
}
