//! Node set of a ceRNA network edge list.

use std::collections::HashSet;
use std::path::Path;

use cernet_common::{CernetError, Result};
use cernet_ingestion::io::read_table;
use cernet_ingestion::table::{SOURCE_COLUMN, TARGET_COLUMN};
use tracing::info;

/// Union of the `source` and `target` values of a tab-delimited network.
/// Null identifiers are skipped.
pub fn load_network_genes(path: &Path) -> Result<HashSet<String>> {
    let table = read_table(path, b'\t')?;
    let column = |name: &str| {
        table
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CernetError::missing_column(name, format!("network {}", path.display())))
    };
    let source_idx = column(SOURCE_COLUMN)?;
    let target_idx = column(TARGET_COLUMN)?;

    let mut genes = HashSet::new();
    for row in table.rows {
        for idx in [source_idx, target_idx] {
            if let Some(id) = &row[idx] {
                genes.insert(id.clone());
            }
        }
    }

    info!(path = %path.display(), n_nodes = genes.len(), "Loaded network nodes");
    Ok(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cernet_test_utils::{tsv, TestDir};

    #[test]
    fn test_union_of_source_and_target() {
        let dir = TestDir::new();
        let path = dir.write(
            "net.tsv",
            &tsv(&[
                &["source", "target", "source_db"],
                &["miR-21", "PTEN", "starBase"],
                &["miR-21", "MALAT1", "LncBase"],
                &["NA", "ZEB1", "miRcode"],
            ]),
        );
        let genes = load_network_genes(&path).unwrap();
        let expected: HashSet<String> = ["miR-21", "PTEN", "MALAT1", "ZEB1"].into_iter().map(String::from).collect();
        assert_eq!(genes, expected);
    }

    #[test]
    fn test_missing_target_column() {
        let dir = TestDir::new();
        let path = dir.write("net.tsv", "source\tpartner\na\tb\n");
        let err = load_network_genes(&path).unwrap_err();
        assert!(matches!(err, CernetError::MissingColumn { ref column, .. } if column == "target"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TestDir::new();
        let err = load_network_genes(&dir.join("none.tsv")).unwrap_err();
        assert!(matches!(err, CernetError::MissingFile(_)));
    }
}
