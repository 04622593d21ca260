//! Shared test fixtures: scratch directories and small interaction tables
//! shaped like the real database dumps.

use std::io::Write;
use std::path::{Path, PathBuf};

/// starBase-style table: named `miRNA` / `target_gene` columns plus a CLIP score.
pub const STARBASE_TSV: &str = "\
miRNA\ttarget_gene\tclip_score\tgeneType
hsa-miR-21-5p\tPTEN\t0.9\tprotein_coding
hsa-miR-21-5p\tPDCD4\t0.4\tprotein_coding
hsa-let-7a-5p\tKRAS\t0.75\tprotein_coding
hsa-miR-21-5p\tPTEN\t0.8\tprotein_coding
hsa-miR-155-5p\tNA\t0.95\tprotein_coding
";

/// LncBase-style table: positional identifier columns.
pub const LNCBASE_TSV: &str = "\
mirna_name\tgene_name\tlncbase_confidence\ttissue
hsa-let-7a-5p\tKRAS\t0.8\tlung
hsa-miR-21-5p\tMALAT1\t0.72\tliver
hsa-miR-21-5p\tNEAT1\t0.5\tliver
";

/// miRcode-style table: no score column at all.
pub const MIRCODE_TSV: &str = "\
microrna\tgene_symbol\tconservation
hsa-miR-21-5p\tMALAT1\t45
hsa-miR-200c-3p\tZEB1\t80
";

/// Mapping from raw identifiers to official symbols.
pub const ID_MAPPING_TSV: &str = "\
raw_id\tofficial_symbol
hsa-let-7a-5p\tMIRLET7A1
ENSG00000251562\tMALAT1
";

/// A scratch directory removed on drop.
pub struct TestDir {
    dir: tempfile::TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a text file, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    /// Write gzip-compressed text.
    pub fn write_gz(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        let file = std::fs::File::create(&path).expect("create gz fixture");
        let mut enc = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
        enc.write_all(content.as_bytes()).expect("write gz fixture");
        enc.finish().expect("finish gz fixture");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.join(rel)).expect("read output")
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Build tab-separated text from rows of cells.
pub fn tsv(rows: &[&[&str]]) -> String {
    rows.iter().map(|r| r.join("\t") + "\n").collect()
}
