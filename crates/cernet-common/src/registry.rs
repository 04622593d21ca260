//! Interaction data sources.
//!
//! The built-in registry lists the databases in the order they are merged;
//! that order decides which source wins when two databases report the same
//! (source, target) edge.

use serde::{Deserialize, Serialize};

/// One downloadable interaction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Database name, written to the `source_db` column of the merged network
    pub name: String,

    /// Download URL
    pub url: String,

    /// File name inside the raw data directory (`.gz` means gzip)
    pub local_filename: String,

    /// Column separator of the raw table
    #[serde(default = "default_separator")]
    pub field_separator: char,

    /// Column holding a per-row confidence score
    #[serde(default)]
    pub score_column: Option<String>,

    /// Minimum score to keep; `None` disables filtering
    #[serde(default)]
    pub score_threshold: Option<f64>,
}

fn default_separator() -> char { '\t' }

impl SourceDescriptor {
    /// Separator as the single byte the CSV reader expects.
    /// Configs with a non-ASCII separator fail validation; the tab fallback
    /// only covers descriptors built in code.
    pub fn separator_byte(&self) -> u8 {
        if self.field_separator.is_ascii() {
            self.field_separator as u8
        } else {
            b'\t'
        }
    }
}

/// The four ceRNA interaction databases, in merge order.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor {
            name: "starBase".to_string(),
            url: "https://starbase.sysu.edu.cn/download/starBase_ceRNA_interactions.tsv.gz".to_string(),
            local_filename: "starBase_ceRNA_interactions.tsv.gz".to_string(),
            field_separator: '\t',
            score_column: Some("clip_score".to_string()),
            score_threshold: Some(0.5),
        },
        SourceDescriptor {
            name: "LncBase".to_string(),
            url: "https://diana.e-ce.uth.gr/lncbasev2/download/LncBase_interactions.tsv.gz".to_string(),
            local_filename: "LncBase_interactions.tsv.gz".to_string(),
            field_separator: '\t',
            score_column: Some("lncbase_confidence".to_string()),
            score_threshold: Some(0.7),
        },
        SourceDescriptor {
            name: "miRTarBase".to_string(),
            url: "https://mirtarbase.cuhk.edu.cn/cache/download/2023_MTI.tsv.gz".to_string(),
            local_filename: "miRTarBase_interactions.tsv.gz".to_string(),
            field_separator: '\t',
            // Categorical evidence label; every entry is experimentally validated
            score_column: Some("SupportType".to_string()),
            score_threshold: None,
        },
        SourceDescriptor {
            name: "miRcode".to_string(),
            url: "http://www.mircode.org/download/mircode_v11.tsv".to_string(),
            local_filename: "miRcode_interactions.tsv".to_string(),
            field_separator: '\t',
            score_column: None,
            score_threshold: None,
        },
    ]
}
