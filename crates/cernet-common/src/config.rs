//! Pipeline configuration.
//!
//! Reads `cernet.toml` (or `.yaml` / `.json`) from an explicit path, the
//! `CERNET_CONFIG` env var, or the current directory. Every field has a
//! default, so running without a config file uses the built-in registry.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CernetError, Result};
use crate::registry::{default_sources, SourceDescriptor};

pub const CONFIG_ENV_VAR: &str = "CERNET_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cernet.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Where raw source tables are downloaded
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Tab-delimited `raw_id` → `official_symbol` table
    #[serde(default = "default_id_mapping_file")]
    pub id_mapping_file: PathBuf,

    /// Merged (unfiltered) network edge list
    #[serde(default = "default_merged_output")]
    pub merged_output: PathBuf,

    /// Network after the global confidence filter
    #[serde(default = "default_final_output")]
    pub final_output: PathBuf,

    /// Quantile of the confidence column used as the global cutoff
    #[serde(default = "default_global_quantile")]
    pub global_quantile: Option<f64>,

    /// Column the global cutoff is computed over
    #[serde(default = "default_confidence_column")]
    pub confidence_column: String,

    /// Keep edges with no numeric confidence through the global cutoff
    #[serde(default)]
    pub keep_unscored_edges: bool,

    /// Connect and read-idle timeout for downloads, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Interaction databases, in merge order
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceDescriptor>,
}

fn default_data_dir() -> PathBuf { PathBuf::from("data/raw") }
fn default_id_mapping_file() -> PathBuf { PathBuf::from("data/annotations/gene_id_mapping.tsv") }
fn default_merged_output() -> PathBuf { PathBuf::from("data/processed/ceRNA_interactions_merged.tsv") }
fn default_final_output() -> PathBuf { PathBuf::from("data/final_ceRNA_interactions.tsv") }
fn default_global_quantile() -> Option<f64> { Some(0.10) }
fn default_confidence_column() -> String { "confidence_score".to_string() }
fn default_http_timeout() -> u64 { 60 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            id_mapping_file: default_id_mapping_file(),
            merged_output: default_merged_output(),
            final_output: default_final_output(),
            global_quantile: default_global_quantile(),
            confidence_column: default_confidence_column(),
            keep_unscored_edges: false,
            http_timeout_secs: default_http_timeout(),
            sources: default_sources(),
        }
    }
}

impl PipelineConfig {
    /// Resolve and load the configuration.
    ///
    /// An explicit path must exist. Without one, `CERNET_CONFIG` is consulted,
    /// then `cernet.toml`; if neither names an existing file the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CernetError::MissingFile(path.to_path_buf()));
                }
                Self::from_path(path)?
            }
            None => {
                let path = std::env::var(CONFIG_ENV_VAR)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
                if path.exists() {
                    Self::from_path(&path)?
                } else {
                    info!(path = %path.display(), "No config file found, using built-in defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load by extension: `.yaml`/`.yml`, `.json`, anything else as TOML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let parsed = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            _ => Self::from_toml(&content),
        };
        info!(path = %path.display(), "Configuration loaded");
        parsed
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CernetError::Config(e.to_string()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| CernetError::Config(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CernetError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CernetError::Config(e.to_string()))
    }

    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(CernetError::Config("no interaction sources configured".into()));
        }
        if let Some(q) = self.global_quantile {
            if !(0.0..=1.0).contains(&q) {
                return Err(CernetError::Config(format!("global_quantile must be in [0, 1], got {q}")));
            }
        }
        if self.http_timeout_secs == 0 {
            return Err(CernetError::Config("http_timeout_secs must be positive".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for src in &self.sources {
            if !seen.insert(src.name.as_str()) {
                return Err(CernetError::Config(format!("duplicate source name '{}'", src.name)));
            }
            if !src.field_separator.is_ascii() {
                return Err(CernetError::Config(format!(
                    "source '{}' has non-ASCII field_separator {:?}",
                    src.name, src.field_separator
                )));
            }
            if src.local_filename.is_empty() {
                return Err(CernetError::Config(format!("source '{}' has no local_filename", src.name)));
            }
        }
        Ok(())
    }

    /// Local path of a source's raw table.
    pub fn raw_path(&self, source: &SourceDescriptor) -> PathBuf {
        self.data_dir.join(&source.local_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.global_quantile, Some(0.10));
        assert_eq!(config.confidence_column, "confidence_score");
        assert!(!config.keep_unscored_edges);
        assert_eq!(config.sources.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = PipelineConfig::from_toml("data_dir = \"/tmp/raw\"\nglobal_quantile = 0.25\n").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/raw"));
        assert_eq!(config.global_quantile, Some(0.25));
        assert_eq!(config.sources, default_sources());
        assert_eq!(config.http_timeout_secs, 60);
    }

    #[test]
    fn test_toml_sources_table() {
        let toml = r#"
[[sources]]
name = "custom"
url = "http://localhost/custom.csv"
local_filename = "custom.csv"
field_separator = ","
score_column = "score"
score_threshold = 0.3
"#;
        let config = PipelineConfig::from_toml(toml).unwrap();
        assert_eq!(config.sources.len(), 1);
        let src = &config.sources[0];
        assert_eq!(src.field_separator, ',');
        assert_eq!(src.score_threshold, Some(0.3));
        assert_eq!(config.raw_path(src), PathBuf::from("data/raw/custom.csv"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = PipelineConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = PipelineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::default();
        let parsed = PipelineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_invalid_quantile_rejected() {
        let config = PipelineConfig { global_quantile: Some(1.5), ..Default::default() };
        assert!(matches!(config.validate(), Err(CernetError::Config(_))));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let mut config = PipelineConfig::default();
        let dup = config.sources[0].clone();
        config.sources.push(dup);
        assert!(matches!(config.validate(), Err(CernetError::Config(_))));
    }

    #[test]
    fn test_non_ascii_separator_rejected() {
        let mut config = PipelineConfig::from_toml(
            "[[sources]]\nname = \"x\"\nurl = \"http://localhost/x\"\nlocal_filename = \"x.tsv\"\nfield_separator = \"§\"\n",
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(CernetError::Config(_))));
        config.sources[0].field_separator = ';';
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let err = PipelineConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, CernetError::MissingFile(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cernet.yaml");
        std::fs::write(&path, "confidence_column: clip_score\nhttp_timeout_secs: 5\n").unwrap();
        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.confidence_column, "clip_score");
        assert_eq!(config.http_timeout_secs, 5);
    }
}
