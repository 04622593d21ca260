use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CernetError {
    #[error("Download failed for {url}: HTTP {status}")]
    Download { url: String, status: u16 },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{column}' in {context}")]
    MissingColumn { column: String, context: String },

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl CernetError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse { path: path.into(), message: message.into() }
    }

    pub fn missing_column(column: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingColumn { column: column.into(), context: context.into() }
    }
}

pub type Result<T> = std::result::Result<T, CernetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_message() {
        let e = CernetError::Download { url: "http://x/y.tsv".into(), status: 404 };
        assert_eq!(e.to_string(), "Download failed for http://x/y.tsv: HTTP 404");
    }

    #[test]
    fn test_missing_column_message() {
        let e = CernetError::missing_column("confidence_score", "merged network");
        assert_eq!(e.to_string(), "Missing column 'confidence_score' in merged network");
    }
}
