//! Shared error type, source registry, and pipeline configuration for the cernet crates.

pub mod error;
pub mod registry;
pub mod config;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{CernetError, Result};
pub use registry::{default_sources, SourceDescriptor};
