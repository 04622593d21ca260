//! ceRNA interaction acquisition and integration.
//! - Source download with presence-based caching
//! - Per-source loading, confidence filtering and deduplication
//! - Identifier harmonisation
//! - Cross-database merge and global quantile cutoff

pub mod table;
pub mod io;
pub mod dedup;
pub mod loader;
pub mod normalise;
pub mod merge;
pub mod confidence;
pub mod sources;
pub mod pipeline;

pub use table::{InteractionRecord, RecordSet};
