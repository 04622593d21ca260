//! Raw interaction table acquisition.

pub mod fetch;

pub use fetch::{FetchStatus, Fetcher};
