//! Identifier normalisation.
//!
//! `IdentifierMap` rewrites raw transcript/gene identifiers to official
//! symbols; unknown identifiers pass through untouched.

pub mod symbols;

pub use symbols::{harmonise, IdentifierMap};
