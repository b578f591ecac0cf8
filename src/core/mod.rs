//! Core modules for the score merge: loading, joining, flattening, export.
//!
//! All error and output primitives shared by the CLI live here.

pub mod enrich;
pub mod error;
pub mod export;
pub mod flatten;
pub mod merge;
pub mod output;
pub mod record;
pub mod scores;
