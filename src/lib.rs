//! Shapefinder: usage inference over JavaScript syntax trees.
//!
//! Loads the ESTree JSON an external parser produced for a source file and
//! runs a named analysis over it. The traversal framework lives in
//! `shapefinder-ast`; spans, diagnostics, error codes and output envelopes
//! live in `shapefinder-core`.

// Core infrastructure - re-exported from shapefinder-core
pub use shapefinder_core::diagnostics;
pub use shapefinder_core::error;
pub use shapefinder_core::output;

pub mod analysis;
pub mod cli;
pub mod config;
pub mod files;

// Error bridges - converts layer errors to ShapeError
mod error_bridges;
