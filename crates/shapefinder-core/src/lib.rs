//! Core infrastructure for shapefinder.
//!
//! This crate provides the language-agnostic pieces shared by the syntax
//! tree crate and the analyses:
//! - Byte spans into source text
//! - Error types and process exit codes
//! - Leveled diagnostics and the sinks that receive them
//! - JSON output envelopes for CLI responses

pub mod diagnostics;
pub mod error;
pub mod output;
pub mod span;

pub use span::Span;
