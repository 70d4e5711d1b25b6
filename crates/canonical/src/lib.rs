//! Canonical text cleanup for corpus documents.
//!
//! Collected speeches and archive transcripts carry noise that has nothing to
//! do with their content: stage directions such as `(Applaudissements)`,
//! irregular line breaks, compatibility code points. This crate removes that
//! noise so the near-duplicate engine compares what was actually said.
//!
//! ## What we do
//!
//! - Unicode normalization (NFKC, configurable)
//! - Removal of parenthetical annotations on a single line
//! - Optional punctuation stripping
//! - Whitespace normalization (collapses to single spaces, trims edges)
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence. Same text and config give
//! the same output on any machine.
//!
//! Casing is left alone: the shingle extractor lower-cases on its own.

mod annotations;
mod config;
mod error;
mod pipeline;
mod whitespace;

pub use crate::annotations::strip_annotations;
pub use crate::config::CanonicalizeConfig;
pub use crate::error::CanonicalError;
pub use crate::pipeline::{apply_cleanup, canonicalize_text};
pub use crate::whitespace::collapse_whitespace;
