//! # hardenkit-export
//!
//! Turns a template use into files on disk.
//!
//! Call [`use_template`] to generate a script, record the use and write it
//! with a hash-gated atomic write; [`diff_script`] shows what a re-export
//! would change without touching anything.

pub mod diff;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use diff::{diff_script, ScriptDiff};
pub use error::ExportError;
pub use pipeline::{use_template, UseOutcome, UseRequest};
pub use writer::{content_digest, write_script, WriteResult};
