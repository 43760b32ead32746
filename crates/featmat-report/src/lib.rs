//! Flattening and multi-format output for featmat results.
//!
//! The flattening step ([`AssemblyReport`]) projects a validated
//! [`ResultForAssembly`](featmat_core::ResultForAssembly) into a
//! per-library, all-features view and enforces the global
//! display-name-uniqueness invariant. Every output writer renders through
//! that one abstraction, so a new format never re-derives the semantics.
//!
//! Writers implement [`ResultOutput`]; [`JsonOutput`] and [`HtmlOutput`]
//! are the built-in formats.

pub mod flatten;
pub mod html;
pub mod json;
pub mod output;

pub use flatten::{AssemblyReport, FeatureEntry, LibraryReport};
pub use html::HtmlOutput;
pub use json::JsonOutput;
pub use output::{ResultOutput, write_all};
