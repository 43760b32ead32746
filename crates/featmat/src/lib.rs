//! Public API facade for the featmat comparison pipeline.
//!
//! Re-exports the result model and the output writers so a probe runner
//! only needs this one crate: declare axes through [`AssemblyBuilder`],
//! record outcomes as probes complete, then hand the finished
//! [`ResultForAssembly`] values to one or more [`ResultOutput`] writers.

pub use featmat_core::{AssemblyBuilder, FeatureTable, ResultForAssembly};
pub use featmat_error::{FeatmatError, Result};
pub use featmat_report::{
    AssemblyReport, FeatureEntry, HtmlOutput, JsonOutput, LibraryReport, ResultOutput, write_all,
};
pub use featmat_types::{
    Feature, FeatureCell, FeatureKey, FeatureState, Library, LibraryId, TableId,
};
