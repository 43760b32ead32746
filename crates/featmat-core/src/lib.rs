//! Result model for the featmat comparison pipeline.
//!
//! The in-memory matrix of libraries x features x outcome: sparse
//! [`FeatureTable`]s with declaration-ordered axes, the
//! [`ResultForAssembly`] grouping that one test run produces, and the
//! [`AssemblyBuilder`] seam the external probe-execution engine drives.
//!
//! # Population model
//!
//! Tables are write-once-per-key, read-many. Axes are declared before any
//! population begins; outcomes then arrive in any order, potentially from
//! concurrently scheduled probes. `set` targets distinct keys safely; two
//! probes racing on the same key get last-writer-wins with no corruption
//! guarantee beyond that. Reading the assembled matrix derives a fresh
//! projection every time and never mutates shared state.

pub mod assembly;
pub mod builder;
pub mod table;

pub use assembly::ResultForAssembly;
pub use builder::AssemblyBuilder;
pub use table::FeatureTable;
