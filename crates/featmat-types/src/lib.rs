//! Leaf value types for the featmat comparison pipeline.
//!
//! Identifiers, outcome values, and the library/feature catalog records
//! shared by every table in a run. Everything here is immutable once
//! constructed; re-probing a cell produces a new [`FeatureCell`] that
//! replaces the old one at the same key, never a mutation of the old one.

pub mod catalog;
pub mod outcome;

pub use catalog::{Feature, Library};
pub use outcome::{FeatureCell, FeatureState};

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identifier of one library (implementation under comparison).
///
/// The identifier is the library's stable name, unique within a run.
/// Identity within the model is this id, not value equality of the
/// surrounding records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryId(String);

impl LibraryId {
    /// Create a library id from a stable name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw name string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifying key of one feature (probe) within a table.
///
/// Keys must be unique within a table's feature axis; the constructor of
/// the table enforces that. The key doubles as the fallback display name
/// when no explicit name was registered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureKey(String);

impl FeatureKey {
    /// Reserved key of the general-info row carrying a library's URL.
    pub const URL: &'static str = "url";
    /// Reserved key of the general-info row carrying a library's version.
    pub const VERSION: &'static str = "version";

    /// Create a feature key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The reserved `url` metadata key.
    #[must_use]
    pub fn url() -> Self {
        Self(Self::URL.to_owned())
    }

    /// The reserved `version` metadata key.
    #[must_use]
    pub fn version() -> Self {
        Self(Self::VERSION.to_owned())
    }

    /// The raw key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one feature table within an assembly.
///
/// Two identifiers are reserved for the cross-cutting metadata tables;
/// everything else is an ordinary feature table. Identifiers must not
/// collide across one assembly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    /// Reserved id of the table carrying per-library URL/version metadata.
    pub const GENERAL_INFO: &'static str = "general-info";
    /// Reserved id of the table carrying per-framework-version support flags.
    pub const FRAMEWORK_SUPPORT: &'static str = "framework-support";

    /// Create a table id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved general-info table id.
    #[must_use]
    pub fn general_info() -> Self {
        Self(Self::GENERAL_INFO.to_owned())
    }

    /// The reserved framework-support table id.
    #[must_use]
    pub fn framework_support() -> Self {
        Self(Self::FRAMEWORK_SUPPORT.to_owned())
    }

    /// Whether this id names one of the two reserved metadata tables.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.0 == Self::GENERAL_INFO || self.0 == Self::FRAMEWORK_SUPPORT
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
