use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for featmat operations.
///
/// Structured variants for every failure the comparison pipeline can
/// surface. Nothing in here is retried internally: every variant is either
/// an authoring mistake in the feature/table definitions or an environment
/// problem, and silent recovery from either would hide real defects in the
/// comparison data.
#[derive(Error, Debug)]
pub enum FeatmatError {
    // === Axis errors ===
    /// Lookup against a library that is not declared on the table's axes.
    #[error("table '{table}': library '{name}' is not a declared axis member")]
    LibraryNotOnAxis { table: String, name: String },

    /// Lookup against a feature that is not declared on the table's axes.
    #[error("table '{table}': feature '{name}' is not a declared axis member")]
    FeatureNotOnAxis { table: String, name: String },

    // === Authoring errors ===
    /// Two features across the ordinary tables of one assembly resolve to
    /// the same display name. Downstream consumers key on the name, so the
    /// flattened mapping would silently merge distinct probes.
    #[error("feature name '{name}' was used more than once (seen while flattening library '{library}')")]
    DuplicateFeatureName { name: String, library: String },

    /// A feature key appears twice on one table's feature axis.
    #[error("table '{table}': duplicate feature key '{key}'")]
    DuplicateFeatureKey { table: String, key: String },

    /// A library appears twice on one table's library axis.
    #[error("table '{table}': duplicate library '{name}'")]
    DuplicateLibrary { table: String, name: String },

    /// Two tables in one assembly share an identifier.
    #[error("duplicate table id '{id}' in assembly")]
    DuplicateTableId { id: String },

    /// An outcome record targets a table that was never declared.
    #[error("no table '{id}' declared in assembly")]
    UnknownTable { id: String },

    /// An assembly is missing one of its reserved tables.
    #[error("assembly has no '{id}' table")]
    ReservedTableMissing { id: String },

    /// An assembly carries more than one copy of a reserved table.
    #[error("assembly has more than one '{id}' table")]
    ReservedTableDuplicated { id: String },

    /// An ordinary table references a library the general-info table does
    /// not enumerate.
    #[error("table '{table}': library '{library}' is not listed in the general-info table")]
    UndeclaredLibrary { table: String, library: String },

    /// An outcome record violates the cell invariant (a raw error attached
    /// to a non-failure state).
    #[error("invalid outcome: {detail}")]
    InvalidOutcome { detail: String },

    // === Environment errors ===
    /// The destination artifact cannot be written.
    #[error("cannot write '{path}': {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other file I/O (capture loading, directory creation).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A run capture file does not match the expected schema.
    #[error("malformed capture: {detail}")]
    Capture { detail: String },
}

impl FeatmatError {
    /// Whether this error is a mistake in the feature/table authoring (as
    /// opposed to an environment problem such as an unwritable directory).
    pub const fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            Self::LibraryNotOnAxis { .. }
                | Self::FeatureNotOnAxis { .. }
                | Self::DuplicateFeatureName { .. }
                | Self::DuplicateFeatureKey { .. }
                | Self::DuplicateLibrary { .. }
                | Self::DuplicateTableId { .. }
                | Self::UnknownTable { .. }
                | Self::ReservedTableMissing { .. }
                | Self::ReservedTableDuplicated { .. }
                | Self::UndeclaredLibrary { .. }
                | Self::InvalidOutcome { .. }
                | Self::Capture { .. }
        )
    }

    /// Process exit code for this error (for CLI use).
    ///
    /// Authoring errors exit 2, environment errors exit 1.
    pub const fn exit_code(&self) -> i32 {
        if self.is_authoring_error() { 2 } else { 1 }
    }

    /// Create a duplicate-feature-name error.
    pub fn duplicate_feature_name(name: impl Into<String>, library: impl Into<String>) -> Self {
        Self::DuplicateFeatureName {
            name: name.into(),
            library: library.into(),
        }
    }

    /// Create an invalid-outcome error.
    pub fn invalid_outcome(detail: impl Into<String>) -> Self {
        Self::InvalidOutcome {
            detail: detail.into(),
        }
    }

    /// Create a capture-format error.
    pub fn capture(detail: impl Into<String>) -> Self {
        Self::Capture {
            detail: detail.into(),
        }
    }

    /// Create a persistence error for a path.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using `FeatmatError`.
pub type Result<T> = std::result::Result<T, FeatmatError>;
