//! Outcome values recorded for one (library, feature) probe.
//!
//! A [`FeatureCell`] is an immutable value: state, optional human comment,
//! optional raw error detail. The constructors uphold the cell invariant
//! (`raw_error` is populated only when the state denotes failure), so a
//! well-typed cell can never claim a diagnostic payload for a probe that
//! did not fail.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use featmat_error::{FeatmatError, Result};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Result state of one probe. Closed enumeration with no transitions once
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureState {
    /// The probe ran and the library supports the feature.
    Success,
    /// The probe ran and failed.
    Failure,
    /// The library declares the feature unsupported.
    NotSupported,
    /// The probe was skipped for this combination.
    Skipped,
    /// The probe produced no classifiable result.
    Unknown,
}

impl FeatureState {
    /// All states in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Success,
        Self::Failure,
        Self::NotSupported,
        Self::Skipped,
        Self::Unknown,
    ];

    /// Lowercase token used in rendered artifacts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::NotSupported => "not-supported",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this state denotes a failure (and may carry a raw error).
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failure)
    }
}

impl fmt::Display for FeatureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureState {
    type Err = FeatmatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "not-supported" => Ok(Self::NotSupported),
            "skipped" => Ok(Self::Skipped),
            "unknown" => Ok(Self::Unknown),
            other => Err(FeatmatError::capture(format!(
                "unknown outcome state '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// The recorded outcome of one (library, feature) probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCell {
    state: FeatureState,
    details: Option<String>,
    raw_error: Option<String>,
}

impl FeatureCell {
    /// Build a cell from raw parts, enforcing the cell invariant.
    ///
    /// Returns [`FeatmatError::InvalidOutcome`] when `raw_error` is present
    /// but `state` is not a failure state. `details` may accompany any
    /// state.
    pub fn new(
        state: FeatureState,
        details: Option<String>,
        raw_error: Option<String>,
    ) -> Result<Self> {
        if raw_error.is_some() && !state.is_failure() {
            return Err(FeatmatError::invalid_outcome(format!(
                "raw error attached to non-failure state '{state}'"
            )));
        }
        Ok(Self {
            state,
            details,
            raw_error,
        })
    }

    /// A successful outcome.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            state: FeatureState::Success,
            details: None,
            raw_error: None,
        }
    }

    /// A failed outcome, with the raw diagnostic payload.
    #[must_use]
    pub fn failure(raw_error: impl Into<String>) -> Self {
        Self {
            state: FeatureState::Failure,
            details: None,
            raw_error: Some(raw_error.into()),
        }
    }

    /// A not-supported outcome.
    #[must_use]
    pub const fn not_supported() -> Self {
        Self {
            state: FeatureState::NotSupported,
            details: None,
            raw_error: None,
        }
    }

    /// A skipped outcome.
    #[must_use]
    pub const fn skipped() -> Self {
        Self {
            state: FeatureState::Skipped,
            details: None,
            raw_error: None,
        }
    }

    /// An unclassified outcome.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            state: FeatureState::Unknown,
            details: None,
            raw_error: None,
        }
    }

    /// Attach a human-readable comment. Valid for any state.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// The recorded state.
    #[must_use]
    pub const fn state(&self) -> FeatureState {
        self.state
    }

    /// Optional human comment.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Optional raw diagnostic payload (failure states only).
    #[must_use]
    pub fn raw_error(&self) -> Option<&str> {
        self.raw_error.as_deref()
    }
}
