//! Library and feature catalog records.
//!
//! A [`Library`] identifies one implementation under comparison; a
//! [`Feature`] identifies one probe. Both are created before any probes
//! run, are immutable thereafter, and are shared by reference (`Arc`)
//! across every table of an assembly. Identity is the stable id, never
//! pointer or field-by-field equality.
//!
//! Display metadata for a library (URL, version) lives in the reserved
//! general-info table, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{FeatureKey, LibraryId};

/// One implementation under comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    id: LibraryId,
}

impl Library {
    /// Create a library from its stable, run-unique name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LibraryId::new(name),
        }
    }

    /// The stable identifier.
    #[must_use]
    pub const fn id(&self) -> &LibraryId {
        &self.id
    }

    /// The stable name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.as_str()
    }
}

/// One probe/capability being compared across libraries.
///
/// The display name resolves to the explicit registration name when one
/// was given, otherwise to the identifying key itself, so authors are not
/// forced to annotate every trivial feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    key: FeatureKey,
    explicit_name: Option<String>,
    group: Option<String>,
    special_cases: BTreeMap<LibraryId, String>,
}

impl Feature {
    /// Create a feature from its identifying key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: FeatureKey::new(key),
            explicit_name: None,
            group: None,
            special_cases: BTreeMap::new(),
        }
    }

    /// Register an explicit display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.explicit_name = Some(name.into());
        self
    }

    /// Attach grouping metadata.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Attach an informational per-library caveat.
    ///
    /// Special cases are descriptive only; they never affect grading or
    /// flattening.
    #[must_use]
    pub fn with_special_case(mut self, library: LibraryId, note: impl Into<String>) -> Self {
        self.special_cases.insert(library, note.into());
        self
    }

    /// The identifying key.
    #[must_use]
    pub const fn key(&self) -> &FeatureKey {
        &self.key
    }

    /// The explicit display name, if one was registered.
    #[must_use]
    pub fn explicit_name(&self) -> Option<&str> {
        self.explicit_name.as_deref()
    }

    /// Canonical display name: explicit name if present, else the key.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.explicit_name.as_deref().unwrap_or(self.key.as_str())
    }

    /// Grouping metadata, if any.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Informational per-library caveats.
    #[must_use]
    pub const fn special_cases(&self) -> &BTreeMap<LibraryId, String> {
        &self.special_cases
    }
}
