//! Per-library flattening of an assembly's tables.
//!
//! For a target library: metadata from the general-info table, the set of
//! supported framework versions from the framework-support table, then one
//! entry per feature of every ordinary table keyed by the feature's
//! resolved display name. The projection is re-derived on every call, so
//! concurrent writers can flatten the same assembly without coordination.
//!
//! # Name uniqueness
//!
//! The resolved display name must be globally unique across every ordinary
//! table of the assembly; downstream consumers key on the name. The check
//! runs exactly once per library during flattening, covers every declared
//! feature whether or not an outcome was recorded, and surfaces the first
//! collision as [`FeatmatError::DuplicateFeatureName`]. This is a hard
//! invariant, not a warning.

use std::collections::BTreeSet;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use featmat_core::{FeatureTable, ResultForAssembly};
use featmat_error::{FeatmatError, Result};
use featmat_types::{FeatureKey, FeatureState, LibraryId};

/// Rendering-friendly projection of one recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureEntry {
    /// Outcome state, rendered as its lowercase token.
    pub result: FeatureState,
    /// Optional human comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Optional raw diagnostic payload (failure states only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The flattened, all-features view of one library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryReport {
    name: String,
    url: Option<String>,
    version: Option<String>,
    supports: Vec<String>,
    /// (display name, entry) pairs in table-then-feature declaration order.
    features: Vec<(String, FeatureEntry)>,
}

impl LibraryReport {
    /// Flatten one library out of an assembly.
    pub fn collect(assembly: &ResultForAssembly, library: &LibraryId) -> Result<Self> {
        let general = assembly.general_info();
        let url = metadata_text(general, library, &FeatureKey::url())?;
        let version = metadata_text(general, library, &FeatureKey::version())?;

        let support = assembly.framework_support();
        let mut supports = Vec::new();
        if support.has_library(library) {
            for framework in support.features() {
                let cell = support.get(library, framework.key())?;
                if cell.is_some_and(|c| c.state() == FeatureState::Success) {
                    supports.push(framework.display_name().to_owned());
                }
            }
        }

        let mut seen = BTreeSet::new();
        let mut features = Vec::new();
        for table in assembly.ordinary_tables() {
            for feature in table.features() {
                let name = feature.display_name();
                if !seen.insert(name.to_owned()) {
                    return Err(FeatmatError::duplicate_feature_name(
                        name,
                        library.as_str(),
                    ));
                }
                if !table.has_library(library) {
                    continue;
                }
                if let Some(cell) = table.get(library, feature.key())? {
                    features.push((
                        name.to_owned(),
                        FeatureEntry {
                            result: cell.state(),
                            comment: cell.details().map(str::to_owned),
                            error: cell.raw_error().map(str::to_owned),
                        },
                    ));
                }
            }
        }

        Ok(Self {
            name: library.as_str().to_owned(),
            url,
            version,
            supports,
            features,
        })
    }

    /// The library's stable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL from the general-info table, if recorded.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Version from the general-info table, if recorded.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Supported framework versions, in declaration order.
    #[must_use]
    pub fn supports(&self) -> &[String] {
        &self.supports
    }

    /// Flattened (display name, entry) pairs, in declaration order.
    #[must_use]
    pub fn features(&self) -> &[(String, FeatureEntry)] {
        &self.features
    }
}

/// Read the text of a reserved general-info row. An undeclared row or an
/// unrecorded cell both mean "no metadata", not an error.
fn metadata_text(
    general: &FeatureTable,
    library: &LibraryId,
    key: &FeatureKey,
) -> Result<Option<String>> {
    if !general.has_feature(key) {
        return Ok(None);
    }
    Ok(general
        .get(library, key)?
        .and_then(|cell| cell.details().map(str::to_owned)))
}

impl Serialize for LibraryReport {
    /// One JSON object per library: `name`, `url`, `version`, `supports`,
    /// then one key per feature display name. Absent metadata and absent
    /// outcomes are omitted, never emitted as null. Key order must follow
    /// declaration order.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(url) = &self.url {
            map.serialize_entry("url", url)?;
        }
        if let Some(version) = &self.version {
            map.serialize_entry("version", version)?;
        }
        map.serialize_entry("supports", &self.supports)?;
        for (name, entry) in &self.features {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// The flattened view of a whole assembly: one [`LibraryReport`] per
/// library, in general-info declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyReport {
    libraries: Vec<LibraryReport>,
}

impl AssemblyReport {
    /// Flatten every library of an assembly.
    ///
    /// Fails fast on the first display-name collision; a duplicate
    /// surfaces as soon as data is actually being flattened for some
    /// library.
    pub fn collect(assembly: &ResultForAssembly) -> Result<Self> {
        let mut libraries = Vec::new();
        for library in assembly.general_info().libraries() {
            libraries.push(LibraryReport::collect(assembly, library.id())?);
        }
        Ok(Self { libraries })
    }

    /// Per-library reports, in general-info declaration order.
    #[must_use]
    pub fn libraries(&self) -> &[LibraryReport] {
        &self.libraries
    }
}

impl Serialize for AssemblyReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.libraries.len()))?;
        for library in &self.libraries {
            seq.serialize_element(library)?;
        }
        seq.end()
    }
}
