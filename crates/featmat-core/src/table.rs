//! Sparse (library, feature) -> outcome matrix with declared axes.
//!
//! A [`FeatureTable`] owns an ordered sequence of libraries (columns) and
//! features (rows). Declaration order is significant and is preserved end
//! to end into every rendered report; it encodes intentional human
//! curation, not arrival order.
//!
//! Lookups distinguish "not a member of the declared axes" (an error in
//! the caller) from "member with no recorded outcome yet" (a legitimate
//! absent result). A pair that was never populated can never surface a
//! default cell that looks like a real result.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use featmat_error::{FeatmatError, Result};
use featmat_types::{Feature, FeatureCell, FeatureKey, Library, LibraryId, TableId};

/// A named, two-dimensional sparse mapping from (library, feature) to
/// outcome.
#[derive(Debug)]
pub struct FeatureTable {
    id: TableId,
    title: Option<String>,
    libraries: Vec<Arc<Library>>,
    features: Vec<Arc<Feature>>,
    library_members: BTreeSet<LibraryId>,
    feature_members: BTreeSet<FeatureKey>,
    cells: RwLock<BTreeMap<(LibraryId, FeatureKey), FeatureCell>>,
}

impl FeatureTable {
    /// Declare a table with its axes.
    ///
    /// Rejects duplicate libraries and duplicate feature keys on the
    /// declared axes. The given ordering becomes the table's canonical
    /// ordering.
    pub fn new(
        id: TableId,
        libraries: Vec<Arc<Library>>,
        features: Vec<Arc<Feature>>,
    ) -> Result<Self> {
        let mut library_members = BTreeSet::new();
        for library in &libraries {
            if !library_members.insert(library.id().clone()) {
                return Err(FeatmatError::DuplicateLibrary {
                    table: id.as_str().to_owned(),
                    name: library.name().to_owned(),
                });
            }
        }

        let mut feature_members = BTreeSet::new();
        for feature in &features {
            if !feature_members.insert(feature.key().clone()) {
                return Err(FeatmatError::DuplicateFeatureKey {
                    table: id.as_str().to_owned(),
                    key: feature.key().as_str().to_owned(),
                });
            }
        }

        Ok(Self {
            id,
            title: None,
            libraries,
            features,
            library_members,
            feature_members,
            cells: RwLock::new(BTreeMap::new()),
        })
    }

    /// Attach a human-readable table heading.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The table identifier.
    #[must_use]
    pub const fn id(&self) -> &TableId {
        &self.id
    }

    /// Human-readable heading, if one was registered.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether this is one of the two reserved metadata tables.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.id.is_reserved()
    }

    /// The library axis, in declaration order.
    #[must_use]
    pub fn libraries(&self) -> &[Arc<Library>] {
        &self.libraries
    }

    /// The feature axis, in declaration order.
    #[must_use]
    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    /// Whether a library is a declared axis member.
    #[must_use]
    pub fn has_library(&self, library: &LibraryId) -> bool {
        self.library_members.contains(library)
    }

    /// Whether a feature is a declared axis member.
    #[must_use]
    pub fn has_feature(&self, feature: &FeatureKey) -> bool {
        self.feature_members.contains(feature)
    }

    /// Pure lookup of a recorded outcome.
    ///
    /// Fails only when `library` or `feature` is not a declared axis
    /// member. A declared pair with no recorded outcome yields `Ok(None)`:
    /// the explicit absent marker, never a default cell.
    pub fn get(&self, library: &LibraryId, feature: &FeatureKey) -> Result<Option<FeatureCell>> {
        self.check_axes(library, feature)?;
        let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
        Ok(cells.get(&(library.clone(), feature.clone())).cloned())
    }

    /// Idempotent upsert of an outcome; last write for a given pair wins.
    ///
    /// Takes `&self` so independently scheduled probes can populate
    /// different cells concurrently. A same-key race resolves to whichever
    /// writer acquires the lock last; the map itself stays intact.
    pub fn set(&self, library: &LibraryId, feature: &FeatureKey, cell: FeatureCell) -> Result<()> {
        self.check_axes(library, feature)?;
        let mut cells = self.cells.write().unwrap_or_else(PoisonError::into_inner);
        let previous = cells.insert((library.clone(), feature.clone()), cell);
        if previous.is_some() {
            debug!(
                table = %self.id,
                library = %library,
                feature = %feature,
                "outcome replaced by a later write"
            );
        }
        Ok(())
    }

    /// Number of recorded outcomes.
    #[must_use]
    pub fn recorded_len(&self) -> usize {
        self.cells
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn check_axes(&self, library: &LibraryId, feature: &FeatureKey) -> Result<()> {
        if !self.library_members.contains(library) {
            return Err(FeatmatError::LibraryNotOnAxis {
                table: self.id.as_str().to_owned(),
                name: library.as_str().to_owned(),
            });
        }
        if !self.feature_members.contains(feature) {
            return Err(FeatmatError::FeatureNotOnAxis {
                table: self.id.as_str().to_owned(),
                name: feature.as_str().to_owned(),
            });
        }
        Ok(())
    }
}
