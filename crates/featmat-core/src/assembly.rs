//! The unit of output: all tables produced by one test run.
//!
//! A [`ResultForAssembly`] owns its tables exclusively and guarantees the
//! assembly invariants at construction: unique table identifiers, exactly
//! one general-info table, exactly one framework-support table, and every
//! ordinary table's library axis being a subset of the libraries the
//! general-info table enumerates.

use std::collections::BTreeSet;

use featmat_error::{FeatmatError, Result};
use featmat_types::TableId;

use crate::table::FeatureTable;

/// The complete, validated set of feature tables from one run, plus the
/// output filename prefix the writers combine with their format extension.
#[derive(Debug)]
pub struct ResultForAssembly {
    output_name_prefix: String,
    tables: Vec<FeatureTable>,
    general_info_index: usize,
    framework_support_index: usize,
}

impl ResultForAssembly {
    /// Validate and assemble a run's tables.
    pub fn new(output_name_prefix: impl Into<String>, tables: Vec<FeatureTable>) -> Result<Self> {
        // Reserved tables are checked first; a duplicated reserved id
        // reports as such, not as a generic id collision.
        let general_info_index = Self::reserved_index(&tables, &TableId::general_info())?;
        let framework_support_index = Self::reserved_index(&tables, &TableId::framework_support())?;

        let mut seen = BTreeSet::new();
        for table in &tables {
            if !seen.insert(table.id().clone()) {
                return Err(FeatmatError::DuplicateTableId {
                    id: table.id().as_str().to_owned(),
                });
            }
        }

        let general = &tables[general_info_index];
        for table in &tables {
            if table.is_reserved() {
                continue;
            }
            for library in table.libraries() {
                if !general.has_library(library.id()) {
                    return Err(FeatmatError::UndeclaredLibrary {
                        table: table.id().as_str().to_owned(),
                        library: library.name().to_owned(),
                    });
                }
            }
        }

        Ok(Self {
            output_name_prefix: output_name_prefix.into(),
            tables,
            general_info_index,
            framework_support_index,
        })
    }

    fn reserved_index(tables: &[FeatureTable], id: &TableId) -> Result<usize> {
        let mut found = None;
        for (index, table) in tables.iter().enumerate() {
            if table.id() == id {
                if found.is_some() {
                    return Err(FeatmatError::ReservedTableDuplicated {
                        id: id.as_str().to_owned(),
                    });
                }
                found = Some(index);
            }
        }
        found.ok_or_else(|| FeatmatError::ReservedTableMissing {
            id: id.as_str().to_owned(),
        })
    }

    /// The output filename prefix for this assembly's artifacts.
    #[must_use]
    pub fn output_name_prefix(&self) -> &str {
        &self.output_name_prefix
    }

    /// All tables, in declaration order.
    #[must_use]
    pub fn tables(&self) -> &[FeatureTable] {
        &self.tables
    }

    /// The reserved general-info table.
    #[must_use]
    pub fn general_info(&self) -> &FeatureTable {
        &self.tables[self.general_info_index]
    }

    /// The reserved framework-support table.
    #[must_use]
    pub fn framework_support(&self) -> &FeatureTable {
        &self.tables[self.framework_support_index]
    }

    /// The ordinary feature tables, in declaration order.
    pub fn ordinary_tables(&self) -> impl Iterator<Item = &FeatureTable> {
        self.tables.iter().filter(|t| !t.is_reserved())
    }
}
