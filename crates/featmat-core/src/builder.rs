//! Ingest seam for the external probe-execution engine.
//!
//! The engine declares every table's axes up front, then records outcomes
//! as probes complete, in any order, possibly from concurrently scheduled
//! probes. `record` goes through the table's own synchronized upsert, so a
//! shared `&AssemblyBuilder` can be driven from multiple threads during
//! the population phase. `finish` runs the assembly invariants and yields
//! the immutable [`ResultForAssembly`].

use std::collections::BTreeMap;

use featmat_error::{FeatmatError, Result};
use featmat_types::{FeatureCell, FeatureKey, LibraryId, TableId};

use crate::assembly::ResultForAssembly;
use crate::table::FeatureTable;

/// Accumulates one run's tables and outcomes.
#[derive(Debug)]
pub struct AssemblyBuilder {
    output_name_prefix: String,
    tables: Vec<FeatureTable>,
    index: BTreeMap<TableId, usize>,
}

impl AssemblyBuilder {
    /// Start a run with the given output filename prefix.
    #[must_use]
    pub fn new(output_name_prefix: impl Into<String>) -> Self {
        Self {
            output_name_prefix: output_name_prefix.into(),
            tables: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Declare a table before population. Declaration order is preserved
    /// into the finished assembly.
    pub fn declare_table(&mut self, table: FeatureTable) -> Result<()> {
        if self.index.contains_key(table.id()) {
            return Err(FeatmatError::DuplicateTableId {
                id: table.id().as_str().to_owned(),
            });
        }
        self.index.insert(table.id().clone(), self.tables.len());
        self.tables.push(table);
        Ok(())
    }

    /// Record one probe outcome. Any order; later writes to the same cell
    /// win.
    pub fn record(
        &self,
        table: &TableId,
        library: &LibraryId,
        feature: &FeatureKey,
        cell: FeatureCell,
    ) -> Result<()> {
        let table = self.table(table)?;
        table.set(library, feature, cell)
    }

    /// Look up a declared table.
    pub fn table(&self, id: &TableId) -> Result<&FeatureTable> {
        self.index
            .get(id)
            .map(|&i| &self.tables[i])
            .ok_or_else(|| FeatmatError::UnknownTable {
                id: id.as_str().to_owned(),
            })
    }

    /// Validate the assembly invariants and finish the run.
    pub fn finish(self) -> Result<ResultForAssembly> {
        ResultForAssembly::new(self.output_name_prefix, self.tables)
    }
}
