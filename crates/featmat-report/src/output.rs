//! The writer contract every output format satisfies.
//!
//! A writer consumes the full collection of assemblies for a run plus a
//! destination directory that must already exist and be writable, and
//! produces one artifact per assembly named
//! `<output name prefix>.<extension>`. Re-running with the same input
//! reproduces byte-identical artifacts; pre-existing artifacts of the same
//! name are overwritten. Side effects are confined to the destination
//! directory, and a writer never mutates the assemblies it is given.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use featmat_core::ResultForAssembly;
use featmat_error::{FeatmatError, Result};

/// A renderer projecting assemblies into a persisted report format.
pub trait ResultOutput {
    /// Short format name for logs and CLI selection (e.g. `"json"`).
    fn format_name(&self) -> &'static str;

    /// Artifact extension without the dot (e.g. `"json"`).
    fn file_extension(&self) -> &'static str;

    /// Render one artifact per assembly into `output_directory`.
    ///
    /// `keep_updating_if_templates_change` is a development convenience
    /// for writers with external template assets: keep re-rendering when
    /// the templates change. It has no effect on the correctness of a
    /// single render, and template-free writers ignore it.
    ///
    /// The whole invocation fails on a display-name collision or an
    /// unwritable destination; an individual absent outcome is rendered
    /// as an explicit no-data marker instead.
    fn write(
        &self,
        output_directory: &Path,
        results: &[ResultForAssembly],
        keep_updating_if_templates_change: bool,
    ) -> Result<()>;
}

/// Drive several writers over one run's results.
///
/// Writers are independent: there is no shared transaction, so artifacts a
/// writer already produced stay on disk when a later writer fails.
pub fn write_all(
    outputs: &[&dyn ResultOutput],
    output_directory: &Path,
    results: &[ResultForAssembly],
) -> Result<()> {
    for output in outputs {
        output.write(output_directory, results, false)?;
    }
    Ok(())
}

/// Persist one rendered artifact, overwriting any previous one.
pub(crate) fn persist_artifact(
    output_directory: &Path,
    file_name: &str,
    contents: &str,
) -> Result<PathBuf> {
    let path = output_directory.join(file_name);
    fs::write(&path, contents).map_err(|source| FeatmatError::persistence(path.clone(), source))?;
    info!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(path)
}
