//! JSON artifact writer.
//!
//! One pretty-printed JSON array per assembly, one element per library:
//! `name`, `url`, `version`, `supports`, and one key per feature display
//! name mapping to `{result, comment, error}`. Absent values are omitted
//! from the emitted objects, not emitted as null. File name is
//! `<output name prefix>.json`.

use std::path::Path;

use tracing::debug;

use featmat_core::ResultForAssembly;
use featmat_error::Result;

use crate::flatten::AssemblyReport;
use crate::output::{ResultOutput, persist_artifact};

/// The built-in JSON writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonOutput;

impl JsonOutput {
    /// Create a JSON writer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_assembly(&self, output_directory: &Path, result: &ResultForAssembly) -> Result<()> {
        let report = AssemblyReport::collect(result)?;
        let json =
            serde_json::to_string_pretty(&report).expect("report serialization must not fail");
        let file_name = format!("{}.{}", result.output_name_prefix(), self.file_extension());
        debug!(assembly = result.output_name_prefix(), "rendering JSON artifact");
        persist_artifact(output_directory, &file_name, &json)?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn write(
        &self,
        output_directory: &Path,
        results: &[ResultForAssembly],
        _keep_updating_if_templates_change: bool,
    ) -> Result<()> {
        for result in results {
            self.write_assembly(output_directory, result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use featmat_core::{AssemblyBuilder, FeatureTable};
    use featmat_error::FeatmatError;
    use featmat_types::{Feature, FeatureCell, FeatureKey, Library, LibraryId, TableId};

    use super::*;

    fn scenario_assembly() -> ResultForAssembly {
        let libs = vec![Arc::new(Library::new("Foo"))];
        let mut builder = AssemblyBuilder::new("DependencyInjection");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::general_info(),
                    libs.clone(),
                    vec![
                        Arc::new(Feature::new(FeatureKey::URL)),
                        Arc::new(Feature::new(FeatureKey::VERSION)),
                    ],
                )
                .expect("axes"),
            )
            .expect("declare");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::framework_support(),
                    libs.clone(),
                    vec![Arc::new(Feature::new(".NET45"))],
                )
                .expect("axes"),
            )
            .expect("declare");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::new("Behavior"),
                    libs,
                    vec![Arc::new(Feature::new("DoesThing"))],
                )
                .expect("axes"),
            )
            .expect("declare");

        let foo = LibraryId::new("Foo");
        builder
            .record(
                &TableId::general_info(),
                &foo,
                &FeatureKey::url(),
                FeatureCell::unknown().with_details("http://x"),
            )
            .expect("record");
        builder
            .record(
                &TableId::general_info(),
                &foo,
                &FeatureKey::version(),
                FeatureCell::unknown().with_details("1.0"),
            )
            .expect("record");
        builder
            .record(
                &TableId::framework_support(),
                &foo,
                &FeatureKey::new(".NET45"),
                FeatureCell::success(),
            )
            .expect("record");
        builder
            .record(
                &TableId::new("Behavior"),
                &foo,
                &FeatureKey::new("DoesThing"),
                FeatureCell::success(),
            )
            .expect("record");
        builder.finish().expect("valid assembly")
    }

    #[test]
    fn end_to_end_scenario_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assembly = scenario_assembly();
        JsonOutput::new()
            .write(dir.path(), std::slice::from_ref(&assembly), false)
            .expect("write");

        let text = fs::read_to_string(dir.path().join("DependencyInjection.json"))
            .expect("artifact exists");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(
            value,
            serde_json::json!([{
                "name": "Foo",
                "url": "http://x",
                "version": "1.0",
                "supports": [".NET45"],
                "DoesThing": {"result": "success"}
            }])
        );

        // Null fields are omitted entirely, not serialized as null.
        assert!(!text.contains("null"));
        assert!(!text.contains("comment"));
        assert!(!text.contains("error"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assembly = scenario_assembly();
        let results = std::slice::from_ref(&assembly);
        let writer = JsonOutput::new();

        writer.write(dir.path(), results, false).expect("first");
        let first = fs::read(dir.path().join("DependencyInjection.json")).expect("read");
        writer.write(dir.path(), results, false).expect("second");
        let second = fs::read(dir.path().join("DependencyInjection.json")).expect("read");
        assert_eq!(first, second);
    }

    #[test]
    fn declaration_order_survives_into_artifact() {
        let libs = vec![
            Arc::new(Library::new("Zeta")),
            Arc::new(Library::new("Alpha")),
        ];
        let mut builder = AssemblyBuilder::new("ordering");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::general_info(),
                    libs.clone(),
                    vec![Arc::new(Feature::new(FeatureKey::URL))],
                )
                .expect("axes"),
            )
            .expect("declare");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::framework_support(),
                    libs.clone(),
                    vec![Arc::new(Feature::new(".NET45"))],
                )
                .expect("axes"),
            )
            .expect("declare");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::new("behavior"),
                    libs,
                    vec![
                        Arc::new(Feature::new("z_feature")),
                        Arc::new(Feature::new("a_feature")),
                    ],
                )
                .expect("axes"),
            )
            .expect("declare");
        for lib in ["Zeta", "Alpha"] {
            for feature in ["z_feature", "a_feature"] {
                builder
                    .record(
                        &TableId::new("behavior"),
                        &LibraryId::new(lib),
                        &FeatureKey::new(feature),
                        FeatureCell::success(),
                    )
                    .expect("record");
            }
        }
        let assembly = builder.finish().expect("valid assembly");

        let dir = tempfile::tempdir().expect("tempdir");
        JsonOutput::new()
            .write(dir.path(), std::slice::from_ref(&assembly), false)
            .expect("write");
        let text = fs::read_to_string(dir.path().join("ordering.json")).expect("artifact");

        // Declaration order, not alphabetical: Zeta before Alpha,
        // z_feature before a_feature.
        let zeta = text.find("\"Zeta\"").expect("Zeta present");
        let alpha = text.find("\"Alpha\"").expect("Alpha present");
        assert!(zeta < alpha);
        let z = text.find("z_feature").expect("z_feature present");
        let a = text.find("a_feature").expect("a_feature present");
        assert!(z < a);
    }

    #[test]
    fn duplicate_display_name_fails_the_whole_write() {
        let libs = vec![Arc::new(Library::new("Foo"))];
        let mut builder = AssemblyBuilder::new("dup");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::general_info(),
                    libs.clone(),
                    vec![Arc::new(Feature::new(FeatureKey::URL))],
                )
                .expect("axes"),
            )
            .expect("declare");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::framework_support(),
                    libs.clone(),
                    vec![Arc::new(Feature::new(".NET45"))],
                )
                .expect("axes"),
            )
            .expect("declare");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::new("a"),
                    libs.clone(),
                    vec![Arc::new(Feature::new("X"))],
                )
                .expect("axes"),
            )
            .expect("declare");
        builder
            .declare_table(
                FeatureTable::new(
                    TableId::new("b"),
                    libs,
                    vec![Arc::new(Feature::new("X"))],
                )
                .expect("axes"),
            )
            .expect("declare");
        let assembly = builder.finish().expect("valid assembly");

        let dir = tempfile::tempdir().expect("tempdir");
        let err = JsonOutput::new()
            .write(dir.path(), std::slice::from_ref(&assembly), false)
            .expect_err("duplicate name");
        assert!(matches!(err, FeatmatError::DuplicateFeatureName { .. }));
        assert!(!dir.path().join("dup.json").exists());
    }
}
