//! Captured-run deserialization.
//!
//! The serialized form of the input boundary: per assembly, the axis
//! declarations for every table, then a flat list of outcome records
//! applied in file order. Any record order is legal; a later record for
//! the same cell wins, matching the table's upsert semantics.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use featmat::{
    AssemblyBuilder, Feature, FeatureCell, FeatureKey, FeatureState, FeatureTable, FeatmatError,
    Library, LibraryId, Result, ResultForAssembly, TableId,
};

/// A whole captured run: one or more assemblies.
#[derive(Debug, Deserialize)]
pub struct RunCapture {
    pub assemblies: Vec<AssemblyCapture>,
}

/// One assembly: output prefix, table declarations, outcome records.
#[derive(Debug, Deserialize)]
pub struct AssemblyCapture {
    pub output_name_prefix: String,
    pub tables: Vec<TableCapture>,
    #[serde(default)]
    pub outcomes: Vec<OutcomeCapture>,
}

/// Axis declaration of one table.
#[derive(Debug, Deserialize)]
pub struct TableCapture {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub libraries: Vec<String>,
    pub features: Vec<FeatureCapture>,
}

/// Registration record of one feature.
#[derive(Debug, Deserialize)]
pub struct FeatureCapture {
    pub key: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub special_cases: BTreeMap<String, String>,
}

/// One probe outcome record.
#[derive(Debug, Deserialize)]
pub struct OutcomeCapture {
    pub table: String,
    pub library: String,
    pub feature: String,
    pub state: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub raw_error: Option<String>,
}

/// Load a capture file and build the validated assemblies.
pub fn load(path: &Path) -> Result<Vec<ResultForAssembly>> {
    let text = fs::read_to_string(path)?;
    let capture: RunCapture = serde_json::from_str(&text)
        .map_err(|e| FeatmatError::capture(format!("{}: {e}", path.display())))?;
    build(capture)
}

/// Build assemblies from an already-parsed capture.
pub fn build(capture: RunCapture) -> Result<Vec<ResultForAssembly>> {
    capture.assemblies.into_iter().map(build_assembly).collect()
}

fn build_assembly(capture: AssemblyCapture) -> Result<ResultForAssembly> {
    // One Arc per library name so every table of the assembly shares the
    // same record, preserving identity across tables.
    let mut libraries: BTreeMap<String, Arc<Library>> = BTreeMap::new();

    let mut builder = AssemblyBuilder::new(capture.output_name_prefix);
    for table in capture.tables {
        let axis_libraries: Vec<Arc<Library>> = table
            .libraries
            .iter()
            .map(|name| {
                libraries
                    .entry(name.clone())
                    .or_insert_with(|| Arc::new(Library::new(name.clone())))
                    .clone()
            })
            .collect();
        let axis_features: Vec<Arc<Feature>> = table
            .features
            .into_iter()
            .map(|f| Arc::new(build_feature(f)))
            .collect();

        let mut declared = FeatureTable::new(TableId::new(table.id), axis_libraries, axis_features)?;
        if let Some(title) = table.title {
            declared = declared.with_title(title);
        }
        builder.declare_table(declared)?;
    }

    for outcome in capture.outcomes {
        let state: FeatureState = outcome.state.parse()?;
        let cell = FeatureCell::new(state, outcome.details, outcome.raw_error)?;
        builder.record(
            &TableId::new(outcome.table),
            &LibraryId::new(outcome.library),
            &FeatureKey::new(outcome.feature),
            cell,
        )?;
    }

    builder.finish()
}

fn build_feature(capture: FeatureCapture) -> Feature {
    let mut feature = Feature::new(capture.key);
    if let Some(name) = capture.display_name {
        feature = feature.with_display_name(name);
    }
    if let Some(group) = capture.group {
        feature = feature.with_group(group);
    }
    for (library, note) in capture.special_cases {
        feature = feature.with_special_case(LibraryId::new(library), note);
    }
    feature
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "assemblies": [{
            "output_name_prefix": "DependencyInjection",
            "tables": [
                {
                    "id": "general-info",
                    "libraries": ["Foo"],
                    "features": [{"key": "url"}, {"key": "version"}]
                },
                {
                    "id": "framework-support",
                    "libraries": ["Foo"],
                    "features": [{"key": ".NET45"}]
                },
                {
                    "id": "behavior",
                    "title": "Basic behavior",
                    "libraries": ["Foo"],
                    "features": [{"key": "DoesThing"}]
                }
            ],
            "outcomes": [
                {"table": "general-info", "library": "Foo", "feature": "url",
                 "state": "unknown", "details": "http://x"},
                {"table": "framework-support", "library": "Foo", "feature": ".NET45",
                 "state": "success"},
                {"table": "behavior", "library": "Foo", "feature": "DoesThing",
                 "state": "failure", "raw_error": "boom"}
            ]
        }]
    }"#;

    #[test]
    fn builds_assemblies_from_capture() {
        let capture: RunCapture = serde_json::from_str(SAMPLE).expect("well-formed sample");
        let assemblies = build(capture).expect("valid capture");
        assert_eq!(assemblies.len(), 1);

        let assembly = &assemblies[0];
        assert_eq!(assembly.output_name_prefix(), "DependencyInjection");
        let behavior = assembly.ordinary_tables().next().expect("behavior table");
        assert_eq!(behavior.title(), Some("Basic behavior"));
        let cell = behavior
            .get(&LibraryId::new("Foo"), &FeatureKey::new("DoesThing"))
            .expect("declared pair")
            .expect("recorded");
        assert_eq!(cell.state(), FeatureState::Failure);
        assert_eq!(cell.raw_error(), Some("boom"));
    }

    #[test]
    fn libraries_share_identity_across_tables() {
        let capture: RunCapture = serde_json::from_str(SAMPLE).expect("well-formed sample");
        let assemblies = build(capture).expect("valid capture");
        let assembly = &assemblies[0];

        let general = &assembly.general_info().libraries()[0];
        let behavior = &assembly.ordinary_tables().next().expect("table").libraries()[0];
        assert!(Arc::ptr_eq(general, behavior));
    }

    #[test]
    fn unknown_state_token_is_a_capture_error() {
        let text = SAMPLE.replace("\"failure\"", "\"exploded\"");
        let capture: RunCapture = serde_json::from_str(&text).expect("still valid JSON");
        let err = build(capture).expect_err("bad state token");
        assert!(matches!(err, FeatmatError::Capture { .. }));
    }

    #[test]
    fn invariant_violations_surface_from_build() {
        let text = SAMPLE.replace(
            "\"state\": \"failure\", \"raw_error\": \"boom\"",
            "\"state\": \"success\", \"raw_error\": \"boom\"",
        );
        let capture: RunCapture = serde_json::from_str(&text).expect("still valid JSON");
        let err = build(capture).expect_err("raw error on success");
        assert!(matches!(err, FeatmatError::InvalidOutcome { .. }));
    }

    #[test]
    fn later_records_win() {
        let text = SAMPLE.replace(
            "{\"table\": \"behavior\", \"library\": \"Foo\", \"feature\": \"DoesThing\",\n                 \"state\": \"failure\", \"raw_error\": \"boom\"}",
            "{\"table\": \"behavior\", \"library\": \"Foo\", \"feature\": \"DoesThing\",\n                 \"state\": \"failure\", \"raw_error\": \"boom\"},\n                {\"table\": \"behavior\", \"library\": \"Foo\", \"feature\": \"DoesThing\",\n                 \"state\": \"success\"}",
        );
        let capture: RunCapture = serde_json::from_str(&text).expect("still valid JSON");
        let assemblies = build(capture).expect("valid capture");
        let behavior = assemblies[0].ordinary_tables().next().expect("table");
        let cell = behavior
            .get(&LibraryId::new("Foo"), &FeatureKey::new("DoesThing"))
            .expect("declared pair")
            .expect("recorded");
        assert_eq!(cell.state(), FeatureState::Success);
    }

    #[test]
    fn load_missing_file_is_io() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(&dir.path().join("absent.json")).expect_err("missing file");
        assert!(matches!(err, FeatmatError::Io(_)));
    }

    #[test]
    fn load_rejects_non_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "not json").expect("write");
        let err = load(&path).expect_err("not json");
        assert!(matches!(err, FeatmatError::Capture { .. }));
    }
}
