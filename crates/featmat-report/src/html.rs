//! HTML artifact writer.
//!
//! One static, self-contained page per assembly: a library summary header
//! (name, URL, version, supported frameworks) followed by one comparison
//! grid per ordinary feature table, libraries as columns and features as
//! rows, in declaration order. Cells are classed by outcome state; an
//! absent outcome renders as an explicit "no data" marker. Informational
//! special-case notes become footnotes under their grid.
//!
//! The page embeds its own stylesheet; there are no external template
//! assets, so `keep_updating_if_templates_change` is ignored.
//!
//! Validation and per-library metadata come from the same
//! [`AssemblyReport`] abstraction the JSON writer uses, so the
//! name-uniqueness and ordering guarantees hold here by construction.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use tracing::debug;

use featmat_core::{FeatureTable, ResultForAssembly};
use featmat_error::Result;

use crate::flatten::AssemblyReport;
use crate::output::{ResultOutput, persist_artifact};

const STYLE: &str = "\
body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;margin-bottom:1.5em}\
th,td{border:1px solid #999;padding:.3em .6em;text-align:left}\
td.success{background:#d7f0d7}\
td.failure{background:#f0d0d0}\
td.not-supported{background:#e8e8e8}\
td.skipped,td.unknown{background:#f7f1d8}\
td.absent{color:#888;font-style:italic}\
ol.notes{font-size:.85em;color:#444}";

/// The built-in HTML writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlOutput;

impl HtmlOutput {
    /// Create an HTML writer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render(&self, result: &ResultForAssembly) -> Result<String> {
        // Flatten first: a display-name collision must abort before any
        // markup is persisted.
        let report = AssemblyReport::collect(result)?;

        let mut page = String::new();
        let title = escape(result.output_name_prefix());
        let _ = write!(
            page,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title} feature comparison</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
             <h1>{title}</h1>\n"
        );

        let _ = page.write_str(
            "<table class=\"libraries\">\n<thead><tr><th>Library</th><th>Version</th>\
             <th>Supports</th></tr></thead>\n<tbody>\n",
        );
        for library in report.libraries() {
            let name = escape(library.name());
            let _ = page.write_str("<tr><td>");
            match library.url() {
                Some(url) => {
                    let _ = write!(page, "<a href=\"{}\">{name}</a>", escape(url));
                }
                None => {
                    let _ = page.write_str(&name);
                }
            }
            let _ = write!(
                page,
                "</td><td>{}</td><td>{}</td></tr>\n",
                library.version().map_or_else(String::new, escape),
                escape(&library.supports().join(", "))
            );
        }
        let _ = page.write_str("</tbody>\n</table>\n");

        for table in result.ordinary_tables() {
            self.render_table(&mut page, table)?;
        }

        let _ = page.write_str("</body>\n</html>\n");
        Ok(page)
    }

    fn render_table(&self, page: &mut String, table: &FeatureTable) -> Result<()> {
        let heading = table.title().unwrap_or_else(|| table.id().as_str());
        let _ = write!(page, "<h2>{}</h2>\n<table class=\"features\">\n", escape(heading));

        let _ = page.write_str("<thead><tr><th>Feature</th>");
        for library in table.libraries() {
            let _ = write!(page, "<th>{}</th>", escape(library.name()));
        }
        let _ = page.write_str("</tr></thead>\n<tbody>\n");

        let mut notes: Vec<String> = Vec::new();
        for feature in table.features() {
            let _ = write!(page, "<tr><th scope=\"row\">{}", escape(feature.display_name()));
            for (library, note) in feature.special_cases() {
                notes.push(format!(
                    "{}, {}: {}",
                    escape(feature.display_name()),
                    escape(library.as_str()),
                    escape(note)
                ));
                let _ = write!(page, "<sup>{}</sup>", notes.len());
            }
            let _ = page.write_str("</th>");

            for library in table.libraries() {
                match table.get(library.id(), feature.key())? {
                    Some(cell) => {
                        let token = cell.state().as_str();
                        let _ = write!(page, "<td class=\"{token}\"");
                        if let Some(raw) = cell.raw_error() {
                            let _ = write!(page, " title=\"{}\"", escape(raw));
                        }
                        let _ = write!(page, ">{token}");
                        if let Some(details) = cell.details() {
                            let _ = write!(page, "<br><small>{}</small>", escape(details));
                        }
                        let _ = page.write_str("</td>");
                    }
                    None => {
                        let _ = page.write_str("<td class=\"absent\">no data</td>");
                    }
                }
            }
            let _ = page.write_str("</tr>\n");
        }
        let _ = page.write_str("</tbody>\n</table>\n");

        if !notes.is_empty() {
            let _ = page.write_str("<ol class=\"notes\">\n");
            for note in &notes {
                let _ = write!(page, "<li>{note}</li>\n");
            }
            let _ = page.write_str("</ol>\n");
        }
        Ok(())
    }
}

impl ResultOutput for HtmlOutput {
    fn format_name(&self) -> &'static str {
        "html"
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    fn write(
        &self,
        output_directory: &Path,
        results: &[ResultForAssembly],
        _keep_updating_if_templates_change: bool,
    ) -> Result<()> {
        for result in results {
            let page = self.render(result)?;
            let file_name = format!("{}.{}", result.output_name_prefix(), self.file_extension());
            debug!(assembly = result.output_name_prefix(), "rendering HTML artifact");
            persist_artifact(output_directory, &file_name, &page)?;
        }
        Ok(())
    }
}

/// Minimal HTML escaping for text and attribute positions.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
