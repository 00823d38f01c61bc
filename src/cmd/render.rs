/*!
Formatter sinks for `show --system`.

  - TextFormatter: section banner + boxed header + header-field table + hex dump
  - JsonFormatter: collects everything and writes one JSON document on finish

JSON Output Shape:
{
  "status": "ok" | "failed",
  "selection": ["nfit", "pcat", "pmtt"],
  "tables": [
    {
      "category": "nfit",
      "signature": "NFIT",
      "length": 40,
      "header": { "signature": "NFIT", "length": 40, "revision": 1, ... },
      "body_hex": "11223344"
    }
  ],
  "diagnostics": [
    { "category": "pmtt", "severity": "info", "message": "PMTT table not found." }
  ]
}
*/

use std::io::{self, Write};

use serde::Serialize;

use crate::cmd::category::Category;
use crate::cmd::dispatch::{Diagnostic, OverallResult, Severity, TableFormatter};
use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji, hex_dump, table};
use crate::cmd::selection::Selection;
use crate::platform::{AcpiTable, SDT_HEADER_LEN};

/* -------------------------------------------------------------------------- */
/* Text                                                                        */
/* -------------------------------------------------------------------------- */

/// Human-readable output written straight to `out`.
///
/// Write errors are latched; the first one is returned by [`TextFormatter::finish`].
pub struct TextFormatter<W: Write> {
    out: W,
    style: StyleOptions,
    error: Option<io::Error>,
}

impl<W: Write> TextFormatter<W> {
    pub fn new(out: W, style: StyleOptions) -> Self {
        TextFormatter {
            out,
            style,
            error: None,
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{text}") {
            self.error = Some(e);
        }
    }

    fn render_table(&mut self, category: Category, t: &AcpiTable) {
        let h = t.header();
        let mut section = vec![format!("---{}---", category.title())];

        section.push(box_header(
            format!("{} {}", emoji("table", &self.style), h.signature)
                .trim_start()
                .to_string(),
            Some(format!("rev {} • {} bytes", h.revision, t.len())),
            &self.style,
        ));

        let rows = vec![
            vec!["Signature".to_string(), h.signature.clone()],
            vec!["Length".to_string(), h.length.to_string()],
            vec!["Revision".to_string(), format!("0x{:02x}", h.revision)],
            vec!["Checksum".to_string(), format!("0x{:02x}", h.checksum)],
            vec!["OEM ID".to_string(), h.oem_id.clone()],
            vec!["OEM Table ID".to_string(), h.oem_table_id.clone()],
            vec!["OEM Revision".to_string(), format!("0x{:08x}", h.oem_revision)],
            vec!["Creator ID".to_string(), h.creator_id.clone()],
            vec![
                "Creator Revision".to_string(),
                format!("0x{:08x}", h.creator_revision),
            ],
        ];
        section.push(table(&["FIELD", "VALUE"], &rows, &self.style));

        let body = t.body();
        if body.is_empty() {
            section.push(color(Role::Dim, "(no table body)", &self.style));
        } else {
            section.push(color(
                Role::Secondary,
                format!("Body ({} bytes):", body.len()),
                &self.style,
            ));
            section.extend(hex_dump(body, SDT_HEADER_LEN));
        }
        section.push(String::new());

        self.emit(&section.join("\n"));
    }
}

impl<W: Write> TableFormatter for TextFormatter<W> {
    fn format_nfit(&mut self, table: &AcpiTable) {
        self.render_table(Category::Nfit, table);
    }

    fn format_pcat(&mut self, table: &AcpiTable) {
        self.render_table(Category::Pcat, table);
    }

    fn format_pmtt(&mut self, table: &AcpiTable) {
        self.render_table(Category::Pmtt, table);
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        let (role, tag) = match diagnostic.severity {
            Severity::Error => (Role::Error, "error"),
            Severity::Warning => (Role::Warning, "warn"),
            Severity::Info => (Role::Dim, "info"),
        };
        let icon = emoji(tag, &self.style);
        let line = if icon.is_empty() {
            diagnostic.to_string()
        } else {
            format!("{icon} {diagnostic}")
        };
        let line = color(role, line, &self.style);
        self.emit(&line);
    }
}

/* -------------------------------------------------------------------------- */
/* JSON                                                                        */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
struct TableEntry {
    category: Category,
    signature: String,
    length: usize,
    header: crate::platform::SdtHeader,
    body_hex: String,
}

#[derive(Debug, Serialize)]
struct DiagnosticEntry {
    category: Category,
    severity: Severity,
    message: String,
}

/// Machine-readable output, buffered until [`JsonFormatter::finish`].
#[derive(Debug, Default)]
pub struct JsonFormatter {
    tables: Vec<TableEntry>,
    diagnostics: Vec<DiagnosticEntry>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, category: Category, t: &AcpiTable) {
        self.tables.push(TableEntry {
            category,
            signature: t.header().signature.clone(),
            length: t.len(),
            header: t.header().clone(),
            body_hex: t.body().iter().map(|b| format!("{b:02x}")).collect(),
        });
    }

    /// Build the final document.
    pub fn document(&self, selection: &Selection, overall: OverallResult) -> serde_json::Value {
        serde_json::json!({
            "status": if overall.is_failed() { "failed" } else { "ok" },
            "selection": selection,
            "tables": self.tables,
            "diagnostics": self.diagnostics,
        })
    }

    /// Write the final document to `out`.
    pub fn finish(
        self,
        mut out: impl Write,
        selection: &Selection,
        overall: OverallResult,
    ) -> io::Result<()> {
        let doc = self.document(selection, overall);
        serde_json::to_writer_pretty(&mut out, &doc)?;
        writeln!(out)?;
        out.flush()
    }
}

impl TableFormatter for JsonFormatter {
    fn format_nfit(&mut self, table: &AcpiTable) {
        self.record(Category::Nfit, table);
    }

    fn format_pcat(&mut self, table: &AcpiTable) {
        self.record(Category::Pcat, table);
    }

    fn format_pmtt(&mut self, table: &AcpiTable) {
        self.record(Category::Pmtt, table);
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(DiagnosticEntry {
            category: diagnostic.category,
            severity: diagnostic.severity,
            message: diagnostic.to_string(),
        });
    }
}
