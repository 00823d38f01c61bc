/*!
Retrieval dispatcher for `show --system`.

For every selected table (fixed order nfit, pcat, pmtt) the dispatcher queries
the [`ConfigService`] once, applies the table's failure policy, hands tables
that were found to the [`TableFormatter`] and releases them afterwards.

Policy:

| table | not found                         | other error                  |
|-------|-----------------------------------|------------------------------|
| nfit  | error, report marked failed       | error, report marked failed  |
| pcat  | warning                           | error                        |
| pmtt  | informational                     | error                        |

A failed table never stops the remaining ones from being queried.
*/

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::cmd::category::Category;
use crate::cmd::selection::Selection;
use crate::platform::{AcpiTable, ConfigService, QueryError};

/* ---- Collaborator: formatter sink ---- */

/// Sink for retrieved tables and per-table diagnostics.
pub trait TableFormatter {
    fn format_nfit(&mut self, table: &AcpiTable);
    fn format_pcat(&mut self, table: &AcpiTable);
    fn format_pmtt(&mut self, table: &AcpiTable);

    /// A per-table message, delivered in dispatch order.
    fn diagnostic(&mut self, diagnostic: &Diagnostic);
}

fn format_table(sink: &mut dyn TableFormatter, category: Category, table: &AcpiTable) {
    match category {
        Category::Nfit => sink.format_nfit(table),
        Category::Pcat => sink.format_pcat(table),
        Category::Pmtt => sink.format_pmtt(table),
    }
}

/* ---- Outcome types ---- */

/// Outcome of one retrieval, consumed right away by the policy step.
#[derive(Debug)]
pub enum RetrievalOutcome {
    Success(AcpiTable),
    NotFound,
    Error(QueryError),
}

impl From<Result<AcpiTable, QueryError>> for RetrievalOutcome {
    fn from(res: Result<AcpiTable, QueryError>) -> Self {
        match res {
            Ok(table) => RetrievalOutcome::Success(table),
            Err(e) if e.is_not_found() => RetrievalOutcome::NotFound,
            Err(e) => RetrievalOutcome::Error(e),
        }
    }
}

/// Whether the report as a whole failed. Once failed it stays failed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OverallResult {
    failed: bool,
}

impl OverallResult {
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    NotFound,
    QueryFailed(String),
}

/// Human-readable message about one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: Category,
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Category::*;
        use DiagnosticKind::*;
        match (self.category, &self.kind) {
            (Nfit, NotFound) => {
                f.write_str("Error: Failed to find the NVDIMM Firmware Interface ACPI tables")
            }
            (Nfit, QueryFailed(cause)) => write!(
                f,
                "Error: Failed to retrieve the NVDIMM Firmware Interface ACPI tables: {cause}"
            ),
            (Pcat, NotFound) => f.write_str("Error: Failed to find the PCAT tables"),
            (Pcat, QueryFailed(cause)) => {
                write!(f, "Error: Failed to retrieve the PCAT tables: {cause}")
            }
            (Pmtt, NotFound) => f.write_str("PMTT table not found."),
            (Pmtt, QueryFailed(cause)) => {
                write!(f, "Error: Failed to find the PMTT tables: {cause}")
            }
        }
    }
}

/* ---- Policy ---- */

/// What to do with a table that could not be retrieved.
struct Policy {
    severity: Severity,
    fails_report: bool,
}

fn not_found_policy(category: Category) -> Policy {
    match category {
        Category::Nfit => Policy {
            severity: Severity::Error,
            fails_report: true,
        },
        Category::Pcat => Policy {
            severity: Severity::Warning,
            fails_report: false,
        },
        Category::Pmtt => Policy {
            severity: Severity::Info,
            fails_report: false,
        },
    }
}

fn query_error_policy(category: Category) -> Policy {
    match category {
        Category::Nfit => Policy {
            severity: Severity::Error,
            fails_report: true,
        },
        Category::Pcat | Category::Pmtt => Policy {
            severity: Severity::Error,
            fails_report: false,
        },
    }
}

/* ---- Dispatch ---- */

/// Query every selected table once and route the results.
pub fn run(
    selection: &Selection,
    service: &dyn ConfigService,
    sink: &mut dyn TableFormatter,
) -> OverallResult {
    let mut overall = OverallResult::default();

    for &category in Category::all() {
        if !selection.contains(category) {
            continue;
        }
        debug!(%category, "querying table");

        let (policy, kind) = match RetrievalOutcome::from(service.retrieve(category)) {
            RetrievalOutcome::Success(table) => {
                debug!(%category, length = table.len(), "table retrieved");
                format_table(sink, category, &table);
                service.release(table);
                continue;
            }
            RetrievalOutcome::NotFound => (not_found_policy(category), DiagnosticKind::NotFound),
            RetrievalOutcome::Error(e) => (
                query_error_policy(category),
                DiagnosticKind::QueryFailed(e.to_string()),
            ),
        };

        let diagnostic = Diagnostic {
            category,
            severity: policy.severity,
            kind,
        };
        debug!(
            %category,
            severity = ?diagnostic.severity,
            fails_report = policy.fails_report,
            "{diagnostic}"
        );
        if policy.fails_report {
            overall.mark_failed();
        }
        sink.diagnostic(&diagnostic);
    }

    overall
}

/* ---- Tests ---- */
