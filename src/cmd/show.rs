/*!
`show.rs`

Implements the `show` subcommand for the `nvdimm-acpi` CLI.

  nvdimm-acpi show --system                 (all tables)
  nvdimm-acpi show --system nfit,pmtt       (named tables, case-insensitive)
  nvdimm-acpi show --system pcat --json

Behavior:
  - The table source is opened first; an unreachable source fails with exit 3
    before anything else is looked at.
  - `--system` must be present. Without a value every table is shown; with a
    value the comma-separated list is validated up front and any unknown name
    fails the command (exit 2) before a single table is read.
  - Tables are then queried in the fixed order nfit, pcat, pmtt. A missing or
    unreadable NFIT fails the report (exit 1); PCAT and PMTT problems are
    reported but do not.
  - If `--tables-dir` is omitted, falls back to `NVDIMM_ACPI_TABLES_DIR`, the
    config file, then `/sys/firmware/acpi/tables`.
*/

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::cmd::dispatch::{self, OverallResult};
use crate::cmd::format::StyleOptions;
use crate::cmd::render::{JsonFormatter, TextFormatter};
use crate::cmd::selection::{Selection, parse_selection};
use crate::config::{CliOverrides, Settings};
use crate::error::{InvalidInput, ShowError};
use crate::platform::{ConfigService, FirmwareTables};

/// CLI arguments for `nvdimm-acpi show`
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// ACPI tables to show: comma-separated nfit,pcat,pmtt (all when no value is given)
    #[arg(short = 's', long = "system", value_name = "TABLES", num_args = 0..=1)]
    pub system: Option<Option<String>>,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Directory holding the raw ACPI tables
    /// (Falls back to NVDIMM_ACPI_TABLES_DIR env var if omitted)
    #[arg(short = 'd', long = "tables-dir", value_name = "DIR")]
    pub tables_dir: Option<PathBuf>,

    /// YAML config file
    /// (Falls back to NVDIMM_ACPI_CONFIG env var if omitted)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Entry point for the show subcommand.
pub fn execute_show(args: ShowArgs) -> Result<()> {
    let settings = Settings::resolve(CliOverrides {
        tables_dir: args.tables_dir.clone(),
        config: args.config.clone(),
        json: args.json,
    })
    .context("failed to load configuration")?;
    debug!(?settings, "resolved settings");

    let service = FirmwareTables::open(&settings.tables_dir)?;
    debug!(root = %service.root().display(), "reading ACPI tables");

    let style = StyleOptions::detect().with_overrides(settings.color, settings.emoji);
    let system = args.system.as_ref().map(|v| v.as_deref());
    show(system, &service, settings.json, style, io::stdout().lock())
}

/// Validate the filter, dispatch, and write the report to `out`.
///
/// `system` is `None` when `--system` was not given, `Some(None)` when it was
/// given without a value.
pub fn show(
    system: Option<Option<&str>>,
    service: &dyn ConfigService,
    json: bool,
    style: StyleOptions,
    out: impl Write,
) -> Result<()> {
    let selection = select(system)?;
    debug!(
        all = selection.is_all(),
        count = selection.len(),
        ?selection,
        "tables selected"
    );

    let overall = if json {
        let mut sink = JsonFormatter::new();
        let overall = dispatch::run(&selection, service, &mut sink);
        sink.finish(out, &selection, overall)
            .context("failed to write JSON output")?;
        overall
    } else {
        let mut sink = TextFormatter::new(out, style);
        let overall = dispatch::run(&selection, service, &mut sink);
        sink.finish().context("failed to write output")?;
        overall
    };

    finish(overall)
}

fn select(system: Option<Option<&str>>) -> Result<Selection, ShowError> {
    let Some(filter) = system else {
        return Err(InvalidInput::MissingSystemTarget.into());
    };
    Ok(parse_selection(filter)?)
}

fn finish(overall: OverallResult) -> Result<()> {
    if overall.is_failed() {
        return Err(ShowError::ReportFailed.into());
    }
    debug!("report complete");
    Ok(())
}
