use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod error;
mod platform;
mod utils;

use cmd::ShowArgs;
use error::ShowError;

/// nvdimm-acpi - show the ACPI tables related to the NVDIMMs in the system
///
/// Command layout:
///   nvdimm-acpi show --system [nfit,pcat,pmtt] [--json] [-d DIR] [-c FILE]
///
/// Tables:
///   nfit  - NVDIMM Firmware Interface Table (required; absence fails the report)
///   pcat  - Platform Configuration Attributes Table (absence is a warning)
///   pmtt  - Platform Memory Topology Table (absence is normal on many platforms)
///
/// Global flags / env:
///   -v / -vv                  Increase verbosity (RUST_LOG overrides)
///   -q / --quiet              Errors only
///   NVDIMM_ACPI_TABLES_DIR    Fallback for --tables-dir
///   NVDIMM_ACPI_CONFIG        Fallback for --config
///   NO_COLOR / NO_EMOJI       Plain human output
///
/// Exit status:
///   0 ok, 1 report failed, 2 invalid input, 3 table source unavailable
///
/// Examples:
///   nvdimm-acpi show --system
///   nvdimm-acpi show -s nfit,pmtt
///   nvdimm-acpi show -s pcat --json -d ./acpi-dump
#[derive(Parser, Debug)]
#[command(
    name = "nvdimm-acpi",
    version,
    about = "Show the ACPI tables related to the DIMMs in the system.",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show ACPI tables (NFIT, PCAT, PMTT)
    Show(ShowArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let result = match cli.command {
        Commands::Show(args) => cmd::execute_show(args),
    };

    if let Err(err) = result {
        let code = err.downcast_ref::<ShowError>().map_or(1, ShowError::exit_code);
        eprintln!("{err:#}");
        std::process::exit(code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nvdimm-acpi", "show", "-s", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Show(args) = cli.command;
        assert_eq!(args.system, Some(None));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
