// crates/dotconf-cli/src/main.rs
// ============================================================================
// Module: Dotconf CLI Entry Point
// Description: Command dispatcher for configuration checking and dumping.
// Purpose: Validate dotted-key configuration files against the reference
//          daemon schema from the command line.
// Dependencies: clap, dotconf-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The `dotconf` binary parses one or more configuration files, validates
//! them against the reference daemon schema, and reports every diagnostic
//! on stderr with its `source:line` provenance. `check` prints a per-file
//! verdict and exits non-zero when any file is less than fully valid;
//! `dump-tree` prints the parsed key tree for debugging. Inputs are
//! untrusted: files are size-limited before reading.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use dotconf_core::parse_file;
use dotconf_core::profile::MainConfig;
use dotconf_core::report::WriterReporter;
use dotconf_core::validate;
use dotconf_core::Status;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dotconf", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate configuration files against the daemon schema.
    Check(CheckCommand),
    /// Print the parsed key tree of one configuration file.
    DumpTree(DumpTreeCommand),
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Print the validated configuration as JSON on stdout.
    #[arg(long)]
    dump: bool,
    /// Configuration files to validate.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

/// Arguments for the `dump-tree` command.
#[derive(Args, Debug)]
struct DumpTreeCommand {
    /// Configuration file to parse.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check(command) => command_check(&command),
        Commands::DumpTree(command) => command_dump_tree(&command),
    }
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command.
///
/// Every file is checked independently; diagnostics go to stderr as they
/// are found. The exit code is success only when every file validates
/// with no defect at all.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let mut worst = Status::Ok;
    for path in &command.files {
        let status = check_file(path, command.dump)?;
        worst = worst.max(status);
    }
    if worst == Status::Ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Checks one file, printing its verdict, and returns its status.
fn check_file(path: &Path, dump: bool) -> CliResult<Status> {
    let mut reporter = WriterReporter::new(std::io::stderr());
    let root = match parse_file(path, &mut reporter) {
        Ok(root) => root,
        Err(err) => {
            write_stderr_line(&err.to_string())
                .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            return Ok(Status::Error);
        }
    };
    let (config, status) = validate::<MainConfig>(&root, &mut reporter);
    write_stdout_line(&format!("{}: {status}", path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if dump {
        let json = serde_json::to_string_pretty(&config)
            .map_err(|err| CliError::new(format!("cannot serialize configuration: {err}")))?;
        write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(status)
}

// ============================================================================
// SECTION: Dump Tree Command
// ============================================================================

/// Executes the `dump-tree` command.
fn command_dump_tree(command: &DumpTreeCommand) -> CliResult<ExitCode> {
    let mut reporter = WriterReporter::new(std::io::stderr());
    let root = parse_file(&command.file, &mut reporter)
        .map_err(|err| CliError::new(err.to_string()))?;
    let mut rendered = String::new();
    root.render_into(&mut rendered, 0);
    write_stdout(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes already-terminated text to stdout without adding a newline.
fn write_stdout(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output failure message for `stream`.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("cannot write to {stream}: {error}")
}

/// Prints an error to stderr and maps it to a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
