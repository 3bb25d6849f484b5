//! Command implementations for the CLI tool.

use std::path::{Path, PathBuf};

use snapture::{Error, RestoreOptions, WriteOptions};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;
use crate::progress::CliProgress;

/// Configuration for the create command.
pub struct CreateConfig<'a> {
    pub source_dir: &'a Path,
    pub archive_path: &'a Path,
    pub exclude: &'a [PathBuf],
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Configuration for the restore command.
pub struct RestoreConfig<'a> {
    pub archive_path: &'a Path,
    pub output_dir: &'a Path,
    pub strict: bool,
    pub apply_permissions: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Create command implementation
pub fn create(config: &CreateConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    // Entry lines would corrupt JSON output
    let quiet = config.quiet || config.format == OutputFormat::Json;

    let mut options = WriteOptions::new().progress(CliProgress::snapshot(quiet));
    for path in config.exclude {
        options = options.exclude(path);
    }
    // A snapshot of a tree that holds this tool leaves the tool out
    if let Ok(exe) = std::env::current_exe() {
        options = options.exclude(exe);
    }

    match snapture::snapshot_with_options(config.source_dir, config.archive_path, options) {
        Ok(result) => {
            print!("{}", formatter.format_snapshot_result(&result));
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// Restore command implementation
pub fn restore(config: &RestoreConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);
    let quiet = config.quiet || config.format == OutputFormat::Json;

    let options = RestoreOptions::new()
        .strict(config.strict)
        .apply_permissions(config.apply_permissions)
        .progress(CliProgress::restore(config.output_dir, quiet));

    match snapture::restore_with_options(config.archive_path, config.output_dir, options) {
        Ok(result) => {
            print!("{}", formatter.format_restore_result(&result, config.output_dir));
            // Dropped files were already reported; a non-strict restore still succeeds
            ExitCode::Success
        }
        Err(Error::HashMismatch { path, .. }) => {
            println!("{} - Hash mismatch!", config.output_dir.join(&path).display());
            ExitCode::HashMismatch
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// List command implementation
pub fn list(archive_path: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    match snapture::list_contents(archive_path) {
        Ok(entries) => {
            print!("{}", formatter.format_list(&entries));
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}
