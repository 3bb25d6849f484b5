//! CLI tool for snapshot archive operations.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Snapshot directory trees into a single file and restore them
#[derive(Parser)]
#[command(name = "snapture")]
#[command(
    author,
    version,
    about = "Snapshot directory trees into a single file and restore them",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress per-entry output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Snapshot a directory tree into an archive (alias: m)
    #[command(alias = "m")]
    Create {
        /// Directory to snapshot
        source: PathBuf,

        /// Archive file to create
        archive: PathBuf,

        /// Paths inside the source to leave out
        #[arg(short = 'x', long)]
        exclude: Vec<PathBuf>,
    },

    /// Restore an archive into a directory (alias: u)
    #[command(alias = "u")]
    Restore {
        /// Archive file to restore
        archive: PathBuf,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,

        /// Continue past files whose hash does not match
        #[arg(short = 's', long)]
        no_strict: bool,

        /// Do not apply the recorded permission bits
        #[arg(long)]
        no_permissions: bool,
    },

    /// List archive contents (alias: l)
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Create {
            source,
            archive,
            exclude,
        } => commands::create(&commands::CreateConfig {
            source_dir: &source,
            archive_path: &archive,
            exclude: &exclude,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::Restore {
            archive,
            output,
            no_strict,
            no_permissions,
        } => commands::restore(&commands::RestoreConfig {
            archive_path: &archive,
            output_dir: &output,
            strict: !no_strict,
            apply_permissions: !no_permissions,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::List { archive } => commands::list(&archive, cli.format),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
