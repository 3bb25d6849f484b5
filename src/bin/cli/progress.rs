//! Per-entry output for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};
use snapture::progress::ProgressReporter;
use std::path::PathBuf;
use std::time::Duration;

/// Which notification prints the entry line.
enum Echo {
    /// Print the archive path as soon as an entry is started.
    Started,
    /// Print the destination path once an entry has been verified, with a
    /// trailing `/` for directories.
    Restored(PathBuf),
}

/// Prints one line per entry while a spinner shows the entry in flight.
pub struct CliProgress {
    spinner: ProgressBar,
    echo: Echo,
    quiet: bool,
}

impl CliProgress {
    /// Echoes every entry added to a new archive.
    pub fn snapshot(quiet: bool) -> Self {
        Self::new(Echo::Started, quiet)
    }

    /// Echoes every entry restored below `output_dir`.
    pub fn restore(output_dir: impl Into<PathBuf>, quiet: bool) -> Self {
        Self::new(Echo::Restored(output_dir.into()), quiet)
    }

    fn new(echo: Echo, quiet: bool) -> Self {
        let spinner = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {wide_msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        Self {
            spinner,
            echo,
            quiet,
        }
    }

    fn print(&self, line: &str) {
        if !self.quiet {
            self.spinner.suspend(|| println!("{}", line));
        }
    }
}

impl ProgressReporter for CliProgress {
    fn on_entry_start(&mut self, entry_name: &str, _size: u64) {
        // Truncate long names
        let display_name = match entry_name.char_indices().rev().nth(56) {
            Some((start, _)) if start > 0 => format!("...{}", &entry_name[start..]),
            _ => entry_name.to_string(),
        };
        self.spinner.set_message(display_name);

        if matches!(self.echo, Echo::Started) {
            self.print(entry_name);
        }
    }

    fn on_entry_complete(&mut self, entry_name: &str, success: bool) {
        if let Echo::Restored(output_dir) = &self.echo {
            let target = output_dir.join(entry_name);
            let line = target.display().to_string();
            if success && target.is_dir() {
                self.print(&format!("{}/", line));
            } else if success {
                self.print(&line);
            } else {
                self.print(&format!("{} - Hash mismatch!", line));
            }
        }
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}
