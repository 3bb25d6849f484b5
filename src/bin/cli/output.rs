//! Output formatting for CLI operations.

use serde_json::json;
use snapture::{EntryKind, ListedEntry, RestoreResult, WriteResult};
use std::path::Path;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a list of entries
    fn format_list(&self, entries: &[ListedEntry]) -> String;

    /// Formats the outcome of taking a snapshot
    fn format_snapshot_result(&self, result: &WriteResult) -> String;

    /// Formats the outcome of a restore below `output_dir`
    fn format_restore_result(&self, result: &RestoreResult, output_dir: &Path) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_list(&self, entries: &[ListedEntry]) -> String {
        entries.iter().map(|entry| format!("{}\n", entry)).collect()
    }

    fn format_snapshot_result(&self, result: &WriteResult) -> String {
        let mut output = format!("\n{}\n", result.archive_size);
        if !result.skipped.is_empty() {
            output.push_str(&format!(
                "Skipped {} entries that are neither files nor directories\n",
                result.skipped.len()
            ));
        }
        output
    }

    fn format_restore_result(&self, result: &RestoreResult, _output_dir: &Path) -> String {
        if result.is_ok() {
            return String::new();
        }
        format!(
            "\nRestored {} of {} files, {} dropped after a hash mismatch\n",
            result.files_restored,
            result.files_restored + result.mismatches.len(),
            result.mismatches.len()
        )
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_list(&self, entries: &[ListedEntry]) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "path": e.path.as_str(),
                    "is_directory": e.kind == EntryKind::Directory,
                    "size": e.size,
                    "size_kib": e.size_kib(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_snapshot_result(&self, result: &WriteResult) -> String {
        let obj = json!({
            "entries_written": result.entries_written,
            "directories_written": result.directories_written,
            "files_written": result.files_written,
            "total_size": result.total_size,
            "archive_size": result.archive_size,
            "skipped": result.skipped.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_restore_result(&self, result: &RestoreResult, output_dir: &Path) -> String {
        let obj = json!({
            "success": result.is_ok(),
            "output_dir": output_dir.display().to_string(),
            "directories_restored": result.directories_restored,
            "files_restored": result.files_restored,
            "bytes_restored": result.bytes_restored,
            "mismatches": result.mismatches.iter().map(|m| json!({
                "path": m.path,
                "expected": m.expected.to_hex(),
                "actual": m.actual.to_hex(),
            })).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}
