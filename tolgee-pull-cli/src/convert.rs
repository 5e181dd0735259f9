use std::path::{Path, PathBuf};

use tolgee_pull::{ExtractedExport, Pipeline, TransformReport, pull};

use crate::config::Settings;

/// Converts every catalog of an unpacked export directory.
///
/// Returns the report even if some files failed; only problems that stop the
/// whole batch (unreadable export directory, output directory that cannot be
/// created) are errors.
pub fn run_convert_command(input: &Path, settings: &Settings) -> Result<TransformReport, String> {
    if !input.is_dir() {
        return Err(format!(
            "Export directory {} does not exist or is not a directory",
            input.display()
        ));
    }

    println!(
        "Converting {} to {} in {}...",
        input.display(),
        settings.format,
        settings.output_dir.display()
    );

    let pipeline = Pipeline::new(&settings.output_dir, settings.format);
    pull(&ExtractedExport::new(input), &pipeline)
        .map_err(|e| format!("Error converting {}: {}", input.display(), e))
}

/// Prints the written files (relative to the working directory) and the failures.
pub fn print_report(report: &TransformReport) {
    let cwd = std::env::current_dir().unwrap_or_default();

    println!("✅ {} file(s) written", report.written.len());
    for path in &report.written {
        println!("  {}", relative_to(path, &cwd).display());
    }

    if !report.failures.is_empty() {
        eprintln!("❌ {} file(s) failed", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {}", failure);
        }
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
