//! `validate` command
//!
//! Runs the collect-all diagnostics pass over each file and prints a report.

use serde::Serialize;
use std::path::Path;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::cli::commands::loader_for;
use crate::config::validation::ValidationResult;
use crate::error::{ConfigError, SexcfgError, ValidationIssue};

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    valid: bool,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl FileReport {
    fn new(path: &Path, result: ValidationResult, strict: bool) -> Self {
        let valid = result.is_valid() && !(strict && !result.warnings.is_empty());
        Self {
            path: path.display().to_string(),
            valid,
            errors: result.errors,
            warnings: result.warnings,
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    total: usize,
    valid: usize,
    invalid: usize,
}

#[derive(Debug, Serialize)]
struct Report {
    files: Vec<FileReport>,
    summary: Summary,
}

/// Validate configuration files.
///
/// # Errors
///
/// Returns an I/O error if a file cannot be read, `InvalidOverride` for a
/// bad `--set` and `ValidationFailed` if any file has errors (or warnings
/// under `--strict`).
pub fn run(args: &ValidateArgs) -> Result<(), SexcfgError> {
    let loader = loader_for(&args.load)?;

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let result = loader.check(path)?;

        for warning in &result.warnings {
            tracing::warn!(file = %path.display(), location = %warning.path, "{}", warning.message);
        }

        let report = FileReport::new(path, result, args.strict);
        if report.valid {
            tracing::info!(file = %path.display(), "configuration valid");
        }
        files.push(report);
    }

    let invalid = files.iter().filter(|f| !f.valid).count();
    let report = Report {
        summary: Summary {
            total: files.len(),
            valid: files.len() - invalid,
            invalid,
        },
        files,
    };

    match args.format {
        OutputFormat::Human => print_human(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if invalid > 0 {
        return Err(ConfigError::ValidationFailed { count: invalid }.into());
    }
    Ok(())
}

fn print_human(report: &Report) {
    for file in &report.files {
        if file.valid {
            println!("{}: ok", file.path);
        } else {
            println!(
                "{}: {} error(s), {} warning(s)",
                file.path,
                file.errors.len(),
                file.warnings.len()
            );
        }
        for issue in file.errors.iter().chain(&file.warnings) {
            println!("  {issue}");
        }
    }
    if report.summary.total > 1 {
        println!(
            "{} file(s) checked: {} valid, {} invalid",
            report.summary.total, report.summary.valid, report.summary.invalid
        );
    }
}
