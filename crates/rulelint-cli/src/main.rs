//! The `rulelint` binary: validate a detection rules document and exit 0
//! (no errors) or 1 (errors, missing file, or malformed XML).
mod cli;
mod error;
mod io;
mod report;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use rulelint_core::{CheckId, Diagnostic, Severity, ValidationReport, parse_rules, validate};

use crate::report::FormatterConfig;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let validation = build_report(&cli.rules_file);

    let config = FormatterConfig::detect();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = report::write_report(
        &mut out,
        &cli.rules_file.display().to_string(),
        &validation,
        &config,
    ) {
        eprintln!("error: failed to write report: {e}");
        return ExitCode::FAILURE;
    }

    if validation.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Reads, parses, and validates the rules document at `path`.
///
/// Read and parse failures short-circuit into a report carrying a single
/// document-level error finding and zero rules validated; no per-rule checks
/// run because no rule structure exists to check.
fn build_report(path: &Path) -> ValidationReport {
    let content = match io::read_rules(path) {
        Ok(content) => content,
        Err(e) => return document_failure(CheckId::DocRead, e.message()),
    };

    match parse_rules(&content) {
        Ok(file) => validate(&file),
        Err(e) => document_failure(CheckId::DocParse, e.to_string()),
    }
}

/// Builds a report whose only finding is a document-level error.
fn document_failure(check: CheckId, message: String) -> ValidationReport {
    ValidationReport {
        diagnostics: vec![Diagnostic::new(check, Severity::Error, message)],
        rules_validated: 0,
        unique_rule_ids: 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
