//! Report rendering for validation results.
//!
//! Produces the human-readable summary report on stdout: a header, the pass
//! counters, the accumulated error and warning findings, and a final status
//! line. There is no machine-readable mode; CI consumes the exit code, humans
//! read the text.
//!
//! Colors are applied to the section labels and the status line, and are
//! disabled when the `NO_COLOR` environment variable is present (per
//! <https://no-color.org>) or stdout is not a TTY.

use std::io::{IsTerminal as _, Write};

use rulelint_core::ValidationReport;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stdout.
///
/// Colors are disabled when either of the following conditions hold:
/// - The `NO_COLOR` environment variable is present (any value).
/// - stdout is not a TTY (e.g. the output is piped to a file).
pub fn colors_enabled() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

// ---------------------------------------------------------------------------
// ANSI escape sequences
// ---------------------------------------------------------------------------

const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";

/// Width of the dividers and centered section labels.
const REPORT_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Configuration for the report renderer.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the environment (`NO_COLOR` and
    /// the stdout TTY state).
    pub fn detect() -> Self {
        Self {
            colors: colors_enabled(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report rendering
// ---------------------------------------------------------------------------

/// Writes the full validation report to `writer`.
///
/// Layout:
///
/// ```text
/// Validating rules/custom_detection_rules.xml...
///
/// ============================================================
/// VALIDATION RESULTS
/// ============================================================
/// Rules validated: 2
/// Unique rule IDs: 2
/// Errors: 1
/// Warnings: 1
///
/// --------------------------ERRORS:---------------------------
///   Rule 100001: Missing level attribute
///
/// -------------------------WARNINGS:--------------------------
///   Rule 100001: No MITRE ATT&CK mapping
///
/// Validation failed - please fix errors above
/// ============================================================
/// ```
///
/// The error and warning sections appear only when non-empty; findings are
/// listed in accumulation order.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    path: &str,
    report: &ValidationReport,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let divider = "=".repeat(REPORT_WIDTH);

    writeln!(writer, "Validating {path}...")?;
    writeln!(writer)?;
    writeln!(writer, "{divider}")?;
    writeln!(writer, "VALIDATION RESULTS")?;
    writeln!(writer, "{divider}")?;
    writeln!(writer, "Rules validated: {}", report.rules_validated)?;
    writeln!(writer, "Unique rule IDs: {}", report.unique_rule_ids)?;
    writeln!(writer, "Errors: {}", report.error_count())?;
    writeln!(writer, "Warnings: {}", report.warning_count())?;

    if report.has_errors() {
        writeln!(writer)?;
        writeln!(writer, "{}", section_label("ERRORS:", ANSI_RED, config))?;
        for diag in report.errors() {
            writeln!(writer, "  {}", diag.message)?;
        }
    }

    if report.warning_count() > 0 {
        writeln!(writer)?;
        writeln!(writer, "{}", section_label("WARNINGS:", ANSI_YELLOW, config))?;
        for diag in report.warnings() {
            writeln!(writer, "  {}", diag.message)?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "{}", status_line(report, config))?;
    writeln!(writer, "{divider}")?;

    Ok(())
}

/// Renders a section label centered in a run of dashes, optionally colored.
fn section_label(label: &str, color: &str, config: &FormatterConfig) -> String {
    let centered = format!("{label:-^REPORT_WIDTH$}");
    if config.colors {
        format!("{color}{centered}{ANSI_RESET}")
    } else {
        centered
    }
}

/// Renders the final status line for the report's outcome.
fn status_line(report: &ValidationReport, config: &FormatterConfig) -> String {
    let (text, color) = if report.has_errors() {
        ("Validation failed - please fix errors above", ANSI_RED)
    } else if report.warning_count() > 0 {
        ("No errors found (warnings can be addressed)", ANSI_YELLOW)
    } else {
        ("All validation checks passed!", ANSI_GREEN)
    };
    if config.colors {
        format!("{color}{text}{ANSI_RESET}")
    } else {
        text.to_owned()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
