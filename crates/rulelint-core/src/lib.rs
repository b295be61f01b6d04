#![deny(clippy::print_stdout, clippy::print_stderr)]

//! Core library for the detection rule linter.
//!
//! Parses a Wazuh-style XML rule document into a [`RuleFile`] and runs the
//! fixed check battery over it, producing a [`ValidationReport`] of errors
//! (deployment-blocking) and warnings (advisory). The library never touches
//! the filesystem and never prints; both concerns live in the CLI crate.

pub mod document;
pub mod validation;
pub mod vocab;

pub use document::{MitreMapping, ParseError, RuleEntry, RuleFile, parse_rules};
pub use validation::{
    CheckId, Diagnostic, RuleCheck, Severity, ValidationReport, build_registry, validate,
};

/// Returns the rulelint-core crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
