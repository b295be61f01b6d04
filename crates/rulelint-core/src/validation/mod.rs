//! Diagnostic types and check dispatch for the rule validation engine.
//!
//! This module defines [`Diagnostic`], [`Severity`], [`CheckId`], and
//! [`ValidationReport`] — the types that represent every finding produced by
//! the check battery — together with the [`RuleCheck`] trait,
//! [`build_registry`], and the top-level [`validate`] dispatch function.

pub mod checks_advisory;
pub mod checks_structural;

use std::collections::HashSet;
use std::fmt;

use crate::document::RuleFile;


/// The severity of a validation finding.
///
/// Errors block deployment (non-zero exit); warnings are advisory and never
/// affect pass/fail. There is no third severity — a file that cannot be read
/// or parsed surfaces as a single [`Severity::Error`] finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The rule violates a hard constraint; deployment must be blocked.
    Error,
    /// The rule deviates from best practice; deployment may proceed.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("Error"),
            Self::Warning => f.write_str("Warning"),
        }
    }
}

/// Machine-readable identifier for one check in the battery.
///
/// [`CheckId::code`] returns the canonical hyphenated form used in output
/// (e.g. `"RUL-03"`). Checks sharing a prefix inspect the same part of a
/// rule: `RUL` the id attribute, `LVL` the level attribute, `DSC` the
/// description, `DET` the detection logic, `MTR` the MITRE mapping, `PAT`
/// the nested patterns and field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    /// DOC-01: The input file exists and is readable.
    ///
    /// Produced by the caller before parsing, never by the registry. A
    /// failure here is the report's only finding: no rules were processed.
    DocRead,
    /// DOC-02: The input is well-formed XML.
    ///
    /// Produced by the caller when [`crate::document::parse_rules`] fails,
    /// never by the registry. No partial results accompany it.
    DocParse,
    /// RUL-01: The `id` attribute is present.
    RulIdPresence,
    /// RUL-02: The `id` attribute parses as an integer.
    RulIdFormat,
    /// RUL-03: The integer id is unique within the document.
    RulIdUnique,
    /// RUL-04: The integer id falls in the reserved custom range 100000-199999.
    RulIdRange,
    /// LVL-01: The `level` attribute is present.
    LvlPresence,
    /// LVL-02: The `level` attribute parses as an integer.
    LvlFormat,
    /// LVL-03: The integer level falls in 0-15.
    LvlRange,
    /// DSC-01: A non-empty `description` element exists.
    DscPresence,
    /// DSC-02: The trimmed description is at least 20 characters.
    DscLength,
    /// DSC-03: The description contains a context phrase.
    DscContext,
    /// DET-01: At least one detection element is a direct child.
    DetPresence,
    /// MTR-01: A `mitre` mapping block exists.
    MtrPresence,
    /// MTR-02: The `mitre` block carries a non-empty technique id.
    MtrTechniqueId,
    /// MTR-03: The technique id matches `T####[.###]`.
    MtrTechniqueFormat,
    /// MTR-04: A MITRE tactic appears among the rule's `attack.` group tags.
    MtrTacticTag,
    /// PAT-01: Every nested `regex` pattern compiles.
    PatRegexSyntax,
    /// PAT-02: Every nested `pcre2` pattern has balanced parentheses.
    PatPcre2Balance,
    /// PAT-03: Every nested `field` name starts with a recognised prefix.
    PatFieldName,
}

impl CheckId {
    /// Returns the canonical hyphenated check code string.
    pub fn code(self) -> &'static str {
        match self {
            Self::DocRead => "DOC-01",
            Self::DocParse => "DOC-02",
            Self::RulIdPresence => "RUL-01",
            Self::RulIdFormat => "RUL-02",
            Self::RulIdUnique => "RUL-03",
            Self::RulIdRange => "RUL-04",
            Self::LvlPresence => "LVL-01",
            Self::LvlFormat => "LVL-02",
            Self::LvlRange => "LVL-03",
            Self::DscPresence => "DSC-01",
            Self::DscLength => "DSC-02",
            Self::DscContext => "DSC-03",
            Self::DetPresence => "DET-01",
            Self::MtrPresence => "MTR-01",
            Self::MtrTechniqueId => "MTR-02",
            Self::MtrTechniqueFormat => "MTR-03",
            Self::MtrTacticTag => "MTR-04",
            Self::PatRegexSyntax => "PAT-01",
            Self::PatPcre2Balance => "PAT-02",
            Self::PatFieldName => "PAT-03",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single validation finding.
///
/// Findings are collected across all checks and returned in a
/// [`ValidationReport`]. The engine never fails fast — a problem in one rule
/// never suppresses checking of other rules, and findings are never
/// deduplicated or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The check that produced this finding.
    pub check_id: CheckId,
    /// The severity of this finding.
    pub severity: Severity,
    /// A self-contained explanation embedding the offending rule id, so the
    /// finding list can be read without the source document at hand.
    pub message: String,
}

impl Diagnostic {
    /// Constructs a new [`Diagnostic`].
    pub fn new(check_id: CheckId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            check_id,
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The collected output of a validation pass over a parsed [`RuleFile`].
///
/// Carries every diagnostic plus the pass counters. Use
/// [`passed`][ValidationReport::passed] for the overall verdict: warnings
/// never affect it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// All diagnostics, in accumulation order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of `rule` elements walked. Every rule increments this exactly
    /// once, findings or not.
    pub rules_validated: usize,
    /// Size of the set of distinct integer rule ids. Duplicated ids still
    /// enter the set, so this is a post-deduplication count by construction.
    pub unique_rule_ids: usize,
}

impl ValidationReport {
    /// Returns `true` if any diagnostic has [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are zero [`Severity::Error`] diagnostics.
    ///
    /// A document passes even when it carries warnings.
    pub fn passed(&self) -> bool {
        !self.has_errors()
    }

    /// Returns an iterator over all diagnostics with [`Severity::Error`].
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Returns an iterator over all diagnostics with [`Severity::Warning`].
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Returns an iterator over all diagnostics produced by the given check.
    pub fn by_check(&self, check: CheckId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.check_id == check)
    }

    /// Returns the number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Returns the number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}

/// A single, stateless check that inspects a [`RuleFile`].
///
/// Each check in the battery implements this trait. Checks push zero or more
/// [`Diagnostic`] values into the provided `diags` vector; a check that finds
/// nothing wrong pushes nothing. The dispatch loop in [`validate`] calls each
/// check's [`check`][RuleCheck::check] method exactly once per pass, in
/// registry order.
///
/// Checks are independent: no check's outcome influences another, with one
/// deliberate exception — a rule whose `id` attribute is absent receives only
/// the RUL-01 error, and every other check skips it (there is no id to
/// reference in its messages).
///
/// # Object safety
///
/// The trait is object-safe; the registry stores checks as
/// `Vec<Box<dyn RuleCheck>>`.
pub trait RuleCheck {
    /// The unique identifier for this check.
    fn id(&self) -> CheckId;

    /// The severity of diagnostics produced by this check.
    fn severity(&self) -> Severity;

    /// Inspect `file` and push any findings into `diags`.
    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>);
}

/// Builds the ordered check registry.
///
/// The order matters only for output readability: findings are reported in
/// registry order, grouped per check. Every check runs on every pass; there
/// is no configuration surface.
pub fn build_registry() -> Vec<Box<dyn RuleCheck>> {
    use checks_advisory::{DscContext, DscLength, MtrPresence, MtrTacticTag, PatFieldName,
        PatPcre2Balance, RulIdRange};
    use checks_structural::{DetPresence, DscPresence, LvlFormat, LvlPresence, LvlRange,
        MtrTechniqueFormat, MtrTechniqueId, PatRegexSyntax, RulIdFormat, RulIdPresence,
        RulIdUnique};

    vec![
        Box::new(RulIdPresence),
        Box::new(RulIdFormat),
        Box::new(RulIdUnique),
        Box::new(RulIdRange),
        Box::new(LvlPresence),
        Box::new(LvlFormat),
        Box::new(LvlRange),
        Box::new(DscPresence),
        Box::new(DetPresence),
        Box::new(MtrPresence),
        Box::new(MtrTechniqueId),
        Box::new(MtrTechniqueFormat),
        Box::new(MtrTacticTag),
        Box::new(DscLength),
        Box::new(DscContext),
        Box::new(PatRegexSyntax),
        Box::new(PatPcre2Balance),
        Box::new(PatFieldName),
    ]
}

/// Runs the full check battery on a parsed [`RuleFile`].
///
/// Walks the registry linearly and collects all diagnostics — the engine
/// never fails fast. Also computes the pass counters: `rules_validated` is
/// the total rule count, and `unique_rule_ids` the size of the distinct
/// integer-id set (non-numeric ids do not enter the set; duplicates count
/// once).
pub fn validate(file: &RuleFile) -> ValidationReport {
    let registry = build_registry();
    let mut diags: Vec<Diagnostic> = Vec::new();
    for check in &registry {
        check.check(file, &mut diags);
    }

    let unique_ids: HashSet<i64> = file
        .rules
        .iter()
        .filter_map(|r| r.id.as_deref())
        .filter_map(|id| id.parse::<i64>().ok())
        .collect();

    ValidationReport {
        diagnostics: diags,
        rules_validated: file.rules.len(),
        unique_rule_ids: unique_ids.len(),
    }
}
