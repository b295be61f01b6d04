//! Structural checks: hard constraints whose violation blocks deployment.
//!
//! Each check is a stateless struct implementing
//! [`crate::validation::RuleCheck`] and producing
//! [`crate::validation::Severity::Error`] diagnostics. All checks collect
//! every violation without early exit; the only short-circuit is the shared
//! id-presence rule — an entry with no `id` attribute gets exactly the RUL-01
//! error and is skipped by every other check, since there is no id to embed
//! in its messages.
//!
//! Checks are registered in [`crate::validation::build_registry`].

use std::collections::HashSet;

use regex::Regex;

use crate::document::RuleFile;
use crate::vocab;

use super::{CheckId, Diagnostic, RuleCheck, Severity};

// ---------------------------------------------------------------------------
// RUL-01: id attribute presence
// ---------------------------------------------------------------------------

/// RUL-01 — Every rule has an `id` attribute.
///
/// A rule without one cannot be referenced by any later message, which is why
/// the remaining checks skip such entries entirely.
pub struct RulIdPresence;

impl RuleCheck for RulIdPresence {
    fn id(&self) -> CheckId {
        CheckId::RulIdPresence
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            if entry.id.is_none() {
                diags.push(Diagnostic::new(
                    CheckId::RulIdPresence,
                    Severity::Error,
                    "Rule missing ID attribute",
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RUL-02: id integer format
// ---------------------------------------------------------------------------

/// RUL-02 — The `id` attribute parses as an integer.
///
/// A non-numeric id produces exactly one format error; the uniqueness and
/// range checks never see it because they parse the id themselves and skip
/// on failure.
pub struct RulIdFormat;

impl RuleCheck for RulIdFormat {
    fn id(&self) -> CheckId {
        CheckId::RulIdFormat
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            if id.parse::<i64>().is_err() {
                diags.push(Diagnostic::new(
                    CheckId::RulIdFormat,
                    Severity::Error,
                    format!("Invalid rule ID format: {id}"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RUL-03: duplicate id detection
// ---------------------------------------------------------------------------

/// RUL-03 — Every integer rule id is unique within the document.
///
/// The second and each later occurrence produces one diagnostic. The id is
/// still inserted into the seen-set, so the reported unique-id count is
/// post-deduplication by construction.
pub struct RulIdUnique;

impl RuleCheck for RulIdUnique {
    fn id(&self) -> CheckId {
        CheckId::RulIdUnique
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        let mut seen: HashSet<i64> = HashSet::new();
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let Ok(id_int) = id.parse::<i64>() else {
                continue;
            };
            if !seen.insert(id_int) {
                diags.push(Diagnostic::new(
                    CheckId::RulIdUnique,
                    Severity::Error,
                    format!("Duplicate rule ID: {id}"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LVL-01: level attribute presence
// ---------------------------------------------------------------------------

/// LVL-01 — Every rule has a `level` attribute.
pub struct LvlPresence;

impl RuleCheck for LvlPresence {
    fn id(&self) -> CheckId {
        CheckId::LvlPresence
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            if entry.level.is_none() {
                diags.push(Diagnostic::new(
                    CheckId::LvlPresence,
                    Severity::Error,
                    format!("Rule {id}: Missing level attribute"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LVL-02: level integer format
// ---------------------------------------------------------------------------

/// LVL-02 — The `level` attribute parses as an integer.
pub struct LvlFormat;

impl RuleCheck for LvlFormat {
    fn id(&self) -> CheckId {
        CheckId::LvlFormat
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let Some(level) = entry.level.as_deref() else {
                continue;
            };
            if level.parse::<i64>().is_err() {
                diags.push(Diagnostic::new(
                    CheckId::LvlFormat,
                    Severity::Error,
                    format!("Rule {id}: Invalid level format"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LVL-03: level range
// ---------------------------------------------------------------------------

/// LVL-03 — The integer level falls in the inclusive range 0-15.
pub struct LvlRange;

impl RuleCheck for LvlRange {
    fn id(&self) -> CheckId {
        CheckId::LvlRange
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let Some(level) = entry.level.as_deref() else {
                continue;
            };
            let Ok(level_int) = level.parse::<i64>() else {
                continue;
            };
            if !(0..=15).contains(&level_int) {
                diags.push(Diagnostic::new(
                    CheckId::LvlRange,
                    Severity::Error,
                    format!("Rule {id}: Level {level} out of range (0-15)"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DSC-01: description presence
// ---------------------------------------------------------------------------

/// DSC-01 — Every rule has a `description` element with text.
///
/// Whitespace-only text satisfies presence; the advisory length check flags
/// it instead.
pub struct DscPresence;

impl RuleCheck for DscPresence {
    fn id(&self) -> CheckId {
        CheckId::DscPresence
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            if entry.description.as_deref().unwrap_or("").is_empty() {
                diags.push(Diagnostic::new(
                    CheckId::DscPresence,
                    Severity::Error,
                    format!("Rule {id}: Missing or empty description"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DET-01: detection logic presence
// ---------------------------------------------------------------------------

/// DET-01 — At least one detection element (`field`, `regex`, `match`,
/// `if_sid`, `if_group`) is a direct child. A rule with no way to match
/// anything is useless.
pub struct DetPresence;

impl RuleCheck for DetPresence {
    fn id(&self) -> CheckId {
        CheckId::DetPresence
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            if !entry.has_detection {
                diags.push(Diagnostic::new(
                    CheckId::DetPresence,
                    Severity::Error,
                    format!("Rule {id}: No detection logic found (field, regex, match, etc.)"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MTR-02: technique id presence
// ---------------------------------------------------------------------------

/// MTR-02 — A `mitre` block, when present, carries a non-empty technique id.
///
/// The mapping itself is optional (MTR-01 warns when it is absent), but a
/// mapping without a technique id is an error: it claims coverage it cannot
/// name.
pub struct MtrTechniqueId;

impl RuleCheck for MtrTechniqueId {
    fn id(&self) -> CheckId {
        CheckId::MtrTechniqueId
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let Some(mitre) = entry.mitre.as_ref() else {
                continue;
            };
            if mitre.technique_id.as_deref().unwrap_or("").is_empty() {
                diags.push(Diagnostic::new(
                    CheckId::MtrTechniqueId,
                    Severity::Error,
                    format!("Rule {id}: MITRE mapping missing technique ID"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MTR-03: technique id format
// ---------------------------------------------------------------------------

/// MTR-03 — The technique id matches `T####` with an optional `.###`
/// sub-technique suffix.
pub struct MtrTechniqueFormat;

impl RuleCheck for MtrTechniqueFormat {
    fn id(&self) -> CheckId {
        CheckId::MtrTechniqueFormat
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let Some(technique_id) = entry
                .mitre
                .as_ref()
                .and_then(|m| m.technique_id.as_deref())
                .filter(|t| !t.is_empty())
            else {
                continue;
            };
            if !vocab::is_valid_technique_id(technique_id) {
                diags.push(Diagnostic::new(
                    CheckId::MtrTechniqueFormat,
                    Severity::Error,
                    format!("Rule {id}: Invalid MITRE technique ID format: {technique_id}"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PAT-01: regex pattern syntax
// ---------------------------------------------------------------------------

/// PAT-01 — Every nested `regex` element's text compiles as a regular
/// expression.
///
/// Known limitation: patterns are compiled with the `regex` crate, whose
/// dialect differs from the PCRE2 dialect the detection engine evaluates at
/// runtime. The check catches gross syntax errors, not dialect mismatches.
pub struct PatRegexSyntax;

impl RuleCheck for PatRegexSyntax {
    fn id(&self) -> CheckId {
        CheckId::PatRegexSyntax
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            for pattern in &entry.regex_patterns {
                if let Err(e) = Regex::new(pattern) {
                    diags.push(Diagnostic::new(
                        CheckId::PatRegexSyntax,
                        Severity::Error,
                        format!("Rule {id}: Invalid regex pattern: {e}"),
                    ));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use crate::document::parse_rules;
    use crate::validation::{CheckId, validate};

    fn check_messages(xml: &str, check: CheckId) -> Vec<String> {
        let file = parse_rules(xml).expect("parse");
        let report = validate(&file);
        report
            .by_check(check)
            .map(|d| d.message.clone())
            .collect()
    }

    // ── RUL-01 ───────────────────────────────────────────────────────────────

    #[test]
    fn missing_id_is_an_error() {
        let msgs = check_messages(
            r#"<group><rule level="5"><description>x</description></rule></group>"#,
            CheckId::RulIdPresence,
        );
        assert_eq!(msgs, vec!["Rule missing ID attribute"]);
    }

    #[test]
    fn missing_id_skips_every_other_check() {
        let file = parse_rules(r#"<group><rule level="99"/></group>"#).expect("parse");
        let report = validate(&file);
        // Only the RUL-01 error, despite the bad level and missing everything.
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].check_id, CheckId::RulIdPresence);
    }

    // ── RUL-02 ───────────────────────────────────────────────────────────────

    #[test]
    fn non_numeric_id_is_a_format_error() {
        let msgs = check_messages(
            r#"<group><rule id="not-a-number" level="5"/></group>"#,
            CheckId::RulIdFormat,
        );
        assert_eq!(msgs, vec!["Invalid rule ID format: not-a-number"]);
    }

    #[test]
    fn non_numeric_id_never_reaches_uniqueness_or_range() {
        let file = parse_rules(
            r#"<group>
                 <rule id="abc" level="5"/>
                 <rule id="abc" level="5"/>
               </group>"#,
        )
        .expect("parse");
        let report = validate(&file);
        assert_eq!(report.by_check(CheckId::RulIdFormat).count(), 2);
        assert_eq!(report.by_check(CheckId::RulIdUnique).count(), 0);
        assert_eq!(report.by_check(CheckId::RulIdRange).count(), 0);
    }

    // ── RUL-03 ───────────────────────────────────────────────────────────────

    #[test]
    fn duplicate_id_errors_once_on_second_occurrence() {
        let msgs = check_messages(
            r#"<group>
                 <rule id="100001" level="5"/>
                 <rule id="100001" level="5"/>
               </group>"#,
            CheckId::RulIdUnique,
        );
        assert_eq!(msgs, vec!["Duplicate rule ID: 100001"]);
    }

    #[test]
    fn triplicate_id_errors_twice() {
        let msgs = check_messages(
            r#"<group>
                 <rule id="100001" level="5"/>
                 <rule id="100001" level="5"/>
                 <rule id="100001" level="5"/>
               </group>"#,
            CheckId::RulIdUnique,
        );
        assert_eq!(msgs.len(), 2);
    }

    #[test]
    fn distinct_ids_produce_no_duplicate_error() {
        let msgs = check_messages(
            r#"<group>
                 <rule id="100001" level="5"/>
                 <rule id="100002" level="5"/>
               </group>"#,
            CheckId::RulIdUnique,
        );
        assert!(msgs.is_empty());
    }

    // ── LVL-01 / LVL-02 / LVL-03 ─────────────────────────────────────────────

    #[test]
    fn missing_level_is_an_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001"/></group>"#,
            CheckId::LvlPresence,
        );
        assert_eq!(msgs, vec!["Rule 100001: Missing level attribute"]);
    }

    #[test]
    fn non_numeric_level_is_a_format_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="high"/></group>"#,
            CheckId::LvlFormat,
        );
        assert_eq!(msgs, vec!["Rule 100001: Invalid level format"]);
    }

    #[test]
    fn level_sixteen_is_out_of_range() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="16"/></group>"#,
            CheckId::LvlRange,
        );
        assert_eq!(msgs, vec!["Rule 100001: Level 16 out of range (0-15)"]);
    }

    #[test]
    fn negative_level_is_out_of_range() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="-1"/></group>"#,
            CheckId::LvlRange,
        );
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn boundary_levels_zero_and_fifteen_pass() {
        let msgs = check_messages(
            r#"<group>
                 <rule id="100001" level="0"/>
                 <rule id="100002" level="15"/>
               </group>"#,
            CheckId::LvlRange,
        );
        assert!(msgs.is_empty());
    }

    // ── DSC-01 ───────────────────────────────────────────────────────────────

    #[test]
    fn missing_description_is_an_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"/></group>"#,
            CheckId::DscPresence,
        );
        assert_eq!(msgs, vec!["Rule 100001: Missing or empty description"]);
    }

    #[test]
    fn empty_description_element_is_an_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><description></description></rule></group>"#,
            CheckId::DscPresence,
        );
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn whitespace_only_description_satisfies_presence() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><description> </description></rule></group>"#,
            CheckId::DscPresence,
        );
        assert!(msgs.is_empty());
    }

    // ── DET-01 ───────────────────────────────────────────────────────────────

    #[test]
    fn rule_without_detection_logic_is_an_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><description>x</description></rule></group>"#,
            CheckId::DetPresence,
        );
        assert_eq!(
            msgs,
            vec!["Rule 100001: No detection logic found (field, regex, match, etc.)"]
        );
    }

    #[test]
    fn each_detection_element_satisfies_the_check() {
        for elem in ["field", "regex", "match", "if_sid", "if_group"] {
            let xml = format!(
                r#"<group><rule id="100001" level="5"><{elem}>x</{elem}></rule></group>"#
            );
            let msgs = check_messages(&xml, CheckId::DetPresence);
            assert!(msgs.is_empty(), "element {elem} should count as detection");
        }
    }

    // ── MTR-02 / MTR-03 ──────────────────────────────────────────────────────

    #[test]
    fn mitre_block_without_technique_id_is_an_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><mitre></mitre></rule></group>"#,
            CheckId::MtrTechniqueId,
        );
        assert_eq!(msgs, vec!["Rule 100001: MITRE mapping missing technique ID"]);
    }

    #[test]
    fn invalid_technique_id_format_is_an_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><mitre><id>TA1059</id></mitre></rule></group>"#,
            CheckId::MtrTechniqueFormat,
        );
        assert_eq!(
            msgs,
            vec!["Rule 100001: Invalid MITRE technique ID format: TA1059"]
        );
    }

    #[test]
    fn short_technique_number_fails_format() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><mitre><id>T105</id></mitre></rule></group>"#,
            CheckId::MtrTechniqueFormat,
        );
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn valid_technique_ids_pass_format() {
        let msgs = check_messages(
            r#"<group>
                 <rule id="100001" level="5"><mitre><id>T1059</id></mitre></rule>
                 <rule id="100002" level="5"><mitre><id>T1059.001</id></mitre></rule>
               </group>"#,
            CheckId::MtrTechniqueFormat,
        );
        assert!(msgs.is_empty());
    }

    // ── PAT-01 ───────────────────────────────────────────────────────────────

    #[test]
    fn unclosed_group_in_regex_is_an_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><regex>(unclosed</regex></rule></group>"#,
            CheckId::PatRegexSyntax,
        );
        assert_eq!(msgs.len(), 1);
        assert!(
            msgs[0].starts_with("Rule 100001: Invalid regex pattern:"),
            "message: {}",
            msgs[0]
        );
    }

    #[test]
    fn valid_regex_produces_no_error() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><regex>^powershell\.exe</regex></rule></group>"#,
            CheckId::PatRegexSyntax,
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn every_bad_pattern_in_a_rule_is_reported() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5">
                 <regex>(one</regex>
                 <regex>[two</regex>
               </rule></group>"#,
            CheckId::PatRegexSyntax,
        );
        assert_eq!(msgs.len(), 2);
    }
}
