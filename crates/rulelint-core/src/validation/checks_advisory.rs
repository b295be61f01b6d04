//! Advisory checks: best-practice deviations that warn but never block.
//!
//! Each check is a stateless struct implementing
//! [`crate::validation::RuleCheck`] and producing
//! [`crate::validation::Severity::Warning`] diagnostics. Entries without an
//! `id` attribute are skipped, same as in the structural battery.
//!
//! Checks are registered in [`crate::validation::build_registry`].

use crate::document::RuleFile;
use crate::vocab;

use super::{CheckId, Diagnostic, RuleCheck, Severity};

// ---------------------------------------------------------------------------
// RUL-04: custom id range
// ---------------------------------------------------------------------------

/// RUL-04 — The integer id falls in the range reserved for custom rules,
/// 100000-199999. Ids outside it collide with vendor-shipped rule space;
/// permitted, but discouraged.
pub struct RulIdRange;

impl RuleCheck for RulIdRange {
    fn id(&self) -> CheckId {
        CheckId::RulIdRange
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let Ok(id_int) = id.parse::<i64>() else {
                continue;
            };
            if !(100_000..=199_999).contains(&id_int) {
                diags.push(Diagnostic::new(
                    CheckId::RulIdRange,
                    Severity::Warning,
                    format!("Rule {id}: ID outside recommended custom range (100000-199999)"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MTR-01: mapping presence
// ---------------------------------------------------------------------------

/// MTR-01 — The rule carries a `mitre` mapping block. Mapping every rule to
/// ATT&CK is best practice, not mandatory.
pub struct MtrPresence;

impl RuleCheck for MtrPresence {
    fn id(&self) -> CheckId {
        CheckId::MtrPresence
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            if entry.mitre.is_none() {
                diags.push(Diagnostic::new(
                    CheckId::MtrPresence,
                    Severity::Warning,
                    format!("Rule {id}: No MITRE ATT&CK mapping"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MTR-04: tactic tagging
// ---------------------------------------------------------------------------

/// MTR-04 — A rule that maps a technique should also tag its tactic in the
/// `group` list (an `attack.`-prefixed token naming one of the 14 tactics).
///
/// Runs only for rules whose `mitre` block carries a technique id; without
/// one the mapping itself is already flagged. Produces one warning when no
/// `attack.` token names a tactic, and one when the rule has no `group` tag
/// list at all.
pub struct MtrTacticTag;

impl RuleCheck for MtrTacticTag {
    fn id(&self) -> CheckId {
        CheckId::MtrTacticTag
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let has_technique = entry
                .mitre
                .as_ref()
                .and_then(|m| m.technique_id.as_deref())
                .is_some_and(|t| !t.is_empty());
            if !has_technique {
                continue;
            }

            match entry.group_tags.as_deref().filter(|t| !t.is_empty()) {
                Some(tags) => {
                    let has_tactic = tags
                        .split(',')
                        .map(str::trim)
                        .filter_map(|t| t.strip_prefix("attack."))
                        .any(vocab::is_valid_tactic);
                    if !has_tactic {
                        diags.push(Diagnostic::new(
                            CheckId::MtrTacticTag,
                            Severity::Warning,
                            format!("Rule {id}: No MITRE tactic in group tags"),
                        ));
                    }
                }
                None => {
                    diags.push(Diagnostic::new(
                        CheckId::MtrTacticTag,
                        Severity::Warning,
                        format!("Rule {id}: No group tags defined"),
                    ));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DSC-02: description length
// ---------------------------------------------------------------------------

/// DSC-02 — The trimmed description is at least 20 characters. Shorter texts
/// rarely tell a responder anything.
pub struct DscLength;

impl RuleCheck for DscLength {
    fn id(&self) -> CheckId {
        CheckId::DscLength
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let Some(desc) = entry.description.as_deref().filter(|d| !d.is_empty()) else {
                continue;
            };
            if desc.trim().chars().count() < 20 {
                diags.push(Diagnostic::new(
                    CheckId::DscLength,
                    Severity::Warning,
                    format!("Rule {id}: Description too short (<20 chars)"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DSC-03: description context
// ---------------------------------------------------------------------------

/// DSC-03 — The description contains at least one context phrase
/// ("suspicious", "detected", "found", "activity"). A heuristic separating
/// contextual descriptions from generic boilerplate.
pub struct DscContext;

impl RuleCheck for DscContext {
    fn id(&self) -> CheckId {
        CheckId::DscContext
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            let Some(desc) = entry.description.as_deref().filter(|d| !d.is_empty()) else {
                continue;
            };
            if !vocab::has_context_phrase(desc.trim()) {
                diags.push(Diagnostic::new(
                    CheckId::DscContext,
                    Severity::Warning,
                    format!("Rule {id}: Description may lack context"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PAT-02: PCRE2 parenthesis balance
// ---------------------------------------------------------------------------

/// PAT-02 — Every nested `pcre2` pattern has matching counts of `(` and `)`.
///
/// A coarse syntactic heuristic, not a PCRE2 parse: balanced-but-invalid
/// patterns pass, and patterns with escaped literal parentheses are flagged.
/// Preserved as-is; the compatibility target is the heuristic, not a real
/// PCRE2 validator.
pub struct PatPcre2Balance;

impl RuleCheck for PatPcre2Balance {
    fn id(&self) -> CheckId {
        CheckId::PatPcre2Balance
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            for pattern in &entry.pcre2_patterns {
                let open = pattern.matches('(').count();
                let close = pattern.matches(')').count();
                if open != close {
                    diags.push(Diagnostic::new(
                        CheckId::PatPcre2Balance,
                        Severity::Warning,
                        format!("Rule {id}: Unbalanced parentheses in PCRE2 pattern"),
                    ));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PAT-03: field name sanity
// ---------------------------------------------------------------------------

/// PAT-03 — Every nested `field` element's `name` attribute starts with a
/// recognised decoder prefix. Catches typos; custom decoders are allowed and
/// simply warn.
pub struct PatFieldName;

impl RuleCheck for PatFieldName {
    fn id(&self) -> CheckId {
        CheckId::PatFieldName
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &RuleFile, diags: &mut Vec<Diagnostic>) {
        for entry in &file.rules {
            let Some(id) = entry.id.as_deref() else {
                continue;
            };
            for name in &entry.field_names {
                if !vocab::is_known_field_prefix(name) {
                    diags.push(Diagnostic::new(
                        CheckId::PatFieldName,
                        Severity::Warning,
                        format!("Rule {id}: Unusual field name: {name}"),
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
    use crate::validation::{CheckId, Severity, validate};

    fn check_messages(xml: &str, check: CheckId) -> Vec<String> {
        let file = parse_rules(xml).expect("parse");
        let report = validate(&file);
        report
            .by_check(check)
            .map(|d| d.message.clone())
            .collect()
    }

    // ── RUL-04 ───────────────────────────────────────────────────────────────

    #[test]
    fn vendor_range_id_warns() {
        let msgs = check_messages(
            r#"<group><rule id="60009" level="5"/></group>"#,
            CheckId::RulIdRange,
        );
        assert_eq!(
            msgs,
            vec!["Rule 60009: ID outside recommended custom range (100000-199999)"]
        );
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        let msgs = check_messages(
            r#"<group>
                 <rule id="100000" level="5"/>
                 <rule id="199999" level="5"/>
               </group>"#,
            CheckId::RulIdRange,
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn id_just_past_the_range_warns() {
        let msgs = check_messages(
            r#"<group><rule id="200000" level="5"/></group>"#,
            CheckId::RulIdRange,
        );
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn range_warning_is_a_warning_not_an_error() {
        let file =
            parse_rules(r#"<group><rule id="60009" level="5"/></group>"#).expect("parse");
        let report = validate(&file);
        let diag = report
            .by_check(CheckId::RulIdRange)
            .next()
            .expect("diagnostic");
        assert_eq!(diag.severity, Severity::Warning);
    }

    // ── MTR-01 ───────────────────────────────────────────────────────────────

    #[test]
    fn missing_mitre_block_warns() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"/></group>"#,
            CheckId::MtrPresence,
        );
        assert_eq!(msgs, vec!["Rule 100001: No MITRE ATT&CK mapping"]);
    }

    // ── MTR-04 ───────────────────────────────────────────────────────────────

    #[test]
    fn tactic_tag_present_is_clean() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5">
                 <mitre><id>T1059.001</id></mitre>
                 <group>attack.execution,pci_dss_10.6.1</group>
               </rule></group>"#,
            CheckId::MtrTacticTag,
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn no_tactic_among_group_tags_warns() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5">
                 <mitre><id>T1059.001</id></mitre>
                 <group>pci_dss_10.6.1,gdpr_IV_35.7.d</group>
               </rule></group>"#,
            CheckId::MtrTacticTag,
        );
        assert_eq!(msgs, vec!["Rule 100001: No MITRE tactic in group tags"]);
    }

    #[test]
    fn attack_prefix_with_unknown_tactic_warns() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5">
                 <mitre><id>T1059.001</id></mitre>
                 <group>attack.exeggution</group>
               </rule></group>"#,
            CheckId::MtrTacticTag,
        );
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn missing_group_tags_warns_differently() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5">
                 <mitre><id>T1059.001</id></mitre>
               </rule></group>"#,
            CheckId::MtrTacticTag,
        );
        assert_eq!(msgs, vec!["Rule 100001: No group tags defined"]);
    }

    #[test]
    fn tactic_check_skipped_without_technique_id() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><mitre></mitre></rule></group>"#,
            CheckId::MtrTacticTag,
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn tactic_tokens_are_trimmed_before_lookup() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5">
                 <mitre><id>T1047</id></mitre>
                 <group>pci_dss_10.6.1, attack.execution</group>
               </rule></group>"#,
            CheckId::MtrTacticTag,
        );
        assert!(msgs.is_empty());
    }

    // ── DSC-02 / DSC-03 ──────────────────────────────────────────────────────

    #[test]
    fn short_description_warns() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><description>Too short</description></rule></group>"#,
            CheckId::DscLength,
        );
        assert_eq!(msgs, vec!["Rule 100001: Description too short (<20 chars)"]);
    }

    #[test]
    fn twenty_character_description_passes_length() {
        // Exactly 20 characters after trimming.
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><description>suspicious activity!</description></rule></group>"#,
            CheckId::DscLength,
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn generic_description_warns_on_context() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><description>Windows event number twelve fired</description></rule></group>"#,
            CheckId::DscContext,
        );
        assert_eq!(msgs, vec!["Rule 100001: Description may lack context"]);
    }

    #[test]
    fn context_phrase_satisfies_the_check() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><description>Suspicious PowerShell spawned from Office</description></rule></group>"#,
            CheckId::DscContext,
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn description_quality_checks_skip_missing_description() {
        // DSC-01 already errors; the advisory checks stay silent.
        let file =
            parse_rules(r#"<group><rule id="100001" level="5"/></group>"#).expect("parse");
        let report = validate(&file);
        assert_eq!(report.by_check(CheckId::DscLength).count(), 0);
        assert_eq!(report.by_check(CheckId::DscContext).count(), 0);
    }

    // ── PAT-02 ───────────────────────────────────────────────────────────────

    #[test]
    fn unbalanced_pcre2_parens_warn() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><pcre2>(?i)cmd\.exe /c (</pcre2></rule></group>"#,
            CheckId::PatPcre2Balance,
        );
        assert_eq!(
            msgs,
            vec!["Rule 100001: Unbalanced parentheses in PCRE2 pattern"]
        );
    }

    #[test]
    fn balanced_pcre2_parens_pass() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><pcre2>(?i)(cmd|powershell)</pcre2></rule></group>"#,
            CheckId::PatPcre2Balance,
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn escaped_literal_paren_still_warns() {
        // Counting parens, not parsing: the escaped literal trips the
        // heuristic. Accepted behaviour.
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><pcre2>\(lsass</pcre2></rule></group>"#,
            CheckId::PatPcre2Balance,
        );
        assert_eq!(msgs.len(), 1);
    }

    // ── PAT-03 ───────────────────────────────────────────────────────────────

    #[test]
    fn unknown_field_prefix_warns() {
        let msgs = check_messages(
            r#"<group><rule id="100001" level="5"><field name="data.custom.thing">x</field></rule></group>"#,
            CheckId::PatFieldName,
        );
        assert_eq!(
            msgs,
            vec!["Rule 100001: Unusual field name: data.custom.thing"]
        );
    }

    #[test]
    fn every_known_prefix_passes() {
        for name in [
            "data.win.eventdata.Image",
            "data.win.system.EventID",
            "data.audit.command",
            "syscheck.path",
            "predecoder.program_name",
        ] {
            let xml = format!(
                r#"<group><rule id="100001" level="5"><field name="{name}">x</field></rule></group>"#
            );
            let msgs = check_messages(&xml, CheckId::PatFieldName);
            assert!(msgs.is_empty(), "prefix of {name} should be recognised");
        }
    }
}
