//! Parsed rule-file representation.
//!
//! [`RuleFile`] is the owned, in-memory model of one detection rule document.
//! Parsing happens once, up front, via [`parse_rules`]; the validation engine
//! in [`crate::validation`] only ever sees this model and never touches the
//! XML tree directly.
//!
//! # Shape
//!
//! The input is an XML document whose `group` elements contain `rule`
//! children:
//!
//! ```xml
//! <group name="windows,">
//!   <rule id="100050" level="7">
//!     <if_sid>60009</if_sid>
//!     <field name="data.win.eventdata.Image">\\powershell.exe</field>
//!     <description>Suspicious PowerShell spawned from Office</description>
//!     <mitre><id>T1059.001</id></mitre>
//!     <group>attack.execution,pci_dss_10.6.1</group>
//!   </rule>
//! </group>
//! ```
//!
//! Every `group` element anywhere in the tree is consulted, including the
//! document root when the root itself is a `group`. Rules are collected in
//! document order.
//!
//! # Raw fields
//!
//! All fields on [`RuleEntry`] are raw, unvalidated strings. A rule with a
//! non-numeric `id` or an out-of-range `level` parses fine; flagging those is
//! the validation engine's job, and keeping the raw text lets diagnostics
//! quote exactly what the author wrote.

use std::fmt;

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// A document-level parse failure: the input is not well-formed XML.
///
/// Parse errors prevent validation from running entirely; no partial
/// [`RuleFile`] is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable description of the failure, including the position
    /// information reported by the XML parser.
    pub message: String,
}

impl ParseError {
    /// Constructs a [`ParseError`] from a message string.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XML parsing error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<roxmltree::Error> for ParseError {
    fn from(e: roxmltree::Error) -> Self {
        Self::new(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// The MITRE ATT&CK mapping block of a rule (`<mitre><id>…</id></mitre>`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MitreMapping {
    /// Text of the `id` child, if present and non-empty.
    pub technique_id: Option<String>,
}

/// One `rule` element, flattened into the fields the check battery consults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleEntry {
    /// The `id` attribute, verbatim. `None` when the attribute is absent.
    pub id: Option<String>,
    /// The `level` attribute, verbatim.
    pub level: Option<String>,
    /// Text of the first `description` child. `None` when the element is
    /// absent or has no text at all; whitespace-only text is preserved.
    pub description: Option<String>,
    /// Text of the first direct `group` child, the comma-separated tag list
    /// (`attack.*` tags, compliance tags). Distinct from the containing
    /// `group` element.
    pub group_tags: Option<String>,
    /// The `<mitre>` block, when present.
    pub mitre: Option<MitreMapping>,
    /// Whether any detection element (`field`, `regex`, `match`, `if_sid`,
    /// `if_group`) exists as a direct child.
    pub has_detection: bool,
    /// Text of every nested `regex` element that has text.
    pub regex_patterns: Vec<String>,
    /// Text of every nested `pcre2` element that has text.
    pub pcre2_patterns: Vec<String>,
    /// The `name` attribute of every nested `field` element that has one.
    pub field_names: Vec<String>,
}

/// The parsed rule document: every rule from every `group`, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleFile {
    /// All rule entries found in the document.
    pub rules: Vec<RuleEntry>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Element names that count as detection logic when present as a direct child.
const DETECTION_ELEMENTS: &[&str] = &["field", "regex", "match", "if_sid", "if_group"];

/// Parses XML text into a [`RuleFile`].
///
/// Walks every `group` element in the tree (the root included, when the root
/// is itself a `group`) and flattens each `rule` child into a [`RuleEntry`].
/// Elements other than `group` and `rule` at the container level are ignored.
///
/// # Errors
///
/// Returns [`ParseError`] when the input is not well-formed XML. No partial
/// document is produced on failure.
pub fn parse_rules(content: &str) -> Result<RuleFile, ParseError> {
    let doc = roxmltree::Document::parse(content)?;

    let mut rules = Vec::new();
    for group in doc
        .descendants()
        .filter(|n| n.has_tag_name("group"))
    {
        for rule in group.children().filter(|n| n.has_tag_name("rule")) {
            rules.push(parse_rule(rule));
        }
    }

    Ok(RuleFile { rules })
}

/// Flattens one `rule` element into a [`RuleEntry`].
fn parse_rule(rule: roxmltree::Node<'_, '_>) -> RuleEntry {
    let id = rule.attribute("id").map(str::to_owned);
    let level = rule.attribute("level").map(str::to_owned);

    let description = first_child_text(rule, "description");
    let group_tags = first_child_text(rule, "group");

    let mitre = rule
        .children()
        .find(|n| n.has_tag_name("mitre"))
        .map(|m| MitreMapping {
            technique_id: first_child_text(m, "id"),
        });

    let has_detection = rule
        .children()
        .any(|n| n.is_element() && DETECTION_ELEMENTS.contains(&n.tag_name().name()));

    let mut regex_patterns = Vec::new();
    let mut pcre2_patterns = Vec::new();
    let mut field_names = Vec::new();
    for node in rule.descendants().filter(roxmltree::Node::is_element) {
        match node.tag_name().name() {
            "regex" => {
                if let Some(text) = node.text() {
                    if !text.is_empty() {
                        regex_patterns.push(text.to_owned());
                    }
                }
            }
            "pcre2" => {
                if let Some(text) = node.text() {
                    if !text.is_empty() {
                        pcre2_patterns.push(text.to_owned());
                    }
                }
            }
            "field" => {
                if let Some(name) = node.attribute("name") {
                    field_names.push(name.to_owned());
                }
            }
            _ => {}
        }
    }

    RuleEntry {
        id,
        level,
        description,
        group_tags,
        mitre,
        has_detection,
        regex_patterns,
        pcre2_patterns,
        field_names,
    }
}

/// Returns the text of the first direct child of `node` named `name`.
///
/// `None` when no such child exists or the child has no text node at all.
fn first_child_text(node: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
