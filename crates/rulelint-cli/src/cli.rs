//! Clap CLI definition for the `rulelint` binary.
use std::path::PathBuf;

use clap::Parser;

/// Default rules document, resolved relative to the working directory.
pub const DEFAULT_RULES_PATH: &str = "rules/custom_detection_rules.xml";

/// Root CLI struct for the `rulelint` binary.
///
/// The surface is deliberately one optional positional argument: the linter
/// is meant to run unattended in CI, where discovery and configuration belong
/// to the pipeline, not the tool.
#[derive(Parser)]
#[command(
    name = "rulelint",
    version,
    about = "Detection rule linter",
    long_about = "Statically validates Wazuh-style XML detection rules before deployment.\n\
                  Checks structure, rule ids and levels, description quality, MITRE\n\
                  ATT&CK mapping, and pattern syntax. Exits 0 when no errors were\n\
                  found (warnings are advisory), 1 otherwise."
)]
pub struct Cli {
    /// Path to the XML rules document.
    #[arg(value_name = "FILE", default_value = DEFAULT_RULES_PATH)]
    pub rules_file: PathBuf,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use clap::Parser as _;

    use super::*;

    #[test]
    fn no_argument_uses_the_default_path() {
        let cli = Cli::try_parse_from(["rulelint"]).expect("parse");
        assert_eq!(cli.rules_file, PathBuf::from(DEFAULT_RULES_PATH));
    }

    #[test]
    fn positional_argument_overrides_the_default() {
        let cli = Cli::try_parse_from(["rulelint", "custom/path.xml"]).expect("parse");
        assert_eq!(cli.rules_file, PathBuf::from("custom/path.xml"));
    }

    #[test]
    fn a_second_positional_is_rejected() {
        assert!(Cli::try_parse_from(["rulelint", "a.xml", "b.xml"]).is_err());
    }
}
