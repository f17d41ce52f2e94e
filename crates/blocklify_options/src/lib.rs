//! blocklify_options: Parser, importer and generator options.
//!
//! Options are plain serde structs so a whole pipeline can be configured
//! from one camelCase JSON document:
//!
//! ```json
//! { "parser": { "ecmaVersion": 3 }, "importer": { "strategy": "atomic" } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ECMAScript edition to parse. Affects reserved words and strict mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum EcmaVersion {
    V3,
    #[default]
    V5,
}

impl TryFrom<u32> for EcmaVersion {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(EcmaVersion::V3),
            5 => Ok(EcmaVersion::V5),
            other => Err(format!("unsupported ecmaVersion {}, expected 3 or 5", other)),
        }
    }
}

impl From<EcmaVersion> for u32 {
    fn from(version: EcmaVersion) -> u32 {
        match version {
            EcmaVersion::V3 => 3,
            EcmaVersion::V5 => 5,
        }
    }
}

/// Options controlling the scanner and parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    pub ecma_version: EcmaVersion,
    /// Require explicit semicolons; disables automatic insertion.
    pub strict_semicolons: bool,
    /// Accept a trailing comma in array and object literals.
    pub allow_trailing_commas: bool,
    /// Reject the edition's future reserved words as identifiers.
    pub forbid_reserved: bool,
    /// Attach line/column locations to every node.
    pub locations: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            ecma_version: EcmaVersion::V5,
            strict_semicolons: false,
            allow_trailing_commas: true,
            forbid_reserved: false,
            locations: false,
        }
    }
}

/// How the importer maps AST nodes to blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStrategy {
    /// One block type per node kind.
    Atomic,
    /// Recognizers only; unmatched nodes become placeholders.
    Pattern,
    /// Recognizers first, falling back to the atomic mapping per node.
    #[default]
    Mixed,
}

impl fmt::Display for ImportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStrategy::Atomic => write!(f, "atomic"),
            ImportStrategy::Pattern => write!(f, "pattern"),
            ImportStrategy::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for ImportStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atomic" => Ok(ImportStrategy::Atomic),
            "pattern" => Ok(ImportStrategy::Pattern),
            "mixed" => Ok(ImportStrategy::Mixed),
            other => Err(format!(
                "unknown strategy '{}', expected atomic, pattern or mixed",
                other
            )),
        }
    }
}

/// Options controlling the importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportOptions {
    pub strategy: ImportStrategy,
    /// Node kinds that force `inline="false"` on the block holding them.
    pub no_inline_kinds: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            strategy: ImportStrategy::Mixed,
            no_inline_kinds: vec![
                "FunctionExpression".to_string(),
                "ObjectExpression".to_string(),
            ],
        }
    }
}

impl ImportOptions {
    pub fn with_strategy(strategy: ImportStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn is_no_inline(&self, kind: &str) -> bool {
        self.no_inline_kinds.iter().any(|k| k == kind)
    }
}

/// Options controlling code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// One level of statement indentation.
    pub indent: String,
    /// Name used in "does not know how to generate" errors.
    pub language_name: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            language_name: "JavaScript".to_string(),
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlocklifyConfig {
    pub parser: ParserOptions,
    pub importer: ImportOptions,
    pub generator: GeneratorOptions,
}

/// Parse a configuration document from a string.
pub fn parse_config(content: &str) -> Result<BlocklifyConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Parse a configuration document from a path.
pub fn parse_config_file(path: &str) -> Result<BlocklifyConfig, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BlocklifyConfig::default();
        assert_eq!(config.parser.ecma_version, EcmaVersion::V5);
        assert!(config.parser.allow_trailing_commas);
        assert!(!config.parser.strict_semicolons);
        assert_eq!(config.importer.strategy, ImportStrategy::Mixed);
        assert!(config.importer.is_no_inline("ObjectExpression"));
        assert_eq!(config.generator.indent, "  ");
    }

    #[test]
    fn test_parse_config_partial() {
        let config = parse_config(
            r#"{ "parser": { "ecmaVersion": 3, "forbidReserved": true }, "importer": { "strategy": "atomic" } }"#,
        )
        .unwrap();
        assert_eq!(config.parser.ecma_version, EcmaVersion::V3);
        assert!(config.parser.forbid_reserved);
        assert!(config.parser.allow_trailing_commas);
        assert_eq!(config.importer.strategy, ImportStrategy::Atomic);
        assert_eq!(config.generator.language_name, "JavaScript");
    }

    #[test]
    fn test_parse_config_rejects_unknown_version() {
        let err = parse_config(r#"{ "parser": { "ecmaVersion": 6 } }"#).unwrap_err();
        assert!(err.to_string().contains("ecmaVersion 6"));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("pattern".parse::<ImportStrategy>(), Ok(ImportStrategy::Pattern));
        assert!("fancy".parse::<ImportStrategy>().is_err());
        assert_eq!(ImportStrategy::Mixed.to_string(), "mixed");
    }

    #[test]
    fn test_config_serializes_camel_case() {
        let json = serde_json::to_string(&ParserOptions::default()).unwrap();
        assert!(json.contains("\"ecmaVersion\":5"));
        assert!(json.contains("\"allowTrailingCommas\":true"));
    }
}
