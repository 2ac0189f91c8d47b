//! Dump tool configuration

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::EntityTable;
use crate::error::{Result, VttError};

/// How parsed cues are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `start --> end` followed by the cue's plain text
    #[default]
    Text,
    /// The whole document as JSON
    Json,
    /// `start --> end` followed by the markup tree notation
    Tree,
}

impl FromStr for OutputFormat {
    type Err = VttError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "tree" => Ok(OutputFormat::Tree),
            other => Err(VttError::Config(format!("unknown output format: {}", other))),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Paths to character reference tables in the published JSON shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTableConfig {
    /// Named references, e.g. `[{"index": "amp", "codepoints": [38]}]`
    pub named: PathBuf,
    /// Numeric substitutions, e.g. `[{"index": 0, "codepoints": [65533]}]`
    pub substitutes: PathBuf,
}

impl EntityTableConfig {
    pub fn load(&self) -> Result<EntityTable> {
        let named = std::fs::read_to_string(&self.named)?;
        let substitutes = std::fs::read_to_string(&self.substitutes)?;
        EntityTable::from_json(&named, &substitutes)
    }
}

/// Dump tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Remove duplicated lines from rolling captions
    pub deduplicate: bool,

    /// Output format
    pub output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log format
    pub log_format: LogFormat,

    /// Character reference tables to use instead of the built-in one
    pub entities: Option<EntityTableConfig>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            deduplicate: false,
            output: OutputFormat::Text,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            entities: None,
        }
    }
}

impl DumpConfig {
    /// Default tracing filter directive
    pub fn log_filter(&self) -> String {
        format!("vtt_cues={}", self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DumpConfig::default();
        assert!(!config.deduplicate);
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.log_filter(), "vtt_cues=info");
        assert!(config.entities.is_none());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TREE".parse::<OutputFormat>().unwrap(), OutputFormat::Tree);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(VttError::Config(_))
        ));
    }

    #[test]
    fn test_entity_table_config_load() {
        let dir = tempfile::tempdir().unwrap();
        let named = dir.path().join("named.json");
        let substitutes = dir.path().join("substitutes.json");
        std::fs::write(&named, r#"[{"index": "heart", "codepoints": [9829]}]"#).unwrap();
        std::fs::write(&substitutes, r#"[{"index": 128, "codepoints": [8364]}]"#).unwrap();

        let table = EntityTableConfig { named, substitutes }.load().unwrap();
        assert_eq!(table.named("heart"), Some("\u{2665}"));
        assert_eq!(table.numeric(128), "\u{20AC}");
    }

    #[test]
    fn test_entity_table_config_missing_file() {
        let config = EntityTableConfig {
            named: PathBuf::from("/nonexistent/named.json"),
            substitutes: PathBuf::from("/nonexistent/substitutes.json"),
        };
        assert!(matches!(config.load(), Err(VttError::Io(_))));
    }
}
