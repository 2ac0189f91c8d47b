//! Configuration file support
//!
//! Loads dump tool configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{DumpConfig, EntityTableConfig, LogFormat, OutputFormat};
use crate::error::{Result, VttError};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Output settings
    pub output: OutputSettings,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
    /// Character reference table settings
    pub entities: Option<EntitySettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Output format (text, json, tree)
    pub format: String,
    /// Remove duplicated lines from rolling captions
    pub deduplicate: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySettings {
    /// Named references JSON file
    pub named: PathBuf,
    /// Numeric substitutions JSON file
    pub substitutes: PathBuf,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| VttError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| VttError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            output: OutputSettings {
                format: "text".to_string(),
                deduplicate: Some(false),
            },
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
            entities: None,
        }
    }

    /// Convert to DumpConfig
    pub fn into_dump_config(self) -> Result<DumpConfig> {
        let output = self.output.format.parse::<OutputFormat>()?;
        let log_format = match self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(VttError::Config(format!("unknown log format: {}", other)))
            }
        };

        Ok(DumpConfig {
            deduplicate: self.output.deduplicate.unwrap_or(false),
            output,
            log_level: self
                .logging
                .map(|l| l.level)
                .unwrap_or_else(|| "info".to_string()),
            log_format,
            entities: self.entities.map(|e| EntityTableConfig {
                named: e.named,
                substitutes: e.substitutes,
            }),
        })
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default_config();
        assert_eq!(config.output.format, "text");
        assert_eq!(config.output.deduplicate, Some(false));
        assert!(config.entities.is_none());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = ConfigFile::default_config();

        let mut temp_file = NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&config).unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let loaded = ConfigFile::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.output.format, config.output.format);
        assert_eq!(
            loaded.logging.map(|l| l.level),
            config.logging.map(|l| l.level)
        );
    }

    #[test]
    fn test_into_dump_config() {
        let toml = r#"
            [output]
            format = "json"
            deduplicate = true

            [logging]
            level = "debug"
            format = "json"

            [entities]
            named = "refs/named.json"
            substitutes = "refs/substitutes.json"
        "#;
        let config_file: ConfigFile = toml::from_str(toml).unwrap();
        let config = config_file.into_dump_config().unwrap();

        assert!(config.deduplicate);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.entities.map(|e| e.named),
            Some(PathBuf::from("refs/named.json"))
        );
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config_file: ConfigFile = toml::from_str("[output]\nformat = \"tree\"\n").unwrap();
        let config = config_file.into_dump_config().unwrap();
        assert!(!config.deduplicate);
        assert_eq!(config.output, OutputFormat::Tree);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_bad_values_rejected() {
        let config_file: ConfigFile = toml::from_str("[output]\nformat = \"srt\"\n").unwrap();
        assert!(matches!(
            config_file.into_dump_config(),
            Err(VttError::Config(_))
        ));

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[output\nformat = ").unwrap();
        assert!(matches!(
            ConfigFile::from_file(temp_file.path()),
            Err(VttError::Config(_))
        ));
    }

    #[test]
    fn test_generate_default_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        generate_default_config(&path).unwrap();

        assert!(path.exists());
        let loaded = ConfigFile::from_file(&path).unwrap();
        assert_eq!(loaded.output.format, "text");
    }
}
