//! WebVTT cue dump tool
//!
//! Parses a WebVTT file and prints its cues as plain text, JSON or markup
//! trees, optionally removing rolling caption duplicates first.

use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vtt_cues::config::{DumpConfig, LogFormat, OutputFormat};
use vtt_cues::config_file::{generate_default_config, ConfigFile};
use vtt_cues::{Result, VttError, WebVtt, WebVttParser};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "vtt-cues";

/// Config file looked up when none is given
const DEFAULT_CONFIG: &str = "vtt-cues.toml";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: {} <file.vtt> [config.toml]", APP_NAME);
        eprintln!("       {} --generate-config [config.toml]", APP_NAME);
        std::process::exit(2);
    };
    if input == "--generate-config" {
        let path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
        generate_default_config(&path)?;
        eprintln!("Wrote default configuration to {}", path);
        return Ok(());
    }
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    // Logging isn't up yet, so keep the load error until it is
    let (config, config_error) = load_config(&config_path);
    init_logging(&config);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Some(e) = config_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }
    tracing::debug!("Configuration loaded: {:?}", config);

    let vtt = parse_input(&input, &config)?;
    tracing::info!("{}: {} cues", input, vtt.cues.len());

    let vtt = if config.deduplicate {
        vtt.deduplicated()
    } else {
        vtt
    };

    print!("{}", format_output(&vtt, config.output)?);
    Ok(())
}

fn load_config(path: &str) -> (DumpConfig, Option<VttError>) {
    if !Path::new(path).exists() {
        return (DumpConfig::default(), None);
    }
    match ConfigFile::from_file(path).and_then(ConfigFile::into_dump_config) {
        Ok(config) => (config, None),
        Err(e) => (DumpConfig::default(), Some(e)),
    }
}

fn parse_input(path: &str, config: &DumpConfig) -> Result<WebVtt> {
    match &config.entities {
        Some(tables) => {
            let references = tables.load()?;
            tracing::debug!("loaded {} character references", references.len());
            let content = std::fs::read_to_string(path)?;
            WebVttParser::with_references(&content, &references).parse()
        }
        None => vtt_cues::parse_file(path),
    }
}

fn format_output(vtt: &WebVtt, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(vtt)?;
            out.push('\n');
        }
        OutputFormat::Text => {
            for cue in &vtt.cues {
                out.push_str(&format!("{}\n{}\n\n", cue.timing, cue.text()));
            }
        }
        OutputFormat::Tree => {
            for cue in &vtt.cues {
                out.push_str(&format!("{}\n{}\n\n", cue.timing, cue.content));
            }
        }
    }
    Ok(out)
}

/// Initialize logging with tracing
fn init_logging(config: &DumpConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WEBVTT\n\n00:01.000 --> 00:02.500\n<v Bob>Hi <b>there</b></v>\n";

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_text_output() {
        let vtt = WebVtt::parse(SAMPLE).unwrap();
        assert_eq!(
            format_output(&vtt, OutputFormat::Text).unwrap(),
            "00:00:01.000 --> 00:00:02.500\nBob: Hi there\n\n"
        );
    }

    #[test]
    fn test_tree_output() {
        let vtt = WebVtt::parse(SAMPLE).unwrap();
        let out = format_output(&vtt, OutputFormat::Tree).unwrap();
        assert!(out.starts_with("00:00:01.000 --> 00:00:02.500\n_[v("));
    }

    #[test]
    fn test_json_output() {
        let vtt = WebVtt::parse(SAMPLE).unwrap();
        let out = format_output(&vtt, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["cues"][0]["timing"]["start"], 1000);
    }

    #[test]
    fn test_generated_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vtt-cues.toml");
        generate_default_config(&path).unwrap();

        let (config, error) = load_config(path.to_str().unwrap());
        assert!(error.is_none());
        assert_eq!(config, DumpConfig::default());
    }

    #[test]
    fn test_bad_config_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vtt-cues.toml");
        std::fs::write(&path, "[output]\nformat = \"srt\"\n").unwrap();

        let (config, error) = load_config(path.to_str().unwrap());
        assert_eq!(config, DumpConfig::default());
        assert!(matches!(error, Some(VttError::Config(_))));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let (config, error) = load_config("/nonexistent/vtt-cues.toml");
        assert_eq!(config, DumpConfig::default());
        assert!(error.is_none());
    }
}
