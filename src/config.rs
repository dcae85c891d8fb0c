//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.impactboard.toml` files.

use crate::cli::{Args, OutputFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".impactboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Dashboard report settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Default dashboard output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Report store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Seed the store with the bundled sample reports.
    #[serde(default = "default_true")]
    pub sample_data: bool,

    /// JSON file of reports to seed from instead of the samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sample_data: true,
            seed_file: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

/// Dashboard report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Include the per-organization table in markdown output.
    #[serde(default = "default_true")]
    pub include_breakdown: bool,

    /// Symbol printed before fund amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            include_breakdown: true,
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.impactboard.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref seed) = args.seed {
            self.store.seed_file = Some(seed.clone());
        }
        if args.no_sample_data {
            self.store.sample_data = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Command;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.store.sample_data);
        assert!(config.store.seed_file.is_none());
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert_eq!(config.dashboard.currency_symbol, "₹");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true
format = "json"

[store]
sample_data = false
seed_file = "data/reports.json"

[server]
bind = "0.0.0.0:8080"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.general.format, OutputFormat::Json);
        assert!(!config.store.sample_data);
        assert_eq!(
            config.store.seed_file,
            Some(PathBuf::from("data/reports.json"))
        );
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(config.dashboard.include_breakdown);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[dashboard]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).unwrap().is_none());

        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[dashboard]\ncurrency_symbol = \"Rs.\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.dashboard.currency_symbol, "Rs.");
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[store\nsample_data = yes").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let args = Args {
            config: None,
            verbose: true,
            quiet: false,
            seed: Some(PathBuf::from("seed.json")),
            no_sample_data: true,
            command: Command::InitConfig,
        };

        let mut config = Config::default();
        config.merge_with_args(&args);

        assert!(config.general.verbose);
        assert!(!config.store.sample_data);
        assert_eq!(config.store.seed_file, Some(PathBuf::from("seed.json")));
    }
}
