use std::path::{Path, PathBuf};

use ddsuite_import::SheetProfile;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Injected configuration: every subcommand's input and output paths live
/// here, not on the command line.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub merge: MergeConfig,
    #[serde(rename = "match")]
    pub matching: MatchConfig,
    pub group: GroupConfig,
    pub calls: CallsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    pub output: PathBuf,
    pub sheets: Vec<MergeSheet>,
}

/// One source spreadsheet: where it lives plus how its columns map onto
/// the unified schema.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeSheet {
    pub path: PathBuf,
    #[serde(flatten)]
    pub profile: SheetProfile,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("DDS_COMBINED.csv"),
            sheets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub customers: PathBuf,
    pub transactions: PathBuf,
    pub output: PathBuf,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            customers: PathBuf::from("DDS_COMBINED.csv"),
            transactions: PathBuf::from("transactions.csv"),
            output: PathBuf::from("DDS_MATCHED.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("DDS_MATCHED.csv"),
            output: PathBuf::from("DDS_GROUPED_BY_CUSTOMER.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallsConfig {
    pub input: PathBuf,
    pub report: PathBuf,
    /// Extensions given a detailed section in the reports.
    pub focus: Vec<String>,
}

impl Default for CallsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("call-data.csv"),
            report: PathBuf::from("CALL_STATS_REPORT.html"),
            focus: vec!["1001".to_string(), "1002".to_string()],
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}
