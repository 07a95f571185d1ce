//! Runtime configuration, assembled once at startup and passed into the
//! collaborators by reference. Nothing below this layer reads the
//! environment.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub google_sheets: SheetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token issued by BotFather.
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Id of the spreadsheet holding the ledger.
    pub spreadsheet_id: String,
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    #[serde(default = "default_token_cache")]
    pub token_cache: String,
    /// Ready-made access token; skips the OAuth flow when set.
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_credentials_path() -> String {
    "credentials.json".to_string()
}

fn default_token_cache() -> String {
    "tokens.json".to_string()
}

#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file does not exist or could not be read.
    MissingFile(String),
    /// The configuration file does not parse.
    Invalid(String),
    /// A required environment variable is not set.
    MissingVar(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingFile(path) => write!(f, "config file {path} not found"),
            ConfigError::Invalid(e) => write!(f, "invalid configuration: {e}"),
            ConfigError::MissingVar(name) => {
                write!(f, "environment variable {name} is not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Loads the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::MissingFile(path.display().to_string()))?;
        toml::from_str(&data).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Builds the configuration from the environment variables the bot has
    /// historically been deployed with.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required =
            |name: &'static str| std::env::var(name).map_err(|_| ConfigError::MissingVar(name));
        Ok(Self {
            telegram: TelegramConfig {
                token: required("TELEGRAM_TOKEN")?,
            },
            google_sheets: SheetsConfig {
                spreadsheet_id: required("SHEET_ID")?,
                credentials_path: std::env::var("GOOGLE_CREDENTIALS")
                    .unwrap_or_else(|_| default_credentials_path()),
                token_cache: std::env::var("SHEET_TOKEN_CACHE")
                    .unwrap_or_else(|_| default_token_cache()),
                access_token: std::env::var("SHEET_ACCESS_TOKEN").ok(),
            },
        })
    }
}
