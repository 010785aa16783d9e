//! Service configuration.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

/// Which table backend the service stores its data in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Process memory; data is lost on restart.
    Memory,
    /// A Google Sheets spreadsheet.
    Sheets,
    /// A local `RocksDB` database under `data_dir`.
    Rocksdb,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sheets" => Ok(Self::Sheets),
            "rocksdb" => Ok(Self::Rocksdb),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Configuration errors detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `STORE_BACKEND` names no known backend.
    #[error("unknown store backend: {0:?} (expected memory, sheets or rocksdb)")]
    UnknownBackend(String),

    /// A setting required by the selected backend is absent.
    #[error("missing setting: {0}")]
    Missing(&'static str),

    /// The backend is known but not compiled into this binary.
    #[error("store backend {0:?} is not available in this build")]
    Unavailable(&'static str),
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:5000").
    pub listen_addr: String,

    /// Raw `STORE_BACKEND` value (default: "memory").
    pub store_backend: String,

    /// Path to the `RocksDB` data directory (default: "data/lms").
    pub data_dir: String,

    /// Sheets API base URL.
    pub sheets_api_url: String,

    /// Spreadsheet holding the tables (sheets backend only).
    pub sheets_spreadsheet_id: Option<String>,

    /// OAuth access token for the Sheets API (sheets backend only).
    pub sheets_access_token: Option<String>,

    /// Directory uploaded media is written to and served from.
    pub upload_dir: String,

    /// Insert the default owner and sample questions into empty tables.
    pub seed_defaults: bool,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes. Media arrives base64 encoded in
    /// JSON bodies, so this is far above a typical API limit.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Sheets secrets file structure.
#[derive(Debug, Deserialize)]
struct SheetsSecrets {
    spreadsheet_id: String,
    access_token: String,
    #[serde(default)]
    api_url: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let (sheets_api_url, sheets_spreadsheet_id, sheets_access_token) = load_sheets_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            store_backend: std::env::var("STORE_BACKEND").unwrap_or(defaults.store_backend),
            data_dir: std::env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            sheets_api_url: sheets_api_url.unwrap_or(defaults.sheets_api_url),
            sheets_spreadsheet_id,
            sheets_access_token,
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            seed_defaults: std::env::var("SEED_DEFAULTS")
                .ok()
                .map_or(defaults.seed_defaults, |v| parse_flag(&v)),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// The selected backend.
    ///
    /// # Errors
    ///
    /// Returns an error if `store_backend` names no known backend.
    pub fn backend_kind(&self) -> Result<BackendKind, ConfigError> {
        self.store_backend.parse()
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Load Sheets settings from file or environment.
fn load_sheets_secrets() -> (Option<String>, Option<String>, Option<String>) {
    let secret_paths = [".secrets/sheets.json", "../.secrets/sheets.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<SheetsSecrets>(path) {
            tracing::info!(path = %path, "Loaded Sheets secrets from file");
            return (
                secrets
                    .api_url
                    .or_else(|| std::env::var("SHEETS_API_URL").ok()),
                Some(secrets.spreadsheet_id),
                Some(secrets.access_token),
            );
        }
    }

    tracing::debug!("Sheets secrets file not found, using environment variables");
    (
        std::env::var("SHEETS_API_URL").ok(),
        std::env::var("SHEETS_SPREADSHEET_ID").ok(),
        std::env::var("SHEETS_ACCESS_TOKEN").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".into(),
            store_backend: "memory".into(),
            data_dir: "data/lms".into(),
            sheets_api_url: lms_store::sheets::DEFAULT_API_URL.into(),
            sheets_spreadsheet_id: None,
            sheets_access_token: None,
            upload_dir: "uploads".into(),
            seed_defaults: true,
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
