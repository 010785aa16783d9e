//! Application state.

use std::sync::Arc;

use lms_store::{MemoryBackend, SheetsBackend, SheetsConfig, TableStore};

use crate::config::{BackendKind, ConfigError, ServiceConfig};
use crate::media::{LocalMediaStore, MediaStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The table store.
    pub store: TableStore,

    /// Where recordings are written.
    pub media: Arc<dyn MediaStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: TableStore, media: Arc<dyn MediaStore>, config: ServiceConfig) -> Self {
        Self {
            store,
            media,
            config,
        }
    }

    /// Build the state the configuration describes: the selected table
    /// backend plus local media under `upload_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unknown, unavailable in this
    /// build, missing settings, or fails to open.
    pub fn from_config(config: ServiceConfig) -> Result<Self, StartupError> {
        let store = open_store(&config)?;
        let media = Arc::new(LocalMediaStore::new(&config.upload_dir));
        Ok(Self::new(store, media, config))
    }
}

/// Errors raised while assembling the service.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend could not be opened.
    #[error("failed to open store: {0}")]
    Store(#[from] lms_store::StoreError),
}

/// Open the table backend selected by `STORE_BACKEND`.
///
/// # Errors
///
/// Returns an error if the backend is unknown, unavailable in this build,
/// missing settings, or fails to open.
pub fn open_store(config: &ServiceConfig) -> Result<TableStore, StartupError> {
    match config.backend_kind()? {
        BackendKind::Memory => {
            tracing::warn!("Using in-memory store - data is lost on restart");
            Ok(TableStore::new(MemoryBackend::new()))
        }
        BackendKind::Sheets => {
            let spreadsheet_id = config
                .sheets_spreadsheet_id
                .clone()
                .ok_or(ConfigError::Missing("SHEETS_SPREADSHEET_ID"))?;
            let access_token = config
                .sheets_access_token
                .clone()
                .ok_or(ConfigError::Missing("SHEETS_ACCESS_TOKEN"))?;

            tracing::info!(spreadsheet_id = %spreadsheet_id, "Using Google Sheets store");
            let sheets = SheetsConfig::new(spreadsheet_id, access_token)
                .with_api_url(&config.sheets_api_url);
            Ok(TableStore::new(SheetsBackend::new(sheets)?))
        }
        BackendKind::Rocksdb => open_rocks(config),
    }
}

#[cfg(feature = "rocksdb-backend")]
fn open_rocks(config: &ServiceConfig) -> Result<TableStore, StartupError> {
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    Ok(TableStore::new(lms_store::RocksBackend::open(&config.data_dir)?))
}

#[cfg(not(feature = "rocksdb-backend"))]
fn open_rocks(_config: &ServiceConfig) -> Result<TableStore, StartupError> {
    Err(ConfigError::Unavailable("rocksdb").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_requires_its_settings() {
        let config = ServiceConfig {
            store_backend: "sheets".into(),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            open_store(&config),
            Err(StartupError::Config(ConfigError::Missing("SHEETS_SPREADSHEET_ID")))
        ));
    }

    #[test]
    fn unknown_backends_fail_at_startup() {
        let config = ServiceConfig {
            store_backend: "excel".into(),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            open_store(&config),
            Err(StartupError::Config(ConfigError::UnknownBackend(_)))
        ));
    }

    #[test]
    fn memory_is_the_default() {
        let store = open_store(&ServiceConfig::default()).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }
}
