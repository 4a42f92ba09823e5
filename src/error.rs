use thiserror::Error;

use matchvault_shared::traits::StoreError;
use matchvault_sync::SyncError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid Riot ID '{0}': expected Name#Tag")]
    InvalidRiotId(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Database error: {0}")]
    Database(#[from] matchvault_db::rusqlite::Error),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Match {0} is not stored")]
    MatchNotStored(String),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}
