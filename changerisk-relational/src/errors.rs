//! Relational-layer errors. Mirrors the teacher's `StorageError`.

use changerisk_core::errors::{ErrorCode, RiskError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("database busy")]
    DbBusy,

    #[error("row not found: {what}")]
    NotFound { what: String },

    #[error("dual-write ordering violated: {what}")]
    OrderingViolation { what: String },
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "STORAGE_SQLITE_ERROR",
            Self::MigrationFailed { .. } => "STORAGE_MIGRATION_FAILED",
            Self::DbBusy => "STORAGE_DB_BUSY",
            Self::NotFound { .. } => "STORAGE_NOT_FOUND",
            Self::OrderingViolation { .. } => "STORAGE_ORDERING_VIOLATION",
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                Self::DbBusy
            }
            other => Self::Sqlite {
                message: other.to_string(),
            },
        }
    }
}

impl From<StorageError> for RiskError {
    fn from(e: StorageError) -> Self {
        match &e {
            StorageError::DbBusy => RiskError::BackendUnavailable {
                backend: "relational",
                reason: e.to_string(),
            },
            _ => RiskError::Query(e.to_string()),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
