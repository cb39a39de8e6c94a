//! Graph-layer errors. Mirrors the teacher's `StorageError`/`ErrorCode` split.

use changerisk_core::errors::{ErrorCode, RiskError};

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph backend unavailable: {reason}")]
    BackendUnavailable { reason: String },

    #[error("graph query failed: {detail}")]
    QueryError { detail: String },

    #[error("constraint violation: {what}")]
    ConstraintViolation { what: String },

    #[error("node not found: {id}")]
    NotFound { id: String },
}

impl ErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BackendUnavailable { .. } => "GRAPH_BACKEND_UNAVAILABLE",
            Self::QueryError { .. } => "GRAPH_QUERY_ERROR",
            Self::ConstraintViolation { .. } => "GRAPH_CONSTRAINT_VIOLATION",
            Self::NotFound { .. } => "GRAPH_NOT_FOUND",
        }
    }
}

impl From<GraphError> for RiskError {
    fn from(e: GraphError) -> Self {
        match &e {
            GraphError::BackendUnavailable { reason } => RiskError::BackendUnavailable {
                backend: "graph",
                reason: reason.clone(),
            },
            GraphError::ConstraintViolation { what } => RiskError::ConstraintViolation(what.clone()),
            _ => RiskError::Query(e.to_string()),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
