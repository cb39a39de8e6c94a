//! Shared error kinds for the change-risk engine (spec §7).
//!
//! Every leaf crate's error enum implements [`ErrorCode`] and converts into
//! [`RiskError`] via `#[from]`, mirroring the teacher's `DriftErrorCode`
//! pattern: leaf errors carry their own variants and codes, the top-level
//! enum just routes.

/// A stable, human-greppable identifier for an error variant.
///
/// Distinct from `Display` (the message): the code is for dashboards/alerts,
/// the message is for humans reading a single failure.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

pub type RiskResult<T> = Result<T, RiskError>;

/// Top-level error enum. Orchestrator-facing code matches on this; leaf
/// crates should generally return their own narrower error type and let
/// `#[from]` promote it here only at the boundary that needs to erase it.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("backend unavailable: {backend} — {reason}")]
    BackendUnavailable { backend: &'static str, reason: String },

    #[error("query failed: {0}")]
    Query(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("LLM call failed: {0}")]
    Llm(String),

    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("investigation produced zero hops: {0}")]
    Investigation(String),

    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl ErrorCode for RiskError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::BackendUnavailable { .. } => "BACKEND_UNAVAILABLE",
            Self::Query(_) => "QUERY_ERROR",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::Llm(_) => "LLM_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Investigation(_) => "INVESTIGATION_ERROR",
            Self::Cancelled(_) => "CANCELLED",
        }
    }
}

impl RiskError {
    /// True for errors that represent a per-file degradation rather than a
    /// fatal condition — the orchestrator downgrades instead of aborting.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable { .. }
                | Self::Query(_)
                | Self::ConstraintViolation(_)
                | Self::Llm(_)
                | Self::Parse { .. }
                | Self::Investigation(_)
        )
    }
}
