//! Default thresholds and budgets, overridable via env vars (spec §6) or
//! config files. Kept as plain constants rather than a global config object —
//! callers read these once and pass explicit values down, per DESIGN.md's
//! "no ambient state" rule.

/// Phase 2 defaults.
pub const DEFAULT_MAX_HOPS: u32 = 5;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.85;
pub const DEFAULT_BREAKTHROUGH_THRESHOLD: f64 = 0.20;
pub const DEFAULT_TOKEN_BUDGET: u32 = 10_000;
pub const DEFAULT_PHASE2_TIMEOUT_SECS: u64 = 30;

/// Temporal analyzer defaults.
pub const DEFAULT_COMMIT_WINDOW_DAYS: u32 = 90;
pub const DEFAULT_COCHANGE_THRESHOLD: f64 = 0.3;
pub const DEFAULT_BULK_COMMIT_FILE_CAP: usize = 50;

/// Phase 1 metric weights (coupling 0.4, co-change 0.3, test gap 0.3).
pub const WEIGHT_COUPLING: f64 = 0.4;
pub const WEIGHT_COCHANGE: f64 = 0.3;
pub const WEIGHT_TEST_GAP: f64 = 0.3;

/// Result formatter limits.
pub const STANDARD_MAX_EVIDENCE_BULLETS: usize = 5;
pub const EXPLAIN_RESPONSE_TRUNCATE_CHARS: usize = 200;

/// Incident store.
pub const RECENT_TITLES_LIMIT: usize = 3;
pub const INCIDENT_STATS_WINDOW_DAYS: i64 = 30;

/// Env var names for runtime overrides (spec §6).
pub const ENV_MAX_HOPS: &str = "MAX_HOPS";
pub const ENV_CONFIDENCE_THRESHOLD: &str = "CONFIDENCE_THRESHOLD";
pub const ENV_TOKEN_BUDGET: &str = "TOKEN_BUDGET";
pub const ENV_PHASE2_TIMEOUT: &str = "PHASE2_TIMEOUT";
