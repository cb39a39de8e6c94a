//! Phase 0 pre-analyzer (C5): syntactic triage from path + diff, no store
//! access, target latency <10ms per file (spec §4.5).

use std::sync::OnceLock;

use changerisk_core::types::{ModificationType, Phase0Decision, Phase0Result};
use regex::Regex;

/// A single file's proposed change, as handed to Phase 0.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: String,
    pub diff: String,
    pub language: Option<String>,
}

fn security_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)auth|crypto|credential|session|permission|acl|jwt|oauth|password|token|secret|key_").unwrap()
    })
}

fn security_diff_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)authenticate|authorize|verify_token|bypass|exploit").unwrap())
}

fn production_filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(^|/)\.env|\.prod\.|production|secrets").unwrap())
}

fn production_diff_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"environment\s*=\s*production").unwrap())
}

fn config_filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(ya?ml|json|toml|ini|cfg|conf)$|config").unwrap())
}

fn doc_filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(md|rst|txt)$").unwrap())
}

fn test_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(^|/)tests?/|_test\.|\.spec\.").unwrap())
}

fn import_hunk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[+-]\s*(import\s|use\s|from\s.+\simport\s)").unwrap())
}

/// A hunk line is "comment-only" if, after stripping the leading +/-, it is
/// blank or starts with a line-comment marker.
fn is_comment_or_blank_line(line: &str) -> bool {
    let stripped = line.trim_start_matches(['+', '-']).trim_start();
    stripped.is_empty() || stripped.starts_with("//") || stripped.starts_with('#') || stripped.starts_with('*')
}

fn diff_is_comment_only(diff: &str) -> bool {
    let hunk_lines: Vec<&str> = diff
        .lines()
        .filter(|l| l.starts_with('+') || l.starts_with('-'))
        .filter(|l| !l.starts_with("+++") && !l.starts_with("---"))
        .collect();
    !hunk_lines.is_empty() && hunk_lines.iter().all(|l| is_comment_or_blank_line(l))
}

/// Applies the ordered rule list (spec §4.5); first match wins.
pub fn classify(change: &FileChange) -> Phase0Result {
    if security_path_re().is_match(&change.path) || security_diff_re().is_match(&change.diff) {
        return Phase0Result {
            decision: Phase0Decision::ForceEscalate,
            modification_type: ModificationType::Security,
            pre_risk: 1.0,
            rationale: format!("path or diff matches security-sensitive pattern: {}", change.path),
        };
    }

    if production_filename_re().is_match(&change.path) || production_diff_re().is_match(&change.diff) {
        return Phase0Result {
            decision: Phase0Decision::ForceEscalate,
            modification_type: ModificationType::ProductionConfiguration,
            pre_risk: 0.85,
            rationale: format!("production configuration touched: {}", change.path),
        };
    }

    if config_filename_re().is_match(&change.path) {
        return Phase0Result {
            decision: Phase0Decision::Normal,
            modification_type: ModificationType::Configuration,
            pre_risk: 0.2,
            rationale: format!("non-production configuration file: {}", change.path),
        };
    }

    if doc_filename_re().is_match(&change.path) {
        return Phase0Result {
            decision: Phase0Decision::Skip,
            modification_type: ModificationType::Documentation,
            pre_risk: 0.1,
            rationale: format!("documentation-only file: {}", change.path),
        };
    }
    if diff_is_comment_only(&change.diff) {
        return Phase0Result {
            decision: Phase0Decision::Skip,
            modification_type: ModificationType::CommentOnly,
            pre_risk: 0.05,
            rationale: "every changed line is a comment or blank".into(),
        };
    }

    if test_path_re().is_match(&change.path) {
        return Phase0Result {
            decision: Phase0Decision::Normal,
            modification_type: ModificationType::TestOnly,
            pre_risk: 0.2,
            rationale: format!("test-only path: {}", change.path),
        };
    }

    if import_hunk_re().is_match(&change.diff) {
        return Phase0Result {
            decision: Phase0Decision::Normal,
            modification_type: ModificationType::Structural,
            pre_risk: 0.6,
            rationale: "diff adds or removes import/use declarations".into(),
        };
    }

    Phase0Result {
        decision: Phase0Decision::Normal,
        modification_type: ModificationType::Unknown,
        pre_risk: 0.0,
        rationale: "no Phase 0 rule matched; deferring to Phase 1".into(),
    }
}
