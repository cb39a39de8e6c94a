//! Adaptive config selector (C6): maps repository metadata to a named
//! threshold profile (spec §4.6).

use changerisk_core::types::{ProfileSelection, RepoMetadata, ThresholdProfile};

const PYTHON_WEB: ThresholdProfile = ThresholdProfile {
    name: "python_web",
    coupling_threshold: 8.0,
    co_change_threshold: 0.5,
    test_ratio_threshold: 0.4,
};

const GO_BACKEND: ThresholdProfile = ThresholdProfile {
    name: "go_backend",
    coupling_threshold: 12.0,
    co_change_threshold: 0.45,
    test_ratio_threshold: 0.5,
};

const TS_FRONTEND: ThresholdProfile = ThresholdProfile {
    name: "ts_frontend",
    coupling_threshold: 15.0,
    co_change_threshold: 0.4,
    test_ratio_threshold: 0.3,
};

const DEFAULT: ThresholdProfile = ThresholdProfile {
    name: "default",
    coupling_threshold: 10.0,
    co_change_threshold: 0.5,
    test_ratio_threshold: 0.4,
};

const PYTHON_WEB_DEPS: &[&str] = &["django", "flask", "fastapi"];
const GO_BACKEND_DEPS: &[&str] = &["gin", "echo", "fiber", "grpc-go"];
const TS_FRONTEND_DEPS: &[&str] = &["react", "vue", "angular", "next", "svelte"];

fn has_any(haystack: &[String], needles: &[&'static str]) -> Option<&'static str> {
    haystack
        .iter()
        .find_map(|dep| needles.iter().find(|n| dep.eq_ignore_ascii_case(n)).copied())
}

/// Keyword-driven selection: dependency manifest keys take precedence over
/// dominant language alone, since a `requirements.txt` with `django` is a
/// stronger signal than a generically Python-dominant repo.
pub fn select(metadata: &RepoMetadata) -> ProfileSelection {
    let lang = metadata.dominant_language.as_deref().unwrap_or("").to_lowercase();

    if let Some(dep) = has_any(&metadata.dependency_manifest_keys, PYTHON_WEB_DEPS) {
        return ProfileSelection {
            profile: PYTHON_WEB,
            reason: format!("dependency manifest contains `{dep}`, a Python web framework"),
        };
    }
    if let Some(dep) = has_any(&metadata.dependency_manifest_keys, GO_BACKEND_DEPS) {
        return ProfileSelection {
            profile: GO_BACKEND,
            reason: format!("dependency manifest contains `{dep}`, a Go backend framework"),
        };
    }
    if let Some(dep) = has_any(&metadata.dependency_manifest_keys, TS_FRONTEND_DEPS) {
        return ProfileSelection {
            profile: TS_FRONTEND,
            reason: format!("dependency manifest contains `{dep}`, a frontend framework"),
        };
    }

    match lang.as_str() {
        "python" => ProfileSelection {
            profile: PYTHON_WEB,
            reason: "dominant language is Python with no specific framework signal".into(),
        },
        "go" => ProfileSelection {
            profile: GO_BACKEND,
            reason: "dominant language is Go with no specific framework signal".into(),
        },
        "typescript" | "javascript" => ProfileSelection {
            profile: TS_FRONTEND,
            reason: "dominant language is TypeScript/JavaScript with no specific framework signal".into(),
        },
        _ => ProfileSelection {
            profile: DEFAULT,
            reason: "no recognized language or framework signal; using default thresholds".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn django_dependency_selects_python_web() {
        let metadata = RepoMetadata {
            dominant_language: Some("python".into()),
            dependency_manifest_keys: vec!["django".into(), "celery".into()],
            directory_topology: vec![],
        };
        assert_eq!(select(&metadata).profile.name, "python_web");
    }

    #[test]
    fn react_dependency_selects_ts_frontend_even_if_language_unset() {
        let metadata = RepoMetadata {
            dominant_language: None,
            dependency_manifest_keys: vec!["react".into()],
            directory_topology: vec![],
        };
        assert_eq!(select(&metadata).profile.name, "ts_frontend");
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let metadata = RepoMetadata {
            dominant_language: Some("cobol".into()),
            dependency_manifest_keys: vec![],
            directory_topology: vec![],
        };
        assert_eq!(select(&metadata).profile.name, "default");
    }

    #[test]
    fn same_metrics_classify_differently_under_different_profiles() {
        let py = select(&RepoMetadata {
            dominant_language: Some("python".into()),
            ..Default::default()
        });
        let go = select(&RepoMetadata {
            dominant_language: Some("go".into()),
            ..Default::default()
        });
        // coupling count of 10 is above python_web's threshold (8) but at
        // go_backend's (12) — same raw metric, different band.
        assert!(10.0 > py.profile.coupling_threshold);
        assert!(10.0 < go.profile.coupling_threshold);
    }
}
