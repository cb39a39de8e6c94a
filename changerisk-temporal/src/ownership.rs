//! Per-file ownership fact derivation (spec §4.3 step 5).

use changerisk_core::model::{OwnershipFacts, RepoId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One commit's touch of a file, for ownership purposes.
#[derive(Debug, Clone)]
pub struct Touch {
    pub author_email: String,
    pub authored_at: DateTime<Utc>,
}

/// `touches` must be ordered ascending by `authored_at`.
///
/// Current owner: the author with the most touches. Previous owner: the
/// author of the commit immediately before the trailing run of commits
/// authored by the current owner — i.e. whoever touched the file last
/// before the current owner's hold on it began. `days_since_handoff` is the
/// age of that transition.
pub fn derive(repo_id: RepoId, file_path: &str, touches: &[Touch], now: DateTime<Utc>) -> OwnershipFacts {
    if touches.is_empty() {
        return OwnershipFacts {
            repo_id,
            file_path: file_path.to_string(),
            current_owner: None,
            previous_owner: None,
            days_since_handoff: None,
        };
    }

    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut last_touch: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for t in touches {
        *counts.entry(t.author_email.as_str()).or_insert(0) += 1;
        last_touch
            .entry(t.author_email.as_str())
            .and_modify(|d| *d = (*d).max(t.authored_at))
            .or_insert(t.authored_at);
    }
    // Ties broken by whoever touched the file most recently.
    let current_owner = counts
        .iter()
        .max_by_key(|(email, &count)| (count, last_touch[*email]))
        .map(|(&email, _)| email.to_string())
        .unwrap_or_else(|| touches.last().unwrap().author_email.clone());

    // Walk backward to find the start of the trailing run owned by `current_owner`.
    let mut run_start = touches.len();
    for (i, t) in touches.iter().enumerate().rev() {
        if t.author_email == current_owner {
            run_start = i;
        } else {
            break;
        }
    }

    let (previous_owner, days_since_handoff) = if run_start > 0 {
        let handoff_point = &touches[run_start];
        let prior = &touches[run_start - 1];
        let days = (now - handoff_point.authored_at).num_days();
        (Some(prior.author_email.clone()), Some(days.max(0)))
    } else {
        (None, None)
    };

    OwnershipFacts {
        repo_id,
        file_path: file_path.to_string(),
        current_owner: Some(current_owner),
        previous_owner,
        days_since_handoff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn touch(email: &str, days_ago: i64) -> Touch {
        Touch {
            author_email: email.into(),
            authored_at: Utc::now() - chrono::Duration::days(days_ago),
        }
    }

    #[test]
    fn single_author_has_no_handoff() {
        let touches = vec![touch("a@x.com", 30), touch("a@x.com", 10)];
        let facts = derive(Uuid::new_v4(), "f.rs", &touches, Utc::now());
        assert_eq!(facts.current_owner.as_deref(), Some("a@x.com"));
        assert!(facts.previous_owner.is_none());
        assert!(facts.days_since_handoff.is_none());
    }

    #[test]
    fn handoff_is_detected_at_trailing_run_boundary() {
        let touches = vec![
            touch("old@x.com", 60),
            touch("old@x.com", 40),
            touch("new@x.com", 20),
            touch("new@x.com", 5),
        ];
        let facts = derive(Uuid::new_v4(), "f.rs", &touches, Utc::now());
        assert_eq!(facts.current_owner.as_deref(), Some("new@x.com"));
        assert_eq!(facts.previous_owner.as_deref(), Some("old@x.com"));
        assert!(facts.days_since_handoff.unwrap() >= 19);
    }

    #[test]
    fn empty_touches_yields_no_facts() {
        let facts = derive(Uuid::new_v4(), "f.rs", &[], Utc::now());
        assert!(facts.current_owner.is_none());
    }
}
