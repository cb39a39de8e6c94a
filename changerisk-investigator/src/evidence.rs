//! Pre-hop evidence collection (spec §4.8): fans out once, concurrently, to
//! the temporal/incident/graph read paths. Grounded in the teacher's
//! `GroundingLoopRunner::collect_evidence` fast-path/slow-path shape — every
//! branch degrades to empty on failure rather than aborting the hop loop.

use std::sync::Arc;

use changerisk_core::model::{IncidentStats, RepoId};
use changerisk_core::types::TemporalCoupling;
use changerisk_graph::GraphAdapter;
use changerisk_incidents::IncidentStore;
use changerisk_relational::RelationalStore;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct PreHopEvidence {
    pub co_changed: Vec<TemporalCoupling>,
    pub incident_stats: IncidentStats,
    pub recent_incident_titles: Vec<String>,
    pub direct_neighbors_count: u32,
}

/// Runs the three lookups concurrently via `spawn_blocking` (the stores are
/// synchronous rusqlite/mutex-guarded calls) and awaits all of them — a
/// single failed branch just leaves its slice of the evidence empty.
pub async fn collect(
    relational: &Arc<RelationalStore>,
    incidents: &Arc<IncidentStore>,
    graph: &Arc<GraphAdapter>,
    repo_id: RepoId,
    file_path: &str,
) -> PreHopEvidence {
    let repo_id_str = repo_id.to_string();

    let cochange_fut = {
        let relational = Arc::clone(relational);
        let repo_id_str = repo_id_str.clone();
        let file_path = file_path.to_string();
        tokio::task::spawn_blocking(move || {
            relational.cochange_edges_for_file(&repo_id_str, &file_path)
        })
    };

    let incidents_fut = {
        let incidents = Arc::clone(incidents);
        let repo_id_str = repo_id_str.clone();
        let file_path = file_path.to_string();
        tokio::task::spawn_blocking(move || {
            let stats = incidents.stats(&repo_id_str, &file_path)?;
            Ok::<_, changerisk_core::errors::RiskError>(stats)
        })
    };

    let neighbors_fut = {
        use changerisk_graph::IGraphReader;
        let graph = Arc::clone(graph);
        let repo_id_str = repo_id_str.clone();
        let file_path = file_path.to_string();
        tokio::task::spawn_blocking(move || graph.direct_importers_count(&repo_id_str, &file_path))
    };

    let (cochange_res, incidents_res, neighbors_res) =
        tokio::join!(cochange_fut, incidents_fut, neighbors_fut);

    let co_changed = match cochange_res {
        Ok(Ok(edges)) => edges
            .into_iter()
            .map(|e| {
                let other = if e.file_a == file_path { e.file_b } else { e.file_a };
                TemporalCoupling {
                    other_file: other,
                    frequency: e.frequency,
                    co_changes: e.co_changes,
                    window_days: e.window_days,
                }
            })
            .collect(),
        Ok(Err(err)) => {
            warn!(%err, file_path, "co-change evidence lookup failed, continuing with none");
            Vec::new()
        }
        Err(err) => {
            warn!(%err, "co-change evidence task panicked");
            Vec::new()
        }
    };

    let (incident_stats, recent_incident_titles) = match incidents_res {
        Ok(Ok(stats)) => {
            let titles = stats.recent_titles.clone();
            (stats, titles)
        }
        Ok(Err(err)) => {
            warn!(%err, file_path, "incident evidence lookup failed, continuing with defaults");
            (IncidentStats::default(), Vec::new())
        }
        Err(err) => {
            warn!(%err, "incident evidence task panicked");
            (IncidentStats::default(), Vec::new())
        }
    };

    let direct_neighbors_count = match neighbors_res {
        Ok(Ok(count)) => count,
        Ok(Err(err)) => {
            warn!(%err, file_path, "neighbor count lookup failed, continuing with 0");
            0
        }
        Err(err) => {
            warn!(%err, "neighbor count task panicked");
            0
        }
    };

    PreHopEvidence { co_changed, incident_stats, recent_incident_titles, direct_neighbors_count }
}
