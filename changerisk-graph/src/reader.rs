//! Narrow, mockable read interface other crates depend on instead of the
//! concrete store — Phase 1 and the investigator's evidence collector both
//! take `Arc<dyn IGraphReader>` so tests can swap in a fake.
//!
//! Pattern reference: `IDriftReader`'s trait-plus-`Arc`-blanket-impl shape.

use std::sync::Arc;

use crate::errors::GraphResult;
use crate::model::{EdgeKind, NodeData};

pub trait IGraphReader: Send + Sync {
    /// Count of direct IMPORTS dependents — files that import this one.
    fn direct_importers_count(&self, repo_id: &str, file_path: &str) -> GraphResult<u32>;

    fn neighbors_out(&self, key: &str, kind: EdgeKind) -> GraphResult<Vec<NodeData>>;

    fn neighbors_in(&self, key: &str, kind: EdgeKind) -> GraphResult<Vec<NodeData>>;

    fn fetch_nodes(&self, keys: &[String]) -> GraphResult<Vec<NodeData>>;
}

impl<T: IGraphReader + ?Sized> IGraphReader for Arc<T> {
    fn direct_importers_count(&self, repo_id: &str, file_path: &str) -> GraphResult<u32> {
        (**self).direct_importers_count(repo_id, file_path)
    }

    fn neighbors_out(&self, key: &str, kind: EdgeKind) -> GraphResult<Vec<NodeData>> {
        (**self).neighbors_out(key, kind)
    }

    fn neighbors_in(&self, key: &str, kind: EdgeKind) -> GraphResult<Vec<NodeData>> {
        (**self).neighbors_in(key, kind)
    }

    fn fetch_nodes(&self, keys: &[String]) -> GraphResult<Vec<NodeData>> {
        (**self).fetch_nodes(keys)
    }
}
