//! # changerisk-graph
//!
//! The "restaurant": an in-memory `petgraph` property graph derived from the
//! relational store, never the reverse. Typed nodes/edges per spec §6;
//! writes enforce dual-write ordering by checking the relational row first.

#![allow(dead_code)]

pub mod adapter;
pub mod errors;
pub mod model;
pub mod reader;
pub mod store;

pub use adapter::GraphAdapter;
pub use errors::{GraphError, GraphResult};
pub use model::{EdgeKind, NodeData};
pub use reader::IGraphReader;
pub use store::GraphStore;
