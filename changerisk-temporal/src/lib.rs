//! # changerisk-temporal
//!
//! Derives co-change edges and ownership facts from commit history (C3).
//! Reads commits from the relational store, writes edges and ownership
//! facts back to it; never touches the graph directly (spec §4.3).

#![allow(dead_code)]

pub mod analyzer;
pub mod cochange;
pub mod ownership;

pub use analyzer::{TemporalAnalyzer, TemporalRunReport};
