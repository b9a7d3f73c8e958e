//! UI components.

pub mod champion_graph;
