//! Interactive champion relationship graph.
//!
//! Renders champions, items, and classes as a force-directed graph on an
//! HTML canvas with:
//! - Relation-type filtering that swaps the visible subgraph
//! - Physics-based node positioning, with a tuning profile per view
//! - Pan, zoom, node dragging, hover highlighting, and click selection
//! - Progressive batched loading of node portraits
//! - A detail panel with build-site links and an embedded build widget
//!
//! # Example
//!
//! ```ignore
//! use rift_graph::{ChampionGraphCanvas, GraphData};
//!
//! let data: GraphData = serde_json::from_str(payload)?;
//!
//! view! { <ChampionGraphCanvas data=data.into() fullscreen=true /> }
//! ```

mod component;
pub mod filter;
pub mod loader;
pub mod physics;
mod render;
pub mod scale;
mod state;
pub mod theme;
pub mod types;
mod widget;

pub use component::ChampionGraphCanvas;
pub use theme::Theme;
pub use types::{BuildSite, GraphData, GraphModel, Role};
