//! Simulation state and interaction tracking for the champion graph.
//!
//! Owns the `force_graph` solver built from the currently visible
//! node/edge subset, the pan/zoom transform, drag and hover state, and a
//! memory of node positions so a view switch does not scatter the
//! surviving nodes. Rebuilding from the visible subset (rather than
//! filtering inside the solver) is what makes `switch_view` idempotent:
//! the same filter always yields the same nodes, masses and sprites.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use log::debug;

use super::filter::{self, ViewState};
use super::scale::{ScaleConfig, ScaledValues};
use super::types::{BASE_NODE_SIZE, GraphModel};

/// Zoom factor bounds.
pub const MIN_ZOOM: f64 = 0.1;
/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 10.0;

/// Simulation payload per node: a pointer back into the model plus the
/// sizing the renderer needs every frame.
#[derive(Clone, Debug, Default)]
pub struct NodeSim {
	/// Index into [`GraphModel::nodes`].
	pub model_idx: usize,
	/// Size multiplier relative to the base node radius.
	pub size: f64,
}

/// A visible edge: solver endpoints plus a pointer to the model edge
/// carrying its colors, label and arrow flags.
#[derive(Clone, Copy, Debug)]
pub struct EdgeSprite {
	/// Solver index of the source node.
	pub src: DefaultNodeIdx,
	/// Solver index of the target node.
	pub tgt: DefaultNodeIdx,
	/// Index into [`GraphModel::edges`].
	pub model_idx: usize,
}

/// Pan and zoom transform applied to the whole view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	/// Horizontal pan in screen pixels.
	pub x: f64,
	/// Vertical pan in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

/// Tracks an in-progress node drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Whether a drag is active.
	pub active: bool,
	/// The node being dragged.
	pub node_idx: Option<DefaultNodeIdx>,
	/// Pointer x at press, screen-space.
	pub start_x: f64,
	/// Pointer y at press, screen-space.
	pub start_y: f64,
	/// Node x at press, world-space.
	pub node_start_x: f32,
	/// Node y at press, world-space.
	pub node_start_y: f32,
}

/// Tracks an in-progress background pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a pan is active.
	pub active: bool,
	/// Pointer x at press.
	pub start_x: f64,
	/// Pointer y at press.
	pub start_y: f64,
	/// Transform x at press.
	pub transform_start_x: f64,
	/// Transform y at press.
	pub transform_start_y: f64,
}

// Hold keeps a highlight alive briefly so skirting a hover zone does not
// flash; speeds are exponential-smoothing factors.
const MIN_HOLD_TIME: f64 = 0.12;
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;

/// Smoothed hover highlighting for the pointed-at node and its in-view
/// neighbors. Each node carries its own intensity in 0.0..=1.0 that
/// animates towards membership in the target set.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	/// Currently hovered node, if any.
	pub hovered: Option<DefaultNodeIdx>,
	target: HashSet<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
	hold: HashMap<DefaultNodeIdx, f64>,
	cached_max: f64,
}

impl HighlightState {
	/// Update the hovered node and recompute the target set from the
	/// visible edge pairs.
	pub fn set_hover(
		&mut self,
		node: Option<DefaultNodeIdx>,
		edges: impl Iterator<Item = (DefaultNodeIdx, DefaultNodeIdx)>,
	) {
		if self.hovered == node {
			return;
		}

		self.hovered = node;
		self.target.clear();

		if let Some(idx) = node {
			self.target.insert(idx);
			for (src, tgt) in edges {
				if src == idx {
					self.target.insert(tgt);
				} else if tgt == idx {
					self.target.insert(src);
				}
			}
			for &idx in &self.target {
				self.hold.insert(idx, MIN_HOLD_TIME);
			}
		}
	}

	/// Animate intensities towards their targets with exponential
	/// smoothing; fade-out waits for the hold timer.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target {
			let intensity = self.intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}

		let target = &self.target;
		self.hold.retain(|idx, timer| {
			if target.contains(idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let hold = &self.hold;
		let mut new_max: f64 = 0.0;
		self.intensity.retain(|idx, intensity| {
			if !target.contains(idx) && hold.get(idx).copied().unwrap_or(0.0) <= 0.0 {
				*intensity *= fade_out;
			}
			new_max = new_max.max(*intensity);
			*intensity > 0.005
		});
		self.cached_max = new_max;
	}

	/// Smoothed intensity for one node.
	pub fn node_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Edge intensity: geometric mean of its endpoints, which transitions
	/// smoothly without lagging behind either node.
	pub fn edge_intensity(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	/// Maximum intensity of any node, used for dimming the rest.
	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}

	fn reset(&mut self) {
		*self = Self::default();
	}
}

/// Core graph state: solver, visible edge sprites, transform and
/// interaction tracking. Created once per page session, rebuilt in place
/// on every view switch, ticked each animation frame.
pub struct GraphState {
	/// The force simulation over the visible subset.
	pub graph: ForceGraph<NodeSim, ()>,
	/// Visible edges with their model pointers.
	pub edges: Vec<EdgeSprite>,
	/// Pan/zoom transform.
	pub transform: ViewTransform,
	/// Node drag tracking.
	pub drag: DragState,
	/// Background pan tracking.
	pub pan: PanState,
	/// Hover highlighting.
	pub highlight: HighlightState,
	/// Currently selected node, if any.
	pub selected: Option<DefaultNodeIdx>,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Whether the simulation advances each frame.
	pub animation_running: bool,
	/// Accumulated animation time in seconds.
	pub flow_time: f64,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	remembered: HashMap<String, (f32, f32)>,
}

impl GraphState {
	/// Build the state for an initial view.
	pub fn new(
		model: &GraphModel,
		view: &ViewState,
		params: SimulationParameters,
		width: f64,
		height: f64,
	) -> Self {
		let mut state = Self {
			graph: ForceGraph::new(SimulationParameters {
				force_charge: params.force_charge,
				force_spring: params.force_spring,
				force_max: params.force_max,
				node_speed: params.node_speed,
				damping_factor: params.damping_factor,
			}),
			edges: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			selected: None,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			id_to_idx: HashMap::new(),
			remembered: HashMap::new(),
		};
		state.rebuild(model, view, params);
		state
	}

	/// Swap the solver contents for the given view: visible nodes get
	/// their connectivity-bucketed mass and either their remembered
	/// position or a seed on a circle; visible edges whose endpoints both
	/// survived become sprites. Edges referencing unknown ids are dropped.
	pub fn rebuild(&mut self, model: &GraphModel, view: &ViewState, params: SimulationParameters) {
		// Remember where outgoing nodes were so survivors stay put.
		{
			let Self {
				graph, remembered, ..
			} = self;
			graph.visit_nodes(|node| {
				let id = &model.nodes[node.data.user_data.model_idx].id;
				remembered.insert(id.clone(), (node.x(), node.y()));
			});
		}

		let degrees = filter::degree_in_view(&model.nodes, &model.edges, &view.filter);
		let mut graph = ForceGraph::new(params);
		let mut id_to_idx = HashMap::new();

		let visible_count = view.visible_nodes.len().max(1);
		let mut placed = 0usize;
		for (model_idx, node) in model.nodes.iter().enumerate() {
			if !view.visible_nodes.contains(&node.id) {
				continue;
			}
			let angle = placed as f64 * 2.0 * PI / visible_count as f64;
			let seed = (
				(self.width / 2.0 + 120.0 * angle.cos()) as f32,
				(self.height / 2.0 + 120.0 * angle.sin()) as f32,
			);
			let (x, y) = self.remembered.get(&node.id).copied().unwrap_or(seed);
			let degree = degrees.get(node.id.as_str()).copied().unwrap_or(0);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: filter::mass_for_degree(degree),
				is_anchor: false,
				user_data: NodeSim {
					model_idx,
					size: node.size / BASE_NODE_SIZE,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			placed += 1;
		}

		let mut sprites = Vec::with_capacity(view.visible_edges.len());
		let mut dropped = 0usize;
		for &edge_idx in &view.visible_edges {
			let edge = &model.edges[edge_idx];
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&edge.from), id_to_idx.get(&edge.to))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				sprites.push(EdgeSprite {
					src,
					tgt,
					model_idx: edge_idx,
				});
			} else {
				dropped += 1;
			}
		}
		if dropped > 0 {
			debug!("dropped {dropped} edges referencing unknown node ids");
		}

		self.graph = graph;
		self.edges = sprites;
		self.id_to_idx = id_to_idx;
		self.drag = DragState::default();
		self.highlight.reset();
		self.selected = None;
	}

	/// Fit the transform so every node is on screen with a margin. An
	/// empty view resets to a centered 1:1 transform.
	pub fn fit_to_view(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((min_x, min_y, max_x, max_y)) => {
					(min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
				}
			});
		});

		let Some((min_x, min_y, max_x, max_y)) = bounds else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};

		let (span_x, span_y) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = ((self.width / span_x).min(self.height / span_y) * 0.85).clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	/// Convert screen coordinates to world coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// The node under a screen position, if any.
	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
		font_family: &str,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k, font_family);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let hit = scale.hit_radius * node.data.user_data.size;
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.index());
			}
		});
		found
	}

	/// Model index of a solver node.
	pub fn model_index_of(&self, idx: DefaultNodeIdx) -> Option<usize> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.model_idx);
			}
		});
		found
	}

	/// Update the hover highlight for the node under the pointer.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		let Self {
			highlight, edges, ..
		} = self;
		highlight.set_hover(node, edges.iter().map(|e| (e.src, e.tgt)));
	}

	/// Advance the simulation and highlight animations.
	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;
		self.highlight.tick(dt as f64);
	}

	/// Record a canvas resize.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::champion_graph::filter::RelationFilter;
	use crate::components::champion_graph::physics;
	use crate::components::champion_graph::types::GraphData;

	fn model() -> GraphModel {
		// Edges: A-B "main", B-C "item"; D is isolated.
		GraphModel::from_raw(
			serde_json::from_str::<GraphData>(
				r#"{
					"nodes": [
						{"id": "A", "label": "Ahri"},
						{"id": "B", "label": "Blade"},
						{"id": "C", "label": "Caitlyn"},
						{"id": "D", "label": "Dorans"}
					],
					"edges": [
						{"from": "A", "to": "B", "type": "main"},
						{"from": "B", "to": "C", "type": "item"}
					]
				}"#,
			)
			.unwrap(),
		)
	}

	fn view_for(m: &GraphModel, filter: RelationFilter) -> ViewState {
		let mut view = ViewState::new(filter.clone());
		view.recompute(&m.nodes, &m.edges, filter);
		view
	}

	fn masses(state: &GraphState) -> Vec<(usize, f32)> {
		let mut out = Vec::new();
		state.graph.visit_nodes(|node| {
			out.push((node.data.user_data.model_idx, node.data.mass));
		});
		out.sort_by_key(|&(i, _)| i);
		out
	}

	#[test]
	fn fit_to_view_on_empty_graph_resets_transform() {
		let m = model();
		let view = view_for(&m, RelationFilter::Only("relNothing".to_string()));
		let mut state =
			GraphState::new(&m, &view, physics::profile_for(&view.filter), 800.0, 600.0);
		assert!(state.edges.is_empty());

		state.transform = ViewTransform {
			x: 5.0,
			y: -40.0,
			k: 3.0,
		};
		state.fit_to_view();
		assert_eq!(state.transform.x, 400.0);
		assert_eq!(state.transform.y, 300.0);
		assert_eq!(state.transform.k, 1.0);
	}

	#[test]
	fn rebuild_with_same_filter_keeps_masses_stable() {
		let m = model();
		let mut view = view_for(&m, RelationFilter::All);
		let mut state =
			GraphState::new(&m, &view, physics::profile_for(&view.filter), 800.0, 600.0);

		let first = masses(&state);
		// B touches two edges, everything else at most one.
		assert_eq!(first, vec![(0, 1.0), (1, 6.0), (2, 1.0), (3, 1.0)]);
		assert_eq!(state.edges.len(), 2);

		view.recompute(&m.nodes, &m.edges, RelationFilter::All);
		state.rebuild(&m, &view, physics::profile_for(&view.filter));
		assert_eq!(masses(&state), first);
		assert_eq!(state.edges.len(), 2);
	}
}
