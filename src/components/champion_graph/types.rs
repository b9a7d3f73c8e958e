//! Dataset structures and domain entities for the champion graph.
//!
//! The raw types mirror the JSON embedded in the host page. Cosmetic
//! fields are optional in the source data and normalized to fixed
//! defaults at ingestion; a missing edge `type` becomes the fallback
//! relation rather than an error.

use serde::{Deserialize, Deserializer};
use web_sys::HtmlImageElement;

use super::loader::VisualState;

/// Relation tag assigned to edges with no `type` in the source data.
pub const FALLBACK_RELATION: &str = "relMain";

/// Node size the scale config's base radius corresponds to.
pub const BASE_NODE_SIZE: f64 = 20.0;

const DEFAULT_NODE_SIZE: f64 = 20.0;
const DEFAULT_NODE_MASS: f64 = 3.0;
const DEFAULT_BORDER: &str = "#C79B3B";
const DEFAULT_BACKGROUND: &str = "#180d43";
const DEFAULT_BORDER_HIGHLIGHT: &str = "#d4c178";
const DEFAULT_BACKGROUND_HIGHLIGHT: &str = "#180d43";
const DEFAULT_EDGE_COLOR: &str = "#555555";
const DEFAULT_EDGE_HIGHLIGHT: &str = "#313131";
const DEFAULT_EDGE_WIDTH: f64 = 1.0;

/// Dataset ids may be strings or numbers; both normalize to a string.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Id {
		Num(i64),
		Text(String),
	}

	Ok(match Id::deserialize(deserializer)? {
		Id::Num(n) => n.to_string(),
		Id::Text(s) => s,
	})
}

/// A node as it appears in the embedded dataset.
#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
	/// Unique identifier, stable across the dataset.
	#[serde(deserialize_with = "deserialize_id")]
	pub id: String,
	/// Display label.
	pub label: String,
	/// Longer display text for the detail panel.
	pub description: Option<String>,
	/// Rendered size; defaults to 20.
	pub size: Option<f64>,
	/// Base physics mass; defaults to 3.
	pub mass: Option<f64>,
	/// Portrait URL. Absent means the node renders as a plain dot.
	pub image: Option<String>,
	/// Fallback portrait used when the primary fails to load.
	#[serde(rename = "brokenImage")]
	pub broken_image: Option<String>,
	/// Build-guide identifier for the widget embed.
	#[serde(rename = "slugWidget")]
	pub slug_widget: Option<String>,
	/// Border color.
	#[serde(rename = "brColor")]
	pub br_color: Option<String>,
	/// Background color.
	#[serde(rename = "bgColor")]
	pub bg_color: Option<String>,
	/// Border color while hovered or selected.
	#[serde(rename = "brColorHg")]
	pub br_color_hg: Option<String>,
	/// Background color while hovered or selected.
	#[serde(rename = "bgColorHg")]
	pub bg_color_hg: Option<String>,
}

/// An edge as it appears in the embedded dataset.
#[derive(Clone, Debug, Deserialize)]
pub struct RawEdge {
	/// Source node id.
	#[serde(deserialize_with = "deserialize_id")]
	pub from: String,
	/// Target node id.
	#[serde(deserialize_with = "deserialize_id")]
	pub to: String,
	/// Relation tag partitioning the edge set.
	#[serde(rename = "type")]
	pub relation_type: Option<String>,
	/// Optional label drawn at the edge midpoint.
	pub label: Option<String>,
	/// Stroke width multiplier.
	pub width: Option<f64>,
	/// Stroke color.
	pub color: Option<String>,
	/// Stroke color while highlighted.
	#[serde(rename = "colorHg")]
	pub color_hg: Option<String>,
	/// Draw an arrow head at the source end.
	#[serde(rename = "arrowToSource", default)]
	pub arrow_to_source: bool,
	/// Draw an arrow head at the target end.
	#[serde(rename = "arrowToTarget", default)]
	pub arrow_to_target: bool,
}

/// Complete raw dataset: nodes and edges.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// All nodes.
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	/// All edges.
	#[serde(default)]
	pub edges: Vec<RawEdge>,
}

/// An external build site linked from the detail panel.
///
/// The `url` is a template containing a `{champion}` placeholder.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BuildSite {
	/// Display name of the site.
	pub name: String,
	/// URL template with a `{champion}` placeholder.
	pub url: String,
	/// Optional icon URL.
	pub icon: Option<String>,
}

impl BuildSite {
	/// Substitute the champion slug into the URL template.
	pub fn link_for(&self, champion_slug: &str) -> String {
		self.url.replace("{champion}", champion_slug)
	}
}

/// Lane role driving the build-guide widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
	/// Top lane.
	Top,
	/// Jungle.
	Jungle,
	/// Mid lane (default).
	#[default]
	Mid,
	/// Bot lane carry.
	Adc,
	/// Support.
	Support,
}

impl Role {
	/// Every role, in display order.
	pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

	/// The value passed to the widget embed.
	pub fn as_str(self) -> &'static str {
		match self {
			Role::Top => "TOP",
			Role::Jungle => "JUNGLE",
			Role::Mid => "MID",
			Role::Adc => "ADC",
			Role::Support => "SUPPORT",
		}
	}

	/// Parse a selector value; anything unrecognized falls back to mid.
	pub fn parse(value: &str) -> Self {
		match value.to_ascii_uppercase().as_str() {
			"TOP" => Role::Top,
			"JUNGLE" => Role::Jungle,
			"ADC" => Role::Adc,
			"SUPPORT" => Role::Support,
			_ => Role::Mid,
		}
	}
}

/// How a node currently renders: plain shape or decoded portrait.
///
/// Resolved once at construction (always [`NodeVisual::Placeholder`]) and
/// at most once more when its image load completes.
#[derive(Clone, Debug, Default)]
pub enum NodeVisual {
	/// Filled dot with a border ring.
	#[default]
	Placeholder,
	/// Circularly clipped portrait.
	Imaged(HtmlImageElement),
}

/// A champion, item, class or brand entity with normalized styling.
#[derive(Clone, Debug)]
pub struct ChampionNode {
	/// Stable unique identifier.
	pub id: String,
	/// Display label.
	pub label: String,
	/// Detail panel text.
	pub description: Option<String>,
	/// Rendered size in dataset units (see [`BASE_NODE_SIZE`]).
	pub size: f64,
	/// Mass from the dataset, before connectivity re-weighting.
	pub base_mass: f64,
	/// Portrait URL, if any.
	pub image_ref: Option<String>,
	/// Fallback portrait URL, if any.
	pub broken_image: Option<String>,
	/// Build-guide identifier, if any.
	pub widget_slug: Option<String>,
	/// Border color.
	pub border_color: String,
	/// Fill color.
	pub background_color: String,
	/// Border color while hovered or selected.
	pub border_highlight: String,
	/// Fill color while hovered or selected.
	pub background_highlight: String,
	/// Current shape.
	pub visual: NodeVisual,
	/// Image lifecycle state; `None` when there is no image reference.
	pub visual_state: Option<VisualState>,
}

impl ChampionNode {
	fn from_raw(raw: RawNode) -> Self {
		let visual_state = raw.image.is_some().then_some(VisualState::Pending);
		Self {
			id: raw.id,
			label: raw.label,
			description: raw.description,
			size: raw.size.unwrap_or(DEFAULT_NODE_SIZE),
			base_mass: raw.mass.unwrap_or(DEFAULT_NODE_MASS),
			image_ref: raw.image,
			broken_image: raw.broken_image,
			widget_slug: raw.slug_widget,
			border_color: raw.br_color.unwrap_or_else(|| DEFAULT_BORDER.to_string()),
			background_color: raw.bg_color.unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
			border_highlight: raw
				.br_color_hg
				.unwrap_or_else(|| DEFAULT_BORDER_HIGHLIGHT.to_string()),
			background_highlight: raw
				.bg_color_hg
				.unwrap_or_else(|| DEFAULT_BACKGROUND_HIGHLIGHT.to_string()),
			visual: NodeVisual::Placeholder,
			visual_state,
		}
	}

	/// Apply a decoded portrait. Only a `Pending` node transitions; a
	/// second call (or a call on an image-less node) is a no-op.
	pub fn apply_image(&mut self, image: HtmlImageElement) {
		if self.visual_state == Some(VisualState::Pending) {
			self.visual = NodeVisual::Imaged(image);
			self.visual_state = Some(VisualState::ImageLoaded);
		}
	}

	/// Record a failed portrait load; the placeholder shape stays.
	pub fn mark_image_failed(&mut self) {
		if self.visual_state == Some(VisualState::Pending) {
			self.visual_state = Some(VisualState::ImageFailed);
		}
	}
}

/// A typed relationship between two nodes, immutable once constructed.
#[derive(Clone, Debug)]
pub struct ChampionEdge {
	/// Source node id.
	pub from: String,
	/// Target node id.
	pub to: String,
	/// Relation tag; never empty.
	pub relation_type: String,
	/// Stroke width multiplier.
	pub width: f64,
	/// Midpoint label, if any.
	pub label: Option<String>,
	/// Stroke color.
	pub color: String,
	/// Stroke color while highlighted.
	pub highlight_color: String,
	/// Arrow head at the source end.
	pub arrow_to_source: bool,
	/// Arrow head at the target end.
	pub arrow_to_target: bool,
}

impl ChampionEdge {
	fn from_raw(raw: RawEdge) -> Self {
		Self {
			from: raw.from,
			to: raw.to,
			relation_type: raw
				.relation_type
				.filter(|t| !t.is_empty())
				.unwrap_or_else(|| FALLBACK_RELATION.to_string()),
			width: raw.width.unwrap_or(DEFAULT_EDGE_WIDTH),
			label: raw.label,
			color: raw.color.unwrap_or_else(|| DEFAULT_EDGE_COLOR.to_string()),
			highlight_color: raw
				.color_hg
				.unwrap_or_else(|| DEFAULT_EDGE_HIGHLIGHT.to_string()),
			arrow_to_source: raw.arrow_to_source,
			arrow_to_target: raw.arrow_to_target,
		}
	}
}

/// Normalized node and edge collections for one page session.
///
/// Topology is owned by the filter engine (reader); per-node visual
/// decoration is owned by the image loader (writer). Nothing else
/// mutates these collections after construction.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	/// All nodes.
	pub nodes: Vec<ChampionNode>,
	/// All edges.
	pub edges: Vec<ChampionEdge>,
}

impl GraphModel {
	/// Normalize the raw dataset into domain entities.
	pub fn from_raw(data: GraphData) -> Self {
		Self {
			nodes: data.nodes.into_iter().map(ChampionNode::from_raw).collect(),
			edges: data.edges.into_iter().map(ChampionEdge::from_raw).collect(),
		}
	}

	/// Index of a node by id.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numeric_and_string_ids_both_parse() {
		let data: GraphData = serde_json::from_str(
			r#"{"nodes": [{"id": 7, "label": "Ahri"}, {"id": "BladeOfTheRuinedKing", "label": "BotRK"}],
			    "edges": [{"from": 7, "to": "BladeOfTheRuinedKing"}]}"#,
		)
		.unwrap();
		let model = GraphModel::from_raw(data);
		assert_eq!(model.nodes[0].id, "7");
		assert_eq!(model.edges[0].from, "7");
		assert_eq!(model.edges[0].to, "BladeOfTheRuinedKing");
	}

	#[test]
	fn missing_edge_type_normalizes_to_fallback() {
		let data: GraphData = serde_json::from_str(
			r#"{"nodes": [], "edges": [{"from": "a", "to": "b"}, {"from": "a", "to": "b", "type": ""}]}"#,
		)
		.unwrap();
		let model = GraphModel::from_raw(data);
		assert_eq!(model.edges[0].relation_type, FALLBACK_RELATION);
		assert_eq!(model.edges[1].relation_type, FALLBACK_RELATION);
	}

	#[test]
	fn cosmetic_defaults_applied() {
		let data: GraphData =
			serde_json::from_str(r#"{"nodes": [{"id": "a", "label": "Ahri"}], "edges": []}"#).unwrap();
		let model = GraphModel::from_raw(data);
		let node = &model.nodes[0];
		assert_eq!(node.size, 20.0);
		assert_eq!(node.base_mass, 3.0);
		assert_eq!(node.border_color, "#C79B3B");
		assert!(node.visual_state.is_none());
		assert!(matches!(node.visual, NodeVisual::Placeholder));
	}

	#[test]
	fn image_bearing_node_starts_pending() {
		let data: GraphData = serde_json::from_str(
			r#"{"nodes": [{"id": "a", "label": "Ahri", "image": "ahri.png"}], "edges": []}"#,
		)
		.unwrap();
		let model = GraphModel::from_raw(data);
		assert_eq!(model.nodes[0].visual_state, Some(VisualState::Pending));
	}

	#[test]
	fn failure_transition_happens_once() {
		let data: GraphData = serde_json::from_str(
			r#"{"nodes": [{"id": "a", "label": "Ahri", "image": "bad-url"}], "edges": []}"#,
		)
		.unwrap();
		let mut model = GraphModel::from_raw(data);
		model.nodes[0].mark_image_failed();
		assert_eq!(model.nodes[0].visual_state, Some(VisualState::ImageFailed));
		// Already settled, further outcomes are ignored.
		model.nodes[0].mark_image_failed();
		assert_eq!(model.nodes[0].visual_state, Some(VisualState::ImageFailed));
		assert!(matches!(model.nodes[0].visual, NodeVisual::Placeholder));
	}

	#[test]
	fn build_site_substitutes_champion_slug() {
		let site = BuildSite {
			name: "OP.GG".to_string(),
			url: "https://example.com/champions/{champion}/build".to_string(),
			icon: None,
		};
		assert_eq!(
			site.link_for("ahri"),
			"https://example.com/champions/ahri/build"
		);
	}

	#[test]
	fn role_parses_case_insensitively_with_mid_fallback() {
		assert_eq!(Role::parse("jungle"), Role::Jungle);
		assert_eq!(Role::parse("ADC"), Role::Adc);
		assert_eq!(Role::parse("nonsense"), Role::Mid);
	}
}
