//! Relation-type view filtering.
//!
//! Derives which edges and nodes are visible under the selected relation
//! filter, plus the connectivity-based mass re-weighting applied when the
//! view changes. Node visibility follows edge visibility: under a
//! specific relation, a node renders only if it is an endpoint of at
//! least one matching edge. Isolated nodes are noise for that relation
//! and stay hidden.
//!
//! All functions here are pure over the full collections; derived sets
//! are replaced wholesale on every change, never patched in place.

use std::collections::{HashMap, HashSet};

use super::types::{ChampionEdge, ChampionNode};

/// The active relation selection: everything, or a single relation type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationFilter {
	/// Show every edge and every node.
	All,
	/// Show only edges of the named relation and their endpoints.
	Only(String),
}

impl RelationFilter {
	/// Parse a dropdown value; `"all"` selects every relation.
	pub fn parse(value: &str) -> Self {
		if value == "all" {
			RelationFilter::All
		} else {
			RelationFilter::Only(value.to_string())
		}
	}

	/// Whether an edge of the given relation type passes this filter.
	pub fn matches(&self, relation_type: &str) -> bool {
		match self {
			RelationFilter::All => true,
			RelationFilter::Only(t) => t == relation_type,
		}
	}

	/// The dropdown value for this filter.
	pub fn as_value(&self) -> &str {
		match self {
			RelationFilter::All => "all",
			RelationFilter::Only(t) => t,
		}
	}
}

/// Indices of edges passing the filter, in input order.
pub fn visible_edges(edges: &[ChampionEdge], filter: &RelationFilter) -> Vec<usize> {
	edges
		.iter()
		.enumerate()
		.filter(|(_, e)| filter.matches(&e.relation_type))
		.map(|(i, _)| i)
		.collect()
}

/// Ids of nodes visible under the filter.
///
/// `All` admits every node. A specific relation admits exactly the
/// endpoints of matching edges; an unknown relation therefore yields an
/// empty set rather than an error.
pub fn visible_nodes(
	nodes: &[ChampionNode],
	edges: &[ChampionEdge],
	filter: &RelationFilter,
) -> HashSet<String> {
	match filter {
		RelationFilter::All => nodes.iter().map(|n| n.id.clone()).collect(),
		RelationFilter::Only(t) => {
			let mut out = HashSet::new();
			for edge in edges.iter().filter(|e| &e.relation_type == t) {
				out.insert(edge.from.clone());
				out.insert(edge.to.clone());
			}
			out
		}
	}
}

/// Degree of every node counting only in-filter edges. All node ids are
/// present in the result, isolated ones with degree zero.
pub fn degree_in_view<'a>(
	nodes: &'a [ChampionNode],
	edges: &'a [ChampionEdge],
	filter: &RelationFilter,
) -> HashMap<&'a str, usize> {
	let mut degrees: HashMap<&str, usize> = nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
	for edge in edges.iter().filter(|e| filter.matches(&e.relation_type)) {
		if let Some(d) = degrees.get_mut(edge.from.as_str()) {
			*d += 1;
		}
		if let Some(d) = degrees.get_mut(edge.to.as_str()) {
			*d += 1;
		}
	}
	degrees
}

/// Bucketed solver mass for a node's in-view degree. Heavily connected
/// hubs anchor the layout; leaves stay light and mobile.
pub fn mass_for_degree(degree: usize) -> f32 {
	if degree > 15 {
		24.0
	} else if degree > 8 {
		18.0
	} else if degree > 4 {
		12.0
	} else if degree > 1 {
		6.0
	} else {
		1.0
	}
}

/// Distinct relation types found in the data, sorted (dropdown order).
pub fn relation_types(edges: &[ChampionEdge]) -> Vec<String> {
	let mut types: Vec<String> = edges
		.iter()
		.map(|e| e.relation_type.clone())
		.collect::<HashSet<_>>()
		.into_iter()
		.collect();
	types.sort();
	types
}

/// Humanize a relation tag for display: `"relMain"` becomes `"Rel Main"`,
/// underscores become spaces, first letter uppercased.
pub fn format_relation_name(relation_type: &str) -> String {
	let mut out = String::with_capacity(relation_type.len() + 4);
	for c in relation_type.chars() {
		if c == '_' {
			out.push(' ');
		} else if c.is_ascii_uppercase() && !out.is_empty() {
			out.push(' ');
			out.push(c);
		} else {
			out.push(c);
		}
	}
	let mut chars = out.trim().chars();
	match chars.next() {
		Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
		None => String::new(),
	}
}

/// The derived view for the current filter, replaced wholesale on every
/// switch so readers never observe a partial update.
#[derive(Clone, Debug)]
pub struct ViewState {
	/// The active filter.
	pub filter: RelationFilter,
	/// Indices into the full edge collection.
	pub visible_edges: Vec<usize>,
	/// Ids of visible nodes.
	pub visible_nodes: HashSet<String>,
}

impl ViewState {
	/// An empty view with the given starting filter; call
	/// [`ViewState::recompute`] once the collections exist.
	pub fn new(filter: RelationFilter) -> Self {
		Self {
			filter,
			visible_edges: Vec::new(),
			visible_nodes: HashSet::new(),
		}
	}

	/// Derive both visible sets from the collections as they stand now.
	pub fn recompute(
		&mut self,
		nodes: &[ChampionNode],
		edges: &[ChampionEdge],
		filter: RelationFilter,
	) {
		self.visible_edges = visible_edges(edges, &filter);
		self.visible_nodes = visible_nodes(nodes, edges, &filter);
		self.filter = filter;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::champion_graph::types::{GraphData, GraphModel};

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

	#[test]
	fn all_filter_passes_everything_through() {
		let m = model();
		assert_eq!(visible_edges(&m.edges, &RelationFilter::All), vec![0, 1]);
		let nodes = visible_nodes(&m.nodes, &m.edges, &RelationFilter::All);
		assert_eq!(nodes.len(), 4);
	}

	#[test]
	fn specific_relation_selects_endpoints_only() {
		let m = model();
		let filter = RelationFilter::parse("item");
		assert_eq!(visible_edges(&m.edges, &filter), vec![1]);
		let nodes = visible_nodes(&m.nodes, &m.edges, &filter);
		let expected: HashSet<String> = ["B", "C"].iter().map(|s| s.to_string()).collect();
		assert_eq!(nodes, expected);
		// A touches only a "main" edge and D touches nothing.
		assert!(!nodes.contains("A"));
		assert!(!nodes.contains("D"));
	}

	#[test]
	fn unknown_relation_yields_empty_sets() {
		let m = model();
		let filter = RelationFilter::parse("relNothing");
		assert!(visible_edges(&m.edges, &filter).is_empty());
		assert!(visible_nodes(&m.nodes, &m.edges, &filter).is_empty());
	}

	#[test]
	fn visible_nodes_equal_endpoint_set_exactly() {
		let m = model();
		for t in ["main", "item"] {
			let filter = RelationFilter::Only(t.to_string());
			let expected: HashSet<String> = m
				.edges
				.iter()
				.filter(|e| e.relation_type == t)
				.flat_map(|e| [e.from.clone(), e.to.clone()])
				.collect();
			assert_eq!(visible_nodes(&m.nodes, &m.edges, &filter), expected);
		}
	}

	#[test]
	fn degrees_count_only_in_filter_edges() {
		let m = model();
		let d = degree_in_view(&m.nodes, &m.edges, &RelationFilter::Only("main".to_string()));
		assert_eq!(d["A"], 1);
		assert_eq!(d["B"], 1);
		assert_eq!(d["C"], 0);
		assert_eq!(d["D"], 0);

		let d = degree_in_view(&m.nodes, &m.edges, &RelationFilter::All);
		assert_eq!(d["B"], 2);
	}

	#[test]
	fn mass_buckets_at_boundaries() {
		assert_eq!(mass_for_degree(0), 1.0);
		assert_eq!(mass_for_degree(1), 1.0);
		assert_eq!(mass_for_degree(2), 6.0);
		assert_eq!(mass_for_degree(4), 6.0);
		assert_eq!(mass_for_degree(5), 12.0);
		assert_eq!(mass_for_degree(8), 12.0);
		assert_eq!(mass_for_degree(9), 18.0);
		assert_eq!(mass_for_degree(15), 18.0);
		assert_eq!(mass_for_degree(16), 24.0);
	}

	#[test]
	fn recompute_is_idempotent() {
		let m = model();
		let mut view = ViewState::new(RelationFilter::All);
		view.recompute(&m.nodes, &m.edges, RelationFilter::parse("item"));
		let (edges_once, nodes_once) = (view.visible_edges.clone(), view.visible_nodes.clone());
		view.recompute(&m.nodes, &m.edges, RelationFilter::parse("item"));
		assert_eq!(view.visible_edges, edges_once);
		assert_eq!(view.visible_nodes, nodes_once);
	}

	#[test]
	fn relation_types_are_distinct_and_sorted() {
		let m = model();
		assert_eq!(relation_types(&m.edges), vec!["item", "main"]);
	}

	#[test]
	fn relation_names_humanize() {
		assert_eq!(format_relation_name("relMain"), "Rel Main");
		assert_eq!(format_relation_name("relItems"), "Rel Items");
		assert_eq!(format_relation_name("item_relation"), "Item relation");
	}
}
