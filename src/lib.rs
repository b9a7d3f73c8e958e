//! rift-graph: Interactive champion relationship explorer.
//!
//! This crate provides a WASM-based graph visualization that renders League
//! champions, items, and classes as a force-directed network with relation
//! filtering, progressively loaded portraits, and per-champion build links.

use leptos::either::Either;
use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;

pub use components::champion_graph::{BuildSite, ChampionGraphCanvas, GraphData};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("rift-graph: logging initialized");
}

/// Failure to read the embedded graph payload at startup.
#[derive(Debug, Error)]
pub enum DataError {
	/// The host page has no element with the expected id.
	#[error("missing element #{0}")]
	MissingElement(&'static str),
	/// The element exists but is not a script tag.
	#[error("element #{0} is not a script tag")]
	NotAScript(&'static str),
	/// The script body is not valid JSON for the expected shape.
	#[error("invalid JSON payload: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Text content of a `<script type="application/json">` element.
fn script_text(id: &'static str) -> Result<String, DataError> {
	let element = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(id))
		.ok_or(DataError::MissingElement(id))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| DataError::NotAScript(id))?;
	Ok(script.text().unwrap_or_default())
}

/// Load graph data from the script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_graph_data() -> Result<GraphData, DataError> {
	let data: GraphData = serde_json::from_str(&script_text("graph-data")?)?;
	info!(
		"rift-graph: loaded {} nodes, {} edges",
		data.nodes.len(),
		data.edges.len()
	);
	Ok(data)
}

/// Load the build-site link list from the script element with
/// id="build-sites". A missing or malformed list is not fatal; the
/// detail panel just shows no links.
fn load_build_sites() -> Vec<BuildSite> {
	match script_text("build-sites").and_then(|text| Ok(serde_json::from_str(&text)?)) {
		Ok(sites) => sites,
		Err(e) => {
			warn!("rift-graph: no build sites available: {e}");
			Vec::new()
		}
	}
}

/// Main application component.
/// Loads the graph payload from the DOM and renders the visualization, or
/// a static error view when the payload cannot be read.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let meta = view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Summoner's Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
	};

	let body = match load_graph_data() {
		Ok(data) => {
			let build_sites = load_build_sites();
			let graph_signal = Signal::derive(move || data.clone());
			Either::Left(view! {
				<div class="fullscreen-graph">
					<ChampionGraphCanvas data=graph_signal build_sites=build_sites fullscreen=true />
					<div class="graph-overlay">
						<h1>"Summoner's Graph"</h1>
						<p class="subtitle">
							"Click a champion for builds. Drag nodes to reposition. Scroll to zoom."
						</p>
					</div>
				</div>
			})
		}
		Err(e) => {
			warn!("rift-graph: startup failed: {e}");
			Either::Right(view! {
				<div class="graph-error">
					<h1>"Failed to initialize network visualization"</h1>
					<p class="subtitle">"The champion data could not be loaded. Reload the page to try again."</p>
				</div>
			})
		}
	};

	view! {
		{meta}
		{body}
	}
}
