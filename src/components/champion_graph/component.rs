//! Leptos component wrapping the champion graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming, and selection. An animation
//! loop runs via `requestAnimationFrame`, calling the physics simulation and
//! renderer each frame. A relation dropdown swaps the visible subgraph, and a
//! background queue fetches node portraits in small batches.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent, WheelEvent, Window,
};

use super::filter::{self, RelationFilter, ViewState};
use super::loader::{ImageLoadQueue, LoaderConfig};
use super::physics;
use super::render;
use super::scale::ScaleConfig;
use super::state::GraphState;
use super::theme::Theme;
use super::types::{BuildSite, FALLBACK_RELATION, GraphData, GraphModel, Role};
use super::widget;

/// Pointer travel below this many pixels between mousedown and mouseup
/// counts as a click rather than a drag.
const CLICK_SLOP: f64 = 4.0;

/// Bundles the graph model and simulation state with visual configuration
/// and the portrait loading queue.
struct GraphContext {
	model: GraphModel,
	view: ViewState,
	state: GraphState,
	scale: ScaleConfig,
	theme: Theme,
	images: ImageLoadQueue,
	loader: LoaderConfig,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Snapshot of the clicked node for the detail panel.
#[derive(Clone, Debug, PartialEq)]
struct SelectedNode {
	label: String,
	description: Option<String>,
	widget_slug: Option<String>,
	x: f64,
	y: f64,
}

/// Recompute the visible subgraph for a relation dropdown value and swap
/// the solver contents, keeping surviving nodes in place.
fn switch_view(context: &SharedContext, value: &str) {
	let mut guard = context.borrow_mut();
	let Some(c) = guard.as_mut() else {
		return;
	};
	let relation = RelationFilter::parse(value);
	c.view.recompute(&c.model.nodes, &c.model.edges, relation);
	c.state
		.rebuild(&c.model, &c.view, physics::profile_for(&c.view.filter));
	c.state.fit_to_view();
	info!(
		"view '{}': {} nodes, {} edges",
		c.view.filter.as_value(),
		c.view.visible_nodes.len(),
		c.view.visible_edges.len()
	);
}

/// Queue every node with a portrait URL and kick off the first batch.
/// Does nothing while a loading pass is already running.
fn start_progressive_loading(context: &SharedContext) {
	let begin = {
		let mut guard = context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		if !c.loader.enabled || !c.images.try_begin() {
			false
		} else {
			c.images
				.enqueue_all(c.model.nodes.iter().map(|n| (n.id.as_str(), n.image_ref.is_some())));
			info!("queued {} portraits for progressive loading", c.images.pending());
			true
		}
	};
	if begin {
		schedule_batch(context.clone());
	}
}

/// Take the next batch off the queue and start a fetch for each member.
/// When the queue is drained (or loading was switched off) the pass ends.
fn schedule_batch(context: SharedContext) {
	let batch = {
		let mut guard = context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		if !c.loader.enabled {
			c.images.clear_pending();
			c.images.finish();
			return;
		}
		if c.images.pending() == 0 {
			c.images.finish();
			info!("progressive image loading completed ({} portraits)", c.images.loaded_count());
			return;
		}
		c.images.take_batch(c.loader.batch_size)
	};

	let remaining = Rc::new(Cell::new(batch.len()));
	for id in batch {
		load_image_for_node(context.clone(), id, remaining.clone());
	}
}

/// Record one finished batch member and, once the whole batch is done,
/// schedule the next one after the configured delay.
fn finish_batch_member(context: SharedContext, id: &str, remaining: Rc<Cell<usize>>) {
	let delay = {
		let mut guard = context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		c.images.mark_loaded(id);
		c.loader.delay_ms
	};
	remaining.set(remaining.get().saturating_sub(1));
	if remaining.get() == 0 {
		set_timeout(
			move || schedule_batch(context),
			Duration::from_millis(delay),
		);
	}
}

fn apply_loaded_image(context: &SharedContext, id: &str, image: HtmlImageElement) {
	let mut guard = context.borrow_mut();
	let Some(c) = guard.as_mut() else {
		return;
	};
	if let Some(i) = c.model.node_index(id) {
		c.model.nodes[i].apply_image(image);
	}
}

fn apply_failed_image(context: &SharedContext, id: &str) {
	let mut guard = context.borrow_mut();
	let Some(c) = guard.as_mut() else {
		return;
	};
	if let Some(i) = c.model.node_index(id) {
		c.model.nodes[i].mark_image_failed();
	}
}

/// Fetch one node's portrait, falling back to its replacement image on
/// error. The node keeps its placeholder dot until something decodes.
fn load_image_for_node(context: SharedContext, id: String, remaining: Rc<Cell<usize>>) {
	let (url, fallback) = {
		let guard = context.borrow();
		let Some(c) = guard.as_ref() else {
			return;
		};
		if c.images.is_loaded(&id) {
			(None, None)
		} else {
			match c.model.node_index(&id) {
				Some(i) => (
					c.model.nodes[i].image_ref.clone(),
					c.model.nodes[i].broken_image.clone(),
				),
				None => (None, None),
			}
		}
	};
	let Some(url) = url else {
		finish_batch_member(context, &id, remaining);
		return;
	};

	let ctx_done = context.clone();
	fetch_image(&url, move |result| match result {
		Ok(image) => {
			apply_loaded_image(&ctx_done, &id, image);
			finish_batch_member(ctx_done, &id, remaining);
		}
		Err(()) => match fallback {
			Some(fb) => {
				warn!("portrait failed for '{id}', trying fallback");
				let ctx_fb = ctx_done.clone();
				fetch_image(&fb, move |second| {
					match second {
						Ok(image) => apply_loaded_image(&ctx_fb, &id, image),
						Err(()) => apply_failed_image(&ctx_fb, &id),
					}
					finish_batch_member(ctx_fb, &id, remaining);
				});
			}
			None => {
				warn!("portrait failed for '{id}', no fallback");
				apply_failed_image(&ctx_done, &id);
				finish_batch_member(ctx_done, &id, remaining);
			}
		},
	});
}

/// Decode an image off-DOM and report exactly one outcome.
fn fetch_image(url: &str, on_done: impl FnOnce(Result<HtmlImageElement, ()>) + 'static) {
	let Ok(image) = HtmlImageElement::new() else {
		on_done(Err(()));
		return;
	};
	// Either handler may fire; the slot guarantees a single callback.
	let slot: Rc<RefCell<Option<Box<dyn FnOnce(Result<HtmlImageElement, ()>)>>>> =
		Rc::new(RefCell::new(Some(Box::new(on_done))));

	let on_load = {
		let (slot, image) = (slot.clone(), image.clone());
		Closure::once_into_js(move || {
			if let Some(done) = slot.borrow_mut().take() {
				done(Ok(image));
			}
		})
	};
	let on_error = {
		let slot = slot.clone();
		Closure::once_into_js(move || {
			if let Some(done) = slot.borrow_mut().take() {
				done(Err(()));
			}
		})
	};
	image.set_onload(Some(on_load.unchecked_ref()));
	image.set_onerror(Some(on_error.unchecked_ref()));
	image.set_src(url);
}

/// Drain the queue in one oversized batch with no inter-batch delay.
fn load_all_images_now(context: &SharedContext) {
	let begin = {
		let mut guard = context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		c.loader.delay_ms = 0;
		if c.images.is_active() {
			// A pass is running; widen its next batch to everything left.
			c.loader.batch_size = c.images.pending().max(1);
			false
		} else {
			c.images
				.enqueue_all(c.model.nodes.iter().map(|n| (n.id.as_str(), n.image_ref.is_some())));
			c.loader.batch_size = c.images.pending().max(1);
			c.images.try_begin()
		}
	};
	if begin {
		info!("loading all pending portraits now");
		schedule_batch(context.clone());
	}
}

/// Flip progressive loading on or off. Turning it off drops queued ids;
/// turning it back on restarts from whatever is still unloaded.
fn set_progressive_loading(context: &SharedContext, enabled: bool) {
	let restart = {
		let mut guard = context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		c.loader.enabled = enabled;
		if !enabled {
			c.images.clear_pending();
		}
		enabled && !c.images.is_active()
	};
	if restart {
		start_progressive_loading(context);
	}
}

/// Renders an interactive champion graph on a canvas element, with a
/// relation dropdown, portrait loading controls, and a detail panel for
/// the selected node.
///
/// Pass graph data via the reactive `data` signal. The component sizes
/// itself to its parent container by default; set `fullscreen = true` to
/// fill the viewport and resize automatically with the window. Explicit
/// `width`/`height` override automatic sizing.
#[component]
pub fn ChampionGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = Vec::new())] build_sites: Vec<BuildSite>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	let relation_options = RwSignal::new(Vec::<String>::new());
	let active_relation = RwSignal::new(FALLBACK_RELATION.to_string());
	let loader_enabled = RwSignal::new(true);
	let selected = RwSignal::new(None::<SelectedNode>);
	let current_slug = RwSignal::new(None::<String>);
	let role = RwSignal::new(Role::default());
	let build_sites = StoredValue::new(build_sites);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let model = GraphModel::from_raw(data.get());
		relation_options.set(filter::relation_types(&model.edges));

		let relation = RelationFilter::parse(&active_relation.get_untracked());
		let mut view = ViewState::new(relation.clone());
		view.recompute(&model.nodes, &model.edges, relation);
		let mut state = GraphState::new(&model, &view, physics::profile_for(&view.filter), w, h);
		state.fit_to_view();
		info!(
			"graph ready: {} nodes, {} edges, initial view '{}' ({} visible)",
			model.nodes.len(),
			model.edges.len(),
			view.filter.as_value(),
			view.visible_nodes.len()
		);

		*context_init.borrow_mut() = Some(GraphContext {
			model,
			view,
			state,
			scale: ScaleConfig::default(),
			theme: Theme::default(),
			images: ImageLoadQueue::default(),
			loader: LoaderConfig {
				enabled: loader_enabled.get_untracked(),
				..LoaderConfig::default()
			},
		});
		start_progressive_loading(&context_init);

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let dt = 0.016;
				if c.state.animation_running {
					c.state.tick(dt);
				}
				render::render(&c.state, &c.model, &ctx, &c.scale, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale, c.theme.font_family) {
				c.state.drag.active = true;
				c.state.drag.node_idx = Some(idx);
				c.state.drag.start_x = x;
				c.state.drag.start_y = y;
				c.state.graph.visit_nodes(|node| {
					if node.index() == idx {
						c.state.drag.node_start_x = node.x();
						c.state.drag.node_start_y = node.y();
					}
				});
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			// Update hover state when not dragging
			if !c.state.drag.active {
				let hovered = c.state.node_at_position(x, y, &c.scale, c.theme.font_family);
				c.state.set_hover(hovered);
				// Qualified: leptos's ElementExt also has a `style` method.
				let _ = web_sys::HtmlElement::style(&canvas).set_property(
					"cursor",
					if hovered.is_some() { "pointer" } else { "grab" },
				);
			}

			if c.state.drag.active {
				if let Some(idx) = c.state.drag.node_idx {
					let (dx, dy) = (
						(x - c.state.drag.start_x) / c.state.transform.k,
						(y - c.state.drag.start_y) / c.state.transform.k,
					);
					let (nx, ny) = (
						c.state.drag.node_start_x + dx as f32,
						c.state.drag.node_start_y + dy as f32,
					);
					c.state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		let mut clicked: Option<SelectedNode> = None;
		let mut deselected = false;
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active {
				let travel = ((x - c.state.drag.start_x).powi(2)
					+ (y - c.state.drag.start_y).powi(2))
				.sqrt();
				if let Some(idx) = c.state.drag.node_idx {
					if travel < CLICK_SLOP {
						if c.state.selected == Some(idx) {
							c.state.selected = None;
							deselected = true;
						} else {
							c.state.selected = Some(idx);
							if let Some(i) = c.state.model_index_of(idx) {
								let node = &c.model.nodes[i];
								clicked = Some(SelectedNode {
									label: node.label.clone(),
									description: node.description.clone(),
									widget_slug: node.widget_slug.clone(),
									x,
									y,
								});
							}
						}
					} else {
						// A real drag pins the node where it was dropped.
						c.state.graph.visit_nodes_mut(|node| {
							if node.index() == idx {
								node.data.is_anchor = true;
							}
						});
					}
				}
			} else if c.state.pan.active {
				let travel = ((x - c.state.pan.start_x).powi(2)
					+ (y - c.state.pan.start_y).powi(2))
				.sqrt();
				if travel < CLICK_SLOP && c.state.selected.take().is_some() {
					deselected = true;
				}
			}
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
		}

		if let Some(info) = clicked {
			debug!("selected node '{}'", info.label);
			if let Some(ref slug) = info.widget_slug {
				current_slug.set(Some(slug.clone()));
				role.set(Role::default());
				widget::render_widget(slug, Role::default());
			} else {
				current_slug.set(None);
			}
			selected.set(Some(info));
		} else if deselected {
			debug!("selection cleared");
			selected.set(None);
			current_slug.set(None);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
			c.state.set_hover(None);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (c.state.transform.k * factor).clamp(super::state::MIN_ZOOM, super::state::MAX_ZOOM);
			let ratio = new_k / c.state.transform.k;
			c.state.transform.x = x - (x - c.state.transform.x) * ratio;
			c.state.transform.y = y - (y - c.state.transform.y) * ratio;
			c.state.transform.k = new_k;
		}
	};

	let context_filter = context.clone();
	let on_filter_change = move |ev| {
		let value = event_target_value(&ev);
		switch_view(&context_filter, &value);
		active_relation.set(value);
		selected.set(None);
		current_slug.set(None);
	};

	let context_toggle = context.clone();
	let on_toggle_loading = move |ev| {
		let enabled = event_target_checked(&ev);
		loader_enabled.set(enabled);
		set_progressive_loading(&context_toggle, enabled);
	};

	let context_load_all = context.clone();
	let on_load_all = move |_| load_all_images_now(&context_load_all);

	let on_role_change = move |ev| {
		let picked = Role::parse(&event_target_value(&ev));
		role.set(picked);
		if let Some(slug) = current_slug.get() {
			widget::render_widget(&slug, picked);
		}
	};

	view! {
		<div class="champion-graph" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="champion-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-controls">
				<select
					class="relation-filter"
					on:change=on_filter_change
					prop:value=move || active_relation.get()
				>
					<option value="all">"All Connections"</option>
					{move || {
						relation_options
							.get()
							.into_iter()
							.map(|t| {
								let display = filter::format_relation_name(&t);
								view! { <option value=t>{display}</option> }
							})
							.collect_view()
					}}
				</select>
				<label class="loader-toggle">
					<input
						type="checkbox"
						prop:checked=move || loader_enabled.get()
						on:change=on_toggle_loading
					/>
					"Progressive images"
				</label>
				<button class="load-all-images" on:click=on_load_all>
					"Load all images"
				</button>
			</div>
			<div
				class="champion-detail-panel"
				style:display=move || if selected.get().is_some() { "block" } else { "none" }
				style:left=move || {
					format!("{}px", selected.get().map(|s| s.x + 16.0).unwrap_or(0.0))
				}
				style:top=move || {
					format!("{}px", selected.get().map(|s| s.y + 16.0).unwrap_or(0.0))
				}
				style="position: absolute;"
			>
				<h2 class="detail-title">
					{move || selected.get().map(|s| s.label).unwrap_or_default()}
				</h2>
				<p class="detail-description">
					{move || selected.get().and_then(|s| s.description).unwrap_or_default()}
				</p>
				<div class="build-links">
					{move || {
						selected
							.get()
							.and_then(|s| s.widget_slug)
							.map(|slug| {
								build_sites
									.get_value()
									.iter()
									.map(|site| {
										view! {
											<a
												class="build-link"
												href=site.link_for(&slug)
												target="_blank"
												rel="noopener"
											>
												{site.name.clone()}
											</a>
										}
									})
									.collect_view()
							})
					}}
				</div>
				<div
					class="widget-section"
					style:display=move || {
						if current_slug.get().is_some() { "block" } else { "none" }
					}
				>
					<select
						class="role-selector"
						on:change=on_role_change
						prop:value=move || role.get().as_str()
					>
						{Role::ALL
							.iter()
							.copied()
							.map(|r| view! { <option value=r.as_str()>{r.as_str()}</option> })
							.collect_view()}
					</select>
					<div id=widget::CONTAINER_ID></div>
				</div>
			</div>
		</div>
	}
}
