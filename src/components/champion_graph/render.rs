//! Canvas rendering for the champion graph.
//!
//! Draws in z-order: background (screen space), then edges, placeholder
//! and portrait nodes, and finally highlighted nodes with rings and
//! labels (world space). Per-element colors come from the model's style
//! attributes; the theme supplies backgrounds, text colors and fonts.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::GraphState;
use super::theme::{Color, Theme, parse_css_color};
use super::types::{ChampionNode, GraphModel, NodeVisual};

/// Smooth ramp between 0 and 1, used to ease highlight transitions.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// World-space position and sizing of one visible node.
#[derive(Clone, Copy)]
struct NodePose {
	x: f64,
	y: f64,
	model_idx: usize,
	size: f64,
	idx: DefaultNodeIdx,
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &GraphState,
	model: &GraphModel,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k, theme.font_family);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let mut poses: HashMap<DefaultNodeIdx, NodePose> = HashMap::new();
	state.graph.visit_nodes(|node| {
		poses.insert(
			node.index(),
			NodePose {
				x: node.x() as f64,
				y: node.y() as f64,
				model_idx: node.data.user_data.model_idx,
				size: node.data.user_data.size,
				idx: node.index(),
			},
		);
	});

	draw_edges(state, model, ctx, &scale, theme, &poses);
	draw_nodes(state, model, ctx, &scale, theme, &poses);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.unwrap();

		gradient
			.add_color_stop(0.0, &theme.background.color_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.color.to_css())
			.unwrap();

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = ctx
		.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			state.width.min(state.height) * 0.3,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.7,
		)
		.unwrap();

	gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)").unwrap();
	gradient
		.add_color_stop(
			1.0,
			&format!("rgba(0, 0, 0, {})", theme.background.vignette),
		)
		.unwrap();

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(
	state: &GraphState,
	model: &GraphModel,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	poses: &HashMap<DefaultNodeIdx, NodePose>,
) {
	let max_t = smooth_step(state.highlight.max_intensity());

	for sprite in &state.edges {
		let (Some(p1), Some(p2)) = (poses.get(&sprite.src), poses.get(&sprite.tgt)) else {
			continue;
		};
		let edge = &model.edges[sprite.model_idx];

		let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		let edge_t = smooth_step(state.highlight.edge_intensity(sprite.src, sprite.tgt));
		// Highlighted edges brighten and thicken; everything else dims
		// while any highlight is active.
		let (alpha, width_mult) = if edge_t > 0.01 {
			(0.7 + 0.3 * edge_t, 1.0 + 0.4 * edge_t)
		} else if max_t > 0.01 {
			(0.7 - 0.5 * max_t, 1.0 - 0.3 * max_t)
		} else {
			(0.7, 1.0)
		};

		let base = if edge_t > 0.5 {
			parse_css_color(&edge.highlight_color)
		} else {
			parse_css_color(&edge.color)
		};
		ctx.set_stroke_style_str(&base.with_alpha(alpha * base.a).to_css());
		ctx.set_line_width(scale.edge_line_width * edge.width * width_mult);

		let r1 = scale.node_radius * p1.size;
		let r2 = scale.node_radius * p2.size;
		let src_inset = r1 + if edge.arrow_to_source { scale.arrow_size } else { 0.0 };
		let tgt_inset = r2 + if edge.arrow_to_target { scale.arrow_size } else { 0.0 };

		ctx.begin_path();
		ctx.move_to(p1.x + ux * src_inset, p1.y + uy * src_inset);
		ctx.line_to(p2.x - ux * tgt_inset, p2.y - uy * tgt_inset);
		ctx.stroke();

		let arrow_color = base.with_alpha(alpha * base.a);
		if edge.arrow_to_target {
			draw_arrow_head(ctx, p2.x - ux * r2, p2.y - uy * r2, ux, uy, scale.arrow_size, arrow_color);
		}
		if edge.arrow_to_source {
			draw_arrow_head(ctx, p1.x + ux * r1, p1.y + uy * r1, -ux, -uy, scale.arrow_size, arrow_color);
		}

		if scale.show_labels {
			if let Some(label) = &edge.label {
				let (mx, my) = ((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
				ctx.set_font(&scale.edge_label_font);
				ctx.set_stroke_style_str(&theme.label_stroke.with_alpha(0.8 * alpha).to_css());
				ctx.set_line_width(3.0 / scale.k);
				let _ = ctx.stroke_text(label, mx, my);
				ctx.set_fill_style_str(&theme.edge_label_color.with_alpha(alpha).to_css());
				let _ = ctx.fill_text(label, mx, my);
			}
		}
	}
}

/// Filled triangular arrow head with its tip at (`tip_x`, `tip_y`),
/// pointing along the (`ux`, `uy`) direction.
fn draw_arrow_head(
	ctx: &CanvasRenderingContext2d,
	tip_x: f64,
	tip_y: f64,
	ux: f64,
	uy: f64,
	size: f64,
	color: Color,
) {
	let (back_x, back_y) = (tip_x - ux * size, tip_y - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);

	ctx.set_fill_style_str(&color.to_css());
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(
	state: &GraphState,
	model: &GraphModel,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	poses: &HashMap<DefaultNodeIdx, NodePose>,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let has_highlight = max_t > 0.01;

	// Pass 1: nodes outside the highlight set, dimmed while a highlight
	// is active.
	for pose in poses.values() {
		if state.highlight.node_intensity(pose.idx) > 0.001 {
			continue;
		}
		let (alpha, radius_mult) = if has_highlight {
			(1.0 - 0.7 * max_t, 1.0 - 0.15 * max_t)
		} else {
			(1.0, 1.0)
		};
		draw_node(state, model, ctx, scale, theme, pose, alpha, radius_mult, false);
	}

	// Pass 2: highlighted nodes on top, grown towards the pointer.
	for pose in poses.values() {
		let node_t = state.highlight.node_intensity(pose.idx);
		if node_t <= 0.001 {
			continue;
		}
		let eased = smooth_step(node_t);
		let hovered = state.highlight.hovered == Some(pose.idx);
		let grow = if hovered { 0.4 } else { 0.25 };
		let dim_alpha = 1.0 - 0.7 * max_t;
		let alpha = dim_alpha + (1.0 - dim_alpha) * eased;
		let radius_mult = 1.0 + grow * eased;
		draw_node(state, model, ctx, scale, theme, pose, alpha, radius_mult, true);
	}
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	state: &GraphState,
	model: &GraphModel,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	pose: &NodePose,
	alpha: f64,
	radius_mult: f64,
	highlighted: bool,
) {
	let node = &model.nodes[pose.model_idx];
	let radius = scale.node_radius * pose.size * radius_mult;
	let (x, y) = (pose.x, pose.y);

	ctx.set_global_alpha(alpha);

	let drew_image = scale.show_images && draw_portrait(ctx, node, x, y, radius);
	if !drew_image {
		draw_dot(ctx, node, theme, x, y, radius, highlighted);
	}

	let border = parse_css_color(if highlighted {
		&node.border_highlight
	} else {
		&node.border_color
	});
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&border.to_css());
	ctx.set_line_width((if highlighted { 3.0 } else { 2.0 }) / scale.k);
	ctx.stroke();

	if state.selected == Some(pose.idx) {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 4.0 / scale.k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.selection_ring.to_css());
		ctx.set_line_width(2.0 / scale.k);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);

	if scale.show_labels && alpha > 0.5 {
		ctx.set_global_alpha(alpha);
		ctx.set_font(&scale.label_font);
		ctx.set_stroke_style_str(&theme.label_stroke.with_alpha(0.9).to_css());
		ctx.set_line_width(4.0 / scale.k);
		let _ = ctx.stroke_text(&node.label, x + radius + 4.0, y + 4.0);
		ctx.set_fill_style_str(&theme.label_color.with_alpha(0.95).to_css());
		let _ = ctx.fill_text(&node.label, x + radius + 4.0, y + 4.0);
		ctx.set_global_alpha(1.0);
	}
}

/// Draw the portrait clipped to a circle. Returns `false` when the node
/// has no decoded image yet, so the caller can fall back to the dot.
fn draw_portrait(
	ctx: &CanvasRenderingContext2d,
	node: &ChampionNode,
	x: f64,
	y: f64,
	radius: f64,
) -> bool {
	let NodeVisual::Imaged(image) = &node.visual else {
		return false;
	};

	ctx.save();
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.clip();
	let side = radius * 2.0;
	if ctx
		.draw_image_with_html_image_element_and_dw_and_dh(image, x - radius, y - radius, side, side)
		.is_err()
	{
		ctx.restore();
		return false;
	}
	ctx.restore();
	true
}

fn draw_dot(
	ctx: &CanvasRenderingContext2d,
	node: &ChampionNode,
	theme: &Theme,
	x: f64,
	y: f64,
	radius: f64,
	highlighted: bool,
) {
	let fill = parse_css_color(if highlighted {
		&node.background_highlight
	} else {
		&node.background_color
	});

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	if theme.node_gradient {
		let gradient = ctx
			.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.unwrap();
		gradient
			.add_color_stop(0.0, &fill.lighten(0.35).to_css())
			.unwrap();
		gradient.add_color_stop(0.7, &fill.to_css()).unwrap();
		gradient
			.add_color_stop(1.0, &fill.darken(0.2).to_css())
			.unwrap();
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&fill.to_css());
	}
	ctx.fill();
}
