//! Zoom-dependent sizing for graph visuals.
//!
//! Centralizes how visual parameters respond to the zoom level `k`.
//! World-space values scale with the canvas transform and appear larger
//! when zoomed in; screen-space values divide by `k` to stay a constant
//! pixel size. Labels and portraits switch off entirely below their
//! zoom thresholds so a zoomed-out graph stays readable and cheap.

/// How a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size; appears larger when zoomed in.
	World,
	/// Constant screen-space size in pixels, unaffected by zoom.
	Screen,
	/// World-space scaling clamped to min/max screen-pixel bounds.
	Clamped {
		/// Minimum on-screen size in pixels.
		min_screen: f64,
		/// Maximum on-screen size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value for a base size at zoom `k`, ready to use after
	/// the canvas transform has been applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Base node radius in world units (for a size-20 dataset node).
	pub node_radius: f64,
	/// How the node radius scales with zoom.
	pub node_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How the hit radius scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Node label font size in screen pixels.
	pub label_size: f64,
	/// Minimum zoom used for label font scaling.
	pub label_min_k: f64,
	/// Zoom below which node labels are hidden.
	pub label_zoom_threshold: f64,
	/// Zoom below which portraits fall back to plain dots.
	pub image_zoom_threshold: f64,
	/// Base edge stroke width in screen pixels.
	pub edge_line_width: f64,
	/// Edge label font size in screen pixels.
	pub edge_label_size: f64,
	/// Base arrow head size in world units.
	pub arrow_size: f64,
	/// How the arrow head scales with zoom.
	pub arrow_behavior: ScaleBehavior,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 14.0,
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 5.0,
				max_screen: f64::INFINITY,
			},
			hit_radius: 18.0,
			hit_behavior: ScaleBehavior::Clamped {
				min_screen: 8.0,
				max_screen: f64::INFINITY,
			},
			label_size: 14.0,
			label_min_k: 0.5,
			label_zoom_threshold: 0.7,
			image_zoom_threshold: 0.4,
			edge_line_width: 1.5,
			edge_label_size: 12.0,
			arrow_size: 6.0,
			arrow_behavior: ScaleBehavior::Clamped {
				min_screen: 0.0,
				max_screen: 18.0,
			},
		}
	}
}

/// Pre-computed scale values for one zoom level; created once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node radius in world-space.
	pub node_radius: f64,
	/// Hit detection radius in world-space.
	pub hit_radius: f64,
	/// Node label font shorthand.
	pub label_font: String,
	/// Edge label font shorthand.
	pub edge_label_font: String,
	/// Edge stroke width in world-space.
	pub edge_line_width: f64,
	/// Arrow head size in world-space.
	pub arrow_size: f64,
	/// Whether labels render at this zoom.
	pub show_labels: bool,
	/// Whether portraits render at this zoom (dots otherwise).
	pub show_images: bool,
}

impl ScaledValues {
	/// Compute scaled values from configuration and zoom level.
	pub fn new(config: &ScaleConfig, k: f64, font_family: &str) -> Self {
		let label_px = config.label_size / k.max(config.label_min_k);
		let edge_label_px = config.edge_label_size / k.max(config.label_min_k);
		Self {
			k,
			node_radius: config.node_behavior.apply(config.node_radius, k),
			hit_radius: config.hit_behavior.apply(config.hit_radius, k),
			label_font: format!("{label_px}px {font_family}"),
			edge_label_font: format!("{edge_label_px}px {font_family}"),
			edge_line_width: config.edge_line_width / k,
			arrow_size: config.arrow_behavior.apply(config.arrow_size, k),
			show_labels: k >= config.label_zoom_threshold,
			show_images: k >= config.image_zoom_threshold,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_behavior_bounds_screen_size() {
		let b = ScaleBehavior::Clamped {
			min_screen: 5.0,
			max_screen: 20.0,
		};
		// Zoomed far out, world value grows so the screen size holds 5px.
		assert_eq!(b.apply(2.0, 0.1), 50.0);
		// In range, world value passes through.
		assert_eq!(b.apply(10.0, 1.0), 10.0);
		// Zoomed far in, capped at 20px on screen.
		assert_eq!(b.apply(10.0, 4.0), 5.0);
	}

	#[test]
	fn screen_behavior_counteracts_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(8.0, 2.0), 4.0);
		assert_eq!(ScaleBehavior::World.apply(8.0, 2.0), 8.0);
	}

	#[test]
	fn labels_and_images_cut_off_below_thresholds() {
		let config = ScaleConfig::default();
		let zoomed_out = ScaledValues::new(&config, 0.3, "sans-serif");
		assert!(!zoomed_out.show_labels);
		assert!(!zoomed_out.show_images);

		let mid = ScaledValues::new(&config, 0.5, "sans-serif");
		assert!(!mid.show_labels);
		assert!(mid.show_images);

		let close = ScaledValues::new(&config, 1.0, "sans-serif");
		assert!(close.show_labels);
		assert!(close.show_images);
	}
}
