//! Colors and visual style for the champion graph.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color from RGB channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with an explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with a different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten towards white (0.0 = unchanged, 1.0 = white).
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken towards black (0.0 = unchanged, 1.0 = black).
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// CSS representation, `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Parse a CSS color string: hex (`#rrggbb`) or `rgb()`/`rgba()`
/// functional notation. Anything else comes back mid-gray.
pub fn parse_css_color(color_str: &str) -> Color {
	if color_str.starts_with('#') && color_str.len() == 7 {
		let r = u8::from_str_radix(&color_str[1..3], 16).unwrap_or(128);
		let g = u8::from_str_radix(&color_str[3..5], 16).unwrap_or(128);
		let b = u8::from_str_radix(&color_str[5..7], 16).unwrap_or(128);
		Color::rgb(r, g, b)
	} else if color_str.starts_with("rgb") {
		let nums: Vec<&str> = color_str
			.trim_start_matches("rgba(")
			.trim_start_matches("rgb(")
			.trim_end_matches(')')
			.split(',')
			.collect();
		let r = nums
			.first()
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let g = nums
			.get(1)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let b = nums
			.get(2)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let a = nums
			.get(3)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(1.0);
		Color::rgba(r, g, b, a)
	} else {
		Color::rgb(128, 128, 128)
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color.
	pub color: Color,
	/// Secondary color for the radial gradient.
	pub color_secondary: Color,
	/// Whether to draw the radial gradient.
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none).
	pub vignette: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Theme identifier.
	pub name: &'static str,
	/// Background styling.
	pub background: BackgroundStyle,
	/// Whether placeholder dots get an inner gradient.
	pub node_gradient: bool,
	/// Node label color.
	pub label_color: Color,
	/// Node label outline color.
	pub label_stroke: Color,
	/// Edge label color.
	pub edge_label_color: Color,
	/// Ring drawn around the selected node.
	pub selection_ring: Color,
	/// Font family for all graph text.
	pub font_family: &'static str,
}

impl Theme {
	/// Dark gold-on-navy look matching the game's visual identity.
	pub fn summoners_rift() -> Self {
		Self {
			name: "summoners_rift",
			background: BackgroundStyle {
				color: Color::rgb(12, 12, 12),
				color_secondary: Color::rgb(24, 19, 43),
				use_gradient: true,
				vignette: 0.2,
			},
			node_gradient: true,
			label_color: Color::rgb(240, 240, 240),
			label_stroke: Color::rgb(12, 12, 12),
			edge_label_color: Color::rgb(212, 193, 120),
			selection_ring: Color::rgba(212, 193, 120, 0.9),
			font_family: "'Beaufort for LOL', sans-serif",
		}
	}

	/// Flat variant without gradients or vignette.
	pub fn minimal() -> Self {
		Self {
			name: "minimal",
			background: BackgroundStyle {
				color: Color::rgb(18, 18, 22),
				color_secondary: Color::rgb(18, 18, 22),
				use_gradient: false,
				vignette: 0.0,
			},
			node_gradient: false,
			label_color: Color::rgb(230, 230, 230),
			label_stroke: Color::rgb(10, 10, 10),
			edge_label_color: Color::rgb(200, 185, 130),
			selection_ring: Color::rgba(230, 230, 230, 0.9),
			font_family: "sans-serif",
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::summoners_rift()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_colors_round_trip_through_css() {
		let gold = parse_css_color("#C79B3B");
		assert_eq!((gold.r, gold.g, gold.b), (0xC7, 0x9B, 0x3B));
		assert_eq!(gold.to_css(), "#c79b3b");
	}

	#[test]
	fn functional_notation_parses_with_alpha() {
		let c = parse_css_color("rgba(212, 193, 120, 0.5)");
		assert_eq!((c.r, c.g, c.b), (212, 193, 120));
		assert_eq!(c.a, 0.5);
	}

	#[test]
	fn garbage_input_falls_back_to_gray() {
		let c = parse_css_color("not-a-color");
		assert_eq!((c.r, c.g, c.b), (128, 128, 128));
	}

	#[test]
	fn lighten_and_darken_stay_in_range() {
		let c = Color::rgb(100, 150, 200);
		let l = c.lighten(1.0);
		assert_eq!((l.r, l.g, l.b), (255, 255, 255));
		let d = c.darken(1.0);
		assert_eq!((d.r, d.g, d.b), (0, 0, 0));
	}
}
