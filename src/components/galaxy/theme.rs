//! Visual theming for the galaxy.
//!
//! Provides the color type shared by families and clusters, HSL jitter used by
//! the layout generator, and the style knobs read by the renderer.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parse `#RRGGBB`. Anything else yields `None`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#')?;
		if digits.len() != 6 {
			return None;
		}
		let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
		Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// Hue, saturation and lightness, each in `[0, 1]`.
	pub fn to_hsl(self) -> (f64, f64, f64) {
		let (r, g, b) = (
			self.r as f64 / 255.0,
			self.g as f64 / 255.0,
			self.b as f64 / 255.0,
		);
		let max = r.max(g).max(b);
		let min = r.min(g).min(b);
		let l = (max + min) / 2.0;
		if (max - min).abs() < f64::EPSILON {
			return (0.0, 0.0, l);
		}
		let d = max - min;
		let s = if l > 0.5 {
			d / (2.0 - max - min)
		} else {
			d / (max + min)
		};
		let h = if max == r {
			(g - b) / d + if g < b { 6.0 } else { 0.0 }
		} else if max == g {
			(b - r) / d + 2.0
		} else {
			(r - g) / d + 4.0
		};
		(h / 6.0, s, l)
	}

	pub fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> Self {
		let h = h.rem_euclid(1.0);
		let s = s.clamp(0.0, 1.0);
		let l = l.clamp(0.0, 1.0);
		if s == 0.0 {
			let v = (l * 255.0).round() as u8;
			return Self::rgba(v, v, v, a);
		}
		let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
		let p = 2.0 * l - q;
		let channel = |t: f64| {
			let t = t.rem_euclid(1.0);
			let v = if t < 1.0 / 6.0 {
				p + (q - p) * 6.0 * t
			} else if t < 0.5 {
				q
			} else if t < 2.0 / 3.0 {
				p + (q - p) * (2.0 / 3.0 - t) * 6.0
			} else {
				p
			};
			(v * 255.0).round().clamp(0.0, 255.0) as u8
		};
		Self::rgba(
			channel(h + 1.0 / 3.0),
			channel(h),
			channel(h - 1.0 / 3.0),
			a,
		)
	}

	/// Shift hue, saturation and lightness by the given deltas.
	/// Hue wraps around; saturation and lightness clamp to `[0, 1]`.
	pub fn offset_hsl(self, dh: f64, ds: f64, dl: f64) -> Self {
		let (h, s, l) = self.to_hsl();
		Self::from_hsl(h + dh, s + ds, l + dl, self.a)
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Orbital star field style.
#[derive(Clone, Debug)]
pub struct StarFieldStyle {
	pub enabled: bool,
	pub count: usize,
	pub color: Color,
	/// Star radius in world units.
	pub size: f64,
	/// Orbit speed in radians per second.
	pub speed: f64,
	pub opacity: f64,
}

/// Styling for clusters and inspiration nodes.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Radius of a family's gas cloud in world units.
	pub family_radius: f64,
	/// Radius of a cluster glow in world units.
	pub cluster_radius: f64,
	/// Radius of an inspiration node in world units.
	pub node_radius: f64,
	/// Radius of a community star in world units.
	pub community_radius: f64,
	/// Pulsing animation intensity (0.0 = none)
	pub pulse_intensity: f64,
	/// Pulsing animation speed
	pub pulse_speed: f64,
	/// Selection ring color
	pub ring_color: Color,
}

/// Compass rings drawn on the orbital plane in overview.
#[derive(Clone, Debug)]
pub struct CompassStyle {
	pub color: Color,
	/// Ring radii as multiples of the orbit radii.
	pub rings: Vec<f64>,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub stars: StarFieldStyle,
	pub node: NodeStyle,
	pub compass: CompassStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(0, 0, 0),
				color_secondary: Color::rgb(8, 10, 22),
				vignette: 0.35,
			},
			stars: StarFieldStyle {
				enabled: true,
				count: 500,
				color: Color::WHITE,
				size: 0.35,
				speed: 0.05,
				opacity: 0.4,
			},
			node: NodeStyle {
				family_radius: 20.0,
				cluster_radius: 4.5,
				node_radius: 0.3,
				community_radius: 0.4,
				pulse_intensity: 0.05,
				pulse_speed: 1.5,
				ring_color: Color::rgba(255, 255, 255, 0.8),
			},
			compass: CompassStyle {
				color: Color::rgba(170, 204, 255, 0.18),
				rings: vec![1.2, 1.8, 2.5, 3.2],
			},
		}
	}
}
