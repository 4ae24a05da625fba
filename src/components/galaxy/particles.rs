//! Ambient star field riding a shrunken copy of the orbit.

use std::f64::consts::TAU;

use glam::DVec3;

use super::orbit::OrbitParams;
use super::theme::StarFieldStyle;

/// Radii of the star ring relative to the hub orbit.
const RING_SCALE: f64 = 0.75;

/// A single star.
#[derive(Clone, Debug)]
pub struct Star {
	/// Starting angle on the ring.
	pub angle: f64,
	/// Fixed offset from the ring: radial spread on the plane plus vertical jitter.
	pub offset: DVec3,
	pub alpha: f64,
	pub phase: f64, // For twinkling and bobbing
}

/// Background stars. Independent of the galaxy spin: they circle on their own clock.
pub struct StarField {
	pub stars: Vec<Star>,
	orbit: OrbitParams,
	speed: f64,
	time: f64,
}

impl StarField {
	pub fn new(style: &StarFieldStyle, orbit: &OrbitParams) -> Self {
		let mut stars = Vec::with_capacity(style.count);

		for i in 0..style.count {
			// Deterministic per index so every session looks the same.
			let seed = i as f64 + 1.0;
			let angle = Self::pseudo_random(seed * 1.1) * TAU;
			let r_offset = (Self::pseudo_random(seed * 2.3) - 0.65) * 35.0;
			let (dx, dz) = (angle.cos() * r_offset, angle.sin() * r_offset);
			let dy = orbit.plane_height(dx, dz) + (Self::pseudo_random(seed * 3.7) - 0.5) * 8.0;

			stars.push(Star {
				angle,
				offset: DVec3::new(dx, dy, dz),
				alpha: style.opacity * (0.3 + Self::pseudo_random(seed * 5.3) * 0.7),
				phase: Self::pseudo_random(seed * 7.9) * TAU,
			});
		}

		Self {
			stars,
			orbit: orbit.scaled(RING_SCALE),
			speed: style.speed,
			time: 0.0,
		}
	}

	/// Simple pseudo-random function (deterministic)
	fn pseudo_random(seed: f64) -> f64 {
		let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
		x - x.floor()
	}

	pub fn update(&mut self, dt: f64) {
		self.time += dt;
	}

	/// World position of `star` at the current time, including its bob.
	pub fn position(&self, star: &Star) -> DVec3 {
		let base = self.orbit.position(star.angle, self.time * self.speed);
		let bob = (self.time + star.phase).sin() * 1.5;
		base + star.offset + DVec3::new(0.0, bob, 0.0)
	}

	/// Get twinkle alpha for a star
	pub fn twinkle_alpha(&self, star: &Star) -> f64 {
		let twinkle = (self.time * 2.0 + star.phase).sin();
		star.alpha * (0.4 + 0.6 * (0.5 + 0.5 * twinkle))
	}
}
