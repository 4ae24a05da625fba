//! The shared tilted elliptical orbit.
//!
//! Every family hub rides the same ellipse; the whole galaxy spins by adding a
//! global rotation offset to each hub's fixed phase. Both the renderer and the
//! camera controller call [`OrbitParams::position`] independently and agree on
//! positions because the function is pure.

use glam::DVec3;
use serde::Deserialize;

/// Radii and tilt of the orbital plane.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitParams {
	/// Ellipse radius along x.
	pub rx: f64,
	/// Ellipse radius along z.
	pub rz: f64,
	/// Plane slope: y contribution per unit of x.
	pub slope_x: f64,
	/// Plane slope: y contribution per unit of z.
	pub slope_z: f64,
}

impl Default for OrbitParams {
	fn default() -> Self {
		Self {
			rx: 42.0,
			rz: 28.0,
			slope_x: 0.45,
			slope_z: -0.65,
		}
	}
}

impl OrbitParams {
	/// World position for an entity with `phase` under the current `rotation`.
	pub fn position(&self, phase: f64, rotation: f64) -> DVec3 {
		let theta = phase + rotation;
		let x = self.rx * theta.cos();
		let z = self.rz * theta.sin();
		DVec3::new(x, self.plane_height(x, z), z)
	}

	/// Height of the orbital plane above `(x, z)`.
	pub fn plane_height(&self, x: f64, z: f64) -> f64 {
		x * self.slope_x + z * self.slope_z
	}

	/// Same plane, radii multiplied by `k`.
	pub fn scaled(&self, k: f64) -> Self {
		Self {
			rx: self.rx * k,
			rz: self.rz * k,
			..*self
		}
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::TAU;

	use super::*;

	const EPS: f64 = 1e-9;

	fn close(a: DVec3, b: DVec3, eps: f64) -> bool {
		(a - b).abs().max_element() < eps
	}

	#[test]
	fn zero_phase_lands_on_the_x_axis() {
		let p = OrbitParams::default().position(0.0, 0.0);
		assert!(close(p, DVec3::new(42.0, 18.9, 0.0), EPS));
	}

	#[test]
	fn periodic_in_rotation() {
		let orbit = OrbitParams::default();
		for i in 0..64 {
			let phase = i as f64 * 0.37;
			let rotation = i as f64 * -1.91 + 100.0;
			let a = orbit.position(phase, rotation);
			let b = orbit.position(phase, rotation + TAU);
			assert!(close(a, b, 1e-6), "phase {phase} rotation {rotation}");
		}
	}

	#[test]
	fn every_position_lies_on_the_tilted_plane() {
		let orbit = OrbitParams::default();
		for i in 0..100 {
			let p = orbit.position(i as f64 * 0.13, i as f64 * 7.7);
			let expected = p.x * orbit.slope_x + p.z * orbit.slope_z;
			assert!((p.y - expected).abs() < EPS);
		}
	}

	#[test]
	fn quarter_turn_reaches_the_minor_axis() {
		let p = OrbitParams::default().position(TAU / 4.0, 0.0);
		assert!(close(p, DVec3::new(0.0, -18.2, 28.0), 1e-9));
	}

	#[test]
	fn scaling_keeps_the_tilt() {
		let orbit = OrbitParams::default().scaled(0.75);
		assert_eq!(orbit.rx, 31.5);
		assert_eq!(orbit.slope_z, -0.65);
	}
}
