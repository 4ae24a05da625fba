//! Damped, draggable spin of the whole galaxy.
//!
//! A single angle/velocity pair owned by the session. It is written by the
//! per-frame integrator and by drag input, and read by every orbit position
//! computation in the same tick.

use serde::Deserialize;

/// Tunables for the spin integrator.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
	/// Per-frame velocity multiplier while not dragging.
	pub decay: f64,
	/// Constant idle spin added per frame while not dragging (radians).
	pub idle_drift: f64,
	/// Velocity impulse per pixel of horizontal drag.
	pub drag_sensitivity: f64,
}

impl Default for RotationConfig {
	fn default() -> Self {
		Self {
			decay: 0.95,
			idle_drift: 0.0012,
			drag_sensitivity: 0.001,
		}
	}
}

/// Accumulated rotation plus the inertial state feeding it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RotationState {
	/// Accumulated rotation offset (radians, unbounded).
	pub angle: f64,
	/// Signed angular velocity (radians per frame).
	pub velocity: f64,
	dragging: bool,
	last_x: f64,
}

impl RotationState {
	pub fn is_dragging(&self) -> bool {
		self.dragging
	}

	/// Advance one frame. Spin only runs in overview; any other view freezes it.
	pub fn integrate(&mut self, overview: bool, config: &RotationConfig) {
		if !overview {
			self.velocity = 0.0;
			return;
		}
		self.angle += self.velocity;
		if !self.dragging {
			self.velocity *= config.decay;
			self.angle += config.idle_drift;
		}
	}

	pub fn begin_drag(&mut self, x: f64) {
		self.dragging = true;
		self.last_x = x;
	}

	/// Convert horizontal pointer travel into a velocity impulse.
	pub fn drag_to(&mut self, x: f64, config: &RotationConfig) {
		if !self.dragging {
			return;
		}
		let dx = x - self.last_x;
		self.last_x = x;
		self.velocity -= dx * config.drag_sensitivity;
	}

	pub fn end_drag(&mut self) {
		self.dragging = false;
	}

	pub fn freeze(&mut self) {
		self.velocity = 0.0;
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn idle_frame_adds_exactly_the_drift() {
		let config = RotationConfig::default();
		let mut rot = RotationState {
			angle: 1.5,
			..Default::default()
		};
		rot.integrate(true, &config);
		assert_eq!(rot.angle, 1.5 + config.idle_drift);
		assert_eq!(rot.velocity, 0.0);
	}

	#[test]
	fn released_spin_decays_towards_zero() {
		let config = RotationConfig::default();
		let mut rot = RotationState {
			velocity: 0.2,
			..Default::default()
		};
		let mut previous = rot.velocity.abs();
		for _ in 0..400 {
			rot.integrate(true, &config);
			let current = rot.velocity.abs();
			assert!(current < previous);
			previous = current;
		}
		assert!(previous < 1e-8);
	}

	#[test]
	fn drag_is_an_impulse_not_a_position() {
		let config = RotationConfig::default();
		let mut rot = RotationState::default();
		rot.begin_drag(100.0);
		rot.drag_to(150.0, &config);
		assert!((rot.velocity + 0.05).abs() < 1e-12);
		rot.drag_to(150.0, &config);
		assert!((rot.velocity + 0.05).abs() < 1e-12);

		// No decay and no idle drift while held.
		rot.integrate(true, &config);
		assert!((rot.angle + 0.05).abs() < 1e-12);
		assert!((rot.velocity + 0.05).abs() < 1e-12);

		rot.end_drag();
		rot.integrate(true, &config);
		assert!(rot.velocity.abs() < 0.05);
	}

	#[test]
	fn focus_freezes_the_spin() {
		let config = RotationConfig::default();
		let mut rot = RotationState {
			angle: 2.0,
			velocity: 0.3,
			..Default::default()
		};
		rot.integrate(false, &config);
		assert_eq!(rot.velocity, 0.0);
		assert_eq!(rot.angle, 2.0);
	}

	#[test]
	fn moves_without_a_drag_are_ignored() {
		let config = RotationConfig::default();
		let mut rot = RotationState::default();
		rot.drag_to(500.0, &config);
		assert_eq!(rot.velocity, 0.0);
	}
}
