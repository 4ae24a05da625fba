//! Per-frame camera easing.
//!
//! The rig never jumps: every frame it moves a fixed fraction of the way
//! towards the goal picked for the current view. The session resolves the
//! view into a [`CameraGoal`] (hub and node positions depend on this frame's
//! rotation), so this module only knows about points in world space.
//!
//! # Goals
//!
//! - Overview: ease back to the default vantage point looking at the origin.
//! - Family: keep looking at the moving hub; glide towards a fixed offset of it
//!   once per arming, until close enough or until the user takes over.
//! - Node: frame the node from a short diagonal offset.
//! - Hold: leave everything untouched.

use std::f64::consts::PI;

use glam::{DMat4, DVec3, DVec4};
use serde::Deserialize;

/// Canvas size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Portrait screens get the wider framing.
	pub fn is_mobile(&self) -> bool {
		self.width < self.height
	}

	/// Width over height, never dividing by zero.
	pub fn aspect(&self) -> f64 {
		if self.width <= 0.0 || self.height <= 0.0 {
			return 1.0;
		}
		self.width / self.height
	}
}

/// Framing distances that differ between portrait and landscape screens.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraProfile {
	/// Multiplier on the overview distance.
	pub overview_multiplier: f64,
	/// Offset of the family vantage point along x and z.
	pub family_zoom: f64,
	/// How far below a node the camera aims.
	pub balance_offset: f64,
	/// Diagonal offset of the detail vantage point.
	pub detail_distance: f64,
}

impl Default for CameraProfile {
	fn default() -> Self {
		Self {
			overview_multiplier: 1.4,
			family_zoom: 16.0,
			balance_offset: 0.2,
			detail_distance: 7.0,
		}
	}
}

impl CameraProfile {
	fn mobile() -> Self {
		Self {
			overview_multiplier: 2.5,
			family_zoom: 22.0,
			balance_offset: 0.4,
			detail_distance: 9.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	pub desktop: CameraProfile,
	pub mobile: CameraProfile,
	/// Overview vantage point before the profile multiplier is applied to z.
	pub overview_height: f64,
	pub overview_distance: f64,
	/// Height of the family vantage point per unit of `family_zoom`.
	pub family_lift: f64,
	/// Height of the detail vantage point above the node.
	pub detail_lift: f64,
	pub overview_smoothing: f64,
	pub chase_smoothing: f64,
	pub look_smoothing: f64,
	pub detail_smoothing: f64,
	/// The family glide ends once the camera is this close to its goal.
	pub chase_stop_distance: f64,
	/// Vertical field of view in degrees.
	pub fov_degrees: f64,
	pub min_distance: f64,
	pub max_distance: f64,
	/// Manual orbit speed; a drag across the full canvas height turns by this many half turns.
	pub rotate_speed: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			desktop: CameraProfile::default(),
			mobile: CameraProfile::mobile(),
			overview_height: 30.0,
			overview_distance: 120.0,
			family_lift: 0.6,
			detail_lift: 2.5,
			overview_smoothing: 0.025,
			chase_smoothing: 0.08,
			look_smoothing: 0.1,
			detail_smoothing: 0.1,
			chase_stop_distance: 2.0,
			fov_degrees: 38.0,
			min_distance: 1.0,
			max_distance: 250.0,
			rotate_speed: 0.5,
		}
	}
}

impl CameraConfig {
	pub fn profile(&self, viewport: Viewport) -> &CameraProfile {
		if viewport.is_mobile() {
			&self.mobile
		} else {
			&self.desktop
		}
	}

	/// Where the overview camera rests.
	pub fn overview_position(&self, viewport: Viewport) -> DVec3 {
		let m = self.profile(viewport).overview_multiplier;
		DVec3::new(0.0, self.overview_height, self.overview_distance * m)
	}

	/// Where the family glide ends for a hub at `hub`.
	pub fn family_position(&self, hub: DVec3, viewport: Viewport) -> DVec3 {
		let z = self.profile(viewport).family_zoom;
		hub + DVec3::new(z, z * self.family_lift, z)
	}
}

/// What the camera should be doing this frame, already in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraGoal {
	Overview,
	/// Focused on a family whose hub is currently at this point.
	Family(DVec3),
	/// Detail view of a node currently at this point.
	Node(DVec3),
	/// Nothing resolvable; keep the current framing.
	Hold,
}

/// A projected point on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
	pub x: f64,
	pub y: f64,
	/// Distance along the view axis, for depth sorting.
	pub depth: f64,
	/// Pixels per world unit at this depth.
	pub scale: f64,
}

/// Camera position and aim, plus the one-shot family glide flag.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
	pub position: DVec3,
	pub look_at: DVec3,
	chasing: bool,
}

impl CameraRig {
	/// A rig resting at the overview vantage point.
	pub fn new(config: &CameraConfig, viewport: Viewport) -> Self {
		Self {
			position: config.overview_position(viewport),
			look_at: DVec3::ZERO,
			chasing: false,
		}
	}

	pub fn is_chasing(&self) -> bool {
		self.chasing
	}

	/// Start a fresh glide towards the focused family's vantage point.
	pub fn arm_chase(&mut self) {
		self.chasing = true;
	}

	/// Ease one frame towards `goal`.
	pub fn update(&mut self, goal: CameraGoal, viewport: Viewport, config: &CameraConfig) {
		match goal {
			CameraGoal::Overview => {
				let s = config.overview_smoothing;
				self.ease_position(config.overview_position(viewport), s);
				self.ease_look(DVec3::ZERO, s);
			}
			CameraGoal::Family(hub) => {
				self.ease_look(hub, config.look_smoothing);
				if self.chasing {
					let ideal = config.family_position(hub, viewport);
					self.ease_position(ideal, config.chase_smoothing);
					if self.position.distance(ideal) < config.chase_stop_distance {
						self.chasing = false;
					}
				}
			}
			CameraGoal::Node(node) => {
				let profile = config.profile(viewport);
				let d = profile.detail_distance;
				let s = config.detail_smoothing;
				self.ease_look(node - DVec3::new(0.0, profile.balance_offset, 0.0), s);
				self.ease_position(node + DVec3::new(d, config.detail_lift, d), s);
			}
			CameraGoal::Hold => {}
		}
	}

	fn ease_position(&mut self, target: DVec3, s: f64) {
		let next = self.position.lerp(target, s);
		if next.is_finite() {
			self.position = next;
		}
	}

	fn ease_look(&mut self, target: DVec3, s: f64) {
		let next = self.look_at.lerp(target, s);
		if next.is_finite() {
			self.look_at = next;
		}
	}

	/// Rotate the camera around its aim point by a pointer drag of `(dx, dy)` px.
	/// Taking over the camera ends any glide in progress.
	pub fn orbit_manually(&mut self, dx: f64, dy: f64, viewport: Viewport, config: &CameraConfig) {
		self.chasing = false;
		let height = viewport.height.max(1.0);
		let offset = self.position - self.look_at;
		let radius = offset.length();
		if radius <= f64::EPSILON {
			return;
		}

		let mut azimuth = offset.x.atan2(offset.z);
		let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
		azimuth -= 2.0 * PI * dx / height * config.rotate_speed;
		polar -= 2.0 * PI * dy / height * config.rotate_speed;
		polar = polar.clamp(1e-3, PI - 1e-3);

		let next = self.look_at
			+ DVec3::new(
				radius * polar.sin() * azimuth.sin(),
				radius * polar.cos(),
				radius * polar.sin() * azimuth.cos(),
			);
		if next.is_finite() {
			self.position = next;
		}
	}

	/// Scale the distance to the aim point by `factor`, within the configured limits.
	pub fn dolly(&mut self, factor: f64, config: &CameraConfig) {
		self.chasing = false;
		if !factor.is_finite() || factor <= 0.0 {
			return;
		}
		let offset = self.position - self.look_at;
		let distance = offset.length();
		if distance <= f64::EPSILON {
			return;
		}
		let target = (distance * factor).clamp(config.min_distance, config.max_distance);
		self.position = self.look_at + offset * (target / distance);
	}

	/// Project `world` onto the canvas. `None` when behind the camera.
	pub fn project(&self, world: DVec3, viewport: Viewport, config: &CameraConfig) -> Option<ScreenPoint> {
		if self.position.distance_squared(self.look_at) <= f64::EPSILON {
			return None;
		}
		let fov = config.fov_degrees.to_radians();
		let view = DMat4::look_at_rh(self.position, self.look_at, DVec3::Y);
		let projection = DMat4::perspective_rh_gl(fov, viewport.aspect(), 0.1, 2000.0);
		let clip: DVec4 = projection * view * world.extend(1.0);
		if !clip.is_finite() || clip.w <= 1e-6 {
			return None;
		}

		let ndc = clip.truncate() / clip.w;
		let scale = viewport.height / (2.0 * (fov / 2.0).tan() * clip.w);
		Some(ScreenPoint {
			x: (ndc.x + 1.0) / 2.0 * viewport.width,
			y: (1.0 - ndc.y) / 2.0 * viewport.height,
			depth: clip.w,
			scale,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DESKTOP: Viewport = Viewport {
		width: 1600.0,
		height: 900.0,
	};
	const PHONE: Viewport = Viewport {
		width: 390.0,
		height: 844.0,
	};

	fn close(a: DVec3, b: DVec3, eps: f64) -> bool {
		(a - b).abs().max_element() < eps
	}

	#[test]
	fn viewport_orientation_and_zero_guard() {
		assert!(PHONE.is_mobile());
		assert!(!DESKTOP.is_mobile());
		assert_eq!(Viewport::new(0.0, 0.0).aspect(), 1.0);
		assert_eq!(Viewport::new(800.0, 0.0).aspect(), 1.0);
	}

	#[test]
	fn overview_vantage_depends_on_orientation() {
		let config = CameraConfig::default();
		assert!(close(
			config.overview_position(DESKTOP),
			DVec3::new(0.0, 30.0, 168.0),
			1e-9
		));
		assert!(close(
			config.overview_position(PHONE),
			DVec3::new(0.0, 30.0, 300.0),
			1e-9
		));
	}

	#[test]
	fn chase_converges_on_the_family_vantage_point() {
		let config = CameraConfig::default();
		let mut rig = CameraRig::new(&config, DESKTOP);
		let hub = DVec3::new(42.0, 18.9, 0.0);
		let ideal = config.family_position(hub, DESKTOP);
		rig.arm_chase();

		let mut previous = rig.position.distance(ideal);
		let mut frames = 0;
		while rig.is_chasing() {
			rig.update(CameraGoal::Family(hub), DESKTOP, &config);
			let current = rig.position.distance(ideal);
			assert!(current < previous, "frame {frames}: {current} >= {previous}");
			previous = current;
			frames += 1;
			assert!(frames < 1000, "chase never converged");
		}
		assert!(rig.position.distance(ideal) < 2.0);

		// Once the glide ends the camera stays put; only the aim keeps tracking.
		let parked = rig.position;
		rig.update(CameraGoal::Family(hub + DVec3::X), DESKTOP, &config);
		assert_eq!(rig.position, parked);
	}

	#[test]
	fn manual_interaction_cancels_the_chase() {
		let config = CameraConfig::default();
		let mut rig = CameraRig::new(&config, DESKTOP);
		rig.arm_chase();
		rig.orbit_manually(20.0, 0.0, DESKTOP, &config);
		assert!(!rig.is_chasing());
		let before = rig.position;
		rig.update(CameraGoal::Family(DVec3::new(10.0, 0.0, 0.0)), DESKTOP, &config);
		assert_eq!(rig.position, before);

		rig.arm_chase();
		rig.dolly(0.5, &config);
		assert!(!rig.is_chasing());
	}

	#[test]
	fn node_detail_frames_from_a_diagonal() {
		let config = CameraConfig::default();
		let mut rig = CameraRig::new(&config, PHONE);
		let node = DVec3::new(5.0, -3.0, 2.0);
		for _ in 0..400 {
			rig.update(CameraGoal::Node(node), PHONE, &config);
		}
		assert!(close(rig.position, node + DVec3::new(9.0, 2.5, 9.0), 1e-6));
		assert!(close(rig.look_at, node - DVec3::new(0.0, 0.4, 0.0), 1e-6));
	}

	#[test]
	fn hold_and_bad_targets_leave_the_rig_untouched() {
		let config = CameraConfig::default();
		let mut rig = CameraRig::new(&config, DESKTOP);
		rig.position = DVec3::new(1.0, 2.0, 3.0);
		let before = rig.clone();
		rig.update(CameraGoal::Hold, DESKTOP, &config);
		assert_eq!(rig, before);
		rig.update(CameraGoal::Node(DVec3::splat(f64::NAN)), DESKTOP, &config);
		assert_eq!(rig, before);
		rig.update(CameraGoal::Overview, Viewport::new(0.0, 0.0), &config);
		assert!(rig.position.is_finite() && rig.look_at.is_finite());
	}

	#[test]
	fn dolly_respects_distance_limits() {
		let config = CameraConfig::default();
		let mut rig = CameraRig::new(&config, DESKTOP);
		rig.dolly(100.0, &config);
		assert!((rig.position.length() - 250.0).abs() < 1e-9);
		rig.dolly(1e-6, &config);
		assert!((rig.position.length() - 1.0).abs() < 1e-9);
		rig.dolly(f64::NAN, &config);
		assert!((rig.position.length() - 1.0).abs() < 1e-9);
	}

	#[test]
	fn orbiting_keeps_the_distance() {
		let config = CameraConfig::default();
		let mut rig = CameraRig::new(&config, DESKTOP);
		let distance = rig.position.distance(rig.look_at);
		rig.orbit_manually(120.0, -40.0, DESKTOP, &config);
		assert!((rig.position.distance(rig.look_at) - distance).abs() < 1e-9);
	}

	#[test]
	fn aim_point_projects_to_the_canvas_center() {
		let config = CameraConfig::default();
		let rig = CameraRig::new(&config, DESKTOP);
		let p = rig.project(DVec3::ZERO, DESKTOP, &config).unwrap();
		assert!((p.x - 800.0).abs() < 1e-6);
		assert!((p.y - 450.0).abs() < 1e-6);
		assert!(p.scale > 0.0);

		// Up in the world is up on screen.
		let above = rig.project(DVec3::new(0.0, 10.0, 0.0), DESKTOP, &config).unwrap();
		assert!(above.y < p.y);

		// Behind the camera.
		assert!(rig.project(DVec3::new(0.0, 30.0, 400.0), DESKTOP, &config).is_none());
	}
}
