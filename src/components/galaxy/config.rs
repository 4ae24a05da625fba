//! Session tunables.
//!
//! Every field defaults to the values the archive ships with, so a page can
//! override a single number with a partial JSON object.

use log::warn;
use serde::Deserialize;

use super::camera::CameraConfig;
use super::layout::LayoutConfig;
use super::orbit::OrbitParams;
use super::rotation::RotationConfig;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
	pub orbit: OrbitParams,
	pub rotation: RotationConfig,
	pub layout: LayoutConfig,
	pub camera: CameraConfig,
}

impl GalaxyConfig {
	/// Parse a (possibly partial) JSON override. Invalid input yields the defaults.
	pub fn from_json(json: &str) -> Self {
		match serde_json::from_str(json) {
			Ok(config) => config,
			Err(e) => {
				warn!("nebula-archive: ignoring invalid config: {}", e);
				Self::default()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_overrides_keep_other_defaults() {
		let config = GalaxyConfig::from_json(
			r#"{ "orbit": { "rx": 50.0 }, "rotation": { "idle_drift": 0.0 }, "layout": { "community_shell": [10.0, 12.0] } }"#,
		);
		assert_eq!(config.orbit.rx, 50.0);
		assert_eq!(config.orbit.rz, 28.0);
		assert_eq!(config.rotation.idle_drift, 0.0);
		assert_eq!(config.rotation.decay, 0.95);
		assert_eq!(config.layout.community_shell, (10.0, 12.0));
		assert_eq!(config.camera, CameraConfig::default());
	}

	#[test]
	fn garbage_falls_back_to_defaults() {
		assert_eq!(GalaxyConfig::from_json("{ nope"), GalaxyConfig::default());
		assert_eq!(GalaxyConfig::from_json("{}"), GalaxyConfig::default());
	}
}
