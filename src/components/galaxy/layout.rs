//! Procedural placement of clusters and seed inspirations.
//!
//! Runs once per session. Each family receives a handful of clusters scattered
//! around its hub, then the curated presets and the community filler are
//! dropped into random clusters of their family. Nothing here is reproducible
//! across sessions unless the caller seeds the RNG.

use std::f64::consts::TAU;

use glam::DVec3;
use log::info;
use rand::Rng;
use serde::Deserialize;

use super::types::{Cluster, ClusterId, ContentType, Family, Inspiration, InspirationId, InspirationKind};

/// Tunables for the layout generator.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Fewest clusters per family.
	pub clusters_min: usize,
	/// Most clusters per family (inclusive).
	pub clusters_max: usize,
	/// Base half-extent of the box cluster centers are drawn from.
	pub cluster_spread: f64,
	/// Per-axis stretch of that box.
	pub axis_scale: [f64; 3],
	/// Full width of the HSL jitter applied to each cluster color channel.
	pub color_jitter: f64,
	/// Full width of the per-axis offset of a node inside its cluster.
	pub node_jitter: f64,
	/// Community items synthesized per family.
	pub community_per_family: usize,
	/// Inner and outer radius of the shell community items sit on.
	pub community_shell: (f64, f64),
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			clusters_min: 3,
			clusters_max: 5,
			cluster_spread: 5.5,
			axis_scale: [2.8, 2.8, 3.6],
			color_jitter: 0.05,
			node_jitter: 3.0,
			community_per_family: 10,
			community_shell: (16.0, 26.0),
		}
	}
}

struct Preset {
	family: Family,
	title: &'static str,
	content: &'static str,
}

const PRESETS: [Preset; 12] = [
	Preset {
		family: Family::Aether,
		title: "Digital Horizon",
		content: "Algorithms brood in the void; at the end of logic lies an endless poem.",
	},
	Preset {
		family: Family::Aether,
		title: "Entropy Protocol",
		content: "In the flood of chaotic data we search for the one ordered structure.",
	},
	Preset {
		family: Family::Aether,
		title: "Entanglement",
		content: "Billions of light years apart, this thought still resonates with yours.",
	},
	Preset {
		family: Family::Void,
		title: "Abyssal Echo",
		content: "When you gaze at the cosmos, the stars look back in units of light years.",
	},
	Preset {
		family: Family::Void,
		title: "Stardust Murmur",
		content: "In the seams of this dimension, dreams are harder than waking.",
	},
	Preset {
		family: Family::Void,
		title: "Eternal Hush",
		content: "Silence is not emptiness but the rest between every sound.",
	},
	Preset {
		family: Family::Veris,
		title: "Void Bloom",
		content: "Life blossoms at absolute zero, defying the fate of entropy.",
	},
	Preset {
		family: Family::Veris,
		title: "Rings of Time",
		content: "Each dying star is one more ring carved into the trunk of the universe.",
	},
	Preset {
		family: Family::Veris,
		title: "Carbon Miracle",
		content: "We are breathing stardust, briefly granted a mind.",
	},
	Preset {
		family: Family::Helios,
		title: "First Spark",
		content: "In a moment of burning passion a new universe is born in the mind.",
	},
	Preset {
		family: Family::Helios,
		title: "Photon Storm",
		content: "Inspiration flares and lights the unknown dark in an instant.",
	},
	Preset {
		family: Family::Helios,
		title: "Stellar Pulse",
		content: "A heartbeat in step with gravity waves, playing a silent rhapsody.",
	},
];

const COMMUNITY_LINES: [&str; 10] = [
	"Greetings from another timeline.",
	"Is this a lonely stretch of stars too?",
	"We are looking for a lost signal.",
	"Light is the only language.",
	"Memory is the backup of the soul.",
	"Every atom is a universe.",
	"Do you hear it? The pulse of the void.",
	"We met inside a dream.",
	"Entropy is the gentlest embrace of the cosmos.",
	"Do not forget how this moment moved you.",
];

/// Static placement produced once at session start.
#[derive(Clone, Debug, Default)]
pub struct Layout {
	pub clusters: Vec<Cluster>,
	/// Curated presets followed by community filler, in creation order.
	pub inspirations: Vec<Inspiration>,
}

impl Layout {
	/// Generate clusters, presets and community items.
	pub fn generate(config: &LayoutConfig, rng: &mut impl Rng, now_ms: f64) -> Self {
		let clusters = generate_clusters(config, rng);
		let mut layout = Self {
			clusters,
			inspirations: Vec::new(),
		};

		for (index, preset) in PRESETS.iter().enumerate() {
			let Some(cluster_id) = layout.random_cluster_of(preset.family, rng) else {
				continue;
			};
			layout.inspirations.push(Inspiration {
				id: InspirationId::new(format!("preset-{index}")),
				kind: InspirationKind::Preset(index),
				title: preset.title.to_string(),
				content: preset.content.to_string(),
				position: jitter_offset(config.node_jitter, rng),
				timestamp: now_ms - rng.gen_range(0.0..1e8_f64).floor(),
				cluster_id,
				content_type: ContentType::Text,
				media: None,
				audio: None,
				variant: None,
			});
		}

		let mut community_index = 0;
		for family in Family::ALL {
			for _ in 0..config.community_per_family {
				let Some(cluster_id) = layout.random_cluster_of(family, rng) else {
					break;
				};
				layout.inspirations.push(Inspiration {
					id: InspirationId::new(format!("community-{community_index}")),
					kind: InspirationKind::Community(community_index),
					title: format!("Echo from {family}"),
					content: COMMUNITY_LINES[community_index % COMMUNITY_LINES.len()].to_string(),
					position: shell_offset(config.community_shell, rng),
					timestamp: now_ms - rng.gen_range(0.0..1e10_f64),
					cluster_id,
					content_type: ContentType::Text,
					media: None,
					audio: None,
					variant: None,
				});
				community_index += 1;
			}
		}

		info!(
			"nebula-archive: layout generated {} clusters, {} inspirations",
			layout.clusters.len(),
			layout.inspirations.len()
		);
		layout
	}

	pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
		self.clusters.iter().find(|c| c.id == id)
	}

	pub fn clusters_of(&self, family: Family) -> impl Iterator<Item = &Cluster> {
		self.clusters.iter().filter(move |c| c.family == family)
	}

	/// Pick a random cluster of `family`, or `None` if it has none.
	pub fn random_cluster_of(&self, family: Family, rng: &mut impl Rng) -> Option<ClusterId> {
		let pool: Vec<ClusterId> = self.clusters_of(family).map(|c| c.id).collect();
		if pool.is_empty() {
			return None;
		}
		Some(pool[rng.gen_range(0..pool.len())])
	}
}

fn generate_clusters(config: &LayoutConfig, rng: &mut impl Rng) -> Vec<Cluster> {
	let min = config.clusters_min.min(config.clusters_max);
	let max = config.clusters_max.max(min);
	let mut clusters = Vec::new();
	let mut next_id = 0u32;

	for family in Family::ALL {
		let count = rng.gen_range(min..=max);
		for _ in 0..count {
			let mut axis = |scale: f64| (rng.r#gen::<f64>() - 0.5) * config.cluster_spread * scale;
			let center = DVec3::new(
				axis(config.axis_scale[0]),
				axis(config.axis_scale[1]),
				axis(config.axis_scale[2]),
			);
			let j = config.color_jitter;
			let color = family.def().deep_color.offset_hsl(
				(rng.r#gen::<f64>() - 0.5) * j,
				(rng.r#gen::<f64>() - 0.5) * j,
				(rng.r#gen::<f64>() - 0.5) * j,
			);
			clusters.push(Cluster {
				id: ClusterId(next_id),
				family,
				color,
				center,
			});
			next_id += 1;
		}
	}
	clusters
}

/// Uniform offset in a cube of side `width` centered on the origin.
pub(crate) fn jitter_offset(width: f64, rng: &mut impl Rng) -> DVec3 {
	DVec3::new(
		(rng.r#gen::<f64>() - 0.5) * width,
		(rng.r#gen::<f64>() - 0.5) * width,
		(rng.r#gen::<f64>() - 0.5) * width,
	)
}

/// Uniformly oriented point on a shell with radius in `[inner, outer)`.
fn shell_offset((inner, outer): (f64, f64), rng: &mut impl Rng) -> DVec3 {
	let r = if outer > inner {
		rng.gen_range(inner..outer)
	} else {
		inner
	};
	let theta = rng.gen_range(0.0..TAU);
	let phi = (2.0 * rng.r#gen::<f64>() - 1.0).acos();
	DVec3::new(
		r * phi.sin() * theta.cos(),
		r * phi.sin() * theta.sin(),
		r * phi.cos(),
	)
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn layout(seed: u64) -> Layout {
		let mut rng = StdRng::seed_from_u64(seed);
		Layout::generate(&LayoutConfig::default(), &mut rng, 1_700_000_000_000.0)
	}

	#[test]
	fn three_to_five_clusters_per_family() {
		for seed in 0..20 {
			let layout = layout(seed);
			for family in Family::ALL {
				let n = layout.clusters_of(family).count();
				assert!((3..=5).contains(&n), "seed {seed}: {family} has {n}");
			}
		}
	}

	#[test]
	fn cluster_ids_are_unique_and_monotonic() {
		let layout = layout(7);
		let ids: Vec<u32> = layout.clusters.iter().map(|c| c.id.0).collect();
		let expected: Vec<u32> = (0..ids.len() as u32).collect();
		assert_eq!(ids, expected);
	}

	#[test]
	fn every_inspiration_references_a_cluster_of_its_family() {
		let layout = layout(11);
		assert_eq!(layout.inspirations.len(), 12 + 40);
		for ins in &layout.inspirations {
			let cluster = layout
				.cluster(ins.cluster_id)
				.expect("inspiration points at a missing cluster");
			match ins.kind {
				InspirationKind::Preset(i) => assert_eq!(cluster.family, PRESETS[i].family),
				InspirationKind::Community(i) => {
					assert_eq!(cluster.family, Family::ALL[i / 10]);
				}
				InspirationKind::UserCreated => panic!("layout never creates user items"),
			}
		}
		let ids: HashSet<_> = layout.inspirations.iter().map(|i| i.id.clone()).collect();
		assert_eq!(ids.len(), layout.inspirations.len());
	}

	#[test]
	fn offsets_stay_in_bounds() {
		let config = LayoutConfig::default();
		let layout = layout(3);
		for cluster in &layout.clusters {
			assert!(cluster.center.x.abs() <= 5.5 * 2.8 / 2.0);
			assert!(cluster.center.y.abs() <= 5.5 * 2.8 / 2.0);
			assert!(cluster.center.z.abs() <= 5.5 * 3.6 / 2.0);
		}
		for ins in &layout.inspirations {
			let len = ins.position.length();
			match ins.kind {
				InspirationKind::Community(_) => {
					assert!(len >= config.community_shell.0 - 1e-9);
					assert!(len < config.community_shell.1 + 1e-9);
				}
				_ => assert!(ins.position.abs().max_element() <= config.node_jitter / 2.0),
			}
		}
	}

	#[test]
	fn families_without_clusters_are_skipped() {
		let config = LayoutConfig {
			clusters_min: 0,
			clusters_max: 0,
			..Default::default()
		};
		let mut rng = StdRng::seed_from_u64(1);
		let layout = Layout::generate(&config, &mut rng, 0.0);
		assert!(layout.clusters.is_empty());
		assert!(layout.inspirations.is_empty());
	}
}
