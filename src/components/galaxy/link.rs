//! Derived "link" inspirations.
//!
//! Every node sprouts a few satellite links. Selecting one shows a transformed
//! variant of the parent's text. Variants are never stored: they are rebuilt
//! from the parent each time, and a link id always splits back to its parent.

use std::f64::consts::TAU;
use std::fmt;

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Inspiration, InspirationId};

/// Separator between the parent id and the variant descriptor.
pub const LINK_SEPARATOR: &str = "_link_";

/// Which ring of satellites a link belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkTier {
	Primary,
	Secondary,
}

impl LinkTier {
	fn tag(self) -> char {
		match self {
			LinkTier::Primary => 'p',
			LinkTier::Secondary => 's',
		}
	}
}

/// Tier plus index within the tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkVariant {
	pub tier: LinkTier,
	pub index: usize,
}

/// A derived view of a parent inspiration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkId {
	pub parent: InspirationId,
	pub variant: LinkVariant,
}

impl LinkId {
	pub fn new(parent: InspirationId, tier: LinkTier, index: usize) -> Self {
		Self {
			parent,
			variant: LinkVariant { tier, index },
		}
	}

	/// Parse `parent_link_<p|s>_<index>`.
	pub fn parse(s: &str) -> Option<Self> {
		let (parent, descriptor) = s.split_once(LINK_SEPARATOR)?;
		let (tag, index) = descriptor.split_once('_')?;
		let tier = match tag {
			"p" => LinkTier::Primary,
			"s" => LinkTier::Secondary,
			_ => return None,
		};
		if parent.is_empty() {
			return None;
		}
		Some(Self::new(
			InspirationId::new(parent),
			tier,
			index.parse().ok()?,
		))
	}

	fn template_index(&self) -> usize {
		let shift = match self.variant.tier {
			LinkTier::Primary => 0,
			LinkTier::Secondary => 2,
		};
		(self.variant.index + shift) % TEMPLATES.len()
	}

	pub fn template(&self) -> &'static VariantTemplate {
		&TEMPLATES[self.template_index()]
	}

	/// Visual treatment of the variant card (1..=3).
	pub fn visual_mode(&self) -> usize {
		self.template_index() % 3 + 1
	}
}

impl fmt::Display for LinkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}{}_{}",
			self.parent,
			LINK_SEPARATOR,
			self.variant.tier.tag(),
			self.variant.index
		)
	}
}

/// What the user has selected: a real node or a derived link.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
	Node(InspirationId),
	Link(LinkId),
}

impl Selection {
	/// Parse a UI id. Anything carrying a well-formed link descriptor is a link.
	pub fn parse(s: &str) -> Self {
		match LinkId::parse(s) {
			Some(link) => Selection::Link(link),
			None => Selection::Node(InspirationId::new(s)),
		}
	}

	/// The stored inspiration this selection resolves through.
	pub fn base_id(&self) -> &InspirationId {
		match self {
			Selection::Node(id) => id,
			Selection::Link(link) => &link.parent,
		}
	}

	/// The link descriptor, including one hiding in a raw node id.
	pub fn link(&self) -> Option<LinkId> {
		match self {
			Selection::Node(id) => LinkId::parse(id.as_str()),
			Selection::Link(link) => Some(link.clone()),
		}
	}
}

impl fmt::Display for Selection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Selection::Node(id) => id.fmt(f),
			Selection::Link(link) => link.fmt(f),
		}
	}
}

/// Text transform applied to a parent to produce a variant.
pub struct VariantTemplate {
	pub name: &'static str,
	title: fn(&str) -> String,
	content: fn(&str) -> String,
}

static TEMPLATES: [VariantTemplate; 4] = [
	VariantTemplate {
		name: "Inverse",
		title: |t| format!("Inverted: {t}"),
		content: |c| {
			let main = c
				.split(['.', ',', '!', '?', ';'])
				.map(str::trim)
				.find(|s| s.chars().count() > 2)
				.unwrap_or(c);
			format!(
				"\"{main}\"... but what if it is only the observer's illusion? On the far side of things the logic may not hold."
			)
		},
	},
	VariantTemplate {
		name: "Decay",
		title: |t| format!("Residue: {}...", t.chars().take(4).collect::<String>()),
		content: |c| {
			let fragmented: String = c
				.chars()
				.enumerate()
				.filter(|(i, _)| i % 3 != 0)
				.map(|(_, ch)| ch)
				.collect();
			format!("Data lost... {fragmented} ...signal source unconfirmed. Memory is dissolving.")
		},
	},
	VariantTemplate {
		name: "Echo",
		title: |t| format!("Echo: {t}"),
		content: |c| {
			let head: String = c.chars().take(10).collect();
			format!(
				"Extrapolated from \"{head}...\": seen from the fifth dimension, the ending was always fixed. An echo from the future."
			)
		},
	},
	VariantTemplate {
		name: "Dream",
		title: |t| format!("Estranged: {t}"),
		content: |c| {
			let reversed: String = c.chars().rev().take(10).collect();
			format!("Dream logic: {c} ... or rather... {reversed}? The border between real and unreal has dissolved.")
		},
	},
];

/// Build the variant view of `parent` for `link`.
pub fn derive(parent: &Inspiration, link: &LinkId) -> Inspiration {
	let template = link.template();
	Inspiration {
		id: InspirationId::new(link.to_string()),
		title: (template.title)(&parent.title),
		content: (template.content)(&parent.content),
		variant: Some(template.name),
		..parent.clone()
	}
}

/// Satellite endpoint relative to its node.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkEndpoint {
	pub id: LinkId,
	pub offset: DVec3,
	pub size: f64,
	/// Start of the connecting segment (node origin or the primary endpoint).
	pub anchor: DVec3,
}

/// All satellites of one node. Deterministic per inspiration id.
#[derive(Clone, Debug, Default)]
pub struct LinkSet {
	pub primary: Vec<LinkEndpoint>,
	pub secondary: Vec<LinkEndpoint>,
}

impl LinkSet {
	pub fn for_inspiration(ins: &Inspiration) -> Self {
		let mut rng = StdRng::seed_from_u64(seed_for(ins.id.as_str()));
		let outward = ins.position.normalize_or_zero();
		let mut set = Self::default();

		let count = rng.gen_range(2..=5);
		for i in 0..count {
			let mut dir = random_direction(&mut rng);
			if dir.dot(outward) < -0.1 {
				dir = -dir;
			}
			let end = dir * rng.gen_range(2.0..4.5_f64);
			let size = rng.gen_range(0.16..0.36_f64) * 1.5;
			set.primary.push(LinkEndpoint {
				id: LinkId::new(ins.id.clone(), LinkTier::Primary, i),
				offset: end,
				size,
				anchor: DVec3::ZERO,
			});

			if rng.gen_bool(0.33) {
				for _ in 0..rng.gen_range(1..=3) {
					let offset = end + random_direction(&mut rng) * rng.gen_range(1.0..2.5_f64);
					let index = set.secondary.len();
					set.secondary.push(LinkEndpoint {
						id: LinkId::new(ins.id.clone(), LinkTier::Secondary, index),
						offset,
						size: size * 0.6,
						anchor: end,
					});
				}
			}
		}
		set
	}

	pub fn iter(&self) -> impl Iterator<Item = &LinkEndpoint> {
		self.primary.iter().chain(self.secondary.iter())
	}
}

fn seed_for(id: &str) -> u64 {
	// FNV-1a keeps link geometry stable for a given id across sessions.
	id.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
		(hash ^ b as u64).wrapping_mul(0x0100_0000_01b3)
	})
}

fn random_direction(rng: &mut impl Rng) -> DVec3 {
	let theta = TAU * rng.r#gen::<f64>();
	let phi = (2.0 * rng.r#gen::<f64>() - 1.0).acos();
	DVec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}
