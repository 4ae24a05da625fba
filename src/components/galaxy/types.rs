//! Core entities of the archive: families, clusters and inspirations.

use std::f64::consts::PI;
use std::fmt;

use glam::DVec3;
use serde::Deserialize;

use super::theme::Color;

/// One of the four thematic families. The set is fixed at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum Family {
	Aether,
	Void,
	Veris,
	Helios,
}

/// Static description of a family.
#[derive(Clone, Copy, Debug)]
pub struct FamilyDef {
	pub family: Family,
	pub name: &'static str,
	pub domain: &'static str,
	pub base_color: Color,
	pub deep_color: Color,
	/// Phase angle on the shared orbit (radians).
	pub phase: f64,
}

static FAMILY_DEFS: [FamilyDef; 4] = [
	FamilyDef {
		family: Family::Aether,
		name: "Aether",
		domain: "Future & Logic",
		base_color: Color::rgb(0x8d, 0xd1, 0xfe),
		deep_color: Color::rgb(0x00, 0xc2, 0xff),
		phase: 0.0,
	},
	FamilyDef {
		family: Family::Void,
		name: "Void",
		domain: "Dream & Philosophy",
		base_color: Color::rgb(0xf6, 0xb3, 0xc7),
		deep_color: Color::rgb(0x9d, 0x4e, 0xdd),
		phase: PI,
	},
	FamilyDef {
		family: Family::Veris,
		name: "Veris",
		domain: "Life & Nature",
		base_color: Color::rgb(0x8e, 0xf3, 0xc8),
		deep_color: Color::rgb(0x00, 0xff, 0x9d),
		phase: 3.0 * PI / 2.0,
	},
	FamilyDef {
		family: Family::Helios,
		name: "Helios",
		domain: "Passion & Creation",
		base_color: Color::rgb(0xf8, 0xe7, 0xb9),
		deep_color: Color::rgb(0xf8, 0xe7, 0xb9),
		phase: PI / 2.0,
	},
];

impl Family {
	/// All families in definition order.
	pub const ALL: [Family; 4] = [Family::Aether, Family::Void, Family::Veris, Family::Helios];

	pub fn def(self) -> &'static FamilyDef {
		&FAMILY_DEFS[self as usize]
	}

	pub fn name(self) -> &'static str {
		self.def().name
	}

	pub fn phase(self) -> f64 {
		self.def().phase
	}

	/// Look up a family by its display name (case-insensitive).
	pub fn from_name(name: &str) -> Option<Family> {
		Family::ALL
			.into_iter()
			.find(|f| f.name().eq_ignore_ascii_case(name.trim()))
	}
}

impl fmt::Display for Family {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Session-unique cluster identifier, assigned in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u32);

/// A sub-grouping of a family, placed relative to the family hub.
#[derive(Clone, Debug)]
pub struct Cluster {
	pub id: ClusterId,
	pub family: Family,
	pub color: Color,
	/// Offset from the family hub.
	pub center: DVec3,
}

impl Cluster {
	/// Phase angle inherited from the owning family.
	pub fn phase(&self) -> f64 {
		self.family.phase()
	}
}

/// Identifier of an inspiration node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InspirationId(pub String);

impl InspirationId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for InspirationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for InspirationId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

/// Where an inspiration came from. Assigned once at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InspirationKind {
	/// Curated entry shipped with the archive.
	Preset(usize),
	/// Procedurally generated filler; drifts and is never camera-locked.
	Community(usize),
	/// Submitted during this session.
	UserCreated,
}

impl InspirationKind {
	pub fn is_community(self) -> bool {
		matches!(self, InspirationKind::Community(_))
	}
}

/// Medium the inspiration was submitted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
	Text,
	Voice,
	Image,
}

impl ContentType {
	pub fn as_str(self) -> &'static str {
		match self {
			ContentType::Text => "text",
			ContentType::Voice => "voice",
			ContentType::Image => "image",
		}
	}
}

/// A glowing node inside a cluster.
#[derive(Clone, Debug)]
pub struct Inspiration {
	pub id: InspirationId,
	pub kind: InspirationKind,
	pub title: String,
	pub content: String,
	/// Offset from the owning cluster's center.
	pub position: DVec3,
	/// Creation time in milliseconds since the epoch.
	pub timestamp: f64,
	pub cluster_id: ClusterId,
	pub content_type: ContentType,
	/// Base64 image shown for the node.
	pub media: Option<String>,
	/// Base64 audio recording, voice submissions only.
	pub audio: Option<String>,
	/// Label of the variant template when this is a derived link view.
	pub variant: Option<&'static str>,
}
