//! The insertion-ordered collection of inspirations.
//!
//! Entries are only ever added or have their media replaced. Lookups go through
//! [`Selection`] so that derived links resolve through their parent.

use indexmap::IndexMap;
use rand::Rng;
use thiserror::Error;

use super::layout::{Layout, jitter_offset};
use super::link::{self, Selection};
use super::types::{ContentType, Family, Inspiration, InspirationId, InspirationKind};

/// Failures of archive mutations. The frame loop never sees these.
#[derive(Debug, Error, PartialEq)]
pub enum ArchiveError {
	#[error("no inspiration with id {0}")]
	UnknownInspiration(String),
	#[error("the layout has no clusters to place an inspiration in")]
	NoClusters,
}

/// Title and body for a new submission, derived locally from what the user typed.
#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
	pub title: String,
	pub content: String,
}

const FALLBACK_TITLE: &str = "Stardust Thought";
const UNTITLED_IMAGE: &str = "Nameless Fragment";
const UNDESCRIBED_IMAGE: &str = "A glimpse caught in passing, waiting for its words.";

impl Caption {
	/// Caption typed text: the first few words become the title.
	pub fn text(text: &str) -> Self {
		let words: Vec<&str> = text.split_whitespace().take(3).collect();
		let title = if words.is_empty() {
			FALLBACK_TITLE.to_string()
		} else {
			words.join(" ")
		};
		Self {
			title,
			content: text.trim().to_string(),
		}
	}

	/// Caption an uploaded image from the note typed beside it, if any.
	pub fn image(note: &str) -> Self {
		if note.trim().is_empty() {
			return Self {
				title: UNTITLED_IMAGE.to_string(),
				content: UNDESCRIBED_IMAGE.to_string(),
			};
		}
		Self::text(note)
	}
}

/// A new inspiration awaiting placement.
#[derive(Clone, Debug)]
pub struct Submission {
	pub content_type: ContentType,
	pub title: String,
	pub content: String,
	pub media: Option<String>,
	pub audio: Option<String>,
}

impl Submission {
	pub fn text(text: &str) -> Self {
		let Caption { title, content } = Caption::text(text);
		Self {
			content_type: ContentType::Text,
			title,
			content,
			media: None,
			audio: None,
		}
	}

	/// An uploaded picture; `media` is its base64 payload.
	pub fn image(media: String, note: &str) -> Self {
		let Caption { title, content } = Caption::image(note);
		Self {
			content_type: ContentType::Image,
			title,
			content,
			media: Some(media),
			audio: None,
		}
	}
}

/// Insertion-ordered store of every known inspiration.
#[derive(Clone, Debug, Default)]
pub struct Archive {
	entries: IndexMap<InspirationId, Inspiration>,
}

impl Archive {
	pub fn new(seed: impl IntoIterator<Item = Inspiration>) -> Self {
		Self {
			entries: seed.into_iter().map(|i| (i.id.clone(), i)).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Inspiration> {
		self.entries.values()
	}

	pub fn get(&self, id: &InspirationId) -> Option<&Inspiration> {
		self.entries.get(id)
	}

	/// The stored inspiration behind a selection (the parent, for links).
	pub fn resolve_base(&self, selection: &Selection) -> Option<&Inspiration> {
		match selection {
			Selection::Node(id) => match self.entries.get(id) {
				Some(ins) => Some(ins),
				None => match Selection::parse(id.as_str()) {
					Selection::Link(link) => self.entries.get(&link.parent),
					Selection::Node(_) => None,
				},
			},
			Selection::Link(link) => self.entries.get(&link.parent),
		}
	}

	/// What the detail view shows: the node itself or its derived variant.
	pub fn resolve(&self, selection: &Selection) -> Option<Inspiration> {
		match selection {
			Selection::Node(id) => match self.entries.get(id) {
				Some(ins) => Some(ins.clone()),
				None => match Selection::parse(id.as_str()) {
					link @ Selection::Link(_) => self.resolve(&link),
					Selection::Node(_) => None,
				},
			},
			Selection::Link(link) => self.entries.get(&link.parent).map(|p| link::derive(p, link)),
		}
	}

	/// Place a new user inspiration in a random cluster of `family`.
	pub fn submit(
		&mut self,
		submission: Submission,
		family: Family,
		layout: &Layout,
		jitter: f64,
		rng: &mut impl Rng,
		now_ms: f64,
	) -> Result<InspirationId, ArchiveError> {
		let cluster_id = match layout.random_cluster_of(family, rng) {
			Some(id) => id,
			None if layout.clusters.is_empty() => return Err(ArchiveError::NoClusters),
			None => layout.clusters[rng.gen_range(0..layout.clusters.len())].id,
		};

		let mut id = random_token(rng);
		while self.entries.contains_key(&id) {
			id = random_token(rng);
		}

		self.entries.insert(
			id.clone(),
			Inspiration {
				id: id.clone(),
				kind: InspirationKind::UserCreated,
				title: submission.title,
				content: submission.content,
				position: jitter_offset(jitter, rng),
				timestamp: now_ms,
				cluster_id,
				content_type: submission.content_type,
				media: submission.media,
				audio: submission.audio,
				variant: None,
			},
		);
		Ok(id)
	}

	/// Replace the visual media of the inspiration behind `selection`.
	pub fn update_media(&mut self, selection: &Selection, media: String) -> Result<(), ArchiveError> {
		let id = self
			.resolve_base(selection)
			.map(|ins| ins.id.clone())
			.ok_or_else(|| ArchiveError::UnknownInspiration(selection.to_string()))?;
		if let Some(entry) = self.entries.get_mut(&id) {
			entry.media = Some(media);
		}
		Ok(())
	}

	/// Case-insensitive match on title, content or content type.
	pub fn search(&self, query: &str) -> Vec<&Inspiration> {
		let query = query.trim().to_lowercase();
		if query.is_empty() {
			return Vec::new();
		}
		self.entries
			.values()
			.filter(|ins| {
				ins.title.to_lowercase().contains(&query)
					|| ins.content.to_lowercase().contains(&query)
					|| ins.content_type.as_str().contains(&query)
			})
			.collect()
	}
}

/// Seeded "resonance" count shown on curated and community cards.
/// Fresh user submissions start at zero.
pub fn resonance(ins: &Inspiration) -> u32 {
	if ins.kind == InspirationKind::UserCreated {
		return 0;
	}
	let hash = ins
		.id
		.as_str()
		.chars()
		.fold(0i32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32));
	hash.unsigned_abs() % 1001
}

fn random_token(rng: &mut impl Rng) -> InspirationId {
	const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
	let token: String = (0..9)
		.map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
		.collect();
	InspirationId::new(token)
}
