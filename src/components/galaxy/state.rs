//! Session state and interaction tracking.
//!
//! One [`GalaxyState`] exists per active session. It owns the layout, the
//! archive, the rotation integrator, the view state machine and the camera
//! rig, and it is the only thing the frame loop and the DOM handlers touch.
//! Everything runs on the browser's main thread inside those callbacks.

use std::collections::{HashMap, HashSet};

use glam::DVec3;
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::archive::{self, Archive, ArchiveError, Submission};
use super::camera::{CameraGoal, CameraRig, ScreenPoint, Viewport};
use super::config::GalaxyConfig;
use super::layout::Layout;
use super::link::{LinkId, LinkSet, Selection};
use super::navigation::{NavEvent, ViewState};
use super::rotation::RotationState;
use super::theme::Color;
use super::types::{Cluster, ClusterId, Family, Inspiration, InspirationId, InspirationKind};

/// World-space hit radii, widened to [`MIN_HIT_PX`] on screen.
const CLUSTER_HIT_RADIUS: f64 = 3.5;
const NODE_HIT_RADIUS: f64 = 0.45;
const COMMUNITY_HIT_RADIUS: f64 = 0.6;
const MIN_HIT_PX: f64 = 8.0;

/// Slow spin of community stars around their cluster (radians per second).
const COMMUNITY_DRIFT_SPEED: f64 = 0.05;

/// Something under the pointer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitTarget {
	Link(LinkId),
	Node(InspirationId),
	Community(InspirationId),
	Cluster(Family, ClusterId),
}

/// Tracks the pointer between press and release.
#[derive(Clone, Debug, Default)]
pub struct PointerState {
	pub down: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub last_x: f64,
	pub last_y: f64,
}

impl PointerState {
	fn travel(&self, x: f64, y: f64) -> f64 {
		(x - self.start_x).hypot(y - self.start_y)
	}
}

/// Smoothed hover glow with a short hold, so skimming the edge of a node does
/// not make it flicker.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub hovered: Option<HitTarget>,
	intensity: HashMap<HitTarget, f64>,
	hold_timer: HashMap<HitTarget, f64>,
}

/// Seconds a hover glow is held before it may fade.
const MIN_HOLD_TIME: f64 = 0.12;

impl HoverState {
	pub fn set(&mut self, target: Option<HitTarget>) {
		if self.hovered == target {
			return;
		}
		if let Some(t) = &target {
			self.hold_timer.insert(t.clone(), MIN_HOLD_TIME);
		}
		self.hovered = target;
	}

	/// Exponential smoothing: value += (target - value) * (1 - e^(-speed * dt)).
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0;
		const FADE_OUT_SPEED: f64 = 4.0;
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		if let Some(t) = &self.hovered {
			let v = self.intensity.entry(t.clone()).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}

		let hovered = self.hovered.clone();
		self.hold_timer.retain(|t, timer| {
			if Some(t) == hovered.as_ref() {
				return true;
			}
			*timer -= dt;
			*timer > 0.0
		});
		self.intensity.retain(|t, v| {
			if Some(t) == hovered.as_ref() {
				return true;
			}
			if self.hold_timer.get(t).copied().unwrap_or(0.0) <= 0.0 {
				*v *= fade_out;
			}
			*v > 0.005
		});
	}

	pub fn intensity(&self, target: &HitTarget) -> f64 {
		self.intensity.get(target).copied().unwrap_or(0.0)
	}
}

/// The whole mutable session.
pub struct GalaxyState {
	pub config: GalaxyConfig,
	pub layout: Layout,
	pub archive: Archive,
	pub rotation: RotationState,
	pub view: ViewState,
	pub camera: CameraRig,
	pub viewport: Viewport,
	pub pointer: PointerState,
	pub hover: HoverState,
	pub show_links: bool,
	pub community_mode: bool,
	/// Sidebar search text; empty shows everything.
	pub query: String,
	/// Seconds since the session started.
	pub time: f64,
	links: HashMap<InspirationId, LinkSet>,
	rng: StdRng,
}

impl GalaxyState {
	pub fn new(config: GalaxyConfig, viewport: Viewport, seed: u64, now_ms: f64) -> Self {
		let mut rng = StdRng::seed_from_u64(seed);
		let layout = Layout::generate(&config.layout, &mut rng, now_ms);
		let archive = Archive::new(layout.inspirations.iter().cloned());
		let links = archive
			.iter()
			.filter(|ins| !ins.kind.is_community())
			.map(|ins| (ins.id.clone(), LinkSet::for_inspiration(ins)))
			.collect();
		let camera = CameraRig::new(&config.camera, viewport);

		Self {
			config,
			layout,
			archive,
			rotation: RotationState::default(),
			view: ViewState::Overview,
			camera,
			viewport,
			pointer: PointerState::default(),
			hover: HoverState::default(),
			show_links: false,
			community_mode: false,
			query: String::new(),
			time: 0.0,
			links,
			rng,
		}
	}

	/// Advance one frame: spin first, then the camera reads this frame's positions.
	pub fn tick(&mut self, dt: f64) {
		self.time += dt;
		self.rotation
			.integrate(self.view.is_overview(), &self.config.rotation);
		let goal = self.camera_goal();
		self.camera.update(goal, self.viewport, &self.config.camera);
		self.hover.tick(dt);
	}

	pub fn camera_goal(&self) -> CameraGoal {
		match &self.view {
			ViewState::Overview => CameraGoal::Overview,
			ViewState::FamilyFocused { family } => CameraGoal::Family(self.hub_position(*family)),
			ViewState::NodeDetail { selection, .. } => match self.archive.resolve_base(selection) {
				// Community stars drift; the camera stays wide instead of chasing them.
				Some(ins) if ins.kind.is_community() => CameraGoal::Overview,
				Some(ins) => self
					.node_world_position(ins)
					.map_or(CameraGoal::Hold, CameraGoal::Node),
				None => CameraGoal::Hold,
			},
		}
	}

	pub fn hub_position(&self, family: Family) -> DVec3 {
		self.config.orbit.position(family.phase(), self.rotation.angle)
	}

	/// Hub position by display name; unknown names sit at the origin.
	pub fn hub_position_by_name(&self, name: &str) -> DVec3 {
		Family::from_name(name).map_or(DVec3::ZERO, |f| self.hub_position(f))
	}

	pub fn cluster_world_position(&self, cluster: &Cluster) -> DVec3 {
		self.hub_position(cluster.family) + cluster.center
	}

	/// Hub + cluster center + node offset, or `None` for a dangling cluster id.
	pub fn node_world_position(&self, ins: &Inspiration) -> Option<DVec3> {
		let cluster = self.layout.cluster(ins.cluster_id)?;
		let offset = if ins.kind.is_community() {
			let angle = self.time * COMMUNITY_DRIFT_SPEED;
			let (sin, cos) = angle.sin_cos();
			let p = ins.position;
			DVec3::new(p.x * cos - p.z * sin, p.y, p.x * sin + p.z * cos)
		} else {
			ins.position
		};
		Some(self.cluster_world_position(cluster) + offset)
	}

	pub fn family_of(&self, selection: &Selection) -> Option<Family> {
		let ins = self.archive.resolve_base(selection)?;
		self.layout.cluster(ins.cluster_id).map(|c| c.family)
	}

	pub fn links_of(&self, id: &InspirationId) -> Option<&LinkSet> {
		self.links.get(id)
	}

	/// Clusters drawn in the current view: the focused family's, or all of them.
	pub fn visible_clusters(&self) -> impl Iterator<Item = &Cluster> {
		let focus = self.view.family();
		self.layout
			.clusters
			.iter()
			.filter(move |c| focus.is_none_or(|f| f == c.family))
	}

	/// Stored, non-community nodes inside the visible clusters.
	pub fn visible_nodes(&self) -> impl Iterator<Item = &Inspiration> {
		let visible: HashSet<ClusterId> = self.visible_clusters().map(|c| c.id).collect();
		self.archive
			.iter()
			.filter(move |ins| !ins.kind.is_community() && visible.contains(&ins.cluster_id))
	}

	/// Community stars, shown only in overview while community mode is on.
	pub fn visible_community(&self) -> impl Iterator<Item = &Inspiration> {
		let shown = self.community_mode && self.view.family().is_none();
		self.archive
			.iter()
			.filter(move |ins| shown && ins.kind.is_community())
	}

	pub fn project(&self, world: DVec3) -> Option<ScreenPoint> {
		self.camera
			.project(world, self.viewport, &self.config.camera)
	}

	/// Topmost target under `(x, y)`: links, then nodes, then community stars,
	/// then clusters.
	pub fn hit_test(&self, x: f64, y: f64) -> Option<HitTarget> {
		let within = |world: DVec3, radius: f64| -> Option<f64> {
			let p = self.project(world)?;
			let d = (p.x - x).hypot(p.y - y);
			(d <= (radius * p.scale).max(MIN_HIT_PX)).then_some(d)
		};
		let closest = |hits: Vec<(f64, HitTarget)>| {
			hits.into_iter()
				.min_by(|a, b| a.0.total_cmp(&b.0))
				.map(|(_, t)| t)
		};

		if self.show_links {
			let mut hits = Vec::new();
			for ins in self.visible_nodes() {
				let (Some(base), Some(set)) = (self.node_world_position(ins), self.links.get(&ins.id))
				else {
					continue;
				};
				for end in set.iter() {
					if let Some(d) = within(base + end.offset, end.size) {
						hits.push((d, HitTarget::Link(end.id.clone())));
					}
				}
			}
			if let Some(t) = closest(hits) {
				return Some(t);
			}
		}

		let nodes = self
			.visible_nodes()
			.filter_map(|ins| {
				let d = within(self.node_world_position(ins)?, NODE_HIT_RADIUS)?;
				Some((d, HitTarget::Node(ins.id.clone())))
			})
			.collect();
		if let Some(t) = closest(nodes) {
			return Some(t);
		}

		let community = self
			.visible_community()
			.filter_map(|ins| {
				let d = within(self.node_world_position(ins)?, COMMUNITY_HIT_RADIUS)?;
				Some((d, HitTarget::Community(ins.id.clone())))
			})
			.collect();
		if let Some(t) = closest(community) {
			return Some(t);
		}

		let clusters = self
			.visible_clusters()
			.filter_map(|c| {
				let d = within(self.cluster_world_position(c), CLUSTER_HIT_RADIUS)?;
				Some((d, HitTarget::Cluster(c.family, c.id)))
			})
			.collect();
		closest(clusters)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.pointer = PointerState {
			down: true,
			start_x: x,
			start_y: y,
			last_x: x,
			last_y: y,
		};
		if self.view.is_overview() {
			self.rotation.begin_drag(x);
		}
	}

	/// Drag spins the galaxy in overview and orbits the camera elsewhere.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.pointer.down {
			let target = self.hit_test(x, y);
			self.hover.set(target);
			return;
		}
		let (dx, dy) = (x - self.pointer.last_x, y - self.pointer.last_y);
		self.pointer.last_x = x;
		self.pointer.last_y = y;
		if self.rotation.is_dragging() {
			self.rotation.drag_to(x, &self.config.rotation);
		} else if dx != 0.0 || dy != 0.0 {
			self.camera
				.orbit_manually(dx, dy, self.viewport, &self.config.camera);
		}
	}

	/// Finish a press. Returns whether the view changed.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
		if !self.pointer.down {
			return false;
		}
		let travel = self.pointer.travel(x, y);
		self.pointer_leave();

		let event = match self.hit_test(x, y) {
			Some(HitTarget::Link(link)) => NavEvent::NodeClicked {
				selection: Selection::Link(link),
				travel,
			},
			Some(HitTarget::Node(id)) => NavEvent::NodeClicked {
				selection: Selection::Node(id),
				travel,
			},
			Some(HitTarget::Community(id)) => NavEvent::CommunitySelected { id, travel },
			Some(HitTarget::Cluster(family, _)) => NavEvent::ClusterClicked { family, travel },
			None => return false,
		};
		self.apply(event)
	}

	/// Abandon a press without clicking.
	pub fn pointer_leave(&mut self) {
		self.pointer.down = false;
		self.rotation.end_drag();
	}

	/// Feed an event through the view state machine and fire its side effects.
	pub fn apply(&mut self, event: NavEvent) -> bool {
		let Some(transition) = self.view.transition(event, |sel| self.family_of(sel)) else {
			return false;
		};
		if transition.freeze_rotation {
			self.rotation.freeze();
			self.rotation.end_drag();
		}
		if transition.arm_chase {
			self.camera.arm_chase();
		}
		self.view = transition.next;
		true
	}

	pub fn back(&mut self) -> bool {
		self.apply(NavEvent::Back)
	}

	pub fn deselect(&mut self) -> bool {
		self.apply(NavEvent::Deselect)
	}

	/// Sidebar pick: toggles the selection without touching the focus.
	pub fn select_from_list(&mut self, id: &str) -> bool {
		let selection = Selection::parse(id);
		if self.archive.resolve_base(&selection).is_none() {
			warn!("nebula-archive: ignoring selection of unknown id {}", id);
			return false;
		}
		self.apply(NavEvent::ToggleSelection(selection))
	}

	/// Start the session over from the wide view. The archive survives.
	pub fn restart(&mut self) {
		self.rotation.reset();
		self.view = ViewState::Overview;
		self.pointer = PointerState::default();
		self.hover = HoverState::default();
		self.query.clear();
		debug!("nebula-archive: session restarted");
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport::new(width, height);
	}

	/// Wheel zoom; positive `delta_y` moves away.
	pub fn zoom(&mut self, delta_y: f64) {
		let factor = (delta_y * 0.001).exp();
		self.camera.dolly(factor, &self.config.camera);
	}

	pub fn toggle_links(&mut self) {
		self.show_links = !self.show_links;
	}

	pub fn set_query(&mut self, query: &str) {
		self.query = query.to_string();
	}

	pub fn toggle_community(&mut self) {
		self.community_mode = !self.community_mode;
	}

	/// Add a submission to the focused family (Aether when unfocused) and open it.
	pub fn submit(&mut self, submission: Submission, now_ms: f64) -> Result<InspirationId, ArchiveError> {
		let family = self.view.family().unwrap_or(Family::Aether);
		let id = self.archive.submit(
			submission,
			family,
			&self.layout,
			self.config.layout.node_jitter,
			&mut self.rng,
			now_ms,
		)?;
		if let Some(ins) = self.archive.get(&id) {
			self.links.insert(id.clone(), LinkSet::for_inspiration(ins));
		}
		debug!("nebula-archive: new inspiration {} in {}", id, family);
		self.apply(NavEvent::ToggleSelection(Selection::Node(id.clone())));
		Ok(id)
	}

	pub fn update_media(&mut self, selection: &Selection, media: String) -> Result<(), ArchiveError> {
		self.archive.update_media(selection, media).inspect_err(|e| {
			warn!("nebula-archive: media update rejected: {}", e);
		})
	}

	/// Swap the picture on the open card. Links write through to their parent.
	pub fn replace_selected_media(&mut self, media: String) -> Result<(), ArchiveError> {
		let selection = self
			.view
			.selection()
			.cloned()
			.ok_or_else(|| ArchiveError::UnknownInspiration(String::new()))?;
		self.update_media(&selection, media)
	}

	/// What the detail card shows.
	pub fn selected_inspiration(&self) -> Option<Inspiration> {
		self.archive.resolve(self.view.selection()?)
	}

	/// Sidebar contents: newest submissions first, then the curated entries.
	/// Community items only appear while selected; a focus narrows the list to
	/// its family.
	pub fn sidebar_items(&self) -> Vec<&Inspiration> {
		let selected = self.view.selection().map(Selection::base_id);
		let focus = self.view.family();
		let keep = |ins: &&Inspiration| {
			if selected == Some(&ins.id) {
				return true;
			}
			if ins.kind.is_community() {
				return false;
			}
			match focus {
				Some(f) => self
					.layout
					.cluster(ins.cluster_id)
					.is_some_and(|c| c.family == f),
				None => true,
			}
		};

		let (mut created, seeded): (Vec<&Inspiration>, Vec<&Inspiration>) = self
			.archive
			.iter()
			.filter(keep)
			.partition(|ins| ins.kind == InspirationKind::UserCreated);
		created.reverse();
		created.extend(seeded);
		created
	}

	/// Accent color for the UI: the selection's cluster, else the focused
	/// family, else white.
	pub fn active_theme_color(&self) -> Color {
		if let Some(cluster) = self
			.view
			.selection()
			.and_then(|sel| self.archive.resolve_base(sel))
			.and_then(|ins| self.layout.cluster(ins.cluster_id))
		{
			return cluster.color;
		}
		match self.view.family() {
			Some(f) => f.def().deep_color,
			None => Color::WHITE,
		}
	}
}

/// One row of the sidebar.
#[derive(Clone, Debug, PartialEq)]
pub struct ListItem {
	pub id: String,
	pub title: String,
	pub selected: bool,
}

/// The open detail card.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailCard {
	pub id: String,
	pub title: String,
	pub content: String,
	pub family: Option<Family>,
	pub variant: Option<&'static str>,
	pub resonance: u32,
	/// Community items and link variants.
	pub echo: bool,
	/// Base64 picture shown on the card, if any.
	pub media: Option<String>,
	/// Card treatment for link variants (1..=3).
	pub visual_mode: Option<usize>,
	/// Whether the picture may be replaced. Links edit their parent.
	pub editable: bool,
}

/// Everything the DOM overlay shows, rebuilt after each interaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlaySnapshot {
	pub focus: Option<Family>,
	pub accent: String,
	pub detail: Option<DetailCard>,
	pub items: Vec<ListItem>,
	pub show_links: bool,
	pub community_mode: bool,
}

impl GalaxyState {
	pub fn snapshot(&self) -> OverlaySnapshot {
		let selected = self.view.selection();
		let detail = selected.and_then(|sel| {
			let shown = self.archive.resolve(sel)?;
			let base = self.archive.resolve_base(sel)?;
			Some(DetailCard {
				id: shown.id.to_string(),
				title: shown.title,
				content: shown.content,
				family: self.family_of(sel),
				variant: shown.variant,
				resonance: archive::resonance(base),
				echo: shown.variant.is_some() || base.kind.is_community(),
				media: shown.media,
				visual_mode: sel.link().map(|link| link.visual_mode()),
				editable: !base.kind.is_community(),
			})
		});

		let matches: Option<HashSet<&InspirationId>> = (!self.query.trim().is_empty())
			.then(|| self.archive.search(&self.query).into_iter().map(|i| &i.id).collect());
		let items = self
			.sidebar_items()
			.into_iter()
			.filter(|ins| matches.as_ref().is_none_or(|m| m.contains(&ins.id)))
			.map(|ins| ListItem {
				id: ins.id.to_string(),
				title: ins.title.clone(),
				selected: selected.is_some_and(|s| s.base_id() == &ins.id),
			})
			.collect();

		OverlaySnapshot {
			focus: self.view.family(),
			accent: self.active_theme_color().to_css(),
			detail,
			items,
			show_links: self.show_links,
			community_mode: self.community_mode,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::galaxy::link::LinkTier;

	const DESKTOP: Viewport = Viewport {
		width: 1600.0,
		height: 900.0,
	};

	fn state() -> GalaxyState {
		GalaxyState::new(GalaxyConfig::default(), DESKTOP, 9, 1_700_000_000_000.0)
	}

	fn screen_of(state: &GalaxyState, world: DVec3) -> (f64, f64) {
		let p = state.project(world).unwrap();
		(p.x, p.y)
	}

	fn click(state: &mut GalaxyState, x: f64, y: f64) -> bool {
		state.pointer_down(x, y);
		state.pointer_up(x + 2.0, y + 1.0)
	}

	fn first_preset(state: &GalaxyState) -> Inspiration {
		state
			.archive
			.iter()
			.find(|i| matches!(i.kind, InspirationKind::Preset(_)))
			.cloned()
			.unwrap()
	}

	#[test]
	fn clicking_the_aether_cloud_focuses_it() {
		let mut state = state();
		state.tick(1.0 / 60.0);
		assert!(state.apply(NavEvent::ClusterClicked {
			family: Family::Aether,
			travel: 2.0
		}));
		assert_eq!(
			state.view,
			ViewState::FamilyFocused {
				family: Family::Aether
			}
		);
		assert!(state.view.selection().is_none());
		assert!(state.camera.is_chasing());
	}

	#[test]
	fn releasing_far_from_the_press_is_not_a_click() {
		let mut state = state();
		let cluster = state.layout.clusters[0].clone();
		let (x, y) = screen_of(&state, state.cluster_world_position(&cluster));
		state.pointer_down(x - 30.0, y);
		state.pointer_move(x, y);
		assert!(!state.pointer_up(x, y));
		assert!(state.view.is_overview());
		// The drag became spin.
		assert!(state.rotation.velocity < 0.0);
	}

	#[test]
	fn pointer_click_on_a_cluster_center() {
		let mut state = state();
		let cluster = state.layout.clusters[0].clone();
		let (x, y) = screen_of(&state, state.cluster_world_position(&cluster));
		// A node drawn over the cloud wins over the cloud itself.
		let expected = match state.hit_test(x + 2.0, y + 1.0) {
			Some(HitTarget::Cluster(family, _)) => family,
			Some(HitTarget::Node(id)) => state.family_of(&Selection::Node(id)).unwrap(),
			other => panic!("unexpected hit {other:?}"),
		};
		assert!(click(&mut state, x, y));
		assert_eq!(state.view.family(), Some(expected));
	}

	#[test]
	fn spin_stops_once_focused() {
		let mut state = state();
		state.rotation.velocity = 0.3;
		state.apply(NavEvent::ClusterClicked {
			family: Family::Void,
			travel: 0.0,
		});
		assert_eq!(state.rotation.velocity, 0.0);
		let angle = state.rotation.angle;
		state.tick(0.016);
		assert_eq!(state.rotation.angle, angle);
	}

	#[test]
	fn restart_returns_to_a_still_overview() {
		let mut state = state();
		state.rotation.angle = 4.0;
		state.set_query("storm");
		let parent = first_preset(&state);
		state.select_from_list(parent.id.as_str());
		let count = state.archive.len();

		state.restart();
		assert!(state.view.is_overview());
		assert_eq!(state.rotation, RotationState::default());
		assert!(state.query.is_empty());
		assert_eq!(state.archive.len(), count);
		assert_eq!(state.camera_goal(), CameraGoal::Overview);
	}

	#[test]
	fn links_frame_their_parent_node() {
		let mut by_node = state();
		let mut by_link = state();
		let parent = first_preset(&by_node);
		by_node.select_from_list(parent.id.as_str());
		by_link.select_from_list(&format!("{}_link_p_1", parent.id));

		for _ in 0..30 {
			by_node.tick(0.016);
			by_link.tick(0.016);
		}
		assert_eq!(by_node.camera, by_link.camera);
		let shown = by_link.selected_inspiration().unwrap();
		assert_eq!(shown.variant, Some("Decay"));
	}

	#[test]
	fn unknown_selection_holds_the_camera() {
		let mut state = state();
		state.view = ViewState::NodeDetail {
			family: None,
			selection: Selection::parse("does-not-exist"),
		};
		let before = state.camera.clone();
		state.tick(0.016);
		assert_eq!(state.camera, before);
		assert!(state.selected_inspiration().is_none());
		assert!(state.snapshot().detail.is_none());
	}

	#[test]
	fn unknown_ids_from_the_list_are_ignored() {
		let mut picked = state();
		let mut untouched = state();
		assert!(!picked.select_from_list("ghost"));
		assert!(!picked.select_from_list("ghost_link_p_0"));
		assert!(picked.view.is_overview());

		for _ in 0..10 {
			picked.tick(0.016);
			untouched.tick(0.016);
		}
		assert_eq!(picked.camera, untouched.camera);
		assert!(picked.snapshot().detail.is_none());
		assert!(picked.replace_selected_media("aGk=".into()).is_err());
	}

	#[test]
	fn replacing_a_link_picture_updates_its_parent() {
		let mut state = state();
		let parent = first_preset(&state);
		assert!(state.select_from_list(&format!("{}_link_s_0", parent.id)));
		state.replace_selected_media("bmV3".into()).unwrap();
		assert_eq!(
			state.archive.get(&parent.id).unwrap().media.as_deref(),
			Some("bmV3")
		);
		let card = state.snapshot().detail.unwrap();
		assert_eq!(card.media.as_deref(), Some("bmV3"));
		assert!(card.editable);
		assert_eq!(card.visual_mode, Some(3));
	}

	#[test]
	fn community_detail_keeps_the_wide_view() {
		let mut state = state();
		let community = state
			.archive
			.iter()
			.find(|i| i.kind.is_community())
			.cloned()
			.unwrap();
		state.apply(NavEvent::CommunitySelected {
			id: community.id.clone(),
			travel: 0.0,
		});
		assert_eq!(state.camera_goal(), CameraGoal::Overview);
		assert!(state.sidebar_items().iter().any(|i| i.id == community.id));
		assert_eq!(
			state.active_theme_color(),
			state.layout.cluster(community.cluster_id).unwrap().color
		);
	}

	#[test]
	fn sidebar_follows_focus_and_hides_community() {
		let mut state = state();
		assert_eq!(state.sidebar_items().len(), 12);
		state.apply(NavEvent::ClusterClicked {
			family: Family::Helios,
			travel: 0.0,
		});
		let items = state.sidebar_items();
		assert_eq!(items.len(), 3);
		for ins in items {
			assert_eq!(state.layout.cluster(ins.cluster_id).unwrap().family, Family::Helios);
		}
	}

	#[test]
	fn submissions_are_selected_and_listed_first() {
		let mut state = state();
		state.apply(NavEvent::ClusterClicked {
			family: Family::Veris,
			travel: 0.0,
		});
		let id = state
			.submit(Submission::text("moss remembers the rain"), 0.0)
			.unwrap();
		assert_eq!(state.view.selection(), Some(&Selection::Node(id.clone())));
		assert_eq!(state.view.family(), Some(Family::Veris));
		assert_eq!(state.sidebar_items()[0].id, id);
		assert!(state.links_of(&id).is_some());
	}

	#[test]
	fn theme_color_tracks_selection_and_focus() {
		let mut state = state();
		assert_eq!(state.active_theme_color(), Color::WHITE);
		state.apply(NavEvent::ClusterClicked {
			family: Family::Void,
			travel: 0.0,
		});
		assert_eq!(state.active_theme_color(), Family::Void.def().deep_color);

		let parent = first_preset(&state);
		let link = LinkId::new(parent.id.clone(), LinkTier::Secondary, 0);
		state.apply(NavEvent::ToggleSelection(Selection::Link(link)));
		let cluster = state.layout.cluster(parent.cluster_id).unwrap();
		assert_eq!(state.active_theme_color(), cluster.color);
	}

	#[test]
	fn unknown_family_names_sit_at_the_origin() {
		let state = state();
		assert_eq!(state.hub_position_by_name("Andromeda"), DVec3::ZERO);
		assert_eq!(
			state.hub_position_by_name("aether"),
			state.hub_position(Family::Aether)
		);
	}

	#[test]
	fn hover_glow_fades_after_the_hold() {
		let mut hover = HoverState::default();
		let target = HitTarget::Node("n".into());
		hover.set(Some(target.clone()));
		for _ in 0..30 {
			hover.tick(0.016);
		}
		let lit = hover.intensity(&target);
		assert!(lit > 0.9);
		hover.set(None);
		hover.tick(0.05);
		assert_eq!(hover.intensity(&target), lit);
		for _ in 0..200 {
			hover.tick(0.016);
		}
		assert_eq!(hover.intensity(&target), 0.0);
	}

	#[test]
	fn snapshot_reflects_selection_and_search() {
		let mut state = state();
		let empty = state.snapshot();
		assert_eq!(empty.focus, None);
		assert_eq!(empty.accent, "#ffffff");
		assert!(empty.detail.is_none());
		assert_eq!(empty.items.len(), 12);

		state.set_query("photon");
		let found = state.snapshot();
		assert_eq!(found.items.len(), 1);
		assert_eq!(found.items[0].title, "Photon Storm");

		state.set_query("");
		let parent = first_preset(&state);
		state.select_from_list(&format!("{}_link_p_0", parent.id));
		let snap = state.snapshot();
		let card = snap.detail.unwrap();
		assert_eq!(card.variant, Some("Inverse"));
		assert_eq!(card.visual_mode, Some(1));
		assert!(card.echo);
		assert!(card.resonance <= 1000);
		assert!(snap.items.iter().any(|i| i.selected && i.id == parent.id.as_str()));
	}
}
