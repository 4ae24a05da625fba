//! Explicit view state machine.
//!
//! The view is always exactly one of [`ViewState`]'s variants; every user
//! action is an [`NavEvent`] and [`ViewState::transition`] decides what it
//! leads to. The camera reads the resulting state each frame, and the
//! [`Transition`] flags tell the session which one-shot effects to fire.

use log::debug;

use super::link::Selection;
use super::types::{Family, InspirationId};

/// Pointer travel (px) between press and release above which a release is a
/// drag, not a click.
pub const CLICK_THRESHOLD: f64 = 10.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ViewState {
	/// All families orbiting; the galaxy spins.
	#[default]
	Overview,
	/// Zoomed onto one family hub.
	FamilyFocused { family: Family },
	/// A node or link is open. `family` is the focus behind it, if any.
	NodeDetail {
		family: Option<Family>,
		selection: Selection,
	},
}

impl ViewState {
	pub fn family(&self) -> Option<Family> {
		match self {
			ViewState::Overview => None,
			ViewState::FamilyFocused { family } => Some(*family),
			ViewState::NodeDetail { family, .. } => *family,
		}
	}

	pub fn selection(&self) -> Option<&Selection> {
		match self {
			ViewState::NodeDetail { selection, .. } => Some(selection),
			_ => None,
		}
	}

	pub fn is_overview(&self) -> bool {
		matches!(self, ViewState::Overview)
	}

	/// Leave any selection, keeping the family focus.
	fn without_selection(&self) -> ViewState {
		match self.family() {
			Some(family) => ViewState::FamilyFocused { family },
			None => ViewState::Overview,
		}
	}

	fn with_selection(&self, family: Option<Family>, selection: Selection) -> ViewState {
		ViewState::NodeDetail { family, selection }
	}

	/// Apply `event`. `family_of` resolves a selection to the family of the
	/// stored node behind it, or `None` if it does not exist.
	///
	/// Returns `None` when the event is ignored.
	pub fn transition(
		&self,
		event: NavEvent,
		family_of: impl Fn(&Selection) -> Option<Family>,
	) -> Option<Transition> {
		let next = match event {
			NavEvent::ClusterClicked { family, travel } => {
				if !is_click(travel) || self.family().is_some() {
					return None;
				}
				ViewState::FamilyFocused { family }
			}
			NavEvent::NodeClicked { selection, travel } => {
				if !is_click(travel) {
					return None;
				}
				let family = family_of(&selection)?;
				if self.selection() == Some(&selection) {
					ViewState::FamilyFocused { family }
				} else {
					self.with_selection(Some(family), selection)
				}
			}
			NavEvent::CommunitySelected { id, travel } => {
				if !is_click(travel) {
					return None;
				}
				self.with_selection(self.family(), Selection::Node(id))
			}
			NavEvent::ToggleSelection(selection) => {
				if self.selection() == Some(&selection) {
					self.without_selection()
				} else {
					self.with_selection(self.family(), selection)
				}
			}
			NavEvent::Deselect => {
				self.selection()?;
				self.without_selection()
			}
			NavEvent::Back => ViewState::Overview,
		};

		if next == *self {
			return None;
		}

		let family_changed = self.family() != next.family();
		let returned_from_detail =
			self.selection().is_some() && next.selection().is_none() && next.family().is_some();
		let transition = Transition {
			arm_chase: family_changed || returned_from_detail,
			freeze_rotation: !next.is_overview(),
			next,
		};
		debug!("nebula-archive: view {:?} -> {:?}", self, transition.next);
		Some(transition)
	}
}

/// User actions that may change the view.
#[derive(Clone, Debug, PartialEq)]
pub enum NavEvent {
	/// Release over a family cluster, `travel` px from where it was pressed.
	ClusterClicked { family: Family, travel: f64 },
	/// Release over a node or link satellite.
	NodeClicked { selection: Selection, travel: f64 },
	/// Release over a drifting community star.
	CommunitySelected { id: InspirationId, travel: f64 },
	/// Pick from the sidebar list. Never changes focus.
	ToggleSelection(Selection),
	/// Close the detail card.
	Deselect,
	/// Return to the overview from anywhere.
	Back,
}

/// Outcome of an accepted event.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
	pub next: ViewState,
	/// Re-arm the one-shot camera glide towards the family hub.
	pub arm_chase: bool,
	/// Stop the galaxy spin immediately.
	pub freeze_rotation: bool,
}

fn is_click(travel: f64) -> bool {
	travel < CLICK_THRESHOLD
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> Selection {
		Selection::parse(id)
	}

	// Every known id in these tests lives in Veris, except "aether-*".
	fn family_of(sel: &Selection) -> Option<Family> {
		let id = sel.base_id().as_str();
		if id.starts_with("aether") {
			Some(Family::Aether)
		} else if id.starts_with("known") {
			Some(Family::Veris)
		} else {
			None
		}
	}

	#[test]
	fn clicking_a_cluster_from_overview_focuses_its_family() {
		let t = ViewState::Overview
			.transition(
				NavEvent::ClusterClicked {
					family: Family::Aether,
					travel: 3.0,
				},
				family_of,
			)
			.unwrap();
		assert_eq!(
			t.next,
			ViewState::FamilyFocused {
				family: Family::Aether
			}
		);
		assert_eq!(t.next.selection(), None);
		assert!(t.arm_chase);
		assert!(t.freeze_rotation);
	}

	#[test]
	fn long_travel_is_a_drag_not_a_click() {
		let view = ViewState::Overview;
		for travel in [10.0, 10.5, 400.0] {
			let event = NavEvent::ClusterClicked {
				family: Family::Void,
				travel,
			};
			assert_eq!(view.transition(event, family_of), None);
		}
		let event = NavEvent::NodeClicked {
			selection: node("known-1"),
			travel: 12.0,
		};
		assert_eq!(view.transition(event, family_of), None);
		let event = NavEvent::ClusterClicked {
			family: Family::Void,
			travel: 9.99,
		};
		assert!(view.transition(event, family_of).is_some());
	}

	#[test]
	fn cluster_clicks_are_ignored_while_focused() {
		let view = ViewState::FamilyFocused {
			family: Family::Helios,
		};
		let event = NavEvent::ClusterClicked {
			family: Family::Void,
			travel: 0.0,
		};
		assert_eq!(view.transition(event, family_of), None);
	}

	#[test]
	fn node_click_focuses_its_family_and_toggles() {
		let view = ViewState::FamilyFocused {
			family: Family::Aether,
		};
		let open = view
			.transition(
				NavEvent::NodeClicked {
					selection: node("known-1_link_p_0"),
					travel: 0.0,
				},
				family_of,
			)
			.unwrap();
		assert_eq!(open.next.family(), Some(Family::Veris));
		assert!(open.arm_chase);

		let closed = open
			.next
			.transition(
				NavEvent::NodeClicked {
					selection: node("known-1_link_p_0"),
					travel: 0.0,
				},
				family_of,
			)
			.unwrap();
		assert_eq!(
			closed.next,
			ViewState::FamilyFocused {
				family: Family::Veris
			}
		);
		// Returning from detail to a focused family re-arms the chase.
		assert!(closed.arm_chase);
	}

	#[test]
	fn unknown_nodes_are_ignored() {
		let event = NavEvent::NodeClicked {
			selection: node("ghost"),
			travel: 0.0,
		};
		assert_eq!(ViewState::Overview.transition(event, family_of), None);
	}

	#[test]
	fn deselect_falls_back_to_the_focus() {
		let focused = ViewState::NodeDetail {
			family: Some(Family::Aether),
			selection: node("aether-1"),
		};
		let t = focused.transition(NavEvent::Deselect, family_of).unwrap();
		assert_eq!(
			t.next,
			ViewState::FamilyFocused {
				family: Family::Aether
			}
		);

		let unfocused = ViewState::NodeDetail {
			family: None,
			selection: node("community-3"),
		};
		let t = unfocused.transition(NavEvent::Deselect, family_of).unwrap();
		assert_eq!(t.next, ViewState::Overview);
		assert!(!t.freeze_rotation);

		assert_eq!(ViewState::Overview.transition(NavEvent::Deselect, family_of), None);
	}

	#[test]
	fn sidebar_toggle_keeps_focus() {
		let t = ViewState::Overview
			.transition(NavEvent::ToggleSelection(node("known-2")), family_of)
			.unwrap();
		assert_eq!(
			t.next,
			ViewState::NodeDetail {
				family: None,
				selection: node("known-2")
			}
		);
		assert!(t.freeze_rotation);
		assert!(!t.arm_chase);

		let back = t
			.next
			.transition(NavEvent::ToggleSelection(node("known-2")), family_of)
			.unwrap();
		assert_eq!(back.next, ViewState::Overview);
	}

	#[test]
	fn community_selection_does_not_focus() {
		let t = ViewState::Overview
			.transition(
				NavEvent::CommunitySelected {
					id: "community-7".into(),
					travel: 1.0,
				},
				family_of,
			)
			.unwrap();
		assert_eq!(t.next.family(), None);
		assert!(t.freeze_rotation);
	}

	#[test]
	fn back_always_returns_to_overview() {
		let views = [
			ViewState::FamilyFocused {
				family: Family::Void,
			},
			ViewState::NodeDetail {
				family: Some(Family::Void),
				selection: node("known-1"),
			},
		];
		for view in views {
			let t = view.transition(NavEvent::Back, family_of).unwrap();
			assert_eq!(t.next, ViewState::Overview);
			assert!(!t.freeze_rotation);
		}
		assert_eq!(ViewState::Overview.transition(NavEvent::Back, family_of), None);
	}
}
