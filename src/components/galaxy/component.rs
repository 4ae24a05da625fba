//! Leptos component wrapping the galaxy canvas.
//!
//! The component creates an HTML canvas element and wires up pointer, wheel and
//! keyboard handlers. Pointer events cover mouse and touch alike. An animation loop runs via `requestAnimationFrame`,
//! advancing the session and rendering each frame. The DOM overlay talks to
//! the same session through a cloned [`GalaxySession`].

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent,
	WheelEvent, Window,
};

use super::archive::Submission;
use super::camera::Viewport;
use super::config::GalaxyConfig;
use super::particles::StarField;
use super::render;
use super::state::{GalaxyState, OverlaySnapshot};
use super::theme::Theme;

/// Bundles the session with visual configuration (theme, star field).
struct GalaxyContext {
	state: GalaxyState,
	theme: Theme,
	stars: Option<StarField>,
}

/// Requests from the DOM overlay.
#[derive(Clone, Debug, PartialEq)]
pub enum GalaxyCommand {
	Back,
	Deselect,
	/// Reset spin and focus without dropping submissions.
	Restart,
	/// Toggle a sidebar entry by id.
	Select(String),
	Search(String),
	/// Submit a text inspiration.
	Submit(String),
	/// Submit an uploaded picture (base64) with an optional note.
	SubmitImage { media: String, note: String },
	/// Replace the picture on the open card (base64).
	ReplaceMedia(String),
	ToggleLinks,
	ToggleCommunity,
}

/// Shared handle to the running session.
///
/// Cheap to clone. Before the canvas mounts every call is a no-op.
#[derive(Clone)]
pub struct GalaxySession {
	context: Rc<RefCell<Option<GalaxyContext>>>,
	snapshot: RwSignal<OverlaySnapshot>,
}

impl Default for GalaxySession {
	fn default() -> Self {
		Self::new()
	}
}

impl GalaxySession {
	pub fn new() -> Self {
		Self {
			context: Rc::new(RefCell::new(None)),
			snapshot: RwSignal::new(OverlaySnapshot::default()),
		}
	}

	/// What the overlay should currently show.
	pub fn snapshot(&self) -> ReadSignal<OverlaySnapshot> {
		self.snapshot.read_only()
	}

	pub fn dispatch(&self, command: GalaxyCommand) {
		self.with_state(true, |state| match command {
			GalaxyCommand::Back => {
				state.back();
			}
			GalaxyCommand::Deselect => {
				state.deselect();
			}
			GalaxyCommand::Restart => state.restart(),
			GalaxyCommand::Select(id) => {
				state.select_from_list(&id);
			}
			GalaxyCommand::Search(query) => state.set_query(&query),
			GalaxyCommand::Submit(text) => {
				if text.trim().is_empty() {
					return;
				}
				if let Err(e) = state.submit(Submission::text(&text), js_sys::Date::now()) {
					warn!("nebula-archive: submission failed: {}", e);
				}
			}
			GalaxyCommand::SubmitImage { media, note } => {
				if let Err(e) = state.submit(Submission::image(media, &note), js_sys::Date::now()) {
					warn!("nebula-archive: image submission failed: {}", e);
				}
			}
			GalaxyCommand::ReplaceMedia(media) => {
				if let Err(e) = state.replace_selected_media(media) {
					debug!("nebula-archive: picture not replaced: {}", e);
				}
			}
			GalaxyCommand::ToggleLinks => state.toggle_links(),
			GalaxyCommand::ToggleCommunity => state.toggle_community(),
		});
	}

	/// Run `f` against the live session, then republish the overlay snapshot if asked.
	fn with_state<R>(&self, publish: bool, f: impl FnOnce(&mut GalaxyState) -> R) -> Option<R> {
		let (result, next) = {
			let mut guard = self.context.try_borrow_mut().ok()?;
			let c = guard.as_mut()?;
			let result = f(&mut c.state);
			(result, publish.then(|| c.state.snapshot()))
		};
		if let Some(next) = next {
			if self.snapshot.with_untracked(|current| current != &next) {
				self.snapshot.set(next);
			}
		}
		Some(result)
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the galaxy on a canvas element.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and resize automatically with the
/// window. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn GalaxyCanvas(
	session: GalaxySession,
	#[prop(into)] config: Signal<GalaxyConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let keydown_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let session_init = session.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("nebula-archive: canvas has no 2d context");
			return;
		};

		let config = config.get_untracked();
		let theme = Theme::default();
		let stars = theme
			.stars
			.enabled
			.then(|| StarField::new(&theme.stars, &config.orbit));
		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let state = GalaxyState::new(config, Viewport::new(w, h), seed, js_sys::Date::now());
		info!(
			"nebula-archive: session started with {} inspirations",
			state.archive.len()
		);
		*session_init.context.borrow_mut() = Some(GalaxyContext {
			state,
			theme,
			stars,
		});
		session_init.with_state(true, |_| ());

		if fullscreen {
			let (session_resize, canvas_resize) = (session_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				session_resize.with_state(false, |state| state.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let session_keys = session_init.clone();
		*keydown_cb.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if ev.key() == "Escape" {
				session_keys.dispatch(GalaxyCommand::Back);
			}
		}));
		if let Some(ref cb) = *keydown_cb.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (session_init.context.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let dt = 0.016;
				c.state.tick(dt);
				if let Some(ref mut field) = c.stars {
					field.update(dt);
				}
				render::render(&c.state, &ctx, &c.theme, c.stars.as_ref());
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let session_pd = session.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		if let Some(canvas) = canvas_ref.get() {
			let _ = canvas.set_pointer_capture(ev.pointer_id());
		}
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			session_pd.with_state(false, |state| state.pointer_down(x, y));
		}
	};

	let session_pm = session.clone();
	let on_pointermove = move |ev: PointerEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			session_pm.with_state(false, |state| state.pointer_move(x, y));
		}
	};

	let session_pu = session.clone();
	let on_pointerup = move |ev: PointerEvent| {
		if let Some(canvas) = canvas_ref.get() {
			let _ = canvas.release_pointer_capture(ev.pointer_id());
		}
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			session_pu.with_state(true, |state| state.pointer_up(x, y));
		}
	};

	// Leaving and cancelling both abandon the press.
	let session_pl = session.clone();
	let on_pointerleave = move |_: PointerEvent| {
		session_pl.with_state(false, |state| {
			state.pointer_leave();
			state.hover.set(None);
		});
	};
	let on_pointercancel = on_pointerleave.clone();

	let session_wh = session;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		session_wh.with_state(false, |state| state.zoom(ev.delta_y()));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="galaxy-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointerleave=on_pointerleave
			on:pointercancel=on_pointercancel
			on:wheel=on_wheel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
