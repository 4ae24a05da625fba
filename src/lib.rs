//! nebula-archive: Interactive orbital galaxy of inspirations.
//!
//! This crate provides a WASM-based visualization where four families of
//! inspirations orbit a shared center. Users spin the galaxy, focus a family,
//! open an inspiration or one of its links, and submit their own.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{FileReader, HtmlInputElement, HtmlScriptElement, Window};

pub mod components;

pub use components::galaxy::{
	Family, GalaxyCanvas, GalaxyCommand, GalaxyConfig, GalaxySession, ListItem, OverlaySnapshot,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("nebula-archive: logging initialized");
}

/// Load tunables from a script element with id="archive-config".
/// Missing element means defaults; any subset of fields may be given.
fn load_config() -> GalaxyConfig {
	match config_text() {
		Some(json) => {
			info!("nebula-archive: loaded config override");
			GalaxyConfig::from_json(&json)
		}
		None => GalaxyConfig::default(),
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("archive-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Read the picture chosen in `input` as base64 (data URL prefix stripped).
fn read_image(input: &HtmlInputElement, on_load: impl FnOnce(String) + 'static) {
	let Some(file) = input.files().and_then(|files| files.get(0)) else {
		return;
	};
	let Ok(reader) = FileReader::new() else {
		warn!("nebula-archive: file reading unavailable");
		return;
	};
	let done = reader.clone();
	let onload = Closure::once_into_js(move || {
		let Some(url) = done.result().ok().and_then(|v| v.as_string()) else {
			warn!("nebula-archive: could not read picture");
			return;
		};
		let data = url.split_once("base64,").map_or(url.as_str(), |(_, d)| d);
		on_load(data.to_string());
	});
	reader.set_onload(Some(onload.unchecked_ref()));
	if let Err(e) = reader.read_as_data_url(&file) {
		warn!("nebula-archive: could not read picture: {:?}", e);
	}
	input.set_value("");
}

/// Main application component.
/// Mounts the galaxy canvas and the DOM overlay driving it.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let config_signal = Signal::derive(move || config.clone());

	let session = GalaxySession::new();
	let snapshot = session.snapshot();
	let handle = StoredValue::new_local(session.clone());
	let send = move |command: GalaxyCommand| handle.with_value(|s| s.dispatch(command));
	let draft = RwSignal::new(String::new());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="The Nebula Archive" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-galaxy">
			<GalaxyCanvas session=session config=config_signal fullscreen=true />
			<div
				class="galaxy-overlay"
				style=move || snapshot.with(|s| format!("--accent: {}", s.accent))
			>
				<header>
					<h1>
						{move || {
							snapshot
								.with(|s| s.focus.map(Family::name).unwrap_or("The Nebula Archive"))
						}}
					</h1>
					<p class="subtitle">
						"Drag to spin. Click a family to travel. Scroll to zoom. Esc to go back."
					</p>
					{move || {
						snapshot
							.with(|s| s.focus.is_some())
							.then(|| {
								view! {
									<button class="back" on:click=move |_| send(GalaxyCommand::Back)>
										"Back to the galaxy"
									</button>
								}
							})
					}}
				</header>

				<aside class="sidebar">
					<input
						type="search"
						placeholder="Search the archive"
						on:input=move |ev| send(GalaxyCommand::Search(event_target_value(&ev)))
					/>
					<div class="toggles">
						<button on:click=move |_| send(GalaxyCommand::Restart)>"Recenter"</button>
						<label>
							<input
								type="checkbox"
								prop:checked=move || snapshot.with(|s| s.show_links)
								on:change=move |_| send(GalaxyCommand::ToggleLinks)
							/>
							" Links"
						</label>
						<label>
							<input
								type="checkbox"
								prop:checked=move || snapshot.with(|s| s.community_mode)
								on:change=move |_| send(GalaxyCommand::ToggleCommunity)
							/>
							" Community"
						</label>
					</div>
					<ul class="entries">
						<For
							each=move || snapshot.with(|s| s.items.clone())
							key=|item: &ListItem| (item.id.clone(), item.selected, item.title.clone())
							children=move |item: ListItem| {
								let id = item.id.clone();
								view! {
									<li
										class="entry"
										class:selected=item.selected
										on:click=move |_| send(GalaxyCommand::Select(id.clone()))
									>
										{item.title}
									</li>
								}
							}
						/>
					</ul>
					<div class="compose">
						<textarea
							placeholder="Leave a thought among the stars"
							prop:value=move || draft.get()
							on:input=move |ev| draft.set(event_target_value(&ev))
						/>
						<button on:click=move |_| {
							send(GalaxyCommand::Submit(draft.get_untracked()));
							draft.set(String::new());
						}>"Submit"</button>
						<label class="attach">
							"Picture "
							<input
								type="file"
								accept="image/*"
								on:change=move |ev| {
									let input: HtmlInputElement = event_target(&ev);
									let note = draft.get_untracked();
									read_image(
										&input,
										move |media| send(GalaxyCommand::SubmitImage { media, note }),
									);
									draft.set(String::new());
								}
							/>
						</label>
					</div>
				</aside>

				{move || {
					snapshot
						.with(|s| s.detail.clone())
						.map(|card| {
							view! {
								<article
									class=format!("detail mode-{}", card.visual_mode.unwrap_or(0))
									class:echo=card.echo
								>
									<h2>{card.title}</h2>
									{card.variant.map(|v| view! { <span class="variant">{v}</span> })}
									{card
										.media
										.map(|m| {
											view! {
												<img class="media" src=format!("data:image/jpeg;base64,{m}") />
											}
										})}
									<p>{card.content}</p>
									{card
										.editable
										.then(|| {
											view! {
												<label class="replace">
													"Replace picture "
													<input
														type="file"
														accept="image/*"
														on:change=move |ev| {
															let input: HtmlInputElement = event_target(&ev);
															read_image(
																&input,
																move |media| send(GalaxyCommand::ReplaceMedia(media)),
															);
														}
													/>
												</label>
											}
										})}
									<footer>
										<span class="family">
											{card.family.map(Family::name).unwrap_or("Community")}
										</span>
										<span class="resonance">
											{format!("Resonance {}", card.resonance)}
										</span>
										<button on:click=move |_| send(GalaxyCommand::Deselect)>
											"Close"
										</button>
									</footer>
								</article>
							}
						})
				}}
			</div>
		</div>
	}
}
