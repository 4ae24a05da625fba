//! Canvas rendering for the galaxy.
//!
//! Everything is drawn in screen space through [`GalaxyState::project`], back
//! to front:
//! 1. Background, compass rings and the star field (overview only)
//! 2. Family gas clouds and constellation lines (overview only)
//! 3. Cluster glows, then links, nodes and community stars sorted by depth
//! 4. Selection ring and vignette

use std::f64::consts::PI;

use glam::DVec3;
use web_sys::CanvasRenderingContext2d;

use super::camera::ScreenPoint;
use super::link::Selection;
use super::particles::StarField;
use super::state::{GalaxyState, HitTarget};
use super::theme::{Color, Theme};
use super::types::Family;

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete scene to the canvas.
pub fn render(
	state: &GalaxyState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	stars: Option<&StarField>,
) {
	draw_background(state, ctx, theme);

	let overview = state.view.family().is_none();
	if overview {
		draw_compass(state, ctx, theme);
		if let Some(field) = stars {
			draw_stars(state, ctx, theme, field);
		}
		draw_family_clouds(state, ctx, theme);
		draw_constellations(state, ctx);
	}

	draw_clusters(state, ctx, theme);
	if state.show_links {
		draw_links(state, ctx);
	}
	draw_nodes(state, ctx, theme);
	draw_community(state, ctx, theme);
	draw_selection(state, ctx, theme);

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (state.viewport.width, state.viewport.height);
	match ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_vignette(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (state.viewport.width, state.viewport.height);
	let Ok(gradient) = ctx.create_radial_gradient(
		w / 2.0,
		h / 2.0,
		w.min(h) * 0.3,
		w / 2.0,
		h / 2.0,
		w.max(h) * 0.7,
	) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", theme.background.vignette),
	);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, w, h);
}

/// Stroke a world-space polyline, breaking it wherever a point falls behind the camera.
fn stroke_polyline(state: &GalaxyState, ctx: &CanvasRenderingContext2d, points: impl Iterator<Item = DVec3>) {
	ctx.begin_path();
	let mut pen_down = false;
	for world in points {
		match state.project(world) {
			Some(p) if pen_down => ctx.line_to(p.x, p.y),
			Some(p) => {
				ctx.move_to(p.x, p.y);
				pen_down = true;
			}
			None => pen_down = false,
		}
	}
	ctx.stroke();
}

fn draw_compass(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	const SEGMENTS: usize = 128;
	const SPOKES: usize = 12;
	let orbit = state.config.orbit;

	ctx.set_stroke_style_str(&theme.compass.color.to_css());
	ctx.set_line_width(1.0);
	for &k in &theme.compass.rings {
		let ring = orbit.scaled(k);
		stroke_polyline(
			state,
			ctx,
			(0..=SEGMENTS).map(|i| ring.position(i as f64 / SEGMENTS as f64 * 2.0 * PI, 0.0)),
		);
	}

	ctx.set_stroke_style_str(&theme.compass.color.with_alpha(theme.compass.color.a * 0.5).to_css());
	for i in 0..SPOKES {
		let angle = i as f64 / SPOKES as f64 * 2.0 * PI;
		let spoke = |r: f64| {
			let (x, z) = (angle.cos() * r, angle.sin() * r);
			DVec3::new(x, orbit.plane_height(x, z), z)
		};
		stroke_polyline(state, ctx, [spoke(25.0), spoke(180.0)].into_iter());
	}
}

fn draw_stars(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme, field: &StarField) {
	let color = theme.stars.color;
	for star in &field.stars {
		let Some(p) = state.project(field.position(star)) else {
			continue;
		};
		let alpha = field.twinkle_alpha(star);
		fill_circle(
			ctx,
			&p,
			(theme.stars.size * p.scale).max(0.5),
			&color.with_alpha(alpha).to_css(),
		);
	}
}

fn draw_family_clouds(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	for family in Family::ALL {
		let Some(p) = state.project(state.hub_position(family)) else {
			continue;
		};
		let radius = theme.node.family_radius * p.scale;
		draw_glow(ctx, &p, radius, family.def().base_color, 0.12);
	}
}

fn draw_constellations(state: &GalaxyState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(0.6);
	for family in Family::ALL {
		let color = family.def().base_color.with_alpha(0.2);
		ctx.set_stroke_style_str(&color.to_css());
		let points: Vec<DVec3> = state
			.layout
			.clusters_of(family)
			.map(|c| state.cluster_world_position(c))
			.collect();
		stroke_polyline(state, ctx, points.into_iter());
	}
}

fn draw_clusters(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let mut glows: Vec<(ScreenPoint, Color, f64)> = state
		.visible_clusters()
		.filter_map(|c| {
			let p = state.project(state.cluster_world_position(c))?;
			let hover = state
				.hover
				.intensity(&HitTarget::Cluster(c.family, c.id));
			Some((p, c.color, hover))
		})
		.collect();
	glows.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));

	for (p, color, hover) in glows {
		let radius = theme.node.cluster_radius * p.scale * (1.0 + 0.15 * smooth_step(hover));
		draw_glow(ctx, &p, radius, color, 0.25 + 0.15 * hover);
	}
}

fn draw_links(state: &GalaxyState, ctx: &CanvasRenderingContext2d) {
	for ins in state.visible_nodes() {
		let (Some(base), Some(set)) = (state.node_world_position(ins), state.links_of(&ins.id)) else {
			continue;
		};
		let color = state
			.layout
			.cluster(ins.cluster_id)
			.map_or(Color::WHITE, |c| c.color);

		for end in set.iter() {
			let (Some(a), Some(b)) = (state.project(base + end.anchor), state.project(base + end.offset))
			else {
				continue;
			};
			let hover = state.hover.intensity(&HitTarget::Link(end.id.clone()));
			ctx.set_stroke_style_str(&color.with_alpha(0.35 + 0.4 * hover).to_css());
			ctx.set_line_width(0.8);
			ctx.begin_path();
			ctx.move_to(a.x, a.y);
			ctx.line_to(b.x, b.y);
			ctx.stroke();

			fill_circle(
				ctx,
				&b,
				(end.size * 0.5 * b.scale).max(1.5),
				&color.lighten(0.3 + 0.3 * hover).to_css(),
			);
		}
	}
}

fn draw_nodes(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let pulse = (state.time * theme.node.pulse_speed).sin() * theme.node.pulse_intensity;
	let focused = state.view.family().is_some();

	let mut nodes: Vec<_> = state
		.visible_nodes()
		.filter_map(|ins| {
			let p = state.project(state.node_world_position(ins)?)?;
			let color = state
				.layout
				.cluster(ins.cluster_id)
				.map_or(Color::WHITE, |c| c.color);
			Some((p, color, ins))
		})
		.collect();
	nodes.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));

	for (p, color, ins) in nodes {
		let hover = smooth_step(state.hover.intensity(&HitTarget::Node(ins.id.clone())));
		let radius = (theme.node.node_radius * p.scale * (1.0 + pulse) * (1.0 + 0.4 * hover)).max(1.5);
		draw_glow(ctx, &p, radius * 3.0, color, 0.3 + 0.3 * hover);

		match ctx.create_radial_gradient(p.x - radius * 0.3, p.y - radius * 0.3, 0.0, p.x, p.y, radius) {
			Ok(gradient) => {
				let _ = gradient.add_color_stop(0.0, &color.lighten(0.6).to_css());
				let _ = gradient.add_color_stop(1.0, &color.to_css());
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			Err(_) => ctx.set_fill_style_str(&color.to_css()),
		}
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.fill();

		if hover > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 4.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.8 * hover));
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		if focused || hover > 0.5 {
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
			ctx.set_font("11px sans-serif");
			let _ = ctx.fill_text(&ins.title, p.x + radius + 6.0, p.y + 3.0);
		}
	}
}

fn draw_community(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	for ins in state.visible_community() {
		let Some(p) = state
			.node_world_position(ins)
			.and_then(|w| state.project(w))
		else {
			continue;
		};
		let hover = state.hover.intensity(&HitTarget::Community(ins.id.clone()));
		let twinkle = 0.6 + 0.4 * (state.time * 2.0 + p.x * 0.01).sin().abs();
		let radius = (theme.node.community_radius * p.scale).max(1.5) * (1.0 + 0.5 * hover);
		draw_glow(ctx, &p, radius * 2.5, Color::WHITE, 0.2 * twinkle);
		fill_circle(
			ctx,
			&p,
			radius,
			&Color::WHITE.with_alpha(0.5 + 0.5 * hover).to_css(),
		);
	}
}

fn draw_selection(state: &GalaxyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let Some(selection) = state.view.selection() else {
		return;
	};
	let Some(base) = state.archive.resolve_base(selection) else {
		return;
	};
	let Some(mut world) = state.node_world_position(base) else {
		return;
	};
	if let Selection::Link(link) = selection {
		if let Some(end) = state
			.links_of(&link.parent)
			.and_then(|set| set.iter().find(|e| &e.id == link))
		{
			world += end.offset;
		}
	}
	let Some(p) = state.project(world) else {
		return;
	};

	let breathe = 1.0 + 0.1 * (state.time * 3.0).sin();
	let radius = (theme.node.node_radius * p.scale * 2.2).max(8.0) * breathe;
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&theme.node.ring_color.to_css());
	ctx.set_line_width(1.5);
	ctx.stroke();

	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius * 1.6, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&state.active_theme_color().with_alpha(0.4).to_css());
	ctx.set_line_width(0.75);
	ctx.stroke();
}

fn fill_circle(ctx: &CanvasRenderingContext2d, p: &ScreenPoint, radius: f64, css: &str) {
	ctx.set_fill_style_str(css);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.fill();
}

fn draw_glow(ctx: &CanvasRenderingContext2d, p: &ScreenPoint, radius: f64, color: Color, alpha: f64) {
	if alpha < 0.01 || radius < 0.5 {
		return;
	}
	let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, 0.0, p.x, p.y, radius) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, &color.with_alpha(alpha).to_css());
	let _ = gradient.add_color_stop(0.5, &color.with_alpha(alpha * 0.35).to_css());
	let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");

	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}
