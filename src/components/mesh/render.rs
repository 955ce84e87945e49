use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::MeshState;
use crate::mesh::MeshNode;

const BACKGROUND: &str = "#1a1a2e";
const HIGHLIGHT: &str = "white";
const RIM: &str = "#444422";

pub fn render(state: &MeshState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	draw_label(state, ctx);
}

fn draw_links(state: &MeshState, ctx: &CanvasRenderingContext2d) {
	let graph = &state.graph;
	ctx.set_global_alpha(state.config.link_opacity);
	for link in graph.links() {
		let (Some(s), Some(t)) = (graph.node(link.source), graph.node(link.target)) else {
			continue;
		};
		ctx.set_stroke_style_str(&link.stroke.to_css());
		ctx.set_line_width((link.value as f64).sqrt());
		ctx.begin_path();
		ctx.move_to(s.x, s.y);
		ctx.line_to(t.x, t.y);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &MeshState, ctx: &CanvasRenderingContext2d) {
	for node in state.graph.nodes() {
		draw_node(node, ctx);
	}
}

/// A shaded sphere: highlight up and left of centre, heated colour across
/// most of the body, dark rim.
fn draw_node(node: &MeshNode, ctx: &CanvasRenderingContext2d) {
	let (x, y, r) = (node.x, node.y, node.heat.radius);
	if r <= 0.0 {
		return;
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	match ctx.create_radial_gradient(x - r / 2.0, y - r / 2.0, 0.0, x, y, r) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, HIGHLIGHT);
			let _ = gradient.add_color_stop(0.75, &node.heat.color.to_css());
			let _ = gradient.add_color_stop(1.0, RIM);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&node.heat.color.to_css()),
	}
	ctx.fill();
}

/// Category name beside the hovered node.
fn draw_label(state: &MeshState, ctx: &CanvasRenderingContext2d) {
	let Some(node) = state.hover.and_then(|id| state.graph.node(id)) else {
		return;
	};
	if node.name.is_empty() {
		return;
	}
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
	ctx.set_font("11px sans-serif");
	let _ = ctx.fill_text(&node.name, node.x + node.heat.radius + 3.0, node.y + 3.0);
}
