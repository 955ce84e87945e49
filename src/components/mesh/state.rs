use log::{debug, info, warn};

use super::layout::ForceLayout;
use crate::mesh::heat::distance;
use crate::mesh::{Entropy, MeshConfig, MeshError, MeshGraph, NodeHeat, NodeId, Topology};

/// Below this temperature the layout is considered settled.
pub const ALPHA_MIN: f64 = 0.005;
/// Extra pick radius around a node's drawn circle.
pub const HIT_SLOP: f64 = 3.0;
/// Share of the canvas, around its centre, that initial positions fall in.
const SEED_SPREAD: f64 = 0.8;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeId>,
	/// Pointer offset from the node centre when the drag began.
	pub offset_x: f64,
	pub offset_y: f64,
}

/// Interaction controller: owns the mesh, drives the layout engine and keeps
/// per-node and per-link heat in step with the pointer.
pub struct MeshState {
	pub graph: MeshGraph,
	pub config: MeshConfig,
	pub drag: DragState,
	pub hover: Option<NodeId>,
	pub width: f64,
	pub height: f64,
	layout: ForceLayout,
	alpha: f64,
}

impl MeshState {
	pub fn new(
		config: MeshConfig,
		width: f64,
		height: f64,
		entropy: &mut dyn Entropy,
	) -> Result<Self, MeshError> {
		config.validate()?;
		let mut graph = config.topology.generate(entropy)?;

		for node in graph.nodes_mut() {
			node.x = width / 2.0 - (entropy.next_f64() - 0.5) * width * SEED_SPREAD;
			node.y = height / 2.0 - (entropy.next_f64() - 0.5) * height * SEED_SPREAD;
			node.name = config.palette.name_for(node.group).to_owned();
			node.color = config.palette.color_for(node.group);
			node.heat = NodeHeat {
				radius: config.heat.node_radius,
				color: node.color,
			};
		}
		for link in graph.links_mut() {
			link.color = config.link_color;
			link.stroke = config.link_color;
		}

		let layout = ForceLayout::new(&config.layout, &graph, width, height);
		info!(
			"mesh built: {} nodes, {} links",
			graph.node_count(),
			graph.link_count()
		);

		Ok(Self {
			alpha: config.layout.alpha,
			graph,
			config,
			drag: DragState::default(),
			hover: None,
			width,
			height,
			layout,
		})
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether the layout still has work to do.
	pub fn is_running(&self) -> bool {
		!self.graph.is_empty() && self.alpha >= ALPHA_MIN
	}

	/// Reheat the layout to its starting temperature.
	pub fn resume(&mut self) {
		self.alpha = self.config.layout.alpha;
	}

	/// One simulation step. Returns whether the layout is still running.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.is_running() {
			return false;
		}
		self.alpha *= self.config.layout.alpha_decay;
		self.layout.step(dt, self.alpha);
		self.layout.sync_into(&mut self.graph);

		let running = self.is_running();
		if !running {
			info!("layout settled at alpha {:.4}", self.alpha());
		}
		running
	}

	/// Recompute heat for every node and every link midpoint.
	pub fn apply_heat(&mut self, x: f64, y: f64) {
		let heat = &self.config.heat;
		for node in self.graph.nodes_mut() {
			let d = distance((x, y), (node.x, node.y));
			node.heat = NodeHeat {
				radius: heat.radius(d),
				color: heat.color(node.color, d),
			};
		}

		let strokes: Vec<_> = self
			.graph
			.links()
			.iter()
			.map(|link| match self.graph.link_midpoint(link) {
				Some(mid) => heat.color(link.color, distance((x, y), mid)),
				None => link.stroke,
			})
			.collect();
		for (link, stroke) in self.graph.links_mut().iter_mut().zip(strokes) {
			link.stroke = stroke;
		}
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		if self.drag.active {
			if let Some(id) = self.drag.node {
				let (nx, ny) = (x - self.drag.offset_x, y - self.drag.offset_y);
				self.layout.set_position(id, nx, ny);
				if let Some(node) = self.graph.node_mut(id) {
					node.x = nx;
					node.y = ny;
				}
				self.resume();
			}
		} else {
			self.hover = self.node_at_position(x, y);
		}
		self.apply_heat(x, y);
	}

	/// Nearest node whose drawn circle (plus slop) contains the point.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<NodeId> {
		self.graph
			.nodes()
			.map(|node| (node.id, distance((x, y), (node.x, node.y)), node.heat.radius))
			.filter(|&(_, d, r)| d <= r + HIT_SLOP)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(id, _, _)| id)
	}

	/// Start dragging the node under the pointer, if any.
	pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
		let Some(id) = self.node_at_position(x, y) else {
			return false;
		};
		let Some((nx, ny)) = self.graph.node(id).map(|n| (n.x, n.y)) else {
			return false;
		};
		self.drag = DragState {
			active: true,
			node: Some(id),
			offset_x: x - nx,
			offset_y: y - ny,
		};
		self.hover = Some(id);
		self.layout.pin(id);
		debug!("drag start {id}");
		true
	}

	pub fn end_drag(&mut self) {
		if let Some(id) = self.drag.node.take() {
			self.layout.release(id);
			debug!("drag end {id}");
		}
		self.drag.active = false;
	}

	pub fn pointer_left(&mut self) {
		self.end_drag();
		self.hover = None;
	}

	/// Remove the node under the pointer. Returns the removed id.
	pub fn double_click(&mut self, x: f64, y: f64) -> Option<NodeId> {
		let id = self.node_at_position(x, y)?;
		self.remove_node(id).then_some(id)
	}

	/// Remove a node, its links and its layout body in one step.
	///
	/// Returns `false` when the node is not in the mesh.
	pub fn remove_node(&mut self, id: NodeId) -> bool {
		if !self.graph.remove_node(id) {
			warn!("remove {id}: not in mesh");
			return false;
		}
		self.layout.remove(id);
		if self.drag.node == Some(id) {
			self.drag = DragState::default();
		}
		if self.hover == Some(id) {
			self.hover = None;
		}
		debug!(
			"removed {id}; {} nodes, {} links left",
			self.layout.node_count(),
			self.graph.link_count()
		);
		true
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.layout.resize(width, height);
		debug!("resized to {width}x{height}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mesh::{Lattice3D, MeshTopology, Palette, RandomMesh, Rgb, SeededEntropy, Torus};

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	fn state_with(topology: MeshTopology) -> MeshState {
		let config = MeshConfig {
			topology,
			..MeshConfig::default()
		};
		MeshState::new(config, W, H, &mut SeededEntropy::new(11)).unwrap()
	}

	fn lattice() -> MeshState {
		state_with(MeshTopology::Lattice3D(Lattice3D::new(1, 3, 3)))
	}

	fn position(state: &MeshState, id: u32) -> (f64, f64) {
		let node = state.graph.node(NodeId(id)).unwrap();
		(node.x, node.y)
	}

	#[test]
	fn test_build_seeds_positions_near_centre() {
		let state = state_with(MeshTopology::Torus(Torus::default()));
		assert_eq!(state.graph.node_count(), 135);
		for node in state.graph.nodes() {
			assert!(node.x >= W * 0.1 && node.x <= W * 0.9, "x = {}", node.x);
			assert!(node.y >= H * 0.1 && node.y <= H * 0.9, "y = {}", node.y);
		}
	}

	#[test]
	fn test_build_decorates_from_palette() {
		let config = MeshConfig {
			topology: MeshTopology::Lattice3D(Lattice3D {
				category_count: 5,
				..Lattice3D::new(1, 4, 4)
			}),
			palette: Palette {
				names: vec!["a".into(), "b".into()],
				colors: vec![Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)],
			},
			..MeshConfig::default()
		};
		let state = MeshState::new(config, W, H, &mut SeededEntropy::new(3)).unwrap();
		for node in state.graph.nodes() {
			let slot = node.group as usize % 2;
			assert_eq!(node.name, ["a", "b"][slot]);
			assert_eq!(node.color, [Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)][slot]);
			assert_eq!(node.heat.color, node.color);
			assert_eq!(node.heat.radius, 4.0);
		}
		let link_color = MeshConfig::default().link_color;
		assert!(state.graph.links().iter().all(|l| l.stroke == link_color));
	}

	#[test]
	fn test_build_rejects_invalid_config() {
		let mut config = MeshConfig::default();
		config.link_opacity = -1.0;
		assert!(matches!(
			MeshState::new(config, W, H, &mut SeededEntropy::new(1)),
			Err(MeshError::Config(_))
		));
	}

	#[test]
	fn test_build_error_reads_as_its_cause() {
		let config = MeshConfig {
			topology: MeshTopology::Random(RandomMesh::new(1, 2)),
			..MeshConfig::default()
		};
		let Err(err) = MeshState::new(config, W, H, &mut SeededEntropy::new(1)) else {
			panic!("one node cannot hold random links");
		};
		assert_eq!(
			err.to_string(),
			"cannot generate topology: random mesh needs at least 2 nodes to place links, got 1"
		);
	}

	#[test]
	fn test_tick_decays_alpha() {
		let mut state = lattice();
		assert_eq!(state.alpha(), 0.3);
		assert!(state.tick(0.016));
		assert!((state.alpha() - 0.3 * 0.995).abs() < 1e-12);
		assert!(state.tick(0.016));
		assert!((state.alpha() - 0.3 * 0.995 * 0.995).abs() < 1e-12);
	}

	#[test]
	fn test_tick_settles_and_resume_reheats() {
		let mut state = lattice();
		let mut ticks = 0;
		while state.tick(0.016) {
			ticks += 1;
			assert!(ticks < 10_000, "layout never settled");
		}
		assert!(state.alpha() < ALPHA_MIN);
		let frozen = position(&state, 0);
		assert!(!state.tick(0.016));
		assert_eq!(position(&state, 0), frozen);

		state.resume();
		assert!(state.is_running());
	}

	#[test]
	fn test_tick_syncs_layout_positions() {
		let mut state = lattice();
		let before = position(&state, 0);
		state.tick(0.016);
		assert_ne!(position(&state, 0), before);
	}

	#[test]
	fn test_heat_at_node_and_far_away() {
		let mut state = lattice();
		let (x, y) = position(&state, 0);
		state.apply_heat(x, y);

		let heat = state.config.heat.clone();
		let node = state.graph.node(NodeId(0)).unwrap();
		assert!((node.heat.radius - heat.max_radius).abs() < 1e-9);
		assert_eq!(node.heat.color, heat.heat_color);

		state.apply_heat(-1e6, -1e6);
		for node in state.graph.nodes() {
			assert_eq!(node.heat.radius, heat.node_radius);
			assert_eq!(node.heat.color, node.color);
		}
		for link in state.graph.links() {
			assert_eq!(link.stroke, link.color);
		}
	}

	#[test]
	fn test_link_heat_uses_midpoint() {
		let mut state = lattice();
		let link = state.graph.links()[0].clone();
		let (mx, my) = state.graph.link_midpoint(&link).unwrap();
		state.apply_heat(mx, my);
		assert_eq!(state.graph.links()[0].stroke, state.config.heat.heat_color);
	}

	#[test]
	fn test_double_click_removes_node_and_links() {
		let mut state = lattice();
		let (x, y) = position(&state, 4);
		// make sure nothing else overlaps the centre node
		for node in state.graph.nodes_mut() {
			if node.id != NodeId(4) {
				node.x = x + 100.0 + node.id.0 as f64 * 20.0;
			}
		}

		assert_eq!(state.double_click(x, y), Some(NodeId(4)));
		assert!(!state.graph.contains(NodeId(4)));
		assert_eq!(state.graph.node_count(), 8);
		assert_eq!(state.graph.link_count(), 8);
		assert!(state.graph.links().iter().all(|l| !l.touches(NodeId(4))));

		assert!(!state.remove_node(NodeId(4)));
		assert!(state.tick(0.016));
	}

	#[test]
	fn test_removing_every_node_stops_layout() {
		let mut state = lattice();
		for id in 0..9 {
			assert!(state.remove_node(NodeId(id)));
		}
		assert!(state.graph.is_empty());
		assert_eq!(state.graph.link_count(), 0);
		assert!(!state.is_running());
		assert!(!state.tick(0.016));
	}

	#[test]
	fn test_drag_moves_and_pins_node() {
		let mut state = lattice();
		let (x, y) = position(&state, 0);
		for node in state.graph.nodes_mut() {
			if node.id != NodeId(0) {
				node.x = x + 100.0 + node.id.0 as f64 * 20.0;
			}
		}

		assert!(state.begin_drag(x, y));
		state.pointer_moved(50.0, 60.0);
		assert_eq!(position(&state, 0), (50.0, 60.0));

		state.tick(0.016);
		let (px, py) = position(&state, 0);
		assert!((px - 50.0).abs() < 1e-4 && (py - 60.0).abs() < 1e-4);

		state.end_drag();
		assert!(!state.drag.active);
		assert_eq!(state.drag.node, None);
	}

	#[test]
	fn test_released_node_does_not_jump() {
		let mut state = lattice();
		let (x, y) = position(&state, 0);
		assert!(state.begin_drag(x, y));
		for _ in 0..300 {
			state.pointer_moved(100.0, 100.0);
			state.tick(0.016);
		}
		let held = position(&state, 0);
		state.end_drag();
		state.tick(0.016);

		let moved = distance(held, position(&state, 0));
		assert!(moved < 20.0, "released node moved {moved}px in one tick");
	}

	#[test]
	fn test_drag_resumes_layout() {
		let mut state = lattice();
		for _ in 0..50 {
			state.tick(0.016);
		}
		assert!(state.alpha() < state.config.layout.alpha);
		let (x, y) = position(&state, 0);
		assert!(state.begin_drag(x, y));
		state.pointer_moved(x + 5.0, y + 5.0);
		assert_eq!(state.alpha(), state.config.layout.alpha);
	}

	#[test]
	fn test_begin_drag_on_empty_space() {
		let mut state = lattice();
		assert!(!state.begin_drag(-500.0, -500.0));
		assert!(!state.drag.active);
	}

	#[test]
	fn test_hover_tracks_pointer_and_clears_on_removal() {
		let mut state = lattice();
		let (x, y) = position(&state, 0);
		state.pointer_moved(x, y);
		let hovered = state.hover.expect("pointer is on a node");
		state.remove_node(hovered);
		assert_eq!(state.hover, None);

		state.pointer_moved(x, y);
		state.pointer_left();
		assert_eq!(state.hover, None);
	}
}
