use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::mesh::{LayoutConfig, MeshGraph, NodeId};

pub const NODE_MASS: f32 = 10.0;
/// Converts a classic force-layout charge into `force_graph` charge units.
const CHARGE_SCALE: f64 = 3.75;

/// Engine parameters at full temperature.
///
/// Spring stiffness is chosen so that a linked pair settles at
/// `link_distance`: the engine pulls with `spring * d / 2` and pushes with
/// `charge * m^2 / d^2`.
pub fn simulation_parameters(config: &LayoutConfig) -> SimulationParameters {
	let force_charge = -config.charge * CHARGE_SCALE;
	let mass_sq = (NODE_MASS * NODE_MASS) as f64;
	let force_spring = 2.0 * force_charge.abs() * mass_sq / config.link_distance.powi(3);
	SimulationParameters {
		force_charge: force_charge as f32,
		force_spring: force_spring as f32,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: (1.0 - config.friction) as f32,
	}
}

/// The external layout engine, addressed by mesh node id.
pub struct ForceLayout {
	engine: ForceGraph<NodeId, ()>,
	handles: HashMap<NodeId, DefaultNodeIdx>,
	base: SimulationParameters,
	initial_alpha: f64,
	gravity: f64,
	center: (f32, f32),
}

impl ForceLayout {
	pub fn new(config: &LayoutConfig, graph: &MeshGraph, width: f64, height: f64) -> Self {
		let base = simulation_parameters(config);
		let mut engine = ForceGraph::new(base.clone());
		let mut handles = HashMap::with_capacity(graph.node_count());

		for node in graph.nodes() {
			let idx = engine.add_node(NodeData {
				x: node.x as f32,
				y: node.y as f32,
				mass: NODE_MASS,
				is_anchor: false,
				user_data: node.id,
			});
			handles.insert(node.id, idx);
		}

		for link in graph.links() {
			// a self-link exerts no force, and the engine cannot borrow a node twice
			if link.source == link.target {
				continue;
			}
			if let (Some(&src), Some(&tgt)) = (handles.get(&link.source), handles.get(&link.target)) {
				engine.add_edge(src, tgt, EdgeData::default());
			}
		}

		Self {
			engine,
			handles,
			base,
			initial_alpha: config.alpha,
			gravity: config.gravity,
			center: ((width / 2.0) as f32, (height / 2.0) as f32),
		}
	}

	/// Advance one step at temperature `alpha`.
	///
	/// Forces scale with `alpha` relative to the starting temperature, and
	/// free nodes are pulled toward the centre by `alpha * gravity`.
	pub fn step(&mut self, dt: f32, alpha: f64) {
		let energy = if self.initial_alpha > 0.0 {
			(alpha / self.initial_alpha) as f32
		} else {
			0.0
		};
		self.engine.parameters.force_charge = self.base.force_charge * energy;
		self.engine.parameters.force_spring = self.base.force_spring * energy;
		self.engine.update(dt);

		let k = (alpha * self.gravity) as f32;
		let (cx, cy) = self.center;
		self.engine.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x += (cx - node.data.x) * k;
				node.data.y += (cy - node.data.y) * k;
			}
		});
	}

	/// Copy engine positions into the mesh nodes.
	pub fn sync_into(&self, graph: &mut MeshGraph) {
		self.engine.visit_nodes(|node| {
			if let Some(mesh_node) = graph.node_mut(node.data.user_data) {
				mesh_node.x = node.x() as f64;
				mesh_node.y = node.y() as f64;
			}
		});
	}

	/// Drop a node and its springs. Returns `false` for an unknown node.
	pub fn remove(&mut self, id: NodeId) -> bool {
		match self.handles.remove(&id) {
			Some(idx) => {
				self.engine.remove_node(idx);
				true
			}
			None => false,
		}
	}

	pub fn position(&self, id: NodeId) -> Option<(f64, f64)> {
		let idx = *self.handles.get(&id)?;
		let mut found = None;
		self.engine.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) {
		self.with_node(id, |data| {
			data.x = x as f32;
			data.y = y as f32;
		});
	}

	/// Hold a node in place.
	pub fn pin(&mut self, id: NodeId) {
		self.with_node(id, |data| data.is_anchor = true);
	}

	/// Let a pinned node move again, starting from rest.
	///
	/// The engine keeps adding spring force to an anchored node without ever
	/// applying or clearing it, so the body is replaced by a fresh one at the
	/// same position with the same springs.
	pub fn release(&mut self, id: NodeId) {
		let (Some(&idx), Some((x, y))) = (self.handles.get(&id), self.position(id)) else {
			return;
		};
		let neighbors: Vec<DefaultNodeIdx> = self.engine.get_graph().neighbors(idx).collect();
		self.engine.remove_node(idx);

		let fresh = self.engine.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: NODE_MASS,
			is_anchor: false,
			user_data: id,
		});
		for other in neighbors {
			self.engine.add_edge(fresh, other, EdgeData::default());
		}
		self.handles.insert(id, fresh);
	}

	fn with_node(&mut self, id: NodeId, mut f: impl FnMut(&mut NodeData<NodeId>)) {
		let Some(&idx) = self.handles.get(&id) else {
			return;
		};
		self.engine.visit_nodes_mut(|node| {
			if node.index() == idx {
				f(&mut node.data);
			}
		});
	}

	pub fn node_count(&self) -> usize {
		self.handles.len()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.center = ((width / 2.0) as f32, (height / 2.0) as f32);
	}
}
