//! Arena-backed mesh graph.
//!
//! Nodes live in slots indexed by their [`NodeId`]; links refer to nodes by id.
//! Removing a node empties its slot and drops every incident link in the same
//! call, so the graph is never observed with a dangling link.

use std::fmt;

use super::color::Rgb;
use super::error::GraphError;

/// Stable node identifier, also the node's slot index in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
	/// Slot index in the arena.
	#[inline]
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Node({})", self.0)
	}
}

/// Current proximity heat of a node as last computed from the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeHeat {
	/// Drawn radius.
	pub radius: f64,
	/// Heated colour.
	pub color: Rgb,
}

/// A mesh vertex. Position is written by the layout engine once it runs.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
	/// Slot id, fixed for the node's lifetime.
	pub id: NodeId,
	/// Category index; drives `name` and `color`.
	pub group: u32,
	/// Canvas x.
	pub x: f64,
	/// Canvas y.
	pub y: f64,
	/// Category name, shown on hover.
	pub name: String,
	/// Base colour before heating.
	pub color: Rgb,
	/// Radius and colour as currently heated.
	pub heat: NodeHeat,
}

impl MeshNode {
	fn new(id: NodeId, group: u32) -> Self {
		Self {
			id,
			group,
			x: 0.0,
			y: 0.0,
			name: String::new(),
			color: Rgb::default(),
			heat: NodeHeat::default(),
		}
	}
}

/// An undirected mesh link between two present nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshLink {
	/// One end.
	pub source: NodeId,
	/// The other end.
	pub target: NodeId,
	/// Weight; drawn as stroke width `sqrt(value)`.
	pub value: u32,
	/// Base colour before heating.
	pub color: Rgb,
	/// Colour as currently heated.
	pub stroke: Rgb,
}

impl MeshLink {
	/// Whether either end is `id`.
	pub fn touches(&self, id: NodeId) -> bool {
		self.source == id || self.target == id
	}
}

/// Node arena plus link list.
#[derive(Clone, Debug, Default)]
pub struct MeshGraph {
	slots: Vec<Option<MeshNode>>,
	links: Vec<MeshLink>,
}

impl MeshGraph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// An empty graph with room for `nodes` and `links`.
	pub fn with_capacity(nodes: usize, links: usize) -> Self {
		Self {
			slots: Vec::with_capacity(nodes),
			links: Vec::with_capacity(links),
		}
	}

	/// Append a node in the next free id.
	pub fn add_node(&mut self, group: u32) -> NodeId {
		let id = NodeId(self.slots.len() as u32);
		self.slots.push(Some(MeshNode::new(id, group)));
		id
	}

	/// Link two present nodes.
	pub fn add_link(&mut self, source: NodeId, target: NodeId, value: u32) -> Result<(), GraphError> {
		for id in [source, target] {
			if !self.contains(id) {
				return Err(GraphError::MissingEndpoint(id));
			}
		}
		self.links.push(MeshLink {
			source,
			target,
			value,
			color: Rgb::default(),
			stroke: Rgb::default(),
		});
		Ok(())
	}

	/// Remove a node together with every link touching it.
	///
	/// Returns `false` when the node is not in the graph; nothing changes then.
	pub fn remove_node(&mut self, id: NodeId) -> bool {
		let Some(slot) = self.slots.get_mut(id.index()) else {
			return false;
		};
		if slot.take().is_none() {
			return false;
		}
		self.links.retain(|link| !link.touches(id));
		true
	}

	/// Whether `id` is present.
	pub fn contains(&self, id: NodeId) -> bool {
		self.node(id).is_some()
	}

	/// The node at `id`, if present.
	pub fn node(&self, id: NodeId) -> Option<&MeshNode> {
		self.slots.get(id.index()).and_then(Option::as_ref)
	}

	/// Mutable access to the node at `id`, if present.
	pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MeshNode> {
		self.slots.get_mut(id.index()).and_then(Option::as_mut)
	}

	/// Present nodes in id order.
	pub fn nodes(&self) -> impl Iterator<Item = &MeshNode> {
		self.slots.iter().flatten()
	}

	/// Present nodes in id order, mutably.
	pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut MeshNode> {
		self.slots.iter_mut().flatten()
	}

	/// All links, in insertion order.
	pub fn links(&self) -> &[MeshLink] {
		&self.links
	}

	/// Links for in-place attribute updates; membership stays fixed.
	pub fn links_mut(&mut self) -> &mut [MeshLink] {
		&mut self.links
	}

	/// Number of present nodes.
	pub fn node_count(&self) -> usize {
		self.nodes().count()
	}

	/// Number of links.
	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// Whether no nodes are present.
	pub fn is_empty(&self) -> bool {
		self.nodes().next().is_none()
	}

	/// Number of link ends at `id`; a self-link counts twice.
	pub fn degree(&self, id: NodeId) -> usize {
		self.links
			.iter()
			.map(|l| (l.source == id) as usize + (l.target == id) as usize)
			.sum()
	}

	/// Midpoint between a link's endpoints at their current positions.
	pub fn link_midpoint(&self, link: &MeshLink) -> Option<(f64, f64)> {
		let (s, t) = (self.node(link.source)?, self.node(link.target)?);
		Some(((s.x + t.x) / 2.0, (s.y + t.y) / 2.0))
	}
}
