//! Mesh topology generators.
//!
//! Every generator assigns node ids densely from 0 and draws each node's
//! category uniformly from `[0, category_count)`.

use super::entropy::Entropy;
use super::error::TopologyError;
use super::graph::{MeshGraph, NodeId};

/// Something that can build a mesh graph.
pub trait Topology {
	/// Build a fresh graph, drawing categories and random links from `entropy`.
	fn generate(&self, entropy: &mut dyn Entropy) -> Result<MeshGraph, TopologyError>;
}

/// Checked product of grid dimensions, bounded by the `u32` id space.
fn node_total(dims: &[usize]) -> Result<usize, TopologyError> {
	let total = dims
		.iter()
		.try_fold(1usize, |acc, &d| acc.checked_mul(d))
		.ok_or(TopologyError::TooLarge)?;
	if total > u32::MAX as usize {
		return Err(TopologyError::TooLarge);
	}
	Ok(total)
}

fn add_categorised_nodes(graph: &mut MeshGraph, count: usize, categories: u32, entropy: &mut dyn Entropy) {
	for _ in 0..count {
		let group = entropy.below(categories as usize) as u32;
		graph.add_node(group);
	}
}

/// Half-open 3D grid: each node links to its +col, +row and +layer neighbour
/// where one exists. No wraparound.
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice3D {
	/// Grid depth.
	pub layers: usize,
	/// Grid height.
	pub rows: usize,
	/// Grid width.
	pub cols: usize,
	/// Weight of every link.
	pub edge_weight: u32,
	/// Number of node categories.
	pub category_count: u32,
}

impl Default for Lattice3D {
	fn default() -> Self {
		Self {
			layers: 1,
			rows: 3,
			cols: 3,
			edge_weight: 5,
			category_count: 3,
		}
	}
}

impl Lattice3D {
	/// Grid with default weight and categories.
	pub fn new(layers: usize, rows: usize, cols: usize) -> Self {
		Self {
			layers,
			rows,
			cols,
			..Self::default()
		}
	}

	/// Id of the node at layer `l`, row `r`, column `c`.
	pub fn id(&self, l: usize, r: usize, c: usize) -> NodeId {
		NodeId((l * self.rows * self.cols + r * self.cols + c) as u32)
	}
}

impl Topology for Lattice3D {
	fn generate(&self, entropy: &mut dyn Entropy) -> Result<MeshGraph, TopologyError> {
		let total = node_total(&[self.layers, self.rows, self.cols])?;
		let mut graph = MeshGraph::with_capacity(total, total.saturating_mul(3));
		add_categorised_nodes(&mut graph, total, self.category_count, entropy);

		for l in 0..self.layers {
			for r in 0..self.rows {
				for c in 0..self.cols {
					let n1 = self.id(l, r, c);
					if c + 1 < self.cols {
						graph.add_link(n1, self.id(l, r, c + 1), self.edge_weight)?;
					}
					if r + 1 < self.rows {
						graph.add_link(n1, self.id(l, r + 1, c), self.edge_weight)?;
					}
					if l + 1 < self.layers {
						graph.add_link(n1, self.id(l + 1, r, c), self.edge_weight)?;
					}
				}
			}
		}
		Ok(graph)
	}
}

/// 2D grid with wraparound in both directions; every node has degree 4.
#[derive(Clone, Debug, PartialEq)]
pub struct Torus {
	/// Grid height.
	pub rows: usize,
	/// Grid width.
	pub cols: usize,
	/// Weight of every link.
	pub edge_weight: u32,
	/// Number of node categories.
	pub category_count: u32,
}

impl Default for Torus {
	fn default() -> Self {
		Self {
			rows: 9,
			cols: 15,
			edge_weight: 5,
			category_count: 3,
		}
	}
}

impl Torus {
	/// Torus with default weight and categories.
	pub fn new(rows: usize, cols: usize) -> Self {
		Self {
			rows,
			cols,
			..Self::default()
		}
	}

	/// Id of the node at `(r, c)`, wrapping both coordinates.
	pub fn id(&self, r: usize, c: usize) -> NodeId {
		NodeId(((r % self.rows) * self.cols + (c % self.cols)) as u32)
	}
}

impl Topology for Torus {
	fn generate(&self, entropy: &mut dyn Entropy) -> Result<MeshGraph, TopologyError> {
		let total = node_total(&[self.rows, self.cols])?;
		let mut graph = MeshGraph::with_capacity(total, total.saturating_mul(2));
		add_categorised_nodes(&mut graph, total, self.category_count, entropy);

		for r in 0..self.rows {
			for c in 0..self.cols {
				let n1 = self.id(r, c);
				graph.add_link(n1, self.id(r, c + 1), self.edge_weight)?;
				graph.add_link(n1, self.id(r + 1, c), self.edge_weight)?;
			}
		}
		Ok(graph)
	}
}

/// Random links with targets skewed toward low ids.
///
/// Targets are `floor(u^4 * n)` for uniform `u`, so they bunch up near id 0.
/// Ids carry no position, so this is a bias in id space only.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMesh {
	/// Number of nodes.
	pub node_count: usize,
	/// Links drawn per node; the total is `node_count * avg_links_per_node`.
	pub avg_links_per_node: usize,
	/// Inclusive lower bound of link weights.
	pub min_weight: u32,
	/// Exclusive upper bound of link weights (unless equal to `min_weight`).
	pub max_weight: u32,
	/// Number of node categories.
	pub category_count: u32,
}

impl Default for RandomMesh {
	fn default() -> Self {
		Self {
			node_count: 20,
			avg_links_per_node: 2,
			min_weight: 2,
			max_weight: 4,
			category_count: 3,
		}
	}
}

impl RandomMesh {
	/// Random mesh with default weights and categories.
	pub fn new(node_count: usize, avg_links_per_node: usize) -> Self {
		Self {
			node_count,
			avg_links_per_node,
			..Self::default()
		}
	}

	fn target(&self, entropy: &mut dyn Entropy) -> usize {
		let n = self.node_count;
		let skewed = (entropy.next_f64().powi(4) * n as f64) as usize;
		(n + skewed.min(n - 1)) % n
	}
}

impl Topology for RandomMesh {
	fn generate(&self, entropy: &mut dyn Entropy) -> Result<MeshGraph, TopologyError> {
		if self.min_weight > self.max_weight {
			return Err(TopologyError::InvalidWeightRange {
				min: self.min_weight,
				max: self.max_weight,
			});
		}
		let total = node_total(&[self.node_count])?;
		let link_total = total
			.checked_mul(self.avg_links_per_node)
			.ok_or(TopologyError::TooLarge)?;
		if link_total > 0 && total < 2 {
			return Err(TopologyError::TooFewNodes { node_count: total });
		}

		let mut graph = MeshGraph::with_capacity(total, link_total);
		add_categorised_nodes(&mut graph, total, self.category_count, entropy);

		let span = (self.max_weight - self.min_weight) as usize;
		for _ in 0..link_total {
			let source = entropy.below(total);
			let target = loop {
				let t = self.target(entropy);
				if t != source {
					break t;
				}
			};
			let value = self.min_weight + entropy.below(span) as u32;
			graph.add_link(NodeId(source as u32), NodeId(target as u32), value)?;
		}
		Ok(graph)
	}
}

/// The generator a mesh is built from.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshTopology {
	/// See [`Lattice3D`].
	Lattice3D(Lattice3D),
	/// See [`Torus`].
	Torus(Torus),
	/// See [`RandomMesh`].
	Random(RandomMesh),
}

impl Default for MeshTopology {
	fn default() -> Self {
		MeshTopology::Lattice3D(Lattice3D::default())
	}
}

impl Topology for MeshTopology {
	fn generate(&self, entropy: &mut dyn Entropy) -> Result<MeshGraph, TopologyError> {
		match self {
			MeshTopology::Lattice3D(t) => t.generate(entropy),
			MeshTopology::Torus(t) => t.generate(entropy),
			MeshTopology::Random(t) => t.generate(entropy),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::mesh::entropy::SeededEntropy;

	fn build(topology: &impl Topology) -> MeshGraph {
		topology.generate(&mut SeededEntropy::new(1)).unwrap()
	}

	fn has_link(graph: &MeshGraph, a: u32, b: u32) -> bool {
		graph
			.links()
			.iter()
			.any(|l| l.source == NodeId(a) && l.target == NodeId(b))
	}

	#[test]
	fn test_lattice_3x3_counts() {
		let graph = build(&Lattice3D::new(1, 3, 3));
		assert_eq!(graph.node_count(), 9);
		assert_eq!(graph.link_count(), 12);
	}

	#[test]
	fn test_lattice_3d_counts_and_steps() {
		let lattice = Lattice3D::new(2, 3, 4);
		let graph = build(&lattice);
		assert_eq!(graph.node_count(), 24);
		// per axis: (cols-1)*rows*layers + (rows-1)*cols*layers + (layers-1)*rows*cols
		assert_eq!(graph.link_count(), 3 * 3 * 2 + 2 * 4 * 2 + 3 * 4);

		for link in graph.links() {
			let step = link.target.0 - link.source.0;
			assert!([1, 4, 12].contains(&step), "unexpected step {step}");
		}
	}

	#[test]
	fn test_lattice_does_not_wrap() {
		let lattice = Lattice3D::new(1, 3, 3);
		let graph = build(&lattice);
		// end of row 0 must not reach start of row 1
		assert!(!has_link(&graph, 2, 3));
		assert!(has_link(&graph, 0, 1));
		assert!(has_link(&graph, 0, 3));
	}

	#[test]
	fn test_torus_2x2() {
		let graph = build(&Torus::new(2, 2));
		assert_eq!(graph.node_count(), 4);
		assert_eq!(graph.link_count(), 8);
	}

	#[test]
	fn test_torus_every_node_has_degree_four() {
		let graph = build(&Torus::new(4, 5));
		for node in graph.nodes() {
			assert_eq!(graph.degree(node.id), 4, "{}", node.id);
		}
	}

	#[test]
	fn test_torus_wraps() {
		let torus = Torus::new(3, 4);
		let graph = build(&torus);
		assert_eq!(torus.id(0, 4), NodeId(0));
		// (0, 3) -> (0, 0) and (2, 0) -> (0, 0)
		assert!(has_link(&graph, 3, 0));
		assert!(has_link(&graph, 8, 0));
	}

	#[test]
	fn test_zero_dimension_is_empty() {
		assert!(build(&Torus::new(0, 5)).is_empty());
		let lattice = build(&Lattice3D::new(0, 3, 3));
		assert!(lattice.is_empty());
		assert_eq!(lattice.link_count(), 0);
	}

	#[test]
	fn test_random_counts_and_no_self_links() {
		let random = RandomMesh::new(30, 3);
		let graph = build(&random);
		assert_eq!(graph.node_count(), 30);
		assert_eq!(graph.link_count(), 90);
		for link in graph.links() {
			assert_ne!(link.source, link.target);
			assert!(graph.contains(link.source) && graph.contains(link.target));
			assert!((random.min_weight..random.max_weight).contains(&link.value));
		}
	}

	#[test]
	fn test_random_two_nodes_always_link_across() {
		let graph = build(&RandomMesh::new(2, 10));
		assert_eq!(graph.link_count(), 20);
		assert!(graph.links().iter().all(|l| l.source != l.target));
	}

	#[test]
	fn test_random_rejects_single_node_with_links() {
		let err = RandomMesh::new(1, 2).generate(&mut SeededEntropy::new(1));
		assert_eq!(err.unwrap_err(), TopologyError::TooFewNodes { node_count: 1 });
		assert!(build(&RandomMesh::new(1, 0)).link_count() == 0);
	}

	#[test]
	fn test_random_rejects_inverted_weights() {
		let random = RandomMesh {
			min_weight: 5,
			max_weight: 2,
			..RandomMesh::default()
		};
		assert_eq!(
			random.generate(&mut SeededEntropy::new(1)).unwrap_err(),
			TopologyError::InvalidWeightRange { min: 5, max: 2 }
		);
	}

	#[test]
	fn test_random_equal_weights_use_min() {
		let random = RandomMesh {
			min_weight: 3,
			max_weight: 3,
			..RandomMesh::default()
		};
		assert!(build(&random).links().iter().all(|l| l.value == 3));
	}

	#[test]
	fn test_categories_within_range_and_ids_unique() {
		let graph = build(&MeshTopology::Torus(Torus::default()));
		let ids: HashSet<NodeId> = graph.nodes().map(|n| n.id).collect();
		assert_eq!(ids.len(), graph.node_count());
		assert!(graph.nodes().all(|n| n.group < 3));
	}

	#[test]
	fn test_zero_categories_fall_back_to_group_zero() {
		let lattice = Lattice3D {
			category_count: 0,
			..Lattice3D::default()
		};
		assert!(build(&lattice).nodes().all(|n| n.group == 0));
	}

	#[test]
	fn test_seeded_generation_is_reproducible() {
		let random = RandomMesh::default();
		let a = random.generate(&mut SeededEntropy::new(9)).unwrap();
		let b = random.generate(&mut SeededEntropy::new(9)).unwrap();
		assert_eq!(a.links(), b.links());
	}

	#[test]
	fn test_oversized_topology_is_rejected() {
		let lattice = Lattice3D::new(usize::MAX, 2, 2);
		assert_eq!(
			lattice.generate(&mut SeededEntropy::new(1)).unwrap_err(),
			TopologyError::TooLarge
		);
	}
}
