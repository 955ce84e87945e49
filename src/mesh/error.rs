//! Error types for graph assembly, topology generation and configuration.

use thiserror::Error;

use super::graph::NodeId;

/// Errors raised while assembling a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	/// A link named a node that is absent.
	#[error("link endpoint {0} is not in the graph")]
	MissingEndpoint(NodeId),
}

/// Errors raised by topology generators for configurations they cannot build.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
	/// Links were requested over fewer than two nodes.
	#[error("random mesh needs at least 2 nodes to place links, got {node_count}")]
	TooFewNodes {
		/// Requested node count.
		node_count: usize,
	},

	/// `min_weight` exceeds `max_weight`.
	#[error("link weight range is empty: min {min} > max {max}")]
	InvalidWeightRange {
		/// Lower bound.
		min: u32,
		/// Upper bound.
		max: u32,
	},

	/// Node ids would not fit in `u32`.
	#[error("topology would need more than u32::MAX nodes")]
	TooLarge,

	/// Graph assembly failed.
	#[error(transparent)]
	Graph(#[from] GraphError),
}

/// Rejected controller configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
	/// A numeric setting outside its allowed range.
	#[error("{field} = {value} is out of range")]
	OutOfRange {
		/// Setting name.
		field: &'static str,
		/// Offending value.
		value: f64,
	},

	/// Heated radius below the resting radius.
	#[error("max radius {max_radius} is smaller than node radius {node_radius}")]
	RadiusRange {
		/// Resting radius.
		node_radius: f64,
		/// Heated radius.
		max_radius: f64,
	},

	/// No colours to assign to categories.
	#[error("node palette has no colours")]
	EmptyPalette,
}

/// Anything that can stop a mesh from being built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
	/// Rejected by validation.
	#[error("invalid configuration: {0}")]
	Config(#[from] ConfigError),

	/// The generator could not build the graph.
	#[error("cannot generate topology: {0}")]
	Topology(#[from] TopologyError),
}
