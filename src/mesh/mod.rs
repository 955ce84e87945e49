//! Mesh core: topology generators, the graph arena and the proximity heat model.
//!
//! Nothing in here touches the DOM, so it is all exercised by native tests.

pub mod color;
pub mod config;
pub mod entropy;
pub mod error;
pub mod graph;
pub mod heat;
pub mod topology;

pub use color::Rgb;
pub use config::{LayoutConfig, MeshConfig, Palette};
pub use entropy::{BrowserEntropy, Entropy, SeededEntropy};
pub use error::{ConfigError, GraphError, MeshError, TopologyError};
pub use graph::{MeshGraph, MeshLink, MeshNode, NodeHeat, NodeId};
pub use heat::HeatModel;
pub use topology::{Lattice3D, MeshTopology, RandomMesh, Topology, Torus};
