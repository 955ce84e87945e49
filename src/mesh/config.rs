//! Controller configuration: palette, heat, layout tuning and the topology.

use super::color::Rgb;
use super::error::ConfigError;
use super::heat::HeatModel;
use super::topology::{Lattice3D, MeshTopology, RandomMesh, Torus};

/// Display names and base colours indexed by node category, wrapping around
/// when there are more categories than entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	/// Display names, e.g. for tooltips.
	pub names: Vec<String>,
	/// Base node colours.
	pub colors: Vec<Rgb>,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			names: vec!["Forest".into(), "SunShine".into(), "Ember".into()],
			colors: vec![
				Rgb::new(35, 69, 29),
				Rgb::new(209, 198, 69),
				Rgb::new(170, 92, 9),
			],
		}
	}
}

impl Palette {
	/// Name for a category, or `""` when there are no names.
	pub fn name_for(&self, group: u32) -> &str {
		wrapped(&self.names, group).map_or("", String::as_str)
	}

	/// Base colour for a category, black when there are no colours.
	pub fn color_for(&self, group: u32) -> Rgb {
		wrapped(&self.colors, group).copied().unwrap_or_default()
	}
}

fn wrapped<T>(items: &[T], group: u32) -> Option<&T> {
	let i = (group as usize).checked_rem(items.len())?;
	items.get(i)
}

/// Tuning handed to the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Rest length of a link.
	pub link_distance: f64,
	/// Negative values repel.
	pub charge: f64,
	/// Pull toward the canvas centre.
	pub gravity: f64,
	/// Fraction of velocity lost per step.
	pub friction: f64,
	/// Starting temperature, also restored by a resume.
	pub alpha: f64,
	/// Per-tick multiplier applied to alpha.
	pub alpha_decay: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			link_distance: 40.0,
			charge: -40.0,
			gravity: 0.05,
			friction: 0.10,
			alpha: 0.3,
			alpha_decay: 0.995,
		}
	}
}

/// Everything needed to build and drive a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshConfig {
	/// Generator the mesh is built from.
	pub topology: MeshTopology,
	/// Category names and colours.
	pub palette: Palette,
	/// Pointer proximity heating.
	pub heat: HeatModel,
	/// Base link colour before heating.
	pub link_color: Rgb,
	/// Global alpha for links, in `[0, 1]`.
	pub link_opacity: f64,
	/// Layout engine tuning.
	pub layout: LayoutConfig,
	/// Fixed seed for reproducible meshes; `None` draws from the browser.
	pub seed: Option<u64>,
}

impl Default for MeshConfig {
	fn default() -> Self {
		Self {
			topology: MeshTopology::default(),
			palette: Palette::default(),
			heat: HeatModel::default(),
			link_color: Rgb::new(207, 134, 44),
			link_opacity: 0.6,
			layout: LayoutConfig::default(),
			seed: None,
		}
	}
}

fn in_range(field: &'static str, value: f64, ok: bool) -> Result<(), ConfigError> {
	if ok {
		Ok(())
	} else {
		Err(ConfigError::OutOfRange { field, value })
	}
}

impl MeshConfig {
	/// Reject values the controller cannot work with.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let heat = &self.heat;
		in_range("node_radius", heat.node_radius, heat.node_radius >= 0.0)?;
		if !(heat.max_radius >= heat.node_radius) {
			return Err(ConfigError::RadiusRange {
				node_radius: heat.node_radius,
				max_radius: heat.max_radius,
			});
		}
		in_range(
			"link_opacity",
			self.link_opacity,
			(0.0..=1.0).contains(&self.link_opacity),
		)?;

		let layout = &self.layout;
		in_range(
			"link_distance",
			layout.link_distance,
			layout.link_distance > 0.0,
		)?;
		in_range(
			"friction",
			layout.friction,
			(0.0..=1.0).contains(&layout.friction),
		)?;
		in_range("alpha", layout.alpha, layout.alpha >= 0.0)?;
		in_range(
			"alpha_decay",
			layout.alpha_decay,
			layout.alpha_decay > 0.0 && layout.alpha_decay <= 1.0,
		)?;

		if self.palette.colors.is_empty() {
			return Err(ConfigError::EmptyPalette);
		}
		Ok(())
	}

	/// Apply string overrides such as a URL query.
	///
	/// Recognised keys: `topology` (`lattice`, `torus`, `random`), `layers`,
	/// `rows`, `cols`, `nodes`, `links`, `categories` and `seed`. Keys that do
	/// not apply to the chosen topology and values that fail to parse are
	/// ignored.
	pub fn with_overrides<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let num = |key: &str| lookup(key).and_then(|v| v.trim().parse::<usize>().ok());

		match lookup("topology").as_deref() {
			Some("lattice") => self.topology = MeshTopology::Lattice3D(Lattice3D::default()),
			Some("torus") => self.topology = MeshTopology::Torus(Torus::default()),
			Some("random") => self.topology = MeshTopology::Random(RandomMesh::default()),
			_ => {}
		}

		let categories = num("categories").map(|c| c as u32);
		match &mut self.topology {
			MeshTopology::Lattice3D(t) => {
				t.layers = num("layers").unwrap_or(t.layers);
				t.rows = num("rows").unwrap_or(t.rows);
				t.cols = num("cols").unwrap_or(t.cols);
				t.category_count = categories.unwrap_or(t.category_count);
			}
			MeshTopology::Torus(t) => {
				t.rows = num("rows").unwrap_or(t.rows);
				t.cols = num("cols").unwrap_or(t.cols);
				t.category_count = categories.unwrap_or(t.category_count);
			}
			MeshTopology::Random(t) => {
				t.node_count = num("nodes").unwrap_or(t.node_count);
				t.avg_links_per_node = num("links").unwrap_or(t.avg_links_per_node);
				t.category_count = categories.unwrap_or(t.category_count);
			}
		}

		if let Some(seed) = lookup("seed").and_then(|v| v.trim().parse().ok()) {
			self.seed = Some(seed);
		}
		self
	}
}
