//! Proximity heat: how close the pointer is to a node or link decides how far
//! its colour shifts toward the heat colour and how much a node swells.

use super::color::Rgb;

/// Euclidean distance between two points.
pub fn distance((x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
	(x2 - x1).hypot(y2 - y1)
}

/// Linear falloff from 1 at distance 0 to 0 at `threshold` and beyond.
/// A non-positive threshold disables the channel.
fn falloff(threshold: f64, d: f64) -> f64 {
	if threshold <= 0.0 {
		return 0.0;
	}
	((threshold - d) / threshold).clamp(0.0, 1.0)
}

/// Distance-to-heat mapping for nodes and link midpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatModel {
	/// Resting node radius.
	pub node_radius: f64,
	/// Radius of a node directly under the pointer.
	pub max_radius: f64,
	/// Pointer distance beyond which colours are not heated.
	pub max_heat_color_distance: f64,
	/// Pointer distance beyond which nodes do not grow.
	pub max_heat_growth_distance: f64,
	/// Colour approached as the pointer closes in.
	pub heat_color: Rgb,
}

impl Default for HeatModel {
	fn default() -> Self {
		Self {
			node_radius: 4.0,
			max_radius: 12.0,
			max_heat_color_distance: 100.0,
			max_heat_growth_distance: 50.0,
			heat_color: Rgb::new(139, 2, 2),
		}
	}
}

impl HeatModel {
	/// Colour heat magnitude in `[0, 1]` for a pointer `d` away.
	pub fn magnitude(&self, d: f64) -> f64 {
		falloff(self.max_heat_color_distance, d)
	}

	/// Node radius for a pointer `d` away, eased out with exponent 1.5.
	pub fn radius(&self, d: f64) -> f64 {
		let v = falloff(self.max_heat_growth_distance, d);
		self.node_radius + v.powf(1.5) * (self.max_radius - self.node_radius)
	}

	/// `base` heated for a pointer `d` away.
	pub fn color(&self, base: Rgb, d: f64) -> Rgb {
		base.blend(self.heat_color, self.magnitude(d))
	}
}
