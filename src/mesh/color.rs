//! 8-bit RGB colours and heat blending.

use std::fmt;

/// An opaque 8-bit RGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Rgb {
	/// Colour from its three channels.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Blend from `self` toward `to` by `magnitude` (0 = self, 1 = to).
	///
	/// Each channel is clamped to 0..=255 and truncated, so a half blend of
	/// black and white is 127, not 128.
	pub fn blend(self, to: Rgb, magnitude: f64) -> Rgb {
		let mix = |base: u8, to: u8| {
			let v = base as f64 * (1.0 - magnitude) + to as f64 * magnitude;
			// NaN saturates to 0 in the cast
			v.clamp(0.0, 255.0) as u8
		};
		Rgb {
			r: mix(self.r, to.r),
			g: mix(self.g, to.g),
			b: mix(self.b, to.b),
		}
	}

	/// CSS `rgb(r,g,b)` form for canvas style setters.
	pub fn to_css(self) -> String {
		self.to_string()
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "rgb({},{},{})", self.r, self.g, self.b)
	}
}
