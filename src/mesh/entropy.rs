//! Random sources for category assignment, link targets and initial positions.

/// A stream of uniform samples in `[0, 1)`.
pub trait Entropy {
	/// Next sample in `[0, 1)`.
	fn next_f64(&mut self) -> f64;

	/// Uniform integer in `[0, n)`. Returns 0 when `n` is 0.
	fn below(&mut self, n: usize) -> usize {
		let v = (self.next_f64() * n as f64) as usize;
		v.min(n.saturating_sub(1))
	}
}

/// The host page's `Math.random`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserEntropy;

impl Entropy for BrowserEntropy {
	fn next_f64(&mut self) -> f64 {
		js_sys::Math::random()
	}
}

const LCG_MUL: u64 = 9301;
const LCG_INC: u64 = 49297;
const LCG_MOD: u64 = 233280;

/// Deterministic linear congruential source. Full period over its modulus, so
/// every sample value recurs and rejection loops always terminate.
#[derive(Clone, Debug)]
pub struct SeededEntropy {
	state: u64,
}

impl SeededEntropy {
	/// Seeds above the modulus wrap around it.
	pub fn new(seed: u64) -> Self {
		Self {
			state: seed % LCG_MOD,
		}
	}
}

impl Entropy for SeededEntropy {
	fn next_f64(&mut self) -> f64 {
		self.state = (self.state * LCG_MUL + LCG_INC) % LCG_MOD;
		self.state as f64 / LCG_MOD as f64
	}
}
