//! Elevation sampling for terrain tiles.
//!
//! The window engine never samples elevation itself; renderers that build
//! terrain meshes pull samples through the [`HeightField`] trait.

#[cfg(not(target_family = "wasm"))]
use fastnoise2::SafeNode;
#[cfg(not(target_family = "wasm"))]
use fastnoise2::generator::prelude::{Generator, GeneratorWrapper};
#[cfg(not(target_family = "wasm"))]
use fastnoise2::generator::simplex::supersimplex_scaled;

/// Deterministic elevation source over the ground plane.
///
/// Implementations must return identical elevations for identical inputs
/// (no mutable seed state visible to callers) so a tile regenerated after
/// leaving and re-entering the window looks the same.
pub trait HeightField: Send + Sync {
  /// Elevation at a world-space (x, z) sample point.
  fn sample(&self, x: f32, z: f32) -> f32;
}

/// Octave-layered coherent noise terrain.
///
/// Sums several SuperSimplex octaves at doubling spatial frequencies and
/// decaying amplitudes for natural-looking relief.
#[cfg(not(target_family = "wasm"))]
pub struct LayeredNoiseField {
  /// One generator per octave, paired with its amplitude.
  octaves: Vec<(GeneratorWrapper<SafeNode>, f32)>,
  seed: i32,
}

#[cfg(not(target_family = "wasm"))]
impl LayeredNoiseField {
  /// Default number of octaves.
  const DEFAULT_OCTAVES: usize = 3;
  /// Default feature scale of the base octave (larger = larger features).
  const DEFAULT_FEATURE_SCALE: f32 = 400.0;
  /// Default peak-to-trough amplitude of the base octave.
  const DEFAULT_AMPLITUDE: f32 = 30.0;
  /// Default amplitude falloff per octave.
  const DEFAULT_PERSISTENCE: f32 = 0.5;

  /// Creates a layered field with default octave parameters.
  pub fn new(seed: i32) -> Self {
    Self::with_params(
      seed,
      Self::DEFAULT_OCTAVES,
      Self::DEFAULT_FEATURE_SCALE,
      Self::DEFAULT_AMPLITUDE,
      Self::DEFAULT_PERSISTENCE,
    )
  }

  /// Creates a layered field with explicit octave parameters.
  ///
  /// Octave `i` has feature scale `feature_scale / 2^i` and amplitude
  /// `amplitude * persistence^i`.
  pub fn with_params(
    seed: i32,
    octaves: usize,
    feature_scale: f32,
    amplitude: f32,
    persistence: f32,
  ) -> Self {
    let octaves = (0..octaves.max(1))
      .map(|i| {
        let scale = feature_scale / 2f32.powi(i as i32);
        let amp = amplitude * persistence.powi(i as i32);
        (supersimplex_scaled(scale).build(), amp)
      })
      .collect();
    Self { octaves, seed }
  }
}

#[cfg(not(target_family = "wasm"))]
impl HeightField for LayeredNoiseField {
  fn sample(&self, x: f32, z: f32) -> f32 {
    self
      .octaves
      .iter()
      .enumerate()
      // Distinct seed per octave so layers decorrelate.
      .map(|(i, (noise, amp))| noise.gen_single_2d(x, z, self.seed + i as i32) * amp)
      .sum()
  }
}
