//! Coordinate types for the toroidal tile window.
//!
//! Three coordinate spaces are in play:
//! - World position (`Vec3`): continuous, observer-driven.
//! - [`TileCoord`]: unbounded signed grid coordinate of a logical tile.
//! - [`MatrixCoord`]: bounded index into the fixed-capacity slot storage,
//!   reused toroidally as the window slides.

use bevy::prelude::*;

/// Number of axes the window can stream along.
///
/// Axes with a tile count of 1 are inactive and excluded from all
/// coordinate math.
pub const AXES: usize = 3;

/// Unbounded signed grid coordinate of a logical tile.
///
/// Uses i64 per axis for effectively infinite worlds without overflow
/// concerns. Inactive axes are always 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileCoord(pub [i64; AXES]);

impl TileCoord {
  /// Creates a new tile coordinate.
  pub const fn new(x: i64, y: i64, z: i64) -> Self {
    Self([x, y, z])
  }

  /// Returns the component on the given axis.
  #[inline]
  pub const fn axis(&self, axis: usize) -> i64 {
    self.0[axis]
  }
}

/// Bounded index into the physical slot storage.
///
/// Each component lies in `[0, tile_count_axis)`. The mapping from
/// [`TileCoord`] to `MatrixCoord` is a sliding modulo: the same physical
/// slot represents different tile coordinates over time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MatrixCoord(pub [usize; AXES]);

impl MatrixCoord {
  /// Creates a new matrix coordinate.
  pub const fn new(x: usize, y: usize, z: usize) -> Self {
    Self([x, y, z])
  }

  /// Returns the component on the given axis.
  #[inline]
  pub const fn axis(&self, axis: usize) -> usize {
    self.0[axis]
  }
}

/// Everything a renderer needs to materialize one slot of the window.
///
/// Emitted once per slot on full rebuild, and once per refreshed slot when
/// the window shifts. A descriptor supersedes any earlier descriptor for
/// the same matrix coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TileDescriptor {
  /// Physical storage slot this tile occupies.
  pub matrix: MatrixCoord,
  /// Logical tile in the infinite grid.
  pub tile: TileCoord,
  /// World position of the tile origin (`tile * tile_size` per axis).
  pub world: Vec3,
}
