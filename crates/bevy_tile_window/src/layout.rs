//! Window layout: per-axis tile counts/sizes and pure coordinate math.
//!
//! [`TileLayout`] is the validated shape of a tile window. All conversions
//! between world positions, tile coordinates and matrix coordinates live
//! here; they are pure functions of the layout and carry no window state.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::coords::{AXES, MatrixCoord, TileCoord};

/// User-facing window configuration, loadable from TOML.
///
/// Tile counts must be even on active axes; odd values are normalized by
/// incrementing (the window is silently enlarged by one tile) so the anchor
/// stays symmetric around the observer. A count of 1 deactivates an axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileWindowConfig {
  /// Tiles held per axis. 1 = axis inactive.
  pub tile_count: [u32; AXES],
  /// World-space extent of one tile per axis. May be 0 on inactive axes.
  pub tile_size: [f32; AXES],
}

impl Default for TileWindowConfig {
  fn default() -> Self {
    // Ground plane on x/z, vertical axis inactive.
    Self {
      tile_count: [8, 1, 8],
      tile_size: [100.0, 0.0, 100.0],
    }
  }
}

impl TileWindowConfig {
  /// Parses a config from TOML text.
  pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(text)
  }

  /// Validates this config into a [`TileLayout`].
  pub fn layout(&self) -> Result<TileLayout, LayoutError> {
    let counts = [
      self.tile_count[0] as usize,
      self.tile_count[1] as usize,
      self.tile_count[2] as usize,
    ];
    TileLayout::new(counts, self.tile_size)
  }
}

/// Error validating a window layout.
#[derive(Debug, PartialEq)]
pub enum LayoutError {
  /// An active axis (count > 1) has a zero or negative tile size.
  DegenerateTileSize { axis: usize, size: f32 },
}

impl std::fmt::Display for LayoutError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::DegenerateTileSize { axis, size } => {
        write!(f, "tile size {} on active axis {} must be positive", size, axis)
      }
    }
  }
}

impl std::error::Error for LayoutError {}

/// Validated shape of a tile window.
///
/// Holds per-axis tile counts and sizes and provides the coordinate
/// algebra: floor conversion from world space to tile space, tile-to-world
/// placement, and the toroidal [`matrix_shift`](Self::matrix_shift) that
/// underpins every wrap-around computation.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayout {
  counts: [usize; AXES],
  sizes: [f32; AXES],
}

impl TileLayout {
  /// Creates a validated layout.
  ///
  /// Counts of 0 are treated as 1 (inactive axis). Odd counts on active
  /// axes are incremented with a diagnostic. Returns an error if an active
  /// axis has a non-positive tile size.
  pub fn new(counts: [usize; AXES], sizes: [f32; AXES]) -> Result<Self, LayoutError> {
    let mut counts = counts;
    for (axis, count) in counts.iter_mut().enumerate() {
      if *count == 0 {
        *count = 1;
      }
      if *count > 1 && *count % 2 != 0 {
        warn!(
          "tile count {} on axis {} must be even, using {}",
          *count,
          axis,
          *count + 1
        );
        *count += 1;
      }
      if *count > 1 && sizes[axis] <= 0.0 {
        return Err(LayoutError::DegenerateTileSize {
          axis,
          size: sizes[axis],
        });
      }
    }
    Ok(Self { counts, sizes })
  }

  /// Returns true if the axis participates in coordinate math.
  #[inline]
  pub fn is_active(&self, axis: usize) -> bool {
    self.counts[axis] > 1
  }

  /// Tile count on the given axis.
  #[inline]
  pub fn count(&self, axis: usize) -> usize {
    self.counts[axis]
  }

  /// Tile size on the given axis.
  #[inline]
  pub fn size(&self, axis: usize) -> f32 {
    self.sizes[axis]
  }

  /// Total number of slots the window holds.
  pub fn capacity(&self) -> usize {
    self.counts.iter().product()
  }

  /// Converts a world position to the tile coordinate containing it.
  ///
  /// Floor semantics: positions on a tile's negative edge belong to that
  /// tile, and negative positions round toward negative infinity.
  pub fn world_to_tile(&self, pos: Vec3) -> TileCoord {
    let mut tile = [0i64; AXES];
    for axis in 0..AXES {
      if self.is_active(axis) {
        tile[axis] = (pos[axis] / self.sizes[axis]).floor() as i64;
      }
    }
    TileCoord(tile)
  }

  /// Converts a world position to a tile coordinate with the shift
  /// threshold centered on tile midpoints.
  ///
  /// The position is offset by half a tile per active axis before the
  /// floor conversion, so the window rolls when the observer passes a tile
  /// center rather than an edge. Inactive axes are skipped entirely.
  pub fn world_to_tile_shifted(&self, pos: Vec3) -> TileCoord {
    let mut shifted = pos;
    for axis in 0..AXES {
      if self.is_active(axis) {
        shifted[axis] += self.sizes[axis] / 2.0;
      }
    }
    self.world_to_tile(shifted)
  }

  /// Converts a tile coordinate to the world position of its origin.
  pub fn tile_to_world(&self, tile: TileCoord) -> Vec3 {
    let mut pos = Vec3::ZERO;
    for axis in 0..AXES {
      if self.is_active(axis) {
        pos[axis] = tile.axis(axis) as f32 * self.sizes[axis];
      }
    }
    pos
  }

  /// Shifts a matrix index along an axis, wrapping toroidally.
  ///
  /// Correct for any signed `delta`, including large negative values:
  /// `rem_euclid` gives the true mathematical modulo, not the truncating
  /// remainder.
  #[inline]
  pub fn matrix_shift(&self, start: usize, axis: usize, delta: i64) -> usize {
    let count = self.counts[axis] as i64;
    ((start as i64 + delta.rem_euclid(count)) % count) as usize
  }

  /// Linear index of a matrix coordinate into the slot storage.
  #[inline]
  pub fn slot_index(&self, matrix: MatrixCoord) -> usize {
    matrix.axis(0) + self.counts[0] * (matrix.axis(1) + self.counts[1] * matrix.axis(2))
  }

  /// Iterates all matrix coordinates in slot storage order.
  pub fn matrix_coords(&self) -> impl Iterator<Item = MatrixCoord> + use<> {
    let [cx, cy, cz] = self.counts;
    (0..cz).flat_map(move |z| {
      (0..cy).flat_map(move |y| (0..cx).map(move |x| MatrixCoord::new(x, y, z)))
    })
  }

  /// Offset that centers the window around the observer's tile.
  ///
  /// Renderers subtract this from a tile's world position so the window
  /// extends half its span in each direction: `(count - 1) * size / 2` per
  /// active axis.
  pub fn center_offset(&self) -> Vec3 {
    let mut offset = Vec3::ZERO;
    for axis in 0..AXES {
      if self.is_active(axis) {
        offset[axis] = (self.counts[axis] - 1) as f32 * self.sizes[axis] / 2.0;
      }
    }
    offset
  }
}
