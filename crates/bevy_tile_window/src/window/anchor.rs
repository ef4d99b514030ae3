//! The anchor tile: the window's reference corner.
//!
//! The anchor ties tile space to matrix space at any instant. It names the
//! matrix cell currently mapped to the most extreme tile coordinate (the
//! far corner from the observer) and is the single source of truth for the
//! sliding modulo mapping: every other slot's tile coordinate is derived
//! from it.

use bevy::prelude::*;

use crate::coords::{AXES, MatrixCoord, TileCoord};
use crate::layout::TileLayout;

/// The {tile, matrix, world} triple of the window's far corner.
///
/// Mutated only by the shift scheduler and the full-rebuild path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowAnchor {
  tile: TileCoord,
  matrix: MatrixCoord,
  world: Vec3,
}

impl WindowAnchor {
  /// Anchor state after a full rebuild.
  ///
  /// The matrix coordinate is the last index on every active axis, and the
  /// tile coordinate is numerically equal to it. This is an arbitrary but
  /// consistent choice of origin: the freshly built window covers tiles
  /// `0..count` on each active axis.
  pub(crate) fn rebuilt(layout: &TileLayout) -> Self {
    let mut matrix = [0usize; AXES];
    let mut tile = [0i64; AXES];
    for axis in 0..AXES {
      if layout.is_active(axis) {
        matrix[axis] = layout.count(axis) - 1;
        tile[axis] = matrix[axis] as i64;
      }
    }
    let tile = TileCoord(tile);
    Self {
      tile,
      matrix: MatrixCoord(matrix),
      world: layout.tile_to_world(tile),
    }
  }

  /// Logical tile of the anchor slot.
  pub fn tile(&self) -> TileCoord {
    self.tile
  }

  /// Matrix cell of the anchor slot.
  pub fn matrix(&self) -> MatrixCoord {
    self.matrix
  }

  /// World position of the anchor tile's origin.
  pub fn world(&self) -> Vec3 {
    self.world
  }

  /// Advances the anchor by `delta` tiles along one axis.
  pub(crate) fn shift_axis(&mut self, layout: &TileLayout, axis: usize, delta: i64) {
    self.tile.0[axis] += delta;
    self.matrix.0[axis] = layout.matrix_shift(self.matrix.0[axis], axis, delta);
    self.world = layout.tile_to_world(self.tile);
  }

  /// Tile coordinate currently represented by a matrix cell.
  ///
  /// Normalizes the matrix coordinate relative to the anchor (removing the
  /// wrap offset) to get a signed offset in `(-count, 0]` per axis, then
  /// adds the anchor's tile coordinate.
  pub fn matrix_to_tile(&self, layout: &TileLayout, matrix: MatrixCoord) -> TileCoord {
    let mut tile = [0i64; AXES];
    for axis in 0..AXES {
      let count = layout.count(axis) as i64;
      let normalized =
        layout.matrix_shift(matrix.axis(axis), axis, count - 1 - self.matrix.axis(axis) as i64);
      let offset = normalized as i64 - count + 1;
      tile[axis] = self.tile.axis(axis) + offset;
    }
    TileCoord(tile)
  }

  /// Matrix cell currently representing a tile coordinate.
  ///
  /// Returns `None` if the tile lies outside the window: the offset from
  /// the anchor must fall in `[0, count)` on every axis.
  pub fn tile_to_matrix(&self, layout: &TileLayout, tile: TileCoord) -> Option<MatrixCoord> {
    let mut matrix = [0usize; AXES];
    for axis in 0..AXES {
      let offset = self.tile.axis(axis) - tile.axis(axis);
      if offset < 0 || offset >= layout.count(axis) as i64 {
        return None;
      }
      matrix[axis] = layout.matrix_shift(self.matrix.axis(axis), axis, -offset);
    }
    Some(MatrixCoord(matrix))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plane_layout() -> TileLayout {
    TileLayout::new([4, 1, 4], [10.0, 0.0, 10.0]).unwrap()
  }

  #[test]
  fn rebuilt_anchor_sits_at_far_corner() {
    let layout = plane_layout();
    let anchor = WindowAnchor::rebuilt(&layout);
    assert_eq!(anchor.matrix(), MatrixCoord::new(3, 0, 3));
    assert_eq!(anchor.tile(), TileCoord::new(3, 0, 3));
    assert_eq!(anchor.world(), Vec3::new(30.0, 0.0, 30.0));
  }

  #[test]
  fn fresh_window_maps_matrix_to_tile_identically() {
    let layout = plane_layout();
    let anchor = WindowAnchor::rebuilt(&layout);
    for matrix in layout.matrix_coords() {
      let tile = anchor.matrix_to_tile(&layout, matrix);
      assert_eq!(tile.axis(0), matrix.axis(0) as i64);
      assert_eq!(tile.axis(2), matrix.axis(2) as i64);
    }
  }

  #[test]
  fn mapping_round_trips_after_shifts() {
    let layout = plane_layout();
    let mut anchor = WindowAnchor::rebuilt(&layout);
    anchor.shift_axis(&layout, 0, 5);
    anchor.shift_axis(&layout, 2, -3);

    for matrix in layout.matrix_coords() {
      let tile = anchor.matrix_to_tile(&layout, matrix);
      assert_eq!(anchor.tile_to_matrix(&layout, tile), Some(matrix));
    }
  }

  #[test]
  fn shift_reassigns_exactly_the_wrapped_plane() {
    let layout = plane_layout();
    let mut anchor = WindowAnchor::rebuilt(&layout);
    let before: Vec<_> = layout
      .matrix_coords()
      .map(|m| anchor.matrix_to_tile(&layout, m))
      .collect();

    anchor.shift_axis(&layout, 0, 1);

    let mut changed = 0;
    for (matrix, old_tile) in layout.matrix_coords().zip(before) {
      let new_tile = anchor.matrix_to_tile(&layout, matrix);
      if new_tile != old_tile {
        changed += 1;
        // The reassigned slots jump a full window span forward.
        assert_eq!(new_tile.axis(0), old_tile.axis(0) + layout.count(0) as i64);
      }
    }
    assert_eq!(changed, 4);
  }

  #[test]
  fn tiles_outside_window_have_no_matrix_cell() {
    let layout = plane_layout();
    let anchor = WindowAnchor::rebuilt(&layout);
    assert_eq!(anchor.tile_to_matrix(&layout, TileCoord::new(4, 0, 0)), None);
    assert_eq!(anchor.tile_to_matrix(&layout, TileCoord::new(-1, 0, 0)), None);
    assert!(anchor.tile_to_matrix(&layout, TileCoord::new(0, 0, 3)).is_some());
  }
}
