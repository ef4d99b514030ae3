//! Incremental window shifts.
//!
//! When the observer's thresholded tile coordinate moves by `d` along one
//! axis, only the `|d|` newly exposed planes of the window need new tile
//! assignments; every other slot keeps the tile it already shows. This
//! module walks exactly those planes, keeping update cost proportional to
//! the window's edge rather than its volume.

use crate::coords::{AXES, MatrixCoord, TileDescriptor};
use crate::layout::TileLayout;
use crate::renderer::TileRenderer;
use crate::window::anchor::WindowAnchor;

/// Recomputes one slot's descriptor, stores it, and notifies the renderer.
pub(crate) fn emit_slot(
  layout: &TileLayout,
  anchor: &WindowAnchor,
  slots: &mut [TileDescriptor],
  renderer: &mut dyn TileRenderer,
  matrix: MatrixCoord,
) {
  let tile = anchor.matrix_to_tile(layout, matrix);
  let descriptor = TileDescriptor {
    matrix,
    tile,
    world: layout.tile_to_world(tile),
  };
  slots[layout.slot_index(matrix)] = descriptor;
  renderer.update_tile(&descriptor);
}

/// Re-emits every slot of the window against the current anchor.
///
/// Used by the full-rebuild path and when a single displacement spans the
/// whole window (the observer teleported); representations are reused, not
/// torn down.
pub(crate) fn refresh_all(
  layout: &TileLayout,
  anchor: &WindowAnchor,
  slots: &mut [TileDescriptor],
  renderer: &mut dyn TileRenderer,
) {
  for matrix in layout.matrix_coords() {
    emit_slot(layout, anchor, slots, renderer, matrix);
  }
}

/// Applies a displacement of `delta` tiles along `axis`.
///
/// Advances the anchor, then walks the newly exposed planes leading-edge
/// first: step `i = 0` emits the plane at the new anchor index (farthest
/// from the observer), later steps recede toward the interior. The plane
/// being replaced on step `i` starts at the anchor's matrix index and
/// recedes against the direction of travel; when moving in the negative
/// direction the anchor-side plane survives and the freed plane is its
/// wrap-around neighbour, hence the extra `+1`.
pub(crate) fn shift_axis(
  layout: &TileLayout,
  anchor: &mut WindowAnchor,
  slots: &mut [TileDescriptor],
  renderer: &mut dyn TileRenderer,
  axis: usize,
  delta: i64,
) {
  debug_assert!(delta != 0);
  anchor.shift_axis(layout, axis, delta);

  let count = layout.count(axis);
  if delta.unsigned_abs() as usize >= count {
    // The whole window is stale on this axis.
    refresh_all(layout, anchor, slots, renderer);
    return;
  }

  let direction = delta.signum();
  for i in 0..delta.unsigned_abs() {
    let mut plane = layout.matrix_shift(anchor.matrix().axis(axis), axis, -(i as i64) * direction);
    if direction < 0 {
      plane = layout.matrix_shift(plane, axis, 1);
    }
    for matrix in plane_coords(layout, axis, plane) {
      emit_slot(layout, anchor, slots, renderer, matrix);
    }
  }
}

/// Iterates the matrix coordinates of one plane: the given axis held at
/// `index`, all other axes over their full ranges.
fn plane_coords(
  layout: &TileLayout,
  axis: usize,
  index: usize,
) -> impl Iterator<Item = MatrixCoord> + use<> {
  let (a, b) = match axis {
    0 => (1, 2),
    1 => (0, 2),
    _ => (0, 1),
  };
  let (count_a, count_b) = (layout.count(a), layout.count(b));
  (0..count_a).flat_map(move |i| {
    (0..count_b).map(move |j| {
      let mut matrix = [0usize; AXES];
      matrix[axis] = index;
      matrix[a] = i;
      matrix[b] = j;
      MatrixCoord(matrix)
    })
  })
}
