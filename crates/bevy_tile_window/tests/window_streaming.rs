//! End-to-end streaming behavior of the tile window engine.

use bevy::prelude::*;
use bevy_tile_window::{
  MatrixCoord, NullRenderer, TileCoord, TileDescriptor, TileLayout, TileRenderer, TileWindow,
  TileWindowConfig, WindowError,
};

/// Renderer capturing every notification for inspection.
#[derive(Default)]
struct Recorder {
  updates: Vec<TileDescriptor>,
  resets: usize,
}

impl TileRenderer for Recorder {
  fn update_tile(&mut self, tile: &TileDescriptor) {
    self.updates.push(*tile);
  }

  fn reset(&mut self, _capacity: usize) {
    self.resets += 1;
  }
}

fn layout_2d() -> TileLayout {
  TileLayout::new([4, 1, 4], [10.0, 0.0, 10.0]).unwrap()
}

fn layout_3d() -> TileLayout {
  TileLayout::new([4, 4, 4], [10.0, 10.0, 10.0]).unwrap()
}

/// Asserts that the stored slots form a bijection consistent with the
/// anchor mapping and with `query_matrix_coord`.
fn assert_window_coherent(window: &TileWindow) {
  let layout = window.layout();
  let mut tiles: Vec<TileCoord> = Vec::new();
  for matrix in layout.matrix_coords() {
    let descriptor = window.descriptor(matrix).copied().unwrap();
    assert_eq!(descriptor.matrix, matrix);
    assert_eq!(
      window.anchor().matrix_to_tile(layout, matrix),
      descriptor.tile
    );
    assert_eq!(layout.tile_to_world(descriptor.tile), descriptor.world);
    // Round-trip through the inverse mapping.
    assert_eq!(
      window.anchor().tile_to_matrix(layout, descriptor.tile),
      Some(matrix)
    );
    tiles.push(descriptor.tile);
  }
  let len = tiles.len();
  tiles.sort_by_key(|t| (t.axis(0), t.axis(1), t.axis(2)));
  tiles.dedup();
  assert_eq!(tiles.len(), len, "duplicate tile coordinate in window");
}

#[test]
fn full_rebuild_emits_sixteen_descriptors() {
  let mut recorder = Recorder::default();
  let window = TileWindow::built(layout_2d(), &mut recorder);

  assert_eq!(recorder.resets, 1);
  assert_eq!(recorder.updates.len(), 16);
  assert_window_coherent(&window);
}

#[test]
fn one_tile_east_emits_exactly_one_plane() {
  let mut window = TileWindow::built(layout_2d(), &mut Recorder::default());
  let mut recorder = Recorder::default();

  window.set_observer_position(Vec3::new(10.0, 0.0, 0.0), &mut recorder);

  assert_eq!(recorder.updates.len(), 4);
  assert_eq!(window.anchor().tile().axis(0), 4);
  // The plane holds the newly entered column, one descriptor per row.
  for descriptor in &recorder.updates {
    assert_eq!(descriptor.tile.axis(0), 4);
    assert_eq!(descriptor.world.x, 40.0);
  }
  assert_window_coherent(&window);
}

#[test]
fn second_call_with_same_position_emits_nothing() {
  let mut window = TileWindow::built(layout_2d(), &mut Recorder::default());
  window.set_observer_position(Vec3::new(10.0, 0.0, 0.0), &mut Recorder::default());

  let mut recorder = Recorder::default();
  window.set_observer_position(Vec3::new(10.0, 0.0, 0.0), &mut recorder);
  assert!(recorder.updates.is_empty());

  // Same thresholded tile, different position: still nothing.
  window.set_observer_position(Vec3::new(13.0, 0.0, 2.0), &mut recorder);
  assert!(recorder.updates.is_empty());
}

#[test]
fn westward_movement_exposes_negative_tiles() {
  let mut window = TileWindow::built(layout_2d(), &mut Recorder::default());
  let mut recorder = Recorder::default();

  window.set_observer_position(Vec3::new(-10.0, 0.0, 0.0), &mut recorder);

  assert_eq!(recorder.updates.len(), 4);
  for descriptor in &recorder.updates {
    assert_eq!(descriptor.tile.axis(0), -1);
    assert_eq!(descriptor.world.x, -10.0);
  }
  assert_window_coherent(&window);
}

#[test]
fn single_axis_window_emits_single_descriptors() {
  let layout = TileLayout::new([4, 1, 1], [10.0, 0.0, 0.0]).unwrap();
  let mut recorder = Recorder::default();
  let mut window = TileWindow::built(layout, &mut recorder);
  assert_eq!(recorder.updates.len(), 4);

  let mut recorder = Recorder::default();
  window.set_observer_position(Vec3::new(10.0, 0.0, 0.0), &mut recorder);
  assert_eq!(recorder.updates.len(), 1);
  assert_eq!(recorder.updates[0].tile, TileCoord::new(4, 0, 0));
}

#[test]
fn two_axis_displacement_processes_axes_in_order() {
  let mut window = TileWindow::built(layout_3d(), &mut Recorder::default());
  let mut recorder = Recorder::default();

  // One tile on x and one on y in a single call.
  window.set_observer_position(Vec3::new(10.0, 10.0, 0.0), &mut recorder);

  // One x-plane (4x4) then one y-plane (4x4); the overlap is emitted
  // twice, not deduplicated.
  assert_eq!(recorder.updates.len(), 32);
  assert!(recorder.updates[..16].iter().all(|d| d.tile.axis(0) == 4));
  assert!(recorder.updates[16..].iter().all(|d| d.tile.axis(1) == 4));

  // Slots hit by both planes got two descriptors, the last authoritative.
  let overlap: Vec<_> = recorder.updates[..16]
    .iter()
    .filter(|d| recorder.updates[16..].iter().any(|e| e.matrix == d.matrix))
    .collect();
  assert_eq!(overlap.len(), 4);
  for early in overlap {
    let last = recorder.updates[16..]
      .iter()
      .find(|e| e.matrix == early.matrix)
      .unwrap();
    assert_eq!(window.descriptor(early.matrix).unwrap(), last);
  }
  assert_window_coherent(&window);
}

#[test]
fn teleport_beyond_window_refreshes_everything_once() {
  let mut window = TileWindow::built(layout_2d(), &mut Recorder::default());
  let mut recorder = Recorder::default();

  // 100 tiles east in one step: still only a full window of updates.
  window.set_observer_position(Vec3::new(1000.0, 0.0, 0.0), &mut recorder);

  assert_eq!(recorder.updates.len(), 16);
  assert_eq!(recorder.resets, 0, "teleport reuses representations");
  assert_eq!(window.anchor().tile().axis(0), 103);
  assert_window_coherent(&window);
}

#[test]
fn window_stays_coherent_under_random_walk() {
  use rand::{Rng, SeedableRng, rngs::StdRng};

  let mut rng = StdRng::seed_from_u64(7);
  let mut window = TileWindow::built(layout_3d(), &mut Recorder::default());
  let mut pos = Vec3::ZERO;

  for _ in 0..200 {
    pos += Vec3::new(
      rng.gen_range(-25.0..25.0),
      rng.gen_range(-25.0..25.0),
      rng.gen_range(-25.0..25.0),
    );
    window.set_observer_position(pos, &mut NullRenderer);
    assert_window_coherent(&window);
  }

  // The observer's thresholded tile is always inside the window.
  assert!(window.query_matrix_coord(pos + Vec3::splat(5.0)).is_ok());
}

#[test]
fn query_reports_out_of_window_positions() {
  let mut window = TileWindow::built(layout_2d(), &mut Recorder::default());

  assert_eq!(
    window.query_matrix_coord(Vec3::new(5.0, 0.0, 5.0)),
    Ok(MatrixCoord::new(0, 0, 0))
  );
  assert_eq!(
    window.query_matrix_coord(Vec3::new(-5.0, 0.0, 5.0)),
    Err(WindowError::OutOfWindow)
  );
  assert_eq!(
    window.query_matrix_coord(Vec3::new(400.0, 0.0, 5.0)),
    Err(WindowError::OutOfWindow)
  );

  // Sliding the window slides the valid range with it.
  window.set_observer_position(Vec3::new(20.0, 0.0, 0.0), &mut NullRenderer);
  assert!(window.query_matrix_coord(Vec3::new(-5.0, 0.0, 5.0)).is_err());
  assert!(window.query_matrix_coord(Vec3::new(55.0, 0.0, 5.0)).is_ok());
}

#[test]
fn odd_configured_counts_are_enlarged() {
  let config = TileWindowConfig {
    tile_count: [5, 1, 5],
    tile_size: [10.0, 0.0, 10.0],
  };
  let layout = config.layout().unwrap();
  assert_eq!(layout.count(0), 6);
  assert_eq!(layout.count(2), 6);

  let mut recorder = Recorder::default();
  TileWindow::built(layout, &mut recorder);
  assert_eq!(recorder.updates.len(), 36);
}
