//! The renderer collaborator contract.
//!
//! The window engine never creates visuals itself. It hands every created
//! or refreshed slot to a [`TileRenderer`], synchronously and in a
//! deterministic order, and the renderer owns whatever representation it
//! builds for the slot.

use crate::coords::TileDescriptor;

/// Receiver for tile slot updates from a [`TileWindow`](crate::TileWindow).
///
/// Implementations must be idempotent per matrix coordinate: a repeated
/// descriptor for the same slot replaces the previous representation. Any
/// visibility predicate (e.g. culling tiles behind a facing direction) is
/// the renderer's responsibility, not the window's.
pub trait TileRenderer {
  /// Called once per slot that is created or refreshed.
  ///
  /// The descriptor is authoritative for its matrix coordinate and
  /// supersedes any earlier descriptor for the same slot.
  fn update_tile(&mut self, tile: &TileDescriptor);

  /// Called before a full rebuild discards and recreates every slot.
  ///
  /// `capacity` is the slot count of the window about to be built.
  /// Renderers should tear down all existing representations here.
  fn reset(&mut self, capacity: usize) {
    let _ = capacity;
  }
}

/// Renderer that ignores all updates.
///
/// Useful for headless runs and for driving the engine when only its
/// coordinate state is of interest.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl TileRenderer for NullRenderer {
  fn update_tile(&mut self, _tile: &TileDescriptor) {}
}
