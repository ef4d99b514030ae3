//! The tile window engine.
//!
//! [`TileWindow`] keeps a fixed-capacity window of tiles materialized
//! around a moving observer. The window is toroidal: slots are reassigned
//! to new tile coordinates as the observer moves, and only the newly
//! exposed edge planes are refreshed per movement step.
//!
//! Sub-modules:
//! - [`anchor`] — the reference corner tying tile space to matrix space
//! - [`shift`] — the incremental plane-walk update

pub(crate) mod anchor;
mod shift;

use bevy::prelude::*;

pub use anchor::WindowAnchor;

use crate::coords::{AXES, MatrixCoord, TileDescriptor};
use crate::layout::TileLayout;
use crate::renderer::TileRenderer;

/// Error from a window query or operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowError {
  /// The window has not been built yet; call
  /// [`TileWindow::rebuild`] first.
  NotBuilt,
  /// The queried position maps to a tile outside the window.
  OutOfWindow,
}

impl std::fmt::Display for WindowError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NotBuilt => write!(f, "window has not been built"),
      Self::OutOfWindow => write!(f, "position is outside the window"),
    }
  }
}

impl std::error::Error for WindowError {}

/// A toroidal window of tiles streamed around an observer.
///
/// Construction is two-phase: [`new`](Self::new) takes a validated layout,
/// [`rebuild`](Self::rebuild) materializes every slot through a
/// [`TileRenderer`]. After that, [`set_observer_position`] drives
/// incremental updates. All renderer notifications are synchronous and
/// complete before the call returns.
///
/// [`set_observer_position`]: Self::set_observer_position
pub struct TileWindow {
  layout: TileLayout,
  anchor: WindowAnchor,
  observer: Vec3,
  /// Fixed-capacity descriptor storage, indexed by
  /// [`TileLayout::slot_index`]. Valid only while `built`.
  slots: Vec<TileDescriptor>,
  built: bool,
}

impl TileWindow {
  /// Creates an unbuilt window for the given layout.
  pub fn new(layout: TileLayout) -> Self {
    let capacity = layout.capacity();
    Self {
      anchor: WindowAnchor::rebuilt(&layout),
      layout,
      observer: Vec3::ZERO,
      slots: vec![TileDescriptor::default(); capacity],
      built: false,
    }
  }

  /// Creates a window and immediately builds it.
  pub fn built(layout: TileLayout, renderer: &mut dyn TileRenderer) -> Self {
    let mut window = Self::new(layout);
    window.rebuild(renderer);
    window
  }

  /// Fully (re)builds the window.
  ///
  /// The renderer is told to discard all representations, the anchor is
  /// reset to the far corner, and one descriptor is emitted per slot. The
  /// recorded observer position resets to the origin; callers re-apply the
  /// observer position afterwards.
  pub fn rebuild(&mut self, renderer: &mut dyn TileRenderer) {
    renderer.reset(self.layout.capacity());
    self.anchor = WindowAnchor::rebuilt(&self.layout);
    self.observer = Vec3::ZERO;
    shift::refresh_all(&self.layout, &self.anchor, &mut self.slots, renderer);
    self.built = true;
  }

  /// Replaces the layout and fully rebuilds.
  ///
  /// Storage is reallocated to the new capacity; all previous renderer
  /// representations are discarded via [`TileRenderer::reset`].
  pub fn set_layout(&mut self, layout: TileLayout, renderer: &mut dyn TileRenderer) {
    self.slots = vec![TileDescriptor::default(); layout.capacity()];
    self.layout = layout;
    self.rebuild(renderer);
  }

  /// Moves the observer, refreshing the newly exposed planes.
  ///
  /// A no-op if the position is unchanged or if its thresholded tile
  /// coordinate (half-tile bias per active axis) matches the previous
  /// one — the position is still recorded. Axes are processed one at a
  /// time in axis order: the anchor is advanced and the exposed planes
  /// emitted for one axis before the next axis is handled. Slots hit by
  /// two axes' planes receive two descriptors, the last authoritative.
  pub fn set_observer_position(&mut self, pos: Vec3, renderer: &mut dyn TileRenderer) {
    if !self.built {
      warn!("set_observer_position called on an unbuilt window");
      return;
    }
    if pos == self.observer {
      return;
    }

    let prev_shifted = self.layout.world_to_tile_shifted(self.observer);
    let shifted = self.layout.world_to_tile_shifted(pos);
    self.observer = pos;

    if shifted == prev_shifted {
      return;
    }

    for axis in 0..AXES {
      let delta = shifted.axis(axis) - prev_shifted.axis(axis);
      if delta != 0 {
        shift::shift_axis(
          &self.layout,
          &mut self.anchor,
          &mut self.slots,
          renderer,
          axis,
          delta,
        );
      }
    }
  }

  /// The matrix cell currently representing the given world position.
  ///
  /// Fails with [`WindowError::OutOfWindow`] when the position's tile lies
  /// outside the window: the tile offset from the anchor must fall in
  /// `[0, count)` per axis.
  pub fn query_matrix_coord(&self, pos: Vec3) -> Result<MatrixCoord, WindowError> {
    if !self.built {
      return Err(WindowError::NotBuilt);
    }
    let tile = self.layout.world_to_tile(pos);
    self
      .anchor
      .tile_to_matrix(&self.layout, tile)
      .ok_or(WindowError::OutOfWindow)
  }

  /// The window's layout.
  pub fn layout(&self) -> &TileLayout {
    &self.layout
  }

  /// The window's anchor: the far-corner {tile, matrix, world} triple.
  pub fn anchor(&self) -> &WindowAnchor {
    &self.anchor
  }

  /// The last recorded observer position.
  pub fn observer_position(&self) -> Vec3 {
    self.observer
  }

  /// True once the window has been built.
  pub fn is_built(&self) -> bool {
    self.built
  }

  /// The descriptor currently stored for a matrix cell.
  pub fn descriptor(&self, matrix: MatrixCoord) -> Option<&TileDescriptor> {
    if !self.built {
      return None;
    }
    self.slots.get(self.layout.slot_index(matrix))
  }

  /// Iterates the descriptors of all slots.
  pub fn descriptors(&self) -> impl Iterator<Item = &TileDescriptor> {
    let end = if self.built { self.slots.len() } else { 0 };
    self.slots[..end].iter()
  }
}
