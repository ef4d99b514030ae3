//! Bevy integration: tile views driven by a streaming observer.
//!
//! A [`TileView`] component owns a [`TileWindow`] plus an arena of spawned
//! tile entities, one per slot. Each frame, [`update_tile_views`] reads the
//! [`StreamingObserver`]'s transform and drives the window; refreshed slots
//! get their entity repositioned and a [`TileRefreshed`] message so the
//! host app can regenerate the tile's visuals (mesh, material, labels).

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::coords::{MatrixCoord, TileCoord, TileDescriptor};
use crate::layout::{LayoutError, TileLayout, TileWindowConfig};
use crate::renderer::TileRenderer;
use crate::window::TileWindow;

/// Marks the entity whose position drives tile streaming.
///
/// Typically the camera. Exactly one observer should exist; with none the
/// views idle, with several only the first is used.
#[derive(Component)]
pub struct StreamingObserver;

/// Per-slot marker on spawned tile entities.
///
/// Updated in place whenever the slot is refreshed; change detection on
/// this component is the cheap way to react to tile reassignment.
#[derive(Component, Clone, Copy, Debug)]
pub struct WindowTile {
  /// Storage slot this entity represents (stable for the entity's life).
  pub matrix: MatrixCoord,
  /// Logical tile currently shown by the slot.
  pub tile: TileCoord,
}

/// Message sent whenever a slot is created or refreshed.
#[derive(bevy::prelude::Message, Clone, Debug)]
pub struct TileRefreshed {
  /// The view entity owning the slot.
  pub view: Entity,
  /// The tile entity to decorate.
  pub entity: Entity,
  /// The authoritative descriptor for the slot.
  pub descriptor: TileDescriptor,
}

/// A streaming tile view: a [`TileWindow`] plus its spawned tile entities.
///
/// Tile entities carry only `Transform`, `Visibility` and [`WindowTile`];
/// visuals are the host's business, attached in response to
/// [`TileRefreshed`] messages. Entities are positioned at the tile's world
/// position minus the window-centering offset, so the window extends half
/// its span to each side of the observer.
///
/// A view spawned via `TileView::default()` has no layout yet; the first
/// [`update_tile_views`] run completes it from [`DefaultTileWindowConfig`].
#[derive(Component, Default)]
pub struct TileView {
  window: Option<TileWindow>,
  /// Entity arena indexed by slot, recreated wholesale on rebuild.
  tiles: Vec<Option<Entity>>,
}

impl TileView {
  /// Creates a view for the given layout. Built on the first update.
  pub fn new(layout: TileLayout) -> Self {
    Self {
      window: Some(TileWindow::new(layout)),
      tiles: Vec::new(),
    }
  }

  /// Creates a view from a user config, validating it.
  pub fn from_config(config: &TileWindowConfig) -> Result<Self, LayoutError> {
    Ok(Self::new(config.layout()?))
  }

  /// The underlying window engine.
  ///
  /// `None` for a defaulted view that has not been through an update yet.
  pub fn window(&self) -> Option<&TileWindow> {
    self.window.as_ref()
  }

  /// The entity currently spawned for a slot, if any.
  pub fn tile_entity(&self, matrix: MatrixCoord) -> Option<Entity> {
    let window = self.window.as_ref()?;
    self
      .tiles
      .get(window.layout().slot_index(matrix))
      .copied()
      .flatten()
  }
}

/// Renderer adapter that maintains the view's entity arena.
struct SceneTileRenderer<'a, 'w, 's, 'm> {
  commands: &'a mut Commands<'w, 's>,
  refreshed: &'a mut MessageWriter<'m, TileRefreshed>,
  view_entity: Entity,
  tiles: &'a mut Vec<Option<Entity>>,
  layout: TileLayout,
  center: Vec3,
}

impl TileRenderer for SceneTileRenderer<'_, '_, '_, '_> {
  fn reset(&mut self, capacity: usize) {
    for entity in self.tiles.drain(..).flatten() {
      self.commands.entity(entity).despawn();
    }
    self.tiles.resize(capacity, None);
  }

  fn update_tile(&mut self, tile: &TileDescriptor) {
    let index = self.layout.slot_index(tile.matrix);
    let transform = Transform::from_translation(tile.world - self.center);
    let marker = WindowTile {
      matrix: tile.matrix,
      tile: tile.tile,
    };

    let entity = match self.tiles[index] {
      Some(entity) => {
        self.commands.entity(entity).insert((transform, marker));
        entity
      }
      None => {
        let entity = self
          .commands
          .spawn((transform, Visibility::default(), marker))
          .id();
        self.tiles[index] = Some(entity);
        entity
      }
    };

    self.refreshed.write(TileRefreshed {
      view: self.view_entity,
      entity,
      descriptor: *tile,
    });
  }
}

/// System: drives every [`TileView`] from the observer position.
///
/// Views spawned without a layout get one from [`DefaultTileWindowConfig`]
/// first. Builds views on their first update, then forwards observer
/// movement to the window engine. All slot updates for a frame are applied
/// before the system returns.
pub fn update_tile_views(
  mut commands: Commands,
  default_config: Res<DefaultTileWindowConfig>,
  observers: Query<&GlobalTransform, With<StreamingObserver>>,
  mut views: Query<(Entity, &mut TileView)>,
  mut refreshed: MessageWriter<TileRefreshed>,
) {
  let Some(observer) = observers.iter().next() else {
    return;
  };
  let observer_pos = observer.translation();

  for (view_entity, mut view) in views.iter_mut() {
    let TileView { window, tiles } = &mut *view;
    if window.is_none() {
      match default_config.0.layout() {
        Ok(layout) => *window = Some(TileWindow::new(layout)),
        Err(err) => {
          warn!("default tile window config is invalid: {}", err);
          continue;
        }
      }
    }
    let Some(window) = window else {
      continue;
    };
    let mut renderer = SceneTileRenderer {
      commands: &mut commands,
      refreshed: &mut refreshed,
      view_entity,
      tiles,
      layout: window.layout().clone(),
      center: window.layout().center_offset(),
    };

    if !window.is_built() {
      window.rebuild(&mut renderer);
    }
    window.set_observer_position(observer_pos, &mut renderer);
  }
}

/// Plugin registering the tile view streaming systems.
///
/// Spawn a [`TileView`] component and mark an entity (usually the camera)
/// with [`StreamingObserver`]; listen for [`TileRefreshed`] messages to
/// attach visuals to tile entities. `TileView::default()` views pick up the
/// plugin's `config`; [`TileView::from_config`] overrides it per view.
#[derive(Default)]
pub struct TileViewPlugin {
  /// Default configuration, exposed as [`DefaultTileWindowConfig`].
  pub config: TileWindowConfig,
}

impl Plugin for TileViewPlugin {
  fn build(&self, app: &mut App) {
    app
      .insert_resource(DefaultTileWindowConfig(self.config.clone()))
      .add_message::<TileRefreshed>()
      .add_systems(Update, update_tile_views);
  }
}

/// Resource holding the plugin's default window configuration.
///
/// Consumed by [`update_tile_views`] to complete views spawned via
/// `TileView::default()`.
#[derive(Resource)]
pub struct DefaultTileWindowConfig(pub TileWindowConfig);
