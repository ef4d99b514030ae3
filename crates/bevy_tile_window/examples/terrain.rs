//! Infinite terrain demo.
//!
//! Streams a window of height-field tiles under a fly camera. Tile
//! entities are managed by the tile view; this example only decorates
//! refreshed tiles with a terrain mesh sampled from layered noise.
//!
//! Controls:
//! - WASD/Arrow keys: Move over the ground plane
//! - Shift: Speed boost (5x)
//!
//! Run with: `cargo run -p bevy_tile_window --example terrain`

use std::sync::Arc;

use bevy::asset::RenderAssetUsages;
use bevy::ecs::message::MessageReader;
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_tile_window::{
  HeightField, LayeredNoiseField, StreamingObserver, TileRefreshed, TileView, TileViewPlugin,
  TileWindowConfig,
};

/// Base camera movement speed in world units per second.
const CAMERA_SPEED: f32 = 120.0;

/// Speed multiplier when holding shift.
const SPEED_BOOST: f32 = 5.0;

/// Grid cells per tile edge in the generated mesh.
const TILE_RESOLUTION: usize = 16;

fn main() {
  App::new()
    .add_plugins(DefaultPlugins.set(WindowPlugin {
      primary_window: Some(Window {
        title: "Tile Window Terrain".to_string(),
        resolution: WindowResolution::new(1280, 720),
        ..default()
      }),
      ..default()
    }))
    .add_plugins(TileViewPlugin {
      config: TileWindowConfig {
        tile_count: [8, 1, 8],
        tile_size: [60.0, 0.0, 60.0],
      },
    })
    .add_systems(Startup, setup)
    .add_systems(Update, (camera_input, decorate_tiles).chain())
    .run();
}

/// Shared elevation source for all tiles.
#[derive(Resource)]
struct Terrain {
  field: Arc<dyn HeightField>,
  material: Handle<StandardMaterial>,
}

fn setup(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
  // Picks up the plugin's default window configuration.
  commands.spawn(TileView::default());

  commands.insert_resource(Terrain {
    field: Arc::new(LayeredNoiseField::new(42)),
    material: materials.add(StandardMaterial {
      base_color: Color::srgb(0.35, 0.55, 0.3),
      perceptual_roughness: 0.95,
      ..default()
    }),
  });

  // The camera drives the streaming window.
  commands.spawn((
    Camera3d::default(),
    Transform::from_xyz(0.0, 90.0, 120.0).looking_at(Vec3::ZERO, Vec3::Y),
    StreamingObserver,
  ));

  commands.spawn((
    DirectionalLight {
      illuminance: 8_000.0,
      shadows_enabled: true,
      ..default()
    },
    Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
  ));
}

/// Rebuilds the mesh of every refreshed tile.
fn decorate_tiles(
  mut commands: Commands,
  mut refreshed: MessageReader<TileRefreshed>,
  views: Query<&TileView>,
  terrain: Res<Terrain>,
  mut meshes: ResMut<Assets<Mesh>>,
) {
  for message in refreshed.read() {
    let Some(window) = views.get(message.view).ok().and_then(TileView::window) else {
      continue;
    };
    let layout = window.layout();
    let size = Vec2::new(layout.size(0), layout.size(2));

    let mesh = build_tile_mesh(terrain.field.as_ref(), message.descriptor.world, size);
    commands.entity(message.entity).insert((
      Mesh3d(meshes.add(mesh)),
      MeshMaterial3d(terrain.material.clone()),
    ));
  }
}

/// Builds one tile's height-field mesh.
///
/// Two triangles per grid cell, non-indexed so flat normals can be
/// computed. Heights are sampled at absolute world coordinates, so
/// adjacent tiles share edge elevations seamlessly.
fn build_tile_mesh(field: &dyn HeightField, origin: Vec3, size: Vec2) -> Mesh {
  let step = size / TILE_RESOLUTION as f32;
  let mut positions = Vec::with_capacity(TILE_RESOLUTION * TILE_RESOLUTION * 6);

  let corner = |x: usize, z: usize| -> [f32; 3] {
    let local = Vec2::new(x as f32 * step.x, z as f32 * step.y);
    let height = field.sample(origin.x + local.x, origin.z + local.y);
    [local.x, height, local.y]
  };

  for x in 0..TILE_RESOLUTION {
    for z in 0..TILE_RESOLUTION {
      let c00 = corner(x, z);
      let c10 = corner(x + 1, z);
      let c01 = corner(x, z + 1);
      let c11 = corner(x + 1, z + 1);

      // Counter-clockwise winding seen from above (+y).
      positions.extend_from_slice(&[c00, c01, c11]);
      positions.extend_from_slice(&[c00, c11, c10]);
    }
  }

  let mut mesh = Mesh::new(
    PrimitiveTopology::TriangleList,
    RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
  )
  .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions);
  mesh.compute_flat_normals();
  mesh
}

fn camera_input(
  keys: Res<ButtonInput<KeyCode>>,
  mut camera: Query<&mut Transform, With<StreamingObserver>>,
  time: Res<Time>,
) {
  let mut direction = Vec3::ZERO;

  // WASD movement over the ground plane
  if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
    direction.z -= 1.0;
  }
  if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
    direction.z += 1.0;
  }
  if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
    direction.x -= 1.0;
  }
  if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
    direction.x += 1.0;
  }

  if direction == Vec3::ZERO {
    return;
  }

  let speed = if keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight) {
    CAMERA_SPEED * SPEED_BOOST
  } else {
    CAMERA_SPEED
  };

  let Ok(mut transform) = camera.single_mut() else {
    return;
  };
  transform.translation += direction.normalize() * speed * time.delta_secs();
}
