//! Tile Window - toroidal tile streaming for infinite terrain in Bevy.
//!
//! This crate keeps a fixed-size window of tiles materialized around a
//! moving observer. The window is toroidal: a fixed-capacity slot matrix
//! is reused as the observer moves, and each movement step refreshes only
//! the newly exposed edge planes, never the whole window.
//!
//! The core engine ([`TileWindow`]) is plain data + arithmetic and can be
//! driven directly with any [`TileRenderer`]. The Bevy layer
//! ([`TileViewPlugin`], [`TileView`], [`StreamingObserver`]) wires it to an
//! observer transform and a pool of tile entities.

pub mod coords;
pub mod heightfield;
pub mod layout;
pub mod renderer;
pub mod view;
pub mod window;

pub use coords::{AXES, MatrixCoord, TileCoord, TileDescriptor};
#[cfg(not(target_family = "wasm"))]
pub use heightfield::LayeredNoiseField;
pub use heightfield::HeightField;
pub use layout::{LayoutError, TileLayout, TileWindowConfig};
pub use renderer::{NullRenderer, TileRenderer};
pub use view::{
  DefaultTileWindowConfig, StreamingObserver, TileRefreshed, TileView, TileViewPlugin,
  WindowTile, update_tile_views,
};
pub use window::{TileWindow, WindowAnchor, WindowError};
