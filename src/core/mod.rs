//! Core-Domäne: Fog-Maske, Kompositing, Raster, Viewport-Sync, Config.

pub mod compositor;
pub mod fog_mask;
pub mod grid;
pub mod map_config;
pub mod viewport;

pub use compositor::{alpha_over, compose, draw_polygon_outline};
pub use fog_mask::{FogMask, FOG_HIDDEN, FOG_REVEALED};
pub use grid::{render_grid, render_grid_with_alpha};
pub use map_config::MapConfig;
pub use viewport::{DisplayMode, ScrollState, ViewportKind, ViewportSync};
