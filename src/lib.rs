//! Mapster — Fog-of-War-Viewer-Engine für Tabletop-Karten.
//!
//! Zwei Ansichten derselben Karte: das Control-Fenster für die
//! Spielleitung (ungedimmter Nebel, Werkzeuge) und das Display-Fenster
//! für die Spieler (gedimmter Nebel). Die Engine hält Maske, Config
//! und Scroll-Synchronisation; Fensterung und Eingabe liefert ein Host
//! über die Traits in [`host`].

pub mod app;
pub mod core;
pub mod host;
pub mod shared;

pub use app::{MapSession, MouseButton, RenderOutput, SessionIntent, Tool};
pub use core::{DisplayMode, FogMask, MapConfig, ViewportKind, FOG_HIDDEN, FOG_REVEALED};
pub use host::{ConfigStore, FsHost, Host, MapEntry, MapLibrary, MaskStore};
pub use shared::{Result, ViewerError, ViewerOptions};
