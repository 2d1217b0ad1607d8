//! Schnittstellen zu den Host-Kollaborateuren.
//!
//! Die Engine besitzt keine Fenster, keine Dateidialoge und keinen
//! eigenen Codec: Karten-Enumeration, Bild-I/O und der Config-Store
//! werden vom Windowing-/Rendering-Host bereitgestellt.

pub mod fs_host;

pub use fs_host::FsHost;

use image::{GrayImage, RgbaImage};

use crate::shared::Result;

/// Eintrag einer ladbaren Karte.
///
/// Unveränderlich nach dem Laden; der Bezeichner ist der Dateiname
/// ohne Endung und schlüsselt Config- und Masken-Ressourcen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    /// Stabiler Bezeichner der Karte
    pub id: String,
    /// Ressourcen-Referenz der Basiskarte (hostspezifisch, z.B. Pfad)
    pub resource: String,
}

/// Kartenbestand des Hosts.
pub trait MapLibrary {
    /// Listet alle ladbaren Karten auf (einmalig beim Sitzungsstart).
    fn enumerate_maps(&self) -> Result<Vec<MapEntry>>;

    /// Lädt die Basiskarte eines Eintrags als RGBA-Bild.
    fn load_base_image(&self, entry: &MapEntry) -> Result<RgbaImage>;
}

/// Persistenz der Fog-Masken, geschlüsselt per Map-Bezeichner.
pub trait MaskStore {
    /// Lädt die Maske einer Map. `Ok(None)` wenn noch keine existiert;
    /// Fehler nur bei vorhandener, aber unlesbarer Ressource.
    fn load_mask(&self, map_id: &str) -> Result<Option<GrayImage>>;

    /// Schreibt die Maske einer Map in die Backing-Ressource.
    fn save_mask(&mut self, map_id: &str, mask: &GrayImage) -> Result<()>;
}

/// Persistenz der Map-Konfiguration als JSON-Blob.
pub trait ConfigStore {
    /// Lädt den Config-Blob einer Map. `Ok(None)` wenn noch keiner existiert.
    fn load_config(&self, map_id: &str) -> Result<Option<serde_json::Value>>;

    /// Schreibt den Config-Blob einer Map.
    fn save_config(&mut self, map_id: &str, config: &serde_json::Value) -> Result<()>;
}

/// Sammel-Trait: ein Host, der alle drei Kollaborateur-Rollen erfüllt.
pub trait Host: MapLibrary + MaskStore + ConfigStore {}

impl<T: MapLibrary + MaskStore + ConfigStore> Host for T {}
