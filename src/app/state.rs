//! Session State — zentrale Datenhaltung.

use glam::Vec2;

use crate::core::{MapConfig, ViewportSync};
use crate::host::MapEntry;
use crate::shared::ViewerOptions;

/// Aktives Werkzeug der GM-Ansicht.
///
/// Höchstens eines gleichzeitig; die Masken-Werkzeuge schließen
/// sich gegenseitig aus und sammeln Polygon-Klicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Zwei Klicks definieren die 5ft-Referenzstrecke
    SetFiveFootRange,
    /// Polygon vollständig aufdecken (Alpha 0)
    Erase,
    /// Polygon auf gedimmtes Licht setzen
    Dim,
    /// Polygon wieder vollständig vernebeln (Alpha 255)
    Refog,
}

impl Tool {
    /// Ob das Werkzeug Polygon-Klicks sammelt.
    pub fn is_masking(self) -> bool {
        !matches!(self, Tool::SetFiveFootRange)
    }

    /// Ziel-Alpha eines Masken-Werkzeugs.
    pub fn target_alpha(self, options: &ViewerOptions) -> Option<u8> {
        match self {
            Tool::Erase => Some(crate::core::FOG_REVEALED),
            Tool::Dim => Some(options.dim_alpha),
            Tool::Refog => Some(crate::core::FOG_HIDDEN),
            Tool::SetFiveFootRange => None,
        }
    }
}

/// Zustand des aktiven Werkzeugs inkl. gesammelter Klicks.
#[derive(Debug, Clone, Default)]
pub struct ToolState {
    /// Aktives Werkzeug (None = keins)
    pub active: Option<Tool>,
    /// Klickpunkte für die 5ft-Messung (maximal zwei)
    pub clicks_5ft: Vec<Vec2>,
    /// Laufendes Polygon in Anzeige-Pixelkoordinaten
    pub pending_polygon: Vec<Vec2>,
}

impl ToolState {
    /// Verwirft alle gesammelten Klicks.
    pub fn clear_clicks(&mut self) {
        self.clicks_5ft.clear();
        self.pending_polygon.clear();
    }
}

/// Vom Host gemeldete Geometrie eines Viewports in Pixeln.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportGeometry {
    /// Sichtbare Breite
    pub width: f32,
    /// Sichtbare Höhe
    pub height: f32,
}

/// Gesamtzustand einer Sitzung.
pub struct SessionState {
    /// Beim Start enumerierte Karten
    pub maps: Vec<MapEntry>,
    /// Index der aktiven Karte
    pub current_index: usize,
    /// Konfiguration der aktiven Karte
    pub config: MapConfig,
    /// Werkzeug-Zustand
    pub tool: ToolState,
    /// Ob das Raster-Overlay gezeichnet wird (nicht persistiert)
    pub grid_shown: bool,
    /// Scroll-Synchronisation beider Viewports
    pub sync: ViewportSync,
    /// Geometrie des GM-Viewports
    pub control_viewport: ViewportGeometry,
    /// Geometrie des Spieler-Viewports
    pub display_viewport: ViewportGeometry,
    /// Laufzeit-Optionen der Engine
    pub options: ViewerOptions,
    /// Breite des zuletzt gerenderten Control-Bilds
    /// (Bezug für die Polygon-Umrechnung in Masken-Koordinaten)
    pub displayed_width: f32,
}

impl SessionState {
    /// Erstellt den Startzustand für eine Kartenliste.
    pub fn new(maps: Vec<MapEntry>, options: ViewerOptions) -> Self {
        Self {
            maps,
            current_index: 0,
            config: MapConfig::default(),
            tool: ToolState::default(),
            grid_shown: false,
            sync: ViewportSync::new(),
            control_viewport: ViewportGeometry::default(),
            display_viewport: ViewportGeometry::default(),
            options,
            displayed_width: 0.0,
        }
    }

    /// Aktive Karte, falls vorhanden.
    pub fn current_map(&self) -> Option<&MapEntry> {
        self.maps.get(self.current_index)
    }
}
