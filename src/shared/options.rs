//! Zentrale Konfiguration der Viewer-Engine.
//!
//! `ViewerOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Fog ─────────────────────────────────────────────────────────────

/// Alpha-Wert für gedimmtes Licht (Dim-Werkzeug).
pub const DIM_ALPHA: u8 = 220;
/// Sigma des Gauss-Blurs, der Polygonkanten der Fog-Maske weichzeichnet.
pub const FOG_BLUR_SIGMA: f32 = 5.0;
/// Alpha-Skalierung der Fog-Maske im Spieler-Komposit.
pub const PLAYER_FOG_DIM: f32 = 0.70;

// ── 5ft-Skala ───────────────────────────────────────────────────────

/// Referenz-Pixelzahl für eine korrekte 5ft-Strecke.
pub const PIXELS_5FT: f32 = 90.0;

// ── Grid ────────────────────────────────────────────────────────────

/// Alpha-Wert der Grid-Linien.
pub const GRID_LINE_ALPHA: u8 = 80;
/// Divisor für die Linienbreite: `ceil(gap / 40)` Pixel, mindestens 1.
pub const GRID_LINE_WIDTH_DIVISOR: f32 = 40.0;

// ── Polygon-Overlay ─────────────────────────────────────────────────

/// Farbe des Umriss-Overlays für das laufende Polygon (RGBA: Rot).
pub const POLYGON_OUTLINE_COLOR: [u8; 4] = [255, 0, 0, 255];
/// Strichstärke des Umriss-Overlays in Pixeln.
pub const POLYGON_OUTLINE_WIDTH: u32 = 3;

/// Kompositing-Profil für einen Render-Pfad (GM oder Spieler).
///
/// Beide Pfade bleiben getrennt parametrierbar: der GM sieht die
/// Maske unverändert, der Spieler eine per `alpha_scale` gedimmte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeProfile {
    /// Sigma des Gauss-Blurs auf der Maske (0.0 = kein Blur)
    pub blur_sigma: f32,
    /// Faktor auf jedes Masken-Alpha vor dem Blending (abgerundet)
    pub alpha_scale: f32,
}

/// Alle zur Laufzeit änderbaren Engine-Optionen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerOptions {
    /// Alpha-Wert für das Dim-Werkzeug
    pub dim_alpha: u8,
    /// Blur-Sigma für Fog-Kanten
    pub blur_sigma: f32,
    /// Alpha-Skalierung im Spieler-Komposit
    pub player_fog_dim: f32,
    /// Referenz-Pixel für 5ft
    pub pixels_5ft: f32,
    /// Alpha der Grid-Linien
    pub grid_line_alpha: u8,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            dim_alpha: DIM_ALPHA,
            blur_sigma: FOG_BLUR_SIGMA,
            player_fog_dim: PLAYER_FOG_DIM,
            pixels_5ft: PIXELS_5FT,
            grid_line_alpha: GRID_LINE_ALPHA,
        }
    }
}

impl ViewerOptions {
    /// Profil für das GM-Komposit: Maske unverändert.
    pub fn gm_profile(&self) -> CompositeProfile {
        CompositeProfile {
            blur_sigma: self.blur_sigma,
            alpha_scale: 1.0,
        }
    }

    /// Profil für das Spieler-Komposit: Maske gedimmt.
    pub fn player_profile(&self) -> CompositeProfile {
        CompositeProfile {
            blur_sigma: self.blur_sigma,
            alpha_scale: self.player_fog_dim,
        }
    }
}
