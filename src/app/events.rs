//! Eingabe-Ereignisse des Hosts an die Session.

use glam::Vec2;

use super::state::Tool;
use crate::core::ViewportKind;

/// Maustaste eines Klicks auf das Control-Bild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Diskrete Host-Ereignisse ohne eigene Mutationslogik.
///
/// Der Host ruft nach jedem verarbeiteten Intent `render()` auf,
/// um beide Ansichten zu aktualisieren.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionIntent {
    /// Werkzeug-Button umgeschaltet
    ToolToggled { tool: Tool, active: bool },
    /// Klick auf das Control-Bild (Anzeige-Pixelkoordinaten)
    MapClicked { pos: Vec2, button: MouseButton },
    /// Control-Viewport wurde gescrollt; neue absolute Position.
    /// Der Host fragt vorher `wheel_allowed()` ab (Locked verschluckt).
    WheelScrolled { v_value: f32, h_value: f32 },
    /// Ein Viewport hat seine Größe geändert
    ViewportResized {
        viewport: ViewportKind,
        width: f32,
        height: f32,
    },
    /// Karte per Bezeichner ausgewählt
    MapSelected { id: String },
    /// Raster-Overlay umgeschaltet
    GridToggled,
    /// Nebel vollständig löschen (alles aufdecken)
    ClearFogRequested,
    /// Nebel vollständig zurücksetzen (alles verbergen)
    ResetFogRequested,
    /// Escape: Host schaltet Vollbild um, Session sichert den Scroll
    EscapePressed,
    /// Locked-Modus umgeschaltet
    LockToggled { active: bool },
    /// Elastic-Modus umgeschaltet
    ElasticToggled { active: bool },
}
