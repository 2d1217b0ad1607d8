//! Fehler-Taxonomie der Viewer-Engine.
//!
//! Alle Fehler bleiben auf die aktuelle Map bzw. die aktuelle
//! Werkzeug-Aktion beschränkt; kein Fehler beendet den Prozess.

use thiserror::Error;

/// Result-Alias für alle Engine-Operationen.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Fehlerarten der Viewer-Engine.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Basiskarte oder Fog-Maske fehlt bzw. ist nicht lesbar.
    /// Fatal nur für die betroffene Map; andere Maps bleiben nutzbar.
    #[error("Ressource nicht lesbar für Map '{map_id}': {reason}")]
    Resource { map_id: String, reason: String },

    /// Persistierte oder abgeleitete Konfiguration ist unbrauchbar.
    /// Wird durch Regenerieren der Standardwerte behoben.
    #[error("Ungültige Konfiguration: {reason}")]
    Config { reason: String },

    /// Degenerierte Eingabe (Null-Distanz, leerer Scrollbereich, ...).
    /// Wird lokal als No-op behandelt und nie zum Absturz.
    #[error("Degenerierte Eingabe: {0}")]
    DegenerateInput(String),

    /// I/O-Fehler aus dem Host-Kollaborateur.
    #[error("I/O-Fehler: {0}")]
    Io(#[from] std::io::Error),

    /// Dekodier-/Enkodier-Fehler des Bild-Codecs.
    #[error("Bild-Codec-Fehler: {0}")]
    Image(#[from] image::ImageError),
}

impl ViewerError {
    /// Ressourcen-Fehler mit Map-Bezug.
    pub fn resource(map_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resource {
            map_id: map_id.into(),
            reason: reason.into(),
        }
    }

    /// Konfigurations-Fehler.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
