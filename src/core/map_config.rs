//! Per-Map persistierte Konfiguration.

use serde::{Deserialize, Serialize};

use crate::host::ConfigStore;
use crate::shared::Result;

/// Persistierter Zustand einer Map.
///
/// Wird beim ersten Kontakt mit Standardwerten angelegt, von der
/// Session mutiert und per Map-Bezeichner im Config-Store abgelegt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Pixel-pro-5ft-Multiplikator (> 0)
    pub scale_factor: f32,
    /// Rasterabstand als Bruchteil der Bildbreite, in (0, 1]
    pub grid_pcnt: f32,
    /// Zuletzt gespeicherter vertikaler Scroll-Bruchteil
    pub v_scroll_pcnt: f32,
    /// Zuletzt gespeicherter horizontaler Scroll-Bruchteil
    pub h_scroll_pcnt: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            grid_pcnt: 1.0,
            v_scroll_pcnt: 0.0,
            h_scroll_pcnt: 0.0,
        }
    }
}

impl MapConfig {
    /// Lädt die Konfiguration einer Map oder legt Standardwerte an.
    ///
    /// Ein unbrauchbarer Blob wird nicht propagiert, sondern durch
    /// regenerierte Standardwerte ersetzt (mit Warnung).
    pub fn load_or_init<S: ConfigStore + ?Sized>(store: &mut S, map_id: &str) -> Result<Self> {
        let config = match store.load_config(map_id) {
            Ok(Some(value)) => match serde_json::from_value::<MapConfig>(value) {
                Ok(config) => return Ok(config.sanitized(map_id)),
                Err(e) => {
                    log::warn!(
                        "Config für '{}' unbrauchbar ({}), regeneriere Standardwerte",
                        map_id,
                        e
                    );
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Keine Config für '{}', lege Standardwerte an", map_id);
                Self::default()
            }
            Err(e) => {
                log::warn!(
                    "Config für '{}' nicht lesbar ({}), regeneriere Standardwerte",
                    map_id,
                    e
                );
                Self::default()
            }
        };

        config.save(store, map_id)?;
        Ok(config)
    }

    /// Schreibt die Konfiguration in den Store.
    pub fn save<S: ConfigStore + ?Sized>(&self, store: &mut S, map_id: &str) -> Result<()> {
        let value = serde_json::to_value(self)
            .map_err(|e| crate::ViewerError::config(format!("Serialisierung: {}", e)))?;
        store.save_config(map_id, &value)
    }

    /// Gespeicherter Scroll-Bruchteil als Paar (vertikal, horizontal).
    pub fn scroll_fraction(&self) -> (f32, f32) {
        (self.v_scroll_pcnt, self.h_scroll_pcnt)
    }

    /// Übernimmt einen Scroll-Bruchteil.
    pub fn set_scroll_fraction(&mut self, (v_pcnt, h_pcnt): (f32, f32)) {
        self.v_scroll_pcnt = v_pcnt.clamp(0.0, 1.0);
        self.h_scroll_pcnt = h_pcnt.clamp(0.0, 1.0);
    }

    /// Ersetzt Werte außerhalb der Verträge durch Standardwerte.
    fn sanitized(mut self, map_id: &str) -> Self {
        let defaults = Self::default();

        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            log::warn!(
                "scale_factor {} für '{}' ungültig, setze {}",
                self.scale_factor,
                map_id,
                defaults.scale_factor
            );
            self.scale_factor = defaults.scale_factor;
        }
        if !self.grid_pcnt.is_finite() || self.grid_pcnt <= 0.0 || self.grid_pcnt > 1.0 {
            log::warn!(
                "grid_pcnt {} für '{}' ungültig, setze {}",
                self.grid_pcnt,
                map_id,
                defaults.grid_pcnt
            );
            self.grid_pcnt = defaults.grid_pcnt;
        }

        self.v_scroll_pcnt = if self.v_scroll_pcnt.is_finite() {
            self.v_scroll_pcnt.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.h_scroll_pcnt = if self.h_scroll_pcnt.is_finite() {
            self.h_scroll_pcnt.clamp(0.0, 1.0)
        } else {
            0.0
        };

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Result;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryConfigs {
        blobs: HashMap<String, serde_json::Value>,
    }

    impl ConfigStore for MemoryConfigs {
        fn load_config(&self, map_id: &str) -> Result<Option<serde_json::Value>> {
            Ok(self.blobs.get(map_id).cloned())
        }

        fn save_config(&mut self, map_id: &str, config: &serde_json::Value) -> Result<()> {
            self.blobs.insert(map_id.to_string(), config.clone());
            Ok(())
        }
    }

    #[test]
    fn test_first_contact_creates_and_persists_defaults() {
        let mut store = MemoryConfigs::default();
        let config = MapConfig::load_or_init(&mut store, "krypta").unwrap();

        assert_eq!(config, MapConfig::default());
        assert!(store.blobs.contains_key("krypta"));
    }

    #[test]
    fn test_roundtrip_preserves_values() {
        let mut store = MemoryConfigs::default();
        let mut config = MapConfig::default();
        config.scale_factor = 1.8;
        config.grid_pcnt = 0.12;
        config.set_scroll_fraction((0.3, 0.7));
        config.save(&mut store, "moor").unwrap();

        let reloaded = MapConfig::load_or_init(&mut store, "moor").unwrap();
        assert_relative_eq!(reloaded.scale_factor, 1.8);
        assert_relative_eq!(reloaded.grid_pcnt, 0.12);
        assert_eq!(reloaded.scroll_fraction(), (0.3, 0.7));
    }

    #[test]
    fn test_malformed_blob_regenerates_defaults() {
        let mut store = MemoryConfigs::default();
        store
            .save_config("wald", &serde_json::json!({ "scale_factor": "drei" }))
            .unwrap();

        let config = MapConfig::load_or_init(&mut store, "wald").unwrap();
        assert_eq!(config, MapConfig::default());

        // Regenerierte Defaults wurden zurückgeschrieben
        let written: MapConfig =
            serde_json::from_value(store.blobs["wald"].clone()).unwrap();
        assert_eq!(written, MapConfig::default());
    }

    #[test]
    fn test_out_of_contract_values_are_sanitized() {
        let mut store = MemoryConfigs::default();
        store
            .save_config(
                "tal",
                &serde_json::json!({
                    "scale_factor": -2.0,
                    "grid_pcnt": 7.5,
                    "v_scroll_pcnt": 3.0,
                    "h_scroll_pcnt": -1.0
                }),
            )
            .unwrap();

        let config = MapConfig::load_or_init(&mut store, "tal").unwrap();
        assert_relative_eq!(config.scale_factor, 1.0);
        assert_relative_eq!(config.grid_pcnt, 1.0);
        assert_eq!(config.scroll_fraction(), (1.0, 0.0));
    }
}
