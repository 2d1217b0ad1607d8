//! Dateisystem-Host: Karten, Masken und Configs unter einem Wurzelverzeichnis.
//!
//! Layout:
//! - `maps/` — Basiskarten (PNG/JPG), Bezeichner = Dateiname ohne Endung
//! - `config/<id>.json` — Map-Konfiguration
//! - `config/fogmaps/<id>.png` — Fog-Maske

use image::{DynamicImage, GrayImage, RgbaImage};
use std::path::{Path, PathBuf};

use super::{ConfigStore, MapEntry, MapLibrary, MaskStore};
use crate::shared::{Result, ViewerError};

/// Bekannte Bild-Endungen für die Karten-Enumeration
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Host-Implementierung gegen ein lokales Verzeichnis.
pub struct FsHost {
    root: PathBuf,
}

impl FsHost {
    /// Öffnet ein Wurzelverzeichnis und legt die Config-Unterverzeichnisse an.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join("config").join("fogmaps"))?;
        log::info!("FsHost geöffnet: {}", root.display());
        Ok(Self { root })
    }

    fn maps_dir(&self) -> PathBuf {
        self.root.join("maps")
    }

    fn config_path(&self, map_id: &str) -> PathBuf {
        self.root.join("config").join(format!("{}.json", map_id))
    }

    fn mask_path(&self, map_id: &str) -> PathBuf {
        self.root
            .join("config")
            .join("fogmaps")
            .join(format!("{}.png", map_id))
    }
}

impl MapLibrary for FsHost {
    fn enumerate_maps(&self) -> Result<Vec<MapEntry>> {
        let dir = self.maps_dir();
        let mut entries = Vec::new();

        for dir_entry in std::fs::read_dir(&dir)? {
            let path = dir_entry?.path();
            if !path.is_file() || !is_image_filename(&path) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            entries.push(MapEntry {
                id: id.to_string(),
                resource: path.to_string_lossy().into_owned(),
            });
        }

        // Deterministische Reihenfolge für die Kartenliste
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        log::info!("{} Karten gefunden in {}", entries.len(), dir.display());
        Ok(entries)
    }

    fn load_base_image(&self, entry: &MapEntry) -> Result<RgbaImage> {
        let image = image::open(&entry.resource)
            .map_err(|e| ViewerError::resource(&entry.id, format!("Basiskarte: {}", e)))?;
        Ok(image.to_rgba8())
    }
}

impl MaskStore for FsHost {
    fn load_mask(&self, map_id: &str) -> Result<Option<GrayImage>> {
        let path = self.mask_path(map_id);
        if !path.exists() {
            return Ok(None);
        }

        let image = image::open(&path)
            .map_err(|e| ViewerError::resource(map_id, format!("Fog-Maske: {}", e)))?;
        Ok(Some(mask_from_image(image)))
    }

    fn save_mask(&mut self, map_id: &str, mask: &GrayImage) -> Result<()> {
        let path = self.mask_path(map_id);
        mask.save(&path)?;
        log::debug!("Fog-Maske gespeichert: {}", path.display());
        Ok(())
    }
}

impl ConfigStore for FsHost {
    fn load_config(&self, map_id: &str) -> Result<Option<serde_json::Value>> {
        let path = self.config_path(map_id);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let value = serde_json::from_str(&content)
            .map_err(|e| ViewerError::config(format!("{}: {}", path.display(), e)))?;
        Ok(Some(value))
    }

    fn save_config(&mut self, map_id: &str, config: &serde_json::Value) -> Result<()> {
        let path = self.config_path(map_id);
        let content = serde_json::to_string(config)
            .map_err(|e| ViewerError::config(format!("Serialisierung: {}", e)))?;
        std::fs::write(&path, content)?;
        log::debug!("Config gespeichert: {}", path.display());
        Ok(())
    }
}

/// Extrahiert die Maske aus einem dekodierten Bild.
///
/// Eigene Masken sind einkanalige PNGs. Bei RGBA-Dateien (Altbestand)
/// ist nur der Alpha-Kanal bedeutungstragend.
fn mask_from_image(image: DynamicImage) -> GrayImage {
    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        let alpha: Vec<u8> = rgba.pixels().map(|p| p[3]).collect();
        // Dimensionen stammen aus demselben Bild, from_raw kann nicht scheitern
        GrayImage::from_raw(w, h, alpha).unwrap_or_else(|| GrayImage::new(w, h))
    } else {
        image.to_luma8()
    }
}

/// Prüft ob ein Pfad eine bekannte Bild-Endung hat.
fn is_image_filename(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_temp_root(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(tmp.join("maps")).unwrap();
        tmp
    }

    #[test]
    fn test_enumerate_maps_strips_extension_and_sorts() {
        let tmp = with_temp_root("mapster_fs_host_enum");
        RgbaImage::new(4, 4).save(tmp.join("maps").join("zz_keller.png")).unwrap();
        RgbaImage::new(4, 4).save(tmp.join("maps").join("aa_wald.png")).unwrap();
        std::fs::write(tmp.join("maps").join("notizen.txt"), b"kein Bild").unwrap();

        let host = FsHost::new(&tmp).unwrap();
        let maps = host.enumerate_maps().unwrap();

        let ids: Vec<&str> = maps.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["aa_wald", "zz_keller"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn test_missing_mask_is_none_not_error() {
        let tmp = with_temp_root("mapster_fs_host_mask_missing");
        let host = FsHost::new(&tmp).unwrap();
        assert!(host.load_mask("gibt_es_nicht").unwrap().is_none());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn test_mask_roundtrip_is_pixel_identical() {
        let tmp = with_temp_root("mapster_fs_host_mask_roundtrip");
        let mut host = FsHost::new(&tmp).unwrap();

        let mut mask = GrayImage::from_pixel(8, 6, image::Luma([255]));
        mask.put_pixel(3, 2, image::Luma([0]));
        mask.put_pixel(7, 5, image::Luma([220]));

        host.save_mask("krypta", &mask).unwrap();
        let loaded = host.load_mask("krypta").unwrap().unwrap();
        assert_eq!(loaded.as_raw(), mask.as_raw());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn test_corrupt_config_reports_config_error() {
        let tmp = with_temp_root("mapster_fs_host_config_corrupt");
        let host = FsHost::new(&tmp).unwrap();
        std::fs::write(tmp.join("config").join("moor.json"), b"{kaputt").unwrap();

        match host.load_config("moor") {
            Err(ViewerError::Config { .. }) => {}
            other => panic!("Config-Fehler erwartet, war: {:?}", other.map(|_| ())),
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
