//! Persistente Fog-of-War-Maske einer Map.
//!
//! Ein Byte pro Pixel: 0 = vollständig aufgedeckt, 255 = vollständig
//! verborgen. Polygon-Fills und Resets schreiben sofort in die
//! Backing-Ressource durch (Write-Through): ein GM-Edit darf durch
//! einen späteren Absturz nie verloren gehen.

use glam::Vec2;
use image::{GrayImage, Luma};

use crate::host::MaskStore;
use crate::shared::{Result, ViewerError};

/// Vollständig verborgen.
pub const FOG_HIDDEN: u8 = 255;
/// Vollständig aufgedeckt.
pub const FOG_REVEALED: u8 = 0;

/// Fog-Maske einer Map in Basiskarten-Auflösung.
pub struct FogMask {
    map_id: String,
    mask: GrayImage,
}

impl FogMask {
    /// Lädt die Maske einer Map aus dem Store.
    ///
    /// Fehlt die Ressource, startet die Map vollständig verborgen.
    /// Eine vorhandene Maske mit abweichenden Dimensionen verletzt die
    /// Invariante Maske == Basiskarte und gilt als korrupt.
    pub fn load<S: MaskStore + ?Sized>(
        store: &S,
        map_id: &str,
        dimensions: (u32, u32),
    ) -> Result<Self> {
        let (width, height) = dimensions;
        let mask = match store.load_mask(map_id)? {
            Some(mask) if mask.dimensions() == dimensions => {
                log::info!("Fog-Maske geladen: '{}' ({}x{})", map_id, width, height);
                mask
            }
            Some(mask) => {
                let (mw, mh) = mask.dimensions();
                return Err(ViewerError::resource(
                    map_id,
                    format!(
                        "Masken-Dimensionen {}x{} passen nicht zur Basiskarte {}x{}",
                        mw, mh, width, height
                    ),
                ));
            }
            None => {
                log::info!("Keine Fog-Maske für '{}', starte vollständig verborgen", map_id);
                GrayImage::from_pixel(width, height, Luma([FOG_HIDDEN]))
            }
        };

        Ok(Self {
            map_id: map_id.to_string(),
            mask,
        })
    }

    /// Füllt das Polygon mit konstantem Alpha (Even-Odd-Scanline).
    ///
    /// Punkte liegen bereits in Masken-Pixelkoordinaten; der Aufrufer
    /// rechnet vorher aus dem angezeigten Bild um. Weniger als drei
    /// Punkte sind ein stilles No-op.
    pub fn apply_polygon(&mut self, points: &[Vec2], target_alpha: u8) {
        if points.len() < 3 {
            log::debug!("Polygon mit {} Punkten ignoriert", points.len());
            return;
        }

        let (width, height) = self.mask.dimensions();
        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

        let y_start = min_y.floor().max(0.0) as u32;
        let y_end = (max_y.ceil().min(height as f32 - 1.0)).max(0.0) as u32;

        let mut crossings: Vec<f32> = Vec::new();
        for y in y_start..=y_end {
            // Zeilenmitte gegen alle Kanten schneiden
            let scan_y = y as f32 + 0.5;
            crossings.clear();

            let mut previous = points[points.len() - 1];
            for &current in points {
                if (current.y > scan_y) != (previous.y > scan_y) {
                    let t = (scan_y - previous.y) / (current.y - previous.y);
                    crossings.push(previous.x + t * (current.x - previous.x));
                }
                previous = current;
            }

            crossings.sort_by(|a, b| a.total_cmp(b));

            for pair in crossings.chunks_exact(2) {
                let x_from = pair[0].round().max(0.0) as u32;
                let x_to = (pair[1].round().min(width as f32)).max(0.0) as u32;
                for x in x_from..x_to {
                    self.mask.put_pixel(x, y, Luma([target_alpha]));
                }
            }
        }
    }

    /// Überschreibt jeden Pixel mit `target_alpha`.
    ///
    /// 0 = "Nebel löschen", 255 = "Nebel zurücksetzen".
    pub fn reset(&mut self, target_alpha: u8) {
        for pixel in self.mask.pixels_mut() {
            *pixel = Luma([target_alpha]);
        }
        log::info!("Fog-Maske '{}' auf {} gesetzt", self.map_id, target_alpha);
    }

    /// Schreibt die Maske in die Backing-Ressource.
    pub fn save<S: MaskStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.save_mask(&self.map_id, &self.mask)
    }

    /// Map-Bezeichner dieser Maske.
    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    /// Pixel-Dimensionen (identisch zur Basiskarte).
    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    /// Rohzugriff für das Kompositing.
    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    /// Alpha-Wert eines Pixels.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.mask.get_pixel(x, y)[0]
    }
}
