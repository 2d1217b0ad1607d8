//! Halbtransparentes Linienraster als Overlay.

use image::{Rgba, RgbaImage};

use crate::shared::options::{GRID_LINE_ALPHA, GRID_LINE_WIDTH_DIVISOR};
use crate::shared::{Result, ViewerError};

/// Rendert das Raster-Overlay für ein Bild der Größe `size`.
///
/// Linienabstand = `spacing_pcnt * Breite`, beginnend bei diesem
/// Offset (nicht bei 0). Linien sind schwarz mit fixem Alpha, die
/// Breite wächst mit dem Abstand (`ceil(gap / 40)`, mindestens 1).
///
/// `spacing_pcnt <= 0` (bzw. ein Abstand unter einem Pixel) ist ein
/// Konfigurationsfehler; ein Raster daraus würde praktisch jede
/// Zelle füllen.
pub fn render_grid(size: (u32, u32), spacing_pcnt: f32) -> Result<RgbaImage> {
    render_grid_with_alpha(size, spacing_pcnt, GRID_LINE_ALPHA)
}

/// Wie [`render_grid`], mit explizitem Linien-Alpha.
pub fn render_grid_with_alpha(
    size: (u32, u32),
    spacing_pcnt: f32,
    line_alpha: u8,
) -> Result<RgbaImage> {
    let (width, height) = size;
    let gap = spacing_pcnt * width as f32;

    if !gap.is_finite() || gap < 1.0 {
        return Err(ViewerError::config(format!(
            "Grid-Abstand {} bei Breite {} ist unbrauchbar (spacing_pcnt = {})",
            gap, width, spacing_pcnt
        )));
    }

    let line_width = (gap / GRID_LINE_WIDTH_DIVISOR).ceil().max(1.0) as u32;
    let color = Rgba([0, 0, 0, line_alpha]);
    let mut grid = RgbaImage::new(width, height);

    // Horizontale Linien
    let mut y = gap;
    while y < height as f32 {
        let row = y as u32;
        for dy in 0..line_width {
            let yy = row + dy;
            if yy >= height {
                break;
            }
            for x in 0..width {
                grid.put_pixel(x, yy, color);
            }
        }
        y += gap;
    }

    // Vertikale Linien
    let mut x = gap;
    while x < width as f32 {
        let col = x as u32;
        for dx in 0..line_width {
            let xx = col + dx;
            if xx >= width {
                break;
            }
            for y in 0..height {
                grid.put_pixel(xx, y, color);
            }
        }
        x += gap;
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_starts_at_gap_offset() {
        // 100 px breit, 25% Abstand: Linien bei x/y = 25, 50, 75
        let grid = render_grid((100, 100), 0.25).unwrap();

        assert_eq!(grid.get_pixel(25, 10)[3], GRID_LINE_ALPHA);
        assert_eq!(grid.get_pixel(10, 25)[3], GRID_LINE_ALPHA);
        // Ursprung bleibt frei: keine Linie bei 0
        assert_eq!(grid.get_pixel(0, 10)[3], 0);
        assert_eq!(grid.get_pixel(10, 0)[3], 0);
        // Zwischenraum bleibt transparent
        assert_eq!(grid.get_pixel(10, 10)[3], 0);
    }

    #[test]
    fn test_line_width_grows_with_gap() {
        // gap = 200 -> Breite ceil(200/40) = 5
        let grid = render_grid((400, 400), 0.5).unwrap();
        for dy in 0..5 {
            assert_eq!(grid.get_pixel(10, 200 + dy)[3], GRID_LINE_ALPHA);
        }
        assert_eq!(grid.get_pixel(10, 206)[3], 0);
    }

    #[test]
    fn test_small_gap_has_single_pixel_lines() {
        // gap = 8 -> Breite ceil(8/40) = 1
        let grid = render_grid((100, 100), 0.08).unwrap();
        assert_eq!(grid.get_pixel(10, 8)[3], GRID_LINE_ALPHA);
        assert_eq!(grid.get_pixel(10, 9)[3], 0);
    }

    #[test]
    fn test_degenerate_spacing_fails_with_config_error() {
        for bad in [0.0, -0.5, f32::NAN] {
            match render_grid((100, 100), bad) {
                Err(ViewerError::Config { .. }) => {}
                other => panic!("Config-Fehler erwartet für {}, war: {:?}", bad, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_full_spacing_renders_no_lines() {
        // spacing_pcnt = 1.0: erste Linie läge genau auf der Breite
        let grid = render_grid((50, 50), 1.0).unwrap();
        assert!(grid.pixels().all(|p| p[3] == 0));
    }
}
