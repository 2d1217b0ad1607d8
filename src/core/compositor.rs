//! Kompositing: Basiskarte + geblurte Fog-Maske + optionales Raster.
//!
//! Zwei getrennt parametrierte Pfade: das GM-Komposit blendet die
//! Maske unverändert (voller Nebel verdeckt auch die GM-Sicht), das
//! Spieler-Komposit skaliert jedes Masken-Alpha vorher mit einem
//! Dimm-Faktor, so dass verborgenes Terrain schwach durchscheint.

use glam::Vec2;
use image::{imageops, GrayImage, Rgba, RgbaImage};

use crate::shared::CompositeProfile;

/// Baut das Komposit für einen Render-Pfad.
///
/// Reihenfolge ist fix: Basis (opak) → geblurte Fog-Maske (schwarz,
/// Alpha aus der Maske, optional gedimmt) → Raster. Der Blur wirkt nur
/// auf die In-Memory-Maske, nie auf die gespeicherte.
pub fn compose(
    base: &RgbaImage,
    fog: &GrayImage,
    grid: Option<&RgbaImage>,
    profile: &CompositeProfile,
) -> RgbaImage {
    let blurred;
    let fog = if profile.blur_sigma > 0.0 {
        blurred = imageops::blur(fog, profile.blur_sigma);
        &blurred
    } else {
        fog
    };

    let width = base.width().min(fog.width());
    let height = base.height().min(fog.height());
    let mut out = base.clone();

    for y in 0..height {
        for x in 0..width {
            let mask_alpha = fog.get_pixel(x, y)[0];
            let scaled = (f32::from(mask_alpha) * profile.alpha_scale).floor() as u8;
            if scaled == 0 {
                continue;
            }

            let alpha = f32::from(scaled) / 255.0;
            let pixel = out.get_pixel_mut(x, y);
            // Alpha-Over mit schwarzem Nebel: Kanäle nur abdunkeln
            pixel[0] = blend_channel(pixel[0], 0, alpha);
            pixel[1] = blend_channel(pixel[1], 0, alpha);
            pixel[2] = blend_channel(pixel[2], 0, alpha);
        }
    }

    if let Some(grid) = grid {
        alpha_over(&mut out, grid);
    }

    out
}

/// Blendet `overlay` per Standard-Alpha-Over auf `dst`.
pub fn alpha_over(dst: &mut RgbaImage, overlay: &RgbaImage) {
    let width = dst.width().min(overlay.width());
    let height = dst.height().min(overlay.height());

    for y in 0..height {
        for x in 0..width {
            let src = overlay.get_pixel(x, y);
            if src[3] == 0 {
                continue;
            }
            let alpha = f32::from(src[3]) / 255.0;
            let pixel = dst.get_pixel_mut(x, y);
            pixel[0] = blend_channel(pixel[0], src[0], alpha);
            pixel[1] = blend_channel(pixel[1], src[1], alpha);
            pixel[2] = blend_channel(pixel[2], src[2], alpha);
        }
    }
}

/// Zeichnet den Umriss des laufenden Polygons: ein Punkt für den
/// ersten Klick, Linien zwischen aufeinanderfolgenden Punkten.
pub fn draw_polygon_outline(
    image: &mut RgbaImage,
    points: &[Vec2],
    color: [u8; 4],
    stroke_width: u32,
) {
    let Some(&first) = points.first() else {
        return;
    };

    draw_dot(image, first, stroke_width, color);
    for segment in points.windows(2) {
        draw_line(image, segment[0], segment[1], stroke_width, color);
    }
}

/// Zeichnet eine Linie durch parametrisches Abschreiten.
fn draw_line(image: &mut RgbaImage, from: Vec2, to: Vec2, stroke_width: u32, color: [u8; 4]) {
    let length = from.distance(to);
    let steps = length.ceil().max(1.0) as u32;

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        draw_dot(image, from.lerp(to, t), stroke_width, color);
    }
}

/// Füllt ein Quadrat um den Punkt (Strichstärke).
fn draw_dot(image: &mut RgbaImage, center: Vec2, stroke_width: u32, color: [u8; 4]) {
    let half = (stroke_width / 2) as i32;
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;
    let w = image.width() as i32;
    let h = image.height() as i32;

    for dy in -half..=half {
        for dx in -half..=half {
            let x = cx + dx;
            let y = cy + dy;
            if x >= 0 && x < w && y >= 0 && y < h {
                image.put_pixel(x as u32, y as u32, Rgba(color));
            }
        }
    }
}

/// Blendet zwei Farbkanäle zusammen.
fn blend_channel(base: u8, overlay: u8, alpha: f32) -> u8 {
    let result = f32::from(base) * (1.0 - alpha) + f32::from(overlay) * alpha;
    result.clamp(0.0, 255.0).round() as u8
}
