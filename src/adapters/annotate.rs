use image::{Rgb, RgbImage};

use crate::domain::detection::Detection;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: u32 = 2;

/// Dibuja los cuadros de las detecciones sobre el frame, para la salida
/// anotada de la utilidad de cámara en vivo.
pub fn draw_detections(img: &mut RgbImage, detections: &[Detection]) {
    for det in detections {
        if let Some(rect) = clamp_box(det.bbox, img.dimensions()) {
            draw_rect(img, rect, BOX_COLOR, BOX_THICKNESS);
        }
    }
}

/// Recorta un cuadro en píxeles a los límites de la imagen. Devuelve `None`
/// si tras el recorte no queda un rectángulo válido.
fn clamp_box(bbox: [f32; 4], dims: (u32, u32)) -> Option<[u32; 4]> {
    let (w, h) = dims;
    if w == 0 || h == 0 {
        return None;
    }
    let clamp = |v: f32, max: u32| -> u32 { v.max(0.0).min((max - 1) as f32) as u32 };
    let x0 = clamp(bbox[0], w);
    let y0 = clamp(bbox[1], h);
    let x1 = clamp(bbox[2], w);
    let y1 = clamp(bbox[3], h);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some([x0, y0, x1, y1])
}

fn draw_rect(img: &mut RgbImage, rect: [u32; 4], color: Rgb<u8>, thickness: u32) {
    let [x0, y0, x1, y1] = rect;
    for t in 0..thickness {
        let xx0 = x0.saturating_add(t);
        let yy0 = y0.saturating_add(t);
        let xx1 = x1.saturating_sub(t);
        let yy1 = y1.saturating_sub(t);
        if xx0 > xx1 || yy0 > yy1 {
            continue;
        }
        for x in xx0..=xx1 {
            img.put_pixel(x, yy0, color);
            img.put_pixel(x, yy1, color);
        }
        for y in yy0..=yy1 {
            img.put_pixel(xx0, y, color);
            img.put_pixel(xx1, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_inbounds_box() {
        assert_eq!(
            clamp_box([10.0, 10.0, 50.0, 40.0], (100, 100)),
            Some([10, 10, 50, 40])
        );
    }

    #[test]
    fn clamp_rejects_degenerate_box() {
        assert_eq!(clamp_box([50.0, 50.0, 50.0, 50.0], (100, 100)), None);
    }

    #[test]
    fn clamp_cuts_box_to_image_bounds() {
        assert_eq!(
            clamp_box([-20.0, -5.0, 500.0, 500.0], (100, 80)),
            Some([0, 0, 99, 79])
        );
    }

    #[test]
    fn draw_paints_border_pixels() {
        let mut img = RgbImage::new(64, 64);
        let det = Detection {
            label: "person".to_string(),
            confidence: 0.8,
            bbox: [8.0, 8.0, 32.0, 32.0],
        };
        draw_detections(&mut img, &[det]);
        assert_eq!(img.get_pixel(8, 8).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(20, 8).0, [0, 255, 0]);
        // El interior queda intacto
        assert_eq!(img.get_pixel(20, 20).0, [0, 0, 0]);
    }
}
