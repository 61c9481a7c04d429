//! Demo picture generator.
//!
//! Draws a light-blue canvas with a red square, a green circle and a yellow
//! triangle, laid out on a 400x300 reference grid and scaled to the requested size.
//! Used by `vault demo` and as a known "ordinary photo" in tests.

use crate::processing::raw_image::RawImage;

const LIGHT_BLUE: [u8; 3] = [173, 216, 230];
const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 128, 0];
const YELLOW: [u8; 3] = [255, 255, 0];

const REF_WIDTH: f64 = 400.0;
const REF_HEIGHT: f64 = 300.0;

/// Render the demo picture at `width x height`.
pub fn sample_image(width: u32, height: u32) -> RawImage {
    let mut img = RawImage::filled(width, height, LIGHT_BLUE);
    let sx = width as f64 / REF_WIDTH;
    let sy = height as f64 / REF_HEIGHT;

    for y in 0..height {
        for x in 0..width {
            // Sample at the pixel centre in reference coordinates.
            let rx = (x as f64 + 0.5) / sx;
            let ry = (y as f64 + 0.5) / sy;

            let color = if in_square(rx, ry) {
                Some(RED)
            } else if in_circle(rx, ry) {
                Some(GREEN)
            } else if in_triangle(rx, ry) {
                Some(YELLOW)
            } else {
                None
            };

            if let Some(rgb) = color {
                img.set_pixel(x, y, rgb);
            }
        }
    }

    img
}

fn in_square(x: f64, y: f64) -> bool {
    (50.0..=150.0).contains(&x) && (50.0..=150.0).contains(&y)
}

fn in_circle(x: f64, y: f64) -> bool {
    let (dx, dy) = (x - 250.0, y - 100.0);
    dx * dx + dy * dy <= 50.0 * 50.0
}

fn in_triangle(x: f64, y: f64) -> bool {
    let (a, b, c) = ((75.0, 200.0), (125.0, 250.0), (25.0, 250.0));
    let d1 = edge(x, y, a, b);
    let d2 = edge(x, y, b, c);
    let d3 = edge(x, y, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

fn edge(px: f64, py: f64, (ax, ay): (f64, f64), (bx, by): (f64, f64)) -> f64 {
    (px - bx) * (ay - by) - (ax - bx) * (py - by)
}
