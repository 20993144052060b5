//! Raster drawing primitives for overlay composition.

use image::RgbImage;

use kinetrack_vision_core::color::Rgb;

/// Stamp a filled circle onto the image, clipped at the borders.
pub fn draw_filled_circle(img: &mut RgbImage, cx: f64, cy: f64, radius: u32, color: Rgb) {
    let r = radius as f64;
    let r2 = r * r;
    let x_min = (cx - r).floor().max(0.0) as u32;
    let x_max = ((cx + r).ceil().min(img.width() as f64 - 1.0)).max(0.0) as u32;
    let y_min = (cy - r).floor().max(0.0) as u32;
    let y_max = ((cy + r).ceil().min(img.height() as f64 - 1.0)).max(0.0) as u32;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x, y, image::Rgb([color.r, color.g, color.b]));
            }
        }
    }
}

/// Draw a thick line segment by stamping disks along its length.
pub fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), thickness: u32, color: Rgb) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    let radius = (thickness / 2).max(1);

    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let x = from.0 + dx * t;
        let y = from.1 + dy * t;
        draw_filled_circle(img, x, y, radius, color);
    }
}
