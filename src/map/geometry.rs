use crate::braille::BrailleCanvas;
use crate::hash::pixel_noise;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Closed outline through the projected vertices
pub fn draw_polygon(canvas: &mut BrailleCanvas, points: &[(i32, i32)]) {
    if points.len() < 2 {
        return;
    }
    for (i, &(x0, y0)) in points.iter().enumerate() {
        let (x1, y1) = points[(i + 1) % points.len()];
        draw_line(canvas, x0, y0, x1, y1);
    }
}

/// Scanline fill of a polygon, lighting a `density` share of interior dots.
/// The dot pattern depends only on the pixel position, so it is identical
/// from one frame to the next.
pub fn fill_polygon(canvas: &mut BrailleCanvas, points: &[(i32, i32)], density: f64) {
    if points.len() < 3 || density <= 0.0 {
        return;
    }

    let max_x = canvas.pixel_width() as i32 - 1;
    let max_y = canvas.pixel_height() as i32 - 1;
    let top = points.iter().map(|p| p.1).min().unwrap_or(0).max(0);
    let bottom = points.iter().map(|p| p.1).max().unwrap_or(-1).min(max_y);

    let mut crossings: Vec<f64> = Vec::with_capacity(points.len());

    for y in top..=bottom {
        let scan = y as f64 + 0.5;
        crossings.clear();

        for (i, &(x0, y0)) in points.iter().enumerate() {
            let (x1, y1) = points[(i + 1) % points.len()];
            let (fy0, fy1) = (y0 as f64, y1 as f64);
            if (fy0 <= scan) != (fy1 <= scan) {
                let t = (scan - fy0) / (fy1 - fy0);
                crossings.push(x0 as f64 + t * (x1 - x0) as f64);
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let start = (span[0].ceil() as i32).max(0);
            let end = (span[1].floor() as i32).min(max_x);
            for x in start..=end {
                if density >= 1.0 || pixel_noise(x, y) < density {
                    canvas.set_pixel(x as usize, y as usize);
                }
            }
        }
    }
}

/// Draw a point marker (small cross)
pub fn draw_marker(canvas: &mut BrailleCanvas, x: i32, y: i32, size: i32) {
    for i in -size..=size {
        canvas.set_pixel_signed(x + i, y);
        canvas.set_pixel_signed(x, y + i);
    }
}
