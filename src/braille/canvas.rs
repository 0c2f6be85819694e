/// Dot raster packed into braille characters (U+2800..U+28FF).
/// One terminal cell holds a 2 wide by 4 tall block of dots, so a canvas of
/// `width` x `height` cells addresses `width*2` x `height*4` pixels.
#[derive(Clone)]
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    /// Dot bits per cell, row-major
    cells: Vec<u8>,
}

/// Bit for the dot at `[y % 4][x % 2]` inside a cell. The bottom row is the
/// eight-dot extension and lives in bits 6 and 7.
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    /// Set a pixel at the given coordinates; out of range is ignored
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }
        self.cells[cy * self.width + cx] |= DOT_BITS[y % 4][x % 2];
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        let (cx, cy) = (x / 2, y / 4);
        cx < self.width && cy < self.height && self.cells[cy * self.width + cx] & DOT_BITS[y % 4][x % 2] != 0
    }

    /// Number of dots lit across the canvas
    pub fn dot_count(&self) -> usize {
        self.cells.iter().map(|b| b.count_ones() as usize).sum()
    }

    #[inline(always)]
    fn glyph(bits: u8) -> char {
        char::from_u32(0x2800 + bits as u32).unwrap_or(' ')
    }

    /// Non-empty characters as (column, row, glyph)
    pub fn glyphs(&self) -> impl Iterator<Item = (u16, u16, char)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, &bits)| {
            if bits == 0 {
                return None;
            }
            let col = (idx % self.width) as u16;
            let row = (idx / self.width) as u16;
            Some((col, row, Self::glyph(bits)))
        })
    }

    /// Glyphs for one row of cells, blank braille for empty ones
    #[cfg(test)]
    pub fn row_text(&self, row: usize) -> String {
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|&b| Self::glyph(b))
            .collect()
    }
}
