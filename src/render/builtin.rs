//! Built-in 5x7 bitmap font used when no font file can be loaded.

use super::{CellMetrics, GlyphMask};

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;

/// Printable ASCII from `' '` to `'~'`, five columns per glyph, bit 0 = top row.
#[rustfmt::skip]
const ASCII: [[u8; GLYPH_COLS]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], [0x00, 0x00, 0x5F, 0x00, 0x00], [0x00, 0x07, 0x00, 0x07, 0x00],
    [0x14, 0x7F, 0x14, 0x7F, 0x14], [0x24, 0x2A, 0x7F, 0x2A, 0x12], [0x23, 0x13, 0x08, 0x64, 0x62],
    [0x36, 0x49, 0x55, 0x22, 0x50], [0x00, 0x05, 0x03, 0x00, 0x00], [0x00, 0x1C, 0x22, 0x41, 0x00],
    [0x00, 0x41, 0x22, 0x1C, 0x00], [0x08, 0x2A, 0x1C, 0x2A, 0x08], [0x08, 0x08, 0x3E, 0x08, 0x08],
    [0x00, 0x50, 0x30, 0x00, 0x00], [0x08, 0x08, 0x08, 0x08, 0x08], [0x00, 0x60, 0x60, 0x00, 0x00],
    [0x20, 0x10, 0x08, 0x04, 0x02], [0x3E, 0x51, 0x49, 0x45, 0x3E], [0x00, 0x42, 0x7F, 0x40, 0x00],
    [0x42, 0x61, 0x51, 0x49, 0x46], [0x21, 0x41, 0x45, 0x4B, 0x31], [0x18, 0x14, 0x12, 0x7F, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39], [0x3C, 0x4A, 0x49, 0x49, 0x30], [0x01, 0x71, 0x09, 0x05, 0x03],
    [0x36, 0x49, 0x49, 0x49, 0x36], [0x06, 0x49, 0x49, 0x29, 0x1E], [0x00, 0x36, 0x36, 0x00, 0x00],
    [0x00, 0x56, 0x36, 0x00, 0x00], [0x00, 0x08, 0x14, 0x22, 0x41], [0x14, 0x14, 0x14, 0x14, 0x14],
    [0x41, 0x22, 0x14, 0x08, 0x00], [0x02, 0x01, 0x51, 0x09, 0x06], [0x32, 0x49, 0x79, 0x41, 0x3E],
    [0x7E, 0x11, 0x11, 0x11, 0x7E], [0x7F, 0x49, 0x49, 0x49, 0x36], [0x3E, 0x41, 0x41, 0x41, 0x22],
    [0x7F, 0x41, 0x41, 0x22, 0x1C], [0x7F, 0x49, 0x49, 0x49, 0x41], [0x7F, 0x09, 0x09, 0x01, 0x01],
    [0x3E, 0x41, 0x41, 0x51, 0x32], [0x7F, 0x08, 0x08, 0x08, 0x7F], [0x00, 0x41, 0x7F, 0x41, 0x00],
    [0x20, 0x40, 0x41, 0x3F, 0x01], [0x7F, 0x08, 0x14, 0x22, 0x41], [0x7F, 0x40, 0x40, 0x40, 0x40],
    [0x7F, 0x02, 0x04, 0x02, 0x7F], [0x7F, 0x04, 0x08, 0x10, 0x7F], [0x3E, 0x41, 0x41, 0x41, 0x3E],
    [0x7F, 0x09, 0x09, 0x09, 0x06], [0x3E, 0x41, 0x51, 0x21, 0x5E], [0x7F, 0x09, 0x19, 0x29, 0x46],
    [0x46, 0x49, 0x49, 0x49, 0x31], [0x01, 0x01, 0x7F, 0x01, 0x01], [0x3F, 0x40, 0x40, 0x40, 0x3F],
    [0x1F, 0x20, 0x40, 0x20, 0x1F], [0x7F, 0x20, 0x18, 0x20, 0x7F], [0x63, 0x14, 0x08, 0x14, 0x63],
    [0x03, 0x04, 0x78, 0x04, 0x03], [0x61, 0x51, 0x49, 0x45, 0x43], [0x00, 0x00, 0x7F, 0x41, 0x41],
    [0x02, 0x04, 0x08, 0x10, 0x20], [0x41, 0x41, 0x7F, 0x00, 0x00], [0x04, 0x02, 0x01, 0x02, 0x04],
    [0x40, 0x40, 0x40, 0x40, 0x40], [0x00, 0x01, 0x02, 0x04, 0x00], [0x20, 0x54, 0x54, 0x54, 0x78],
    [0x7F, 0x48, 0x44, 0x44, 0x38], [0x38, 0x44, 0x44, 0x44, 0x20], [0x38, 0x44, 0x44, 0x48, 0x7F],
    [0x38, 0x54, 0x54, 0x54, 0x18], [0x08, 0x7E, 0x09, 0x01, 0x02], [0x08, 0x14, 0x54, 0x54, 0x3C],
    [0x7F, 0x08, 0x04, 0x04, 0x78], [0x00, 0x44, 0x7D, 0x40, 0x00], [0x20, 0x40, 0x44, 0x3D, 0x00],
    [0x00, 0x7F, 0x10, 0x28, 0x44], [0x00, 0x41, 0x7F, 0x40, 0x00], [0x7C, 0x04, 0x18, 0x04, 0x78],
    [0x7C, 0x08, 0x04, 0x04, 0x78], [0x38, 0x44, 0x44, 0x44, 0x38], [0x7C, 0x14, 0x14, 0x14, 0x08],
    [0x08, 0x14, 0x14, 0x18, 0x7C], [0x7C, 0x08, 0x04, 0x04, 0x08], [0x48, 0x54, 0x54, 0x54, 0x20],
    [0x04, 0x3F, 0x44, 0x40, 0x20], [0x3C, 0x40, 0x40, 0x20, 0x7C], [0x1C, 0x20, 0x40, 0x20, 0x1C],
    [0x3C, 0x40, 0x30, 0x40, 0x3C], [0x44, 0x28, 0x10, 0x28, 0x44], [0x0C, 0x50, 0x50, 0x50, 0x3C],
    [0x44, 0x64, 0x54, 0x4C, 0x44], [0x00, 0x08, 0x36, 0x41, 0x00], [0x00, 0x00, 0x7F, 0x00, 0x00],
    [0x00, 0x41, 0x36, 0x08, 0x00], [0x02, 0x01, 0x02, 0x04, 0x02],
];

fn columns(ch: char) -> Option<&'static [u8; GLYPH_COLS]> {
    let code = ch as usize;
    (0x20..=0x7E).contains(&code).then(|| &ASCII[code - 0x20])
}

/// Rasterize `ch`, scaled with nearest-neighbour sampling to fit the cell.
///
/// Characters outside printable ASCII render as a hollow box.
pub fn rasterize(ch: char, metrics: &CellMetrics) -> GlyphMask {
    let cell_w = metrics.width as usize;
    let cell_h = metrics.height as usize;
    let width = (cell_w - cell_w / 5).max(GLYPH_COLS);
    let height = (width * GLYPH_ROWS / GLYPH_COLS)
        .min(cell_h * 3 / 4)
        .max(GLYPH_ROWS);

    let mut coverage = vec![0u8; width * height];
    match columns(ch) {
        Some(cols) => {
            for y in 0..height {
                let src_y = y * GLYPH_ROWS / height;
                for x in 0..width {
                    let src_x = x * GLYPH_COLS / width;
                    if (cols[src_x] >> src_y) & 1 == 1 {
                        coverage[y * width + x] = 255;
                    }
                }
            }
        }
        None => {
            for y in 0..height {
                for x in 0..width {
                    if y == 0 || y == height - 1 || x == 0 || x == width - 1 {
                        coverage[y * width + x] = 255;
                    }
                }
            }
        }
    }

    GlyphMask {
        width,
        height,
        left: (cell_w.saturating_sub(width) / 2) as i32,
        top: (cell_h.saturating_sub(height) / 2) as i32,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_is_empty() {
        let mask = rasterize(' ', &CellMetrics::for_font_size(16.0));
        assert!(mask.coverage.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_letters_have_ink_and_fit_cell() {
        let metrics = CellMetrics::for_font_size(16.0);
        for ch in ['A', 'g', '0', '~', '@'] {
            let mask = rasterize(ch, &metrics);
            assert!(mask.coverage.iter().any(|&c| c == 255), "{ch} has no ink");
            assert!(mask.left as usize + mask.width <= metrics.width as usize);
            assert!(mask.top as usize + mask.height <= metrics.height as usize);
        }
    }

    #[test]
    fn test_non_ascii_is_box() {
        let mask = rasterize('é', &CellMetrics::for_font_size(16.0));
        assert_eq!(mask.coverage[0], 255);
        let center = (mask.height / 2) * mask.width + mask.width / 2;
        assert_eq!(mask.coverage[center], 0);
    }

    #[test]
    fn test_distinct_glyphs() {
        let metrics = CellMetrics::for_font_size(20.0);
        assert_ne!(rasterize('l', &metrics), rasterize('1', &metrics));
    }
}
