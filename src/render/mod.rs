//! Rasterization of [`ScreenBuffer`]s into PNG images.
//!
//! Cell geometry is fixed by the font size so output is reproducible:
//!
//! - the font size is clamped to at least [`MIN_FONT_SIZE`];
//! - a cell is `round(0.6 * size)` pixels wide and `round(1.4 * size)` tall;
//! - the canvas is the grid plus `padding` on every side plus a
//!   [`CANVAS_MARGIN`] pixel margin on the right and bottom.
//!
//! Identical buffers rendered with identical themes produce byte-identical
//! files.

mod builtin;
pub mod font;

pub use font::{FontError, GlyphSource};

use crate::color::Color;
use crate::config::Theme;
use crate::error::RenderError;
use crate::screen::{ScreenBuffer, ScreenCell};
use image::{ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

pub const MIN_FONT_SIZE: f32 = 16.0;
pub const CELL_WIDTH_RATIO: f32 = 0.6;
pub const CELL_HEIGHT_RATIO: f32 = 1.4;
pub const CANVAS_MARGIN: u32 = 2;

/// Pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Effective font size after the minimum is applied.
    pub font_size: f32,
    pub width: u32,
    pub height: u32,
}

impl CellMetrics {
    pub fn for_font_size(font_size: f32) -> Self {
        let font_size = if font_size.is_finite() {
            font_size.max(MIN_FONT_SIZE)
        } else {
            MIN_FONT_SIZE
        };
        Self {
            font_size,
            width: (font_size * CELL_WIDTH_RATIO).round() as u32,
            height: (font_size * CELL_HEIGHT_RATIO).round() as u32,
        }
    }
}

/// Coverage bitmap of one glyph, positioned relative to its cell's top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    pub width: usize,
    pub height: usize,
    pub left: i32,
    pub top: i32,
    pub coverage: Vec<u8>,
}

pub struct Renderer {
    background: Color,
    padding: u32,
    metrics: CellMetrics,
    glyphs: GlyphSource,
}

impl Renderer {
    /// Build a renderer for `theme`, resolving its font setting.
    pub fn new(theme: &Theme) -> Self {
        Self::with_glyphs(theme, GlyphSource::resolve(theme.font.as_deref()))
    }

    pub fn with_glyphs(theme: &Theme, glyphs: GlyphSource) -> Self {
        Self {
            background: theme.background,
            padding: theme.padding,
            metrics: CellMetrics::for_font_size(theme.font_size),
            glyphs,
        }
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Canvas size in pixels for a `cols x rows` grid.
    pub fn canvas_size(&self, cols: usize, rows: usize) -> (u32, u32) {
        let pad = self.padding * 2 + CANVAS_MARGIN;
        (
            cols as u32 * self.metrics.width + pad,
            rows as u32 * self.metrics.height + pad,
        )
    }

    pub fn rasterize(&mut self, buffer: &ScreenBuffer) -> RgbaImage {
        let (width, height) = self.canvas_size(buffer.width(), buffer.height());
        let mut image = RgbaImage::from_pixel(width, height, Rgba(self.background.to_rgba()));
        let (cell_w, cell_h) = (self.metrics.width, self.metrics.height);

        for (row, cells) in buffer.rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let x = self.padding + col as u32 * cell_w;
                let y = self.padding + row as u32 * cell_h;
                self.draw_cell(&mut image, x, y, cell);
            }
        }
        image
    }

    fn draw_cell(&mut self, image: &mut RgbaImage, x: u32, y: u32, cell: &ScreenCell) {
        let (cell_w, cell_h) = (self.metrics.width, self.metrics.height);

        if cell.bg != self.background && !cell.bg.is_transparent() {
            fill_rect(image, x, y, cell_w, cell_h, cell.bg);
        }

        if cell.ch != ' ' && cell.ch != '\0' {
            let glyph = self.glyphs.glyph(cell.ch, &self.metrics);
            let (gx, gy) = (x as i32 + glyph.left, y as i32 + glyph.top);
            blend_mask(image, gx, gy, glyph, cell.fg);
            if cell.attrs.bold {
                blend_mask(image, gx + 1, gy, glyph, cell.fg);
            }
        }

        if cell.attrs.underline {
            fill_rect(image, x, y + cell_h.saturating_sub(2), cell_w, 1, cell.fg);
        }
    }

    /// Render `buffer` to a PNG at `path`.
    ///
    /// The parent directory is created if needed. The image is written to a
    /// temporary file beside `path` and renamed into place, so a failed write
    /// never leaves a truncated PNG behind.
    pub fn render_to_file(&mut self, buffer: &ScreenBuffer, path: &Path) -> Result<(), RenderError> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let image = self.rasterize(buffer);

        let mut tmp = tempfile::Builder::new()
            .prefix(".ptyshot-")
            .suffix(".png.tmp")
            .tempfile_in(dir)
            .map_err(|source| RenderError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            image.write_to(&mut writer, ImageFormat::Png)?;
            writer.flush().map_err(|source| RenderError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        tmp.persist(path).map_err(|e| RenderError::Write {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        debug!(path = %path.display(), width = image.width(), height = image.height(), "wrote png");
        Ok(())
    }
}

fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Color) {
    let x_end = (x + w).min(image.width());
    let y_end = (y + h).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            blend_pixel(image, px, py, color, color.a);
        }
    }
}

fn blend_mask(image: &mut RgbaImage, x: i32, y: i32, mask: &GlyphMask, color: Color) {
    for my in 0..mask.height {
        let py = y + my as i32;
        if py < 0 || py >= image.height() as i32 {
            continue;
        }
        for mx in 0..mask.width {
            let px = x + mx as i32;
            if px < 0 || px >= image.width() as i32 {
                continue;
            }
            let coverage = mask.coverage[my * mask.width + mx];
            if coverage == 0 {
                continue;
            }
            let alpha = (u16::from(coverage) * u16::from(color.a) / 255) as u8;
            blend_pixel(image, px as u32, py as u32, color, alpha);
        }
    }
}

fn blend_pixel(image: &mut RgbaImage, x: u32, y: u32, color: Color, alpha: u8) {
    if alpha == 0 {
        return;
    }
    let pixel = image.get_pixel_mut(x, y);
    let a = u16::from(alpha);
    let inv = 255 - a;
    let src = [color.r, color.g, color.b];
    for (dst, src) in pixel.0.iter_mut().take(3).zip(src) {
        *dst = ((u16::from(src) * a + u16::from(*dst) * inv) / 255) as u8;
    }
    pixel.0[3] = pixel.0[3].max(alpha);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Attributes;

    const FG: Color = Color::rgb(212, 212, 212);
    const BG: Color = Color::rgb(26, 26, 26);

    fn theme() -> Theme {
        Theme {
            background: BG,
            foreground: FG,
            font: Some("builtin".to_string()),
            font_size: 14.0,
            padding: 20,
            ..Theme::default()
        }
    }

    fn buffer(text: &str, cols: usize, rows: usize) -> ScreenBuffer {
        let blank = ScreenCell::blank(FG, BG);
        let cells = text.chars().map(|ch| ScreenCell { ch, ..blank }).collect();
        ScreenBuffer::from_cells(cols, rows, cells, blank)
    }

    fn pixel(image: &RgbaImage, x: u32, y: u32) -> Color {
        let p = image.get_pixel(x, y).0;
        Color {
            r: p[0],
            g: p[1],
            b: p[2],
            a: p[3],
        }
    }

    #[test]
    fn test_metrics_apply_floor() {
        let m = CellMetrics::for_font_size(14.0);
        assert_eq!(m.font_size, MIN_FONT_SIZE);
        assert_eq!((m.width, m.height), (10, 22));

        let m = CellMetrics::for_font_size(20.0);
        assert_eq!((m.width, m.height), (12, 28));
        assert_eq!(CellMetrics::for_font_size(f32::NAN).font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn test_canvas_size() {
        let renderer = Renderer::new(&theme());
        assert_eq!(
            renderer.canvas_size(80, 24),
            (80 * 10 + 40 + CANVAS_MARGIN, 24 * 22 + 40 + CANVAS_MARGIN)
        );
    }

    #[test]
    fn test_blank_buffer_is_uniform_background() {
        let mut renderer = Renderer::new(&theme());
        let image = renderer.rasterize(&buffer("", 4, 2));
        assert!(image.pixels().all(|p| p.0 == BG.to_rgba()));
    }

    #[test]
    fn test_cell_background_fills_exactly_one_cell() {
        let mut renderer = Renderer::new(&theme());
        let red = Color::rgb(200, 0, 0);
        let blank = ScreenCell::blank(FG, BG);
        let mut cells = vec![blank; 3];
        cells[1].bg = red;
        let image = renderer.rasterize(&ScreenBuffer::from_cells(3, 1, cells, blank));

        let (x0, y0) = (20 + 10, 20);
        assert_eq!(pixel(&image, x0, y0), red);
        assert_eq!(pixel(&image, x0 + 9, y0 + 21), red);
        assert_eq!(pixel(&image, x0 - 1, y0), BG);
        assert_eq!(pixel(&image, x0 + 10, y0), BG);
        assert_eq!(pixel(&image, x0, y0 + 22), BG);
    }

    #[test]
    fn test_transparent_background_not_painted() {
        let mut renderer = Renderer::new(&theme());
        let blank = ScreenCell::blank(FG, BG);
        let mut cell = blank;
        cell.bg = Color { a: 0, ..Color::rgb(255, 0, 0) };
        let image = renderer.rasterize(&ScreenBuffer::from_cells(1, 1, vec![cell], blank));
        assert!(image.pixels().all(|p| p.0 == BG.to_rgba()));
    }

    #[test]
    fn test_glyph_drawn_in_foreground() {
        let mut renderer = Renderer::new(&theme());
        let image = renderer.rasterize(&buffer("#", 1, 1));
        assert!(image.pixels().any(|p| p.0 == FG.to_rgba()));
    }

    #[test]
    fn test_underline_and_bold() {
        let mut renderer = Renderer::new(&theme());
        let blank = ScreenCell::blank(FG, BG);
        let mut cell = blank;
        cell.attrs = Attributes {
            underline: true,
            ..Attributes::default()
        };
        let image = renderer.rasterize(&ScreenBuffer::from_cells(1, 1, vec![cell], blank));
        assert_eq!(pixel(&image, 20, 20 + 20), FG);

        let plain = renderer.rasterize(&buffer("l", 1, 1));
        let mut bold_cell = ScreenCell { ch: 'l', ..blank };
        bold_cell.attrs.bold = true;
        let bold = renderer.rasterize(&ScreenBuffer::from_cells(1, 1, vec![bold_cell], blank));
        let ink = |img: &RgbaImage| img.pixels().filter(|p| p.0 == FG.to_rgba()).count();
        assert!(ink(&bold) > ink(&plain));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");

        Renderer::new(&theme())
            .render_to_file(&buffer("hello, world", 20, 3), &first)
            .unwrap();
        Renderer::new(&theme())
            .render_to_file(&buffer("hello, world", 20, 3), &second)
            .unwrap();

        let a = fs::read(&first).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, fs::read(&second).unwrap());
    }

    #[test]
    fn test_creates_directory_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/shot.png");
        Renderer::new(&theme())
            .render_to_file(&buffer("x", 2, 2), &path)
            .unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 2 * 10 + 40 + CANVAS_MARGIN);
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
