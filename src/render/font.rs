//! Glyph sources: a loaded monospace font or the built-in bitmap font.

use super::{CellMetrics, GlyphMask, builtin};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Well-known monospace font locations, tried in order.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Name selecting the built-in font in `theme.font`.
pub const BUILTIN_FONT: &str = "builtin";

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse font {path}: {reason}")]
    Parse { path: PathBuf, reason: &'static str },
}

/// First existing font from the candidate list.
pub fn discover() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|path| path.is_file())
        .map(Path::to_path_buf)
}

/// Rasterizes and caches glyph masks for one renderer.
pub struct GlyphSource {
    font: Option<fontdue::Font>,
    cache: HashMap<char, GlyphMask>,
}

impl GlyphSource {
    pub fn builtin() -> Self {
        Self {
            font: None,
            cache: HashMap::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(
            |reason| FontError::Parse {
                path: path.to_path_buf(),
                reason,
            },
        )?;
        Ok(Self {
            font: Some(font),
            cache: HashMap::new(),
        })
    }

    /// Pick a glyph source for a `theme.font` setting.
    ///
    /// `"builtin"` selects the bitmap font, a path loads that file and `None`
    /// tries the well-known locations. Every failure falls back to the
    /// built-in font.
    pub fn resolve(font: Option<&str>) -> Self {
        let path = match font {
            Some(name) if name.eq_ignore_ascii_case(BUILTIN_FONT) => return Self::builtin(),
            Some(path) => PathBuf::from(path),
            None => match discover() {
                Some(path) => path,
                None => {
                    debug!("no monospace font found, using built-in glyphs");
                    return Self::builtin();
                }
            },
        };

        match Self::load(&path) {
            Ok(source) => {
                debug!(font = %path.display(), "loaded font");
                source
            }
            Err(e) => {
                warn!("{e}; using built-in glyphs");
                Self::builtin()
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.font.is_none()
    }

    pub fn glyph(&mut self, ch: char, metrics: &CellMetrics) -> &GlyphMask {
        let font = &self.font;
        self.cache.entry(ch).or_insert_with(|| match font {
            Some(font) => rasterize_font(font, ch, metrics),
            None => builtin::rasterize(ch, metrics),
        })
    }
}

fn rasterize_font(font: &fontdue::Font, ch: char, metrics: &CellMetrics) -> GlyphMask {
    let px = metrics.font_size;
    let (ascent, descent) = font
        .horizontal_line_metrics(px)
        .map(|line| (line.ascent, line.descent))
        .unwrap_or((px * 0.8, -px * 0.2));
    let baseline = ((metrics.height as f32 - (ascent - descent)) / 2.0 + ascent).round() as i32;

    let (glyph, coverage) = font.rasterize(ch, px);
    GlyphMask {
        width: glyph.width,
        height: glyph.height,
        left: glyph.xmin,
        top: baseline - glyph.height as i32 - glyph.ymin,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keyword() {
        assert!(GlyphSource::resolve(Some("builtin")).is_builtin());
        assert!(GlyphSource::resolve(Some("BUILTIN")).is_builtin());
    }

    #[test]
    fn test_missing_font_falls_back() {
        let source = GlyphSource::resolve(Some("/nonexistent/font.ttf"));
        assert!(source.is_builtin());
    }

    #[test]
    fn test_unparseable_font_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(
            GlyphSource::load(&path),
            Err(FontError::Parse { .. })
        ));
        assert!(GlyphSource::resolve(path.to_str()).is_builtin());
    }

    #[test]
    fn test_glyphs_are_cached() {
        let mut source = GlyphSource::builtin();
        let metrics = CellMetrics::for_font_size(16.0);
        let first = source.glyph('x', &metrics).clone();
        assert_eq!(source.cache.len(), 1);
        assert_eq!(*source.glyph('x', &metrics), first);
        assert_eq!(source.cache.len(), 1);
    }
}
