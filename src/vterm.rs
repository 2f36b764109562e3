//! The virtual terminal: a `vt100` emulator fed with raw PTY output.

use crate::color::{ColorCode, ColorScheme};
use crate::screen::{Attributes, ScreenBuffer, ScreenSource};
use crate::snapshot;

/// One cell as the emulator reports it, colors still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    /// `'\0'` for an empty cell.
    pub ch: char,
    pub fg: ColorCode,
    pub bg: ColorCode,
    pub attrs: Attributes,
    pub inverse: bool,
}

/// A styled character grid reflecting everything the program has written.
pub struct VirtualTerminal {
    parser: vt100::Parser,
    scheme: ColorScheme,
}

impl VirtualTerminal {
    pub fn new(cols: u16, rows: u16, scheme: ColorScheme) -> Self {
        Self {
            // No scrollback: only the visible screen is ever captured.
            parser: vt100::Parser::new(rows, cols, 0),
            scheme,
        }
    }

    /// Grid size as `(cols, rows)`.
    pub fn size(&self) -> (u16, u16) {
        let (rows, cols) = self.parser.screen().size();
        (cols, rows)
    }

    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    pub fn cell_at(&self, col: u16, row: u16) -> Option<RawCell> {
        let cell = self.parser.screen().cell(row, col)?;
        Some(RawCell {
            ch: cell.contents().chars().next().unwrap_or('\0'),
            fg: convert_color(cell.fgcolor()),
            bg: convert_color(cell.bgcolor()),
            attrs: Attributes {
                bold: cell.bold(),
                italic: cell.italic(),
                underline: cell.underline(),
            },
            inverse: cell.inverse(),
        })
    }

    /// Cursor position as `(col, row)`.
    pub fn cursor(&self) -> (u16, u16) {
        let (row, col) = self.parser.screen().cursor_position();
        (col, row)
    }
}

fn convert_color(color: vt100::Color) -> ColorCode {
    match color {
        vt100::Color::Default => ColorCode::Default,
        vt100::Color::Idx(n) => ColorCode::Indexed(n),
        vt100::Color::Rgb(r, g, b) => ColorCode::Rgb(r, g, b),
    }
}

impl ScreenSource for VirtualTerminal {
    fn write(&mut self, bytes: &[u8]) {
        self.parser.process(bytes);
    }

    fn rendered_text(&self) -> String {
        self.parser.screen().contents()
    }

    fn snapshot(&self) -> ScreenBuffer {
        snapshot::extract(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Palette};

    fn term(cols: u16, rows: u16) -> VirtualTerminal {
        VirtualTerminal::new(
            cols,
            rows,
            ColorScheme::new(
                Palette::default(),
                Color::rgb(200, 200, 200),
                Color::rgb(0, 0, 0),
            ),
        )
    }

    #[test]
    fn test_plain_text_and_cursor() {
        let mut vt = term(20, 4);
        vt.write(b"hello\r\nworld");
        assert_eq!(vt.cell_at(0, 0).unwrap().ch, 'h');
        assert_eq!(vt.cell_at(4, 1).unwrap().ch, 'd');
        assert_eq!(vt.cursor(), (5, 1));
        assert!(vt.rendered_text().contains("hello\nworld"));
    }

    #[test]
    fn test_empty_cell_is_nul() {
        let vt = term(10, 2);
        assert_eq!(vt.cell_at(3, 1).unwrap().ch, '\0');
        assert!(vt.cell_at(10, 0).is_none());
        assert!(vt.cell_at(0, 2).is_none());
    }

    #[test]
    fn test_sgr_colors_and_attributes() {
        let mut vt = term(20, 2);
        vt.write(b"\x1b[1;4;31mA\x1b[0m\x1b[38;5;200;48;2;1;2;3mB\x1b[7mC");
        let a = vt.cell_at(0, 0).unwrap();
        assert_eq!(a.fg, ColorCode::Indexed(1));
        assert!(a.attrs.bold && a.attrs.underline && !a.attrs.italic);

        let b = vt.cell_at(1, 0).unwrap();
        assert_eq!(b.fg, ColorCode::Indexed(200));
        assert_eq!(b.bg, ColorCode::Rgb(1, 2, 3));
        assert!(!b.inverse);

        assert!(vt.cell_at(2, 0).unwrap().inverse);
    }

    #[test]
    fn test_cursor_movement_overwrites() {
        let mut vt = term(10, 3);
        vt.write(b"abc\x1b[1;2HX\x1b[3;1Hz");
        assert_eq!(vt.cell_at(1, 0).unwrap().ch, 'X');
        assert_eq!(vt.cell_at(0, 2).unwrap().ch, 'z');
    }

    #[test]
    fn test_line_wrapping() {
        let mut vt = term(4, 3);
        vt.write(b"abcdef");
        assert_eq!(vt.cell_at(3, 0).unwrap().ch, 'd');
        assert_eq!(vt.cell_at(0, 1).unwrap().ch, 'e');
    }

    #[test]
    fn test_size() {
        assert_eq!(term(80, 24).size(), (80, 24));
    }
}
