//! Conversion of live virtual terminal state into an immutable [`ScreenBuffer`].

use crate::screen::{ScreenBuffer, ScreenCell};
use crate::vterm::VirtualTerminal;

/// Copy the full grid of `vt`, resolving every color against its scheme.
///
/// Callers must hold the screen lock for the duration (this is what
/// [`crate::screen::SharedScreen::snapshot`] does) so the grid is consistent.
pub fn extract(vt: &VirtualTerminal) -> ScreenBuffer {
    let scheme = vt.scheme();
    let (cols, rows) = vt.size();
    let blank = ScreenCell::blank(scheme.foreground, scheme.background);

    let mut cells = Vec::with_capacity(cols as usize * rows as usize);
    for row in 0..rows {
        for col in 0..cols {
            let Some(raw) = vt.cell_at(col, row) else {
                cells.push(blank);
                continue;
            };
            let mut fg = scheme.resolve_fg(raw.fg);
            let mut bg = scheme.resolve_bg(raw.bg);
            if raw.inverse {
                std::mem::swap(&mut fg, &mut bg);
            }
            cells.push(ScreenCell {
                ch: if raw.ch == '\0' { ' ' } else { raw.ch },
                fg,
                bg,
                attrs: raw.attrs,
            });
        }
    }

    ScreenBuffer::from_cells(cols as usize, rows as usize, cells, blank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorScheme, Palette};
    use crate::screen::ScreenSource;

    const FG: Color = Color::rgb(212, 212, 212);
    const BG: Color = Color::rgb(26, 26, 26);

    fn term() -> VirtualTerminal {
        VirtualTerminal::new(10, 3, ColorScheme::new(Palette::default(), FG, BG))
    }

    #[test]
    fn test_blank_screen_uses_defaults() {
        let buf = extract(&term());
        assert_eq!((buf.width(), buf.height()), (10, 3));
        for row in buf.rows() {
            for cell in row {
                assert_eq!(*cell, ScreenCell::blank(FG, BG));
            }
        }
    }

    #[test]
    fn test_resolves_each_color_kind() {
        let mut vt = term();
        vt.write(b"\x1b[32ma\x1b[38;5;21mb\x1b[38;5;244mc\x1b[38;2;10;20;30md\x1b[39;41me");
        let buf = extract(&vt);
        let palette = Palette::default();
        assert_eq!(buf.cell(0, 0).unwrap().fg, palette.0[2]);
        assert_eq!(buf.cell(1, 0).unwrap().fg, Color::rgb(0, 0, 255));
        assert_eq!(buf.cell(2, 0).unwrap().fg, Color::rgb(128, 128, 128));
        assert_eq!(buf.cell(3, 0).unwrap().fg, Color::rgb(10, 20, 30));
        let e = buf.cell(4, 0).unwrap();
        assert_eq!(e.fg, FG);
        assert_eq!(e.bg, palette.0[1]);
        assert_eq!(buf.cell(5, 0).unwrap().bg, BG);
    }

    #[test]
    fn test_inverse_swaps_colors() {
        let mut vt = term();
        vt.write(b"\x1b[7mx");
        let cell = *extract(&vt).cell(0, 0).unwrap();
        assert_eq!((cell.ch, cell.fg, cell.bg), ('x', BG, FG));
    }

    #[test]
    fn test_snapshot_is_detached_from_terminal() {
        let mut vt = term();
        vt.write(b"old");
        let before = vt.snapshot();
        vt.write(b"\x1b[Hnew");
        assert_eq!(before.text().lines().next(), Some("old"));
        assert_eq!(vt.snapshot().text().lines().next(), Some("new"));
    }
}
