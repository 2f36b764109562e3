//! SGR style parsing for the styled-text fallback screen.
//!
//! Raw program output is run through a `vte` state machine. Printable text is
//! grouped into [`Segment`]s carrying the style active when it was printed;
//! every other control sequence is consumed without affecting the text.

use crate::color::{Color, ColorScheme, Palette};
use crate::screen::Attributes;

/// Colors and attributes applied to a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attributes,
}

/// A run of text printed with a single style.
///
/// `text` may contain `\n`, `\r` and `\t`; other control characters are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

/// Incremental SGR parser. State carries over between [`parse`](Self::parse)
/// calls, so sequences split across reads are handled.
pub struct StyleParser {
    machine: vte::Parser,
    state: StyleState,
}

impl StyleParser {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            machine: vte::Parser::new(),
            state: StyleState::new(scheme),
        }
    }

    pub fn parse(&mut self, bytes: &[u8]) -> Vec<Segment> {
        self.machine.advance(&mut self.state, bytes);
        self.state.flush();
        std::mem::take(&mut self.state.segments)
    }

    pub fn style(&self) -> Style {
        self.state.current
    }

    pub fn default_style(&self) -> Style {
        self.state.defaults
    }
}

struct StyleState {
    palette: Palette,
    defaults: Style,
    current: Style,
    text: String,
    segments: Vec<Segment>,
}

impl StyleState {
    fn new(scheme: ColorScheme) -> Self {
        let defaults = Style {
            fg: scheme.foreground,
            bg: scheme.background,
            attrs: Attributes::default(),
        };
        Self {
            palette: scheme.palette,
            defaults,
            current: defaults,
            text: String::new(),
            segments: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        match self.segments.last_mut() {
            Some(last) if last.style == self.current => last.text.push_str(&text),
            _ => self.segments.push(Segment {
                text,
                style: self.current,
            }),
        }
    }

    fn reset(&mut self) {
        self.current = self.defaults;
    }

    fn apply_sgr(&mut self, codes: &[u16]) {
        if codes.is_empty() {
            self.reset();
            return;
        }

        let mut codes = codes.iter().copied();
        while let Some(code) = codes.next() {
            let style = &mut self.current;
            match code {
                0 => *style = self.defaults,
                1 => style.attrs.bold = true,
                3 => style.attrs.italic = true,
                4 => style.attrs.underline = true,
                22 => style.attrs.bold = false,
                23 => style.attrs.italic = false,
                24 => style.attrs.underline = false,
                30..=37 => {
                    let bright = if style.attrs.bold { 8 } else { 0 };
                    style.fg = self.palette.0[(code - 30) as usize + bright];
                }
                38 => {
                    if let Some(color) = extended_color(&mut codes, &self.palette) {
                        style.fg = color;
                    }
                }
                39 => style.fg = self.defaults.fg,
                40..=47 => style.bg = self.palette.0[(code - 40) as usize],
                48 => {
                    if let Some(color) = extended_color(&mut codes, &self.palette) {
                        style.bg = color;
                    }
                }
                49 => style.bg = self.defaults.bg,
                90..=97 => style.fg = self.palette.0[(code - 90) as usize + 8],
                100..=107 => style.bg = self.palette.0[(code - 100) as usize + 8],
                _ => {}
            }
        }
    }
}

/// Parse the tail of a `38`/`48` code: `5;n` or `2;r;g;b`.
///
/// Consumes the parameters belonging to the form even when they are out of
/// range, in which case no color is returned.
fn extended_color(codes: &mut impl Iterator<Item = u16>, palette: &Palette) -> Option<Color> {
    match codes.next()? {
        5 => {
            let index = codes.next()?;
            u8::try_from(index).ok().map(|i| palette.indexed(i))
        }
        2 => {
            let (r, g, b) = (codes.next()?, codes.next()?, codes.next()?);
            Some(Color::rgb(
                u8::try_from(r).ok()?,
                u8::try_from(g).ok()?,
                u8::try_from(b).ok()?,
            ))
        }
        _ => None,
    }
}

impl vte::Perform for StyleState {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.text.push(byte as char);
        }
    }

    fn csi_dispatch(
        &mut self,
        params: &vte::Params,
        intermediates: &[u8],
        ignore: bool,
        action: char,
    ) {
        if action != 'm' || ignore || !intermediates.is_empty() {
            return;
        }
        self.flush();
        // Colon sub-parameters are flattened so `38:5:n` reads like `38;5;n`.
        let codes: Vec<u16> = params.iter().flat_map(|p| p.iter().copied()).collect();
        self.apply_sgr(&codes);
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        if byte == b'c' && intermediates.is_empty() {
            self.flush();
            self.reset();
        }
    }
}
