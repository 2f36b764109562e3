//! Fallback screen model: styled text laid out line by line.
//!
//! No cursor addressing is interpreted; text flows top to bottom, wraps at the
//! terminal width and the last `rows` lines form the visible screen. Suitable
//! for programs that print linear output.

use crate::color::ColorScheme;
use crate::screen::{ScreenBuffer, ScreenCell, ScreenSource};
use crate::style::StyleParser;
use std::collections::VecDeque;

const TAB_WIDTH: usize = 4;
const MAX_LINES: usize = 1000;

pub struct StyledTextScreen {
    parser: StyleParser,
    cols: usize,
    rows: usize,
    lines: VecDeque<Vec<ScreenCell>>,
    col: usize,
    blank: ScreenCell,
}

impl StyledTextScreen {
    pub fn new(cols: u16, rows: u16, scheme: ColorScheme) -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(Vec::new());
        Self {
            parser: StyleParser::new(scheme),
            cols: cols.max(1) as usize,
            rows: rows as usize,
            lines,
            col: 0,
            blank: ScreenCell::blank(scheme.foreground, scheme.background),
        }
    }

    fn new_line(&mut self) {
        self.lines.push_back(Vec::new());
        if self.lines.len() > MAX_LINES {
            self.lines.pop_front();
        }
        self.col = 0;
    }

    fn put(&mut self, cell: ScreenCell) {
        if self.col >= self.cols {
            self.new_line();
        }
        let col = self.col;
        let blank = self.blank;
        if let Some(line) = self.lines.back_mut() {
            if col < line.len() {
                line[col] = cell;
            } else {
                line.resize(col, blank);
                line.push(cell);
            }
        }
        self.col += 1;
    }
}

impl ScreenSource for StyledTextScreen {
    fn write(&mut self, bytes: &[u8]) {
        for segment in self.parser.parse(bytes) {
            let template = ScreenCell {
                ch: ' ',
                fg: segment.style.fg,
                bg: segment.style.bg,
                attrs: segment.style.attrs,
            };
            for ch in segment.text.chars() {
                match ch {
                    '\n' => self.new_line(),
                    '\r' => self.col = 0,
                    '\t' => {
                        for _ in 0..TAB_WIDTH {
                            self.put(template);
                        }
                    }
                    ch => self.put(ScreenCell { ch, ..template }),
                }
            }
        }
    }

    fn rendered_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|cell| cell.ch)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn snapshot(&self) -> ScreenBuffer {
        let skip = self.lines.len().saturating_sub(self.rows);
        let mut cells = Vec::with_capacity(self.cols * self.rows);
        for line in self.lines.iter().skip(skip) {
            let mut row = line.clone();
            row.resize(self.cols, self.blank);
            cells.extend(row);
        }
        ScreenBuffer::from_cells(self.cols, self.rows, cells, self.blank)
    }
}
