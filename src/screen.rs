//! Screen snapshots and the lock-guarded live screen shared between the PTY
//! reader thread and the script task.

use crate::color::Color;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Per-cell text attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Attributes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// One character position of a snapshot with resolved colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attributes,
}

impl ScreenCell {
    pub fn blank(fg: Color, bg: Color) -> Self {
        Self {
            ch: ' ',
            fg,
            bg,
            attrs: Attributes::default(),
        }
    }
}

/// An immutable, row-major `width x height` grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    width: usize,
    height: usize,
    cells: Vec<ScreenCell>,
}

impl ScreenBuffer {
    /// Build a buffer from row-major cells.
    ///
    /// Missing cells are padded with `fill` and extra cells are dropped, so
    /// the grid is always exactly `width x height`.
    pub fn from_cells(
        width: usize,
        height: usize,
        mut cells: Vec<ScreenCell>,
        fill: ScreenCell,
    ) -> Self {
        cells.resize(width * height, fill);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&ScreenCell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[ScreenCell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// The characters of the grid, one line per row, trailing blanks trimmed.
    pub fn text(&self) -> String {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.ch)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A source of screen content fed by raw PTY output.
///
/// Implemented by the full virtual terminal and by the lighter styled-text
/// fallback; the engine picks one per session.
pub trait ScreenSource: Send {
    /// Feed raw bytes from the program.
    fn write(&mut self, bytes: &[u8]);

    /// Flattened text used for pattern matching.
    fn rendered_text(&self) -> String;

    /// A point-in-time copy of the visible grid.
    fn snapshot(&self) -> ScreenBuffer;
}

/// Shared handle to the live screen of one session.
///
/// Every access takes the same lock, so a snapshot never observes a partially
/// applied write.
#[derive(Clone)]
pub struct SharedScreen {
    inner: Arc<Mutex<Box<dyn ScreenSource>>>,
}

impl SharedScreen {
    pub fn new(source: impl ScreenSource + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(source))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn ScreenSource>> {
        // A panicking writer leaves the model usable; keep serving reads.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self, bytes: &[u8]) {
        self.lock().write(bytes);
    }

    pub fn rendered_text(&self) -> String {
        self.lock().rendered_text()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.lock().rendered_text().contains(pattern)
    }

    pub fn snapshot(&self) -> ScreenBuffer {
        self.lock().snapshot()
    }
}
