use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Cursor position plus the visible window onto the document.
///
/// `cx`/`cy` address raw bytes; `rx` is the on-screen column of `cx` and is
/// only refreshed by [`View::scroll`]. `cy` may equal the line count, which
/// places the cursor on the virtual line past the end of the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub cx: usize,
    pub cy: usize,
    pub rx: usize,
    pub rowoff: usize,
    pub coloff: usize,
    pub screenrows: usize,
    pub screencols: usize,
}

/// The parts of a [`View`] a cancelled search puts back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    cx: usize,
    cy: usize,
    rowoff: usize,
    coloff: usize,
}

impl View {
    pub fn new(screenrows: usize, screencols: usize) -> Self {
        Self {
            screenrows,
            screencols,
            ..Self::default()
        }
    }

    pub fn move_cursor(&mut self, direction: Direction, doc: &Document) {
        match direction {
            Direction::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = doc.line_len(self.cy);
                }
            }
            Direction::Right => {
                if let Some(line) = doc.line(self.cy) {
                    if self.cx < line.len() {
                        self.cx += 1;
                    } else if self.cx == line.len() {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            Direction::Up => {
                self.cy = self.cy.saturating_sub(1);
            }
            Direction::Down => {
                if self.cy < doc.len() {
                    self.cy += 1;
                }
            }
        }
        self.clamp_cx(doc);
    }

    pub fn clamp_cx(&mut self, doc: &Document) {
        self.cx = self.cx.min(doc.line_len(self.cy));
    }

    pub fn move_to_line_start(&mut self) {
        self.cx = 0;
    }

    pub fn move_to_line_end(&mut self, doc: &Document) {
        if self.cy < doc.len() {
            self.cx = doc.line_len(self.cy);
        }
    }

    /// Pulls the offsets just far enough to keep the cursor on screen.
    pub fn scroll(&mut self, doc: &Document) {
        self.rx = if self.cy < doc.len() {
            doc.raw_to_rendered(self.cy, self.cx)
        } else {
            0
        };

        if self.cy < self.rowoff {
            self.rowoff = self.cy;
        }
        if self.cy >= self.rowoff + self.screenrows {
            self.rowoff = (self.cy + 1).saturating_sub(self.screenrows);
        }
        if self.rx < self.coloff {
            self.coloff = self.rx;
        }
        if self.rx >= self.coloff + self.screencols {
            self.coloff = (self.rx + 1).saturating_sub(self.screencols);
        }
    }

    pub fn position(&self) -> Position {
        Position {
            cx: self.cx,
            cy: self.cy,
            rowoff: self.rowoff,
            coloff: self.coloff,
        }
    }

    pub fn restore(&mut self, pos: Position) {
        self.cx = pos.cx;
        self.cy = pos.cy;
        self.rowoff = pos.rowoff;
        self.coloff = pos.coloff;
    }
}
