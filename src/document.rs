pub const TAB_STOP: usize = 8;

/// One line of text: the stored bytes plus their on-screen form with tabs
/// expanded. `render` is rebuilt from `chars` after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Line {
    fn new(chars: Vec<u8>, tab_stop: usize) -> Self {
        let render = render_tabs(&chars, tab_stop);
        Self { chars, render }
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        let mut rx = 0;
        for &byte in self.chars.iter().take(cx) {
            if byte == b'\t' {
                rx += (tab_stop - 1) - (rx % tab_stop);
            }
            rx += 1;
        }
        rx
    }

    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &byte) in self.chars.iter().enumerate() {
            if byte == b'\t' {
                cur_rx += (tab_stop - 1) - (cur_rx % tab_stop);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    fn update(&mut self, tab_stop: usize) {
        self.render = render_tabs(&self.chars, tab_stop);
    }
}

pub fn render_tabs(chars: &[u8], tab_stop: usize) -> Vec<u8> {
    let tabs = chars.iter().filter(|&&b| b == b'\t').count();
    let mut render = Vec::with_capacity(chars.len() + tabs * (tab_stop - 1));
    for &byte in chars {
        if byte == b'\t' {
            render.push(b' ');
            while render.len() % tab_stop != 0 {
                render.push(b' ');
            }
        } else {
            render.push(byte);
        }
    }
    render
}

/// The edited text as an ordered list of lines.
///
/// Every mutating operation bumps `dirty`; indices outside the valid range are
/// clamped or ignored rather than reported.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<Line>,
    dirty: usize,
    tab_stop: usize,
}

impl Document {
    pub fn new(tab_stop: usize) -> Self {
        Self {
            lines: Vec::new(),
            dirty: 0,
            tab_stop: tab_stop.max(1),
        }
    }

    /// Builds a clean document from already-split lines.
    pub fn from_lines<I>(lines: I, tab_stop: usize) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let tab_stop = tab_stop.max(1);
        Self {
            lines: lines
                .into_iter()
                .map(|chars| Line::new(chars, tab_stop))
                .collect(),
            dirty: 0,
            tab_stop,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, at: usize) -> Option<&Line> {
        self.lines.get(at)
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_len(&self, at: usize) -> usize {
        self.lines.get(at).map_or(0, Line::len)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    pub fn insert_line(&mut self, at: usize, content: Vec<u8>) {
        let at = at.min(self.lines.len());
        self.lines.insert(at, Line::new(content, self.tab_stop));
        self.dirty += 1;
    }

    pub fn delete_line(&mut self, at: usize) -> Option<Line> {
        if at >= self.lines.len() {
            return None;
        }
        self.dirty += 1;
        Some(self.lines.remove(at))
    }

    pub fn insert_char(&mut self, at: usize, col: usize, ch: u8) {
        let tab_stop = self.tab_stop;
        let Some(line) = self.lines.get_mut(at) else {
            return;
        };
        let col = col.min(line.chars.len());
        line.chars.insert(col, ch);
        line.update(tab_stop);
        self.dirty += 1;
    }

    pub fn delete_char(&mut self, at: usize, col: usize) {
        let tab_stop = self.tab_stop;
        let Some(line) = self.lines.get_mut(at) else {
            return;
        };
        if col >= line.chars.len() {
            return;
        }
        line.chars.remove(col);
        line.update(tab_stop);
        self.dirty += 1;
    }

    pub fn append_content(&mut self, at: usize, bytes: &[u8]) {
        let tab_stop = self.tab_stop;
        let Some(line) = self.lines.get_mut(at) else {
            return;
        };
        line.chars.extend_from_slice(bytes);
        line.update(tab_stop);
        self.dirty += 1;
    }

    /// Cuts line `at` at `col`, moving the tail into a new line below it.
    pub fn split_line(&mut self, at: usize, col: usize) {
        let tab_stop = self.tab_stop;
        let Some(line) = self.lines.get_mut(at) else {
            return;
        };
        let col = col.min(line.chars.len());
        let tail = line.chars.split_off(col);
        line.update(tab_stop);
        self.insert_line(at + 1, tail);
    }

    pub fn serialize(&self) -> Vec<u8> {
        let total = self.lines.iter().map(|line| line.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for line in &self.lines {
            out.extend_from_slice(&line.chars);
            out.push(b'\n');
        }
        out
    }

    pub fn raw_to_rendered(&self, at: usize, cx: usize) -> usize {
        self.lines
            .get(at)
            .map_or(0, |line| line.cx_to_rx(cx, self.tab_stop))
    }

    pub fn rendered_to_raw(&self, at: usize, rx: usize) -> usize {
        self.lines
            .get(at)
            .map_or(0, |line| line.rx_to_cx(rx, self.tab_stop))
    }
}
