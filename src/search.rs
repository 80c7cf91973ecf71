use crate::document::Document;
use crate::editor::Editor;
use crate::keys::Key;
use crate::prompt::PromptObserver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub line: usize,
    /// Byte offset of the match within the line's rendered text.
    pub rx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scan {
    pub hit: Option<Hit>,
    pub probes: usize,
}

/// State for one incremental search session.
#[derive(Debug)]
pub struct Search {
    last_match: Option<usize>,
    direction: SearchDirection,
    found: bool,
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl Search {
    pub fn new() -> Self {
        Self {
            last_match: None,
            direction: SearchDirection::Forward,
            found: false,
        }
    }

    /// Whether the most recent scan located the query.
    pub fn found(&self) -> bool {
        self.found
    }

    fn reset(&mut self) {
        self.last_match = None;
        self.direction = SearchDirection::Forward;
    }

    /// Looks for `query` in rendered text, visiting each line at most once.
    ///
    /// A fresh session starts on `from` (the cursor line); a running one
    /// starts one step past the previous match in the current direction.
    pub fn scan(&self, doc: &Document, query: &[u8], from: usize) -> Scan {
        let len = doc.len();
        if len == 0 || query.is_empty() {
            return Scan {
                hit: None,
                probes: 0,
            };
        }
        let mut current = match self.last_match {
            Some(last) => self.step(last, len),
            None if from < len => from,
            None => 0,
        };
        for probe in 1..=len {
            if let Some(rx) = doc
                .line(current)
                .and_then(|line| find_bytes(line.render(), query))
            {
                return Scan {
                    hit: Some(Hit { line: current, rx }),
                    probes: probe,
                };
            }
            current = self.step(current, len);
        }
        Scan {
            hit: None,
            probes: len,
        }
    }

    fn step(&self, line: usize, len: usize) -> usize {
        match self.direction {
            SearchDirection::Forward if line + 1 >= len => 0,
            SearchDirection::Forward => line + 1,
            SearchDirection::Backward if line == 0 => len - 1,
            SearchDirection::Backward => line - 1,
        }
    }
}

impl PromptObserver for Search {
    fn on_input(&mut self, editor: &mut Editor, input: &str, key: Key) {
        match key {
            Key::ENTER | Key::ESCAPE => {
                self.reset();
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.direction = SearchDirection::Forward,
            Key::ArrowLeft | Key::ArrowUp => self.direction = SearchDirection::Backward,
            _ => self.reset(),
        }
        if self.last_match.is_none() {
            self.direction = SearchDirection::Forward;
        }

        let scan = self.scan(&editor.document, input.as_bytes(), editor.view.cy);
        self.found = scan.hit.is_some();
        if let Some(hit) = scan.hit {
            self.last_match = Some(hit.line);
            editor.view.cy = hit.line;
            editor.view.cx = editor.document.rendered_to_raw(hit.line, hit.rx);
            editor.view.rowoff = editor.document.len();
        }
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
