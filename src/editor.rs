use crate::config::Config;
use crate::document::Document;
use crate::file;
use crate::keys::{self, ctrl, Key};
use crate::prompt::prompt;
use crate::render;
use crate::search::Search;
use crate::terminal::{self, StdTerminal, Terminal, TerminalGuard};
use crate::view::{Direction, View};
use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

const QUIT_KEY: u8 = ctrl(b'q');
const SAVE_KEY: u8 = ctrl(b's');
const FIND_KEY: u8 = ctrl(b'f');
const REFRESH_KEY: u8 = ctrl(b'l');
const ERASE_KEY: u8 = ctrl(b'h');

pub const HELP: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

pub fn run(path: Option<PathBuf>, config: Config) -> Result<()> {
    let guard = TerminalGuard::acquire()?;
    let result = run_session(path, config);
    let _ = terminal::clear_screen(&mut io::stdout());
    drop(guard);
    result
}

fn run_session(path: Option<PathBuf>, config: Config) -> Result<()> {
    let (rows, cols) = terminal::window_size()?;
    let mut term = StdTerminal::new(config.escape_timeout())?;
    let mut editor = Editor::new(config, rows, cols);
    if let Some(path) = path {
        editor.open(&path)?;
    }
    editor.set_status(HELP);

    loop {
        editor.refresh(&mut term)?;
        if editor.process_keypress(&mut term)? == Action::Quit {
            info!("quit");
            return Ok(());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    fn new(text: String) -> Self {
        Self {
            text,
            set_at: Instant::now(),
        }
    }

    pub fn visible(&self, now: Instant, config: &Config) -> Option<&str> {
        if self.text.is_empty() || now.duration_since(self.set_at) >= config.message_timeout() {
            return None;
        }
        Some(&self.text)
    }
}

pub struct Editor {
    pub document: Document,
    pub view: View,
    pub filename: Option<PathBuf>,
    pub status: StatusMessage,
    pub config: Config,
    quit_times: usize,
}

impl Editor {
    /// `rows` and `cols` are the full window size; two rows go to the status
    /// and message bars.
    pub fn new(config: Config, rows: u16, cols: u16) -> Self {
        Self {
            document: Document::new(config.tab_stop),
            view: View::new(usize::from(rows).saturating_sub(2), usize::from(cols)),
            filename: None,
            status: StatusMessage::new(String::new()),
            quit_times: config.quit_times,
            config,
        }
    }

    pub fn open(&mut self, path: &Path) -> Result<()> {
        let lines = file::read_lines(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        self.document = Document::from_lines(lines, self.config.tab_stop);
        self.filename = Some(path.to_path_buf());
        info!(path = %path.display(), lines = self.document.len(), "opened file");
        Ok(())
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = StatusMessage::new(text.into());
    }

    pub fn refresh<T: Terminal>(&mut self, term: &mut T) -> io::Result<()> {
        let frame = render::refresh_screen(self, Instant::now())?;
        term.write_frame(&frame)
    }

    pub fn process_keypress<T: Terminal>(&mut self, term: &mut T) -> io::Result<Action> {
        let key = keys::read_key(term)?;
        match key {
            Key::ENTER => self.insert_newline(),
            Key::Char(QUIT_KEY) => {
                if self.document.is_dirty() && self.quit_times > 0 {
                    self.set_status(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Ok(Action::Continue);
                }
                return Ok(Action::Quit);
            }
            Key::Char(SAVE_KEY) => self.save(term)?,
            Key::Home => self.view.move_to_line_start(),
            Key::End => self.view.move_to_line_end(&self.document),
            Key::Backspace | Key::Delete | Key::Char(ERASE_KEY) => {
                if key == Key::Delete {
                    self.view.move_cursor(Direction::Right, &self.document);
                }
                self.delete_char();
            }
            Key::PageUp => self.page(Direction::Up),
            Key::PageDown => self.page(Direction::Down),
            Key::ArrowUp => self.view.move_cursor(Direction::Up, &self.document),
            Key::ArrowDown => self.view.move_cursor(Direction::Down, &self.document),
            Key::ArrowLeft => self.view.move_cursor(Direction::Left, &self.document),
            Key::ArrowRight => self.view.move_cursor(Direction::Right, &self.document),
            Key::Char(FIND_KEY) => self.find(term)?,
            Key::Char(REFRESH_KEY) | Key::ESCAPE => {}
            Key::Char(byte) => self.insert_char(byte),
        }
        self.quit_times = self.config.quit_times;
        Ok(Action::Continue)
    }

    fn insert_char(&mut self, byte: u8) {
        if self.view.cy == self.document.len() {
            self.document.insert_line(self.document.len(), Vec::new());
        }
        self.document.insert_char(self.view.cy, self.view.cx, byte);
        self.view.cx += 1;
    }

    fn insert_newline(&mut self) {
        if self.view.cx == 0 {
            self.document.insert_line(self.view.cy, Vec::new());
        } else {
            self.document.split_line(self.view.cy, self.view.cx);
        }
        self.view.cy += 1;
        self.view.cx = 0;
    }

    fn delete_char(&mut self) {
        let (cx, cy) = (self.view.cx, self.view.cy);
        if cy == self.document.len() || (cx == 0 && cy == 0) {
            return;
        }
        if cx > 0 {
            self.document.delete_char(cy, cx - 1);
            self.view.cx -= 1;
        } else {
            self.view.cx = self.document.line_len(cy - 1);
            if let Some(line) = self.document.delete_line(cy) {
                self.document.append_content(cy - 1, line.chars());
            }
            self.view.cy -= 1;
        }
    }

    fn page(&mut self, direction: Direction) {
        let rows = self.view.screenrows;
        self.view.cy = match direction {
            Direction::Up => self.view.rowoff,
            _ => (self.view.rowoff + rows)
                .saturating_sub(1)
                .min(self.document.len()),
        };
        self.view.clamp_cx(&self.document);
        for _ in 0..rows {
            self.view.move_cursor(direction, &self.document);
        }
    }

    fn save<T: Terminal>(&mut self, term: &mut T) -> io::Result<()> {
        if self.filename.is_none() {
            match prompt(self, term, "Save as: {} (ESC to cancel)", None)? {
                Some(name) => self.filename = Some(PathBuf::from(name)),
                None => {
                    self.set_status("Save aborted");
                    return Ok(());
                }
            }
        }
        let Some(path) = self.filename.clone() else {
            return Ok(());
        };

        let bytes = self.document.serialize();
        match file::write_all(&path, &bytes) {
            Ok(written) => {
                self.document.mark_clean();
                info!(path = %path.display(), bytes = written, "saved");
                self.set_status(format!("{written} bytes written to disk"));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "save failed");
                self.set_status(format!("Can't save! I/O error: {err}"));
            }
        }
        Ok(())
    }

    fn find<T: Terminal>(&mut self, term: &mut T) -> io::Result<()> {
        let saved = self.view.position();
        let mut search = Search::new();
        debug!("search started");
        let query = prompt(
            self,
            term,
            "Search: {} (Use ESC/Arrows/Enter)",
            Some(&mut search),
        )?;
        match query {
            None => {
                self.view.restore(saved);
                debug!("search cancelled");
            }
            Some(query) if !search.found() => {
                self.set_status(format!("Not found: {query}"));
            }
            Some(_) => {}
        }
        Ok(())
    }
}
