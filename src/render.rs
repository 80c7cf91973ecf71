use crate::editor::Editor;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::time::Instant;

const FILLER: u8 = b'~';
const NO_NAME: &str = "[No Name]";
const MAX_NAME_LEN: usize = 20;

/// Builds one complete frame: text rows, status bar, message bar, then the
/// cursor. Scroll offsets are brought up to date first.
pub fn refresh_screen(editor: &mut Editor, now: Instant) -> io::Result<Vec<u8>> {
    editor.view.scroll(&editor.document);

    let mut out = Vec::new();
    queue!(out, Hide, MoveTo(0, 0))?;
    draw_rows(&mut out, editor)?;
    draw_status_bar(&mut out, editor)?;
    draw_message_bar(&mut out, editor, now)?;

    let view = &editor.view;
    let col = to_u16(view.rx.saturating_sub(view.coloff));
    let row = to_u16(view.cy.saturating_sub(view.rowoff));
    queue!(out, MoveTo(col, row), Show)?;
    Ok(out)
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn draw_rows(out: &mut Vec<u8>, editor: &Editor) -> io::Result<()> {
    let view = &editor.view;
    let doc = &editor.document;
    for y in 0..view.screenrows {
        match doc.line(y + view.rowoff) {
            Some(line) => {
                let render = line.render();
                let start = view.coloff.min(render.len());
                let end = (view.coloff + view.screencols).min(render.len());
                out.extend_from_slice(&render[start..end]);
            }
            None if doc.is_empty() && y == view.screenrows / 3 => {
                draw_welcome(out, view.screencols);
            }
            None => out.push(FILLER),
        }
        queue!(out, Clear(ClearType::UntilNewLine))?;
        out.extend_from_slice(b"\r\n");
    }
    Ok(())
}

fn draw_welcome(out: &mut Vec<u8>, cols: usize) {
    let banner = format!("Kilo editor -- version {}", env!("CARGO_PKG_VERSION"));
    let shown = &banner.as_bytes()[..banner.len().min(cols)];
    let mut padding = (cols - shown.len()) / 2;
    if padding > 0 {
        out.push(FILLER);
        padding -= 1;
    }
    out.resize(out.len() + padding, b' ');
    out.extend_from_slice(shown);
}

fn draw_status_bar(out: &mut Vec<u8>, editor: &Editor) -> io::Result<()> {
    let cols = editor.view.screencols;
    let lines = editor.document.len();

    let name = editor
        .filename
        .as_ref()
        .map_or_else(|| NO_NAME.into(), |p| p.to_string_lossy());
    let name = &name.as_bytes()[..name.len().min(MAX_NAME_LEN)];
    let mut left = name.to_vec();
    left.extend_from_slice(format!(" - {lines} lines").as_bytes());
    if editor.document.is_dirty() {
        left.extend_from_slice(b" (modified)");
    }
    let right = format!("{}/{}", editor.view.cy + 1, lines);

    queue!(out, SetAttribute(Attribute::Reverse))?;
    let mut len = left.len().min(cols);
    out.extend_from_slice(&left[..len]);
    while len < cols {
        if cols - len == right.len() {
            out.extend_from_slice(right.as_bytes());
            break;
        }
        out.push(b' ');
        len += 1;
    }
    queue!(out, SetAttribute(Attribute::Reset))?;
    out.extend_from_slice(b"\r\n");
    Ok(())
}

fn draw_message_bar(out: &mut Vec<u8>, editor: &Editor, now: Instant) -> io::Result<()> {
    queue!(out, Clear(ClearType::UntilNewLine))?;
    if let Some(text) = editor.status.visible(now, &editor.config) {
        let text = text.as_bytes();
        out.extend_from_slice(&text[..text.len().min(editor.view.screencols)]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::{Document, TAB_STOP};
    use std::path::PathBuf;
    use std::time::Duration;

    fn editor_with(lines: &[&str]) -> Editor {
        let mut ed = Editor::new(Config::default(), 10, 40);
        ed.document =
            Document::from_lines(lines.iter().map(|l| l.as_bytes().to_vec()), TAB_STOP);
        ed
    }

    fn frame(ed: &mut Editor) -> String {
        let bytes = refresh_screen(ed, Instant::now()).expect("frame");
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Text between the reverse-video markers.
    fn status_bar(frame: &str) -> &str {
        let start = frame.find("\x1b[7m").expect("status start") + 4;
        let end = frame.find("\x1b[0m").expect("status end");
        &frame[start..end]
    }

    fn rows(frame: &str) -> Vec<&str> {
        let body = frame.strip_prefix("\x1b[?25l\x1b[1;1H").expect("frame prefix");
        body.split("\x1b[K\r\n").collect()
    }

    #[test]
    fn empty_document_shows_centered_banner() {
        let mut ed = editor_with(&[]);
        let f = frame(&mut ed);
        let rows = rows(&f);
        let banner = format!("Kilo editor -- version {}", env!("CARGO_PKG_VERSION"));
        // 8 text rows; the banner sits on row 2.
        let pad = (40 - banner.len()) / 2;
        assert_eq!(rows[2], format!("~{}{banner}", " ".repeat(pad - 1)));
        assert_eq!(rows[0], "~");
        assert_eq!(rows[7], "~");
    }

    #[test]
    fn banner_is_clipped_on_narrow_screen() {
        let mut ed = Editor::new(Config::default(), 10, 10);
        let f = frame(&mut ed);
        assert_eq!(rows(&f)[2], "Kilo edito");
    }

    #[test]
    fn rows_past_end_show_filler() {
        let mut ed = editor_with(&["one", "two"]);
        let f = frame(&mut ed);
        let rows = rows(&f);
        assert_eq!(&rows[..4], &["one", "two", "~", "~"]);
        assert!(!f.contains("Kilo editor"));
    }

    #[test]
    fn tabs_are_drawn_expanded() {
        let mut ed = editor_with(&["a\tb"]);
        let f = frame(&mut ed);
        assert_eq!(rows(&f)[0], "a       b");
    }

    #[test]
    fn status_bar_fills_width_with_position_on_right() {
        let mut ed = editor_with(&["a", "b"]);
        ed.filename = Some(PathBuf::from("notes.txt"));
        let f = frame(&mut ed);
        let bar = status_bar(&f);
        assert_eq!(bar.len(), 40);
        assert!(bar.starts_with("notes.txt - 2 lines "));
        assert!(bar.ends_with(" 1/2"));
    }

    #[test]
    fn status_bar_marks_unnamed_and_modified() {
        let mut ed = editor_with(&["a"]);
        ed.document.insert_char(0, 0, b'x');
        let f = frame(&mut ed);
        assert!(status_bar(&f).starts_with("[No Name] - 1 lines (modified)"));
    }

    #[test]
    fn long_filename_is_cut_to_twenty_bytes() {
        let mut ed = editor_with(&[]);
        ed.filename = Some(PathBuf::from("abcdefghijklmnopqrstuvwxyz.txt"));
        let f = frame(&mut ed);
        assert!(status_bar(&f).starts_with("abcdefghijklmnopqrst - 0 lines"));
    }

    #[test]
    fn status_bar_is_clipped_without_position_when_too_narrow() {
        let mut ed = Editor::new(Config::default(), 10, 12);
        ed.filename = Some(PathBuf::from("notes.txt"));
        let f = frame(&mut ed);
        assert_eq!(status_bar(&f), "notes.txt - ");
    }

    #[test]
    fn message_shown_until_it_expires() {
        let mut ed = editor_with(&["a"]);
        ed.set_status("hello there");
        let fresh = refresh_screen(&mut ed, Instant::now()).expect("frame");
        assert!(String::from_utf8_lossy(&fresh).contains("\x1b[Khello there"));

        let later = Instant::now() + Duration::from_secs(6);
        let stale = refresh_screen(&mut ed, later).expect("frame");
        assert!(!String::from_utf8_lossy(&stale).contains("hello there"));
    }

    #[test]
    fn message_is_clipped_to_width() {
        let mut ed = Editor::new(Config::default(), 10, 5);
        ed.set_status("abcdefgh");
        let f = frame(&mut ed);
        assert!(f.contains("\x1b[Kabcde\x1b["));
        assert!(!f.contains("abcdef"));
    }

    #[test]
    fn long_line_is_clipped_to_visible_columns() {
        let line = format!("{}END", "x".repeat(50));
        let mut ed = editor_with(&[line.as_str()]);
        ed.view.cx = 52;
        let f = frame(&mut ed);
        assert_eq!(ed.view.coloff, 13);
        assert_eq!(rows(&f)[0], &line[13..53]);
        assert!(f.ends_with("\x1b[1;40H\x1b[?25h"));
    }

    #[test]
    fn cursor_is_placed_relative_to_viewport() {
        let lines: Vec<String> = (0..30).map(|i| format!("\tline {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut ed = editor_with(&refs);
        ed.view.cy = 20;
        ed.view.cx = 1;
        let f = frame(&mut ed);
        assert_eq!(ed.view.rowoff, 13);
        assert!(f.starts_with("\x1b[?25l\x1b[1;1H"));
        assert!(f.ends_with("\x1b[8;9H\x1b[?25h"));
        assert_eq!(rows(&f)[0], "        line 13");
    }
}
