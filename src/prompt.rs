use crate::editor::Editor;
use crate::keys::{self, ctrl, Key};
use crate::terminal::Terminal;
use std::io;

const ERASE: u8 = ctrl(b'h');

/// Receives the prompt input after every keystroke.
pub trait PromptObserver {
    fn on_input(&mut self, editor: &mut Editor, input: &str, key: Key);
}

/// Reads one line of input on the message bar. `template` is shown with its
/// first `{}` replaced by the current input.
///
/// Returns `None` when the user cancels with ESC.
pub fn prompt<T: Terminal>(
    editor: &mut Editor,
    term: &mut T,
    template: &str,
    mut observer: Option<&mut dyn PromptObserver>,
) -> io::Result<Option<String>> {
    let mut input = String::new();
    loop {
        editor.set_status(template.replacen("{}", &input, 1));
        editor.refresh(term)?;

        let key = keys::read_key(term)?;
        match key {
            Key::ESCAPE => {
                editor.set_status("");
                notify(&mut observer, editor, &input, key);
                return Ok(None);
            }
            Key::ENTER if !input.is_empty() => {
                editor.set_status("");
                notify(&mut observer, editor, &input, key);
                return Ok(Some(input));
            }
            Key::Backspace | Key::Delete | Key::Char(ERASE) => {
                input.pop();
            }
            Key::Char(byte) if byte.is_ascii() && !byte.is_ascii_control() => {
                input.push(char::from(byte));
            }
            _ => {}
        }
        notify(&mut observer, editor, &input, key);
    }
}

fn notify(
    observer: &mut Option<&mut dyn PromptObserver>,
    editor: &mut Editor,
    input: &str,
    key: Key,
) {
    if let Some(observer) = observer.as_deref_mut() {
        observer.on_input(editor, input, key);
    }
}
