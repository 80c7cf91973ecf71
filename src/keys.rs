use std::io;
use tracing::trace;

pub const ESC: u8 = 0x1b;
pub const ENTER: u8 = b'\r';
const DEL: u8 = 0x7f;

/// Longest CSI parameter run consumed before giving up on a sequence.
const MAX_CSI_PARAMS: usize = 16;

pub const fn ctrl(key: u8) -> u8 {
    key & 0x1f
}

/// One logical keypress, independent of the byte sequence that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(u8),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
}

impl Key {
    pub const ESCAPE: Key = Key::Char(ESC);
    pub const ENTER: Key = Key::Char(ENTER);
}

pub trait ByteSource {
    /// Blocks until a byte arrives.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Waits briefly for the next byte of an escape sequence. `None` means
    /// nothing arrived in time.
    fn read_pending(&mut self) -> io::Result<Option<u8>>;
}

pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Key> {
    match source.read_byte()? {
        ESC => read_escape(source),
        DEL => Ok(Key::Backspace),
        byte => Ok(Key::Char(byte)),
    }
}

fn read_escape<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Key> {
    let Some(intro) = source.read_pending()? else {
        return Ok(Key::ESCAPE);
    };
    match intro {
        b'[' => read_csi(source),
        b'O' => {
            let Some(byte) = source.read_pending()? else {
                return Ok(Key::ESCAPE);
            };
            Ok(match byte {
                b'H' => Key::Home,
                b'F' => Key::End,
                other => unrecognized(&[b'O', other]),
            })
        }
        other => Ok(unrecognized(&[other])),
    }
}

fn read_csi<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Key> {
    let Some(byte) = source.read_pending()? else {
        return Ok(Key::ESCAPE);
    };
    Ok(match byte {
        b'A' => Key::ArrowUp,
        b'B' => Key::ArrowDown,
        b'C' => Key::ArrowRight,
        b'D' => Key::ArrowLeft,
        b'H' => Key::Home,
        b'F' => Key::End,
        0x30..=0x3f => return read_csi_params(source, byte),
        other => unrecognized(&[b'[', other]),
    })
}

// Consumes the rest of a parameterized CSI sequence so none of its bytes
// reach the next call. Only the single-digit `ESC [ n ~` forms map to keys.
fn read_csi_params<S: ByteSource + ?Sized>(source: &mut S, first: u8) -> io::Result<Key> {
    let mut params = 1usize;
    let last = loop {
        let Some(byte) = source.read_pending()? else {
            return Ok(Key::ESCAPE);
        };
        if (0x40..=0x7e).contains(&byte) {
            break byte;
        }
        params += 1;
        if params > MAX_CSI_PARAMS {
            return Ok(unrecognized(&[b'[', first]));
        }
    };
    if last != b'~' || params != 1 {
        return Ok(unrecognized(&[b'[', first, last]));
    }
    Ok(match first {
        b'1' | b'7' => Key::Home,
        b'3' => Key::Delete,
        b'4' | b'8' => Key::End,
        b'5' => Key::PageUp,
        b'6' => Key::PageDown,
        _ => unrecognized(&[b'[', first, last]),
    })
}

fn unrecognized(seq: &[u8]) -> Key {
    trace!(?seq, "unrecognized escape sequence");
    Key::ESCAPE
}
