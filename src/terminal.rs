use crate::keys::ByteSource;
use anyhow::{bail, Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::fs::File;
use std::io::{self, Read, Stdout, Write};
use std::os::fd::AsFd;
use std::time::Duration;

/// Byte input plus a sink for whole frames.
pub trait Terminal: ByteSource {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// Keeps the terminal in raw mode for as long as it lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn acquire() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Returns `(rows, cols)`.
pub fn window_size() -> Result<(u16, u16)> {
    let (cols, rows) = terminal::size().context("Failed to query window size")?;
    if cols == 0 || rows == 0 {
        bail!("Terminal reported an empty window ({cols}x{rows})");
    }
    Ok((rows, cols))
}

pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}

/// The process's own terminal. Input is read unbuffered from a duplicate of
/// the stdin descriptor so `poll` sees every pending byte.
pub struct StdTerminal {
    input: File,
    output: Stdout,
    escape_timeout: Duration,
}

impl StdTerminal {
    pub fn new(escape_timeout: Duration) -> Result<Self> {
        let fd = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .context("Failed to duplicate stdin")?;
        Ok(Self {
            input: File::from(fd),
            output: io::stdout(),
            escape_timeout,
        })
    }

    fn wait_readable(&self) -> io::Result<bool> {
        let millis = u16::try_from(self.escape_timeout.as_millis()).unwrap_or(u16::MAX);
        let mut fds = [PollFd::new(self.input.as_fd(), PollFlags::POLLIN)];
        loop {
            match poll(&mut fds, PollTimeout::from(millis)) {
                Ok(ready) => return Ok(ready > 0),
                Err(Errno::EINTR) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl ByteSource for StdTerminal {
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(1) => return Ok(buf[0]),
                Ok(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "terminal input closed",
                    ))
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    fn read_pending(&mut self) -> io::Result<Option<u8>> {
        if !self.wait_readable()? {
            return Ok(None);
        }
        self.read_byte().map(Some)
    }
}

impl Terminal for StdTerminal {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        let mut out = self.output.lock();
        out.write_all(frame)?;
        out.flush()
    }
}
