use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads `path` as a list of lines with trailing `\r`/`\n` bytes removed.
pub fn read_lines(path: &Path) -> io::Result<Vec<Vec<u8>>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    loop {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Replaces the contents of `path`, returning the number of bytes written.
pub fn write_all(path: &Path, bytes: &[u8]) -> io::Result<usize> {
    fs::write(path, bytes)?;
    Ok(bytes.len())
}
