// src/exec/scanner.rs

//! Incremental line reassembly over a raw byte stream.
//!
//! The child's output arrives in arbitrarily split chunks; the scanner keeps
//! the not-yet-terminated tail across pushes so that the sequence of emitted
//! lines is independent of how the bytes were chunked.

/// Carry-over buffer turning byte chunks into newline-terminated lines.
#[derive(Debug, Default)]
pub struct LineScanner {
    carry: Vec<u8>,
}

impl LineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line completed by it, in order.
    ///
    /// A line is the maximal run of bytes up to (and excluding) the next
    /// `\n`; a trailing `\r` is stripped. Bytes are decoded lossily, since
    /// the child writes in whatever console encoding it pleases.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.carry.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.carry.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.carry.drain(..=pos).collect();
            line.pop(); // the newline itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Flush trailing bytes that never saw a newline, if any.
    ///
    /// Called once after the stream ends so a final unterminated line is not
    /// lost.
    pub fn finish(&mut self) -> Option<String> {
        if self.carry.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.carry);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}
