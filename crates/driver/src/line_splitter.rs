// SPDX-License-Identifier: MIT

//! Splits a byte stream into LF-delimited lines, retaining a trailing partial
//! line across reads and discarding runaway unterminated lines (spec.md §4.6).

/// If an unterminated line's buffer grows past this without a newline,
/// everything read so far for that line is discarded.
pub const MAX_UNTERMINATED_BYTES: usize = 1024 * 1024;

#[derive(Default)]
pub struct LineSplitter {
    buf: Vec<u8>,
}

fn strip_trailing_cr(line: &[u8]) -> &[u8] {
    if line.last() == Some(&b'\r') {
        &line[..line.len() - 1]
    } else {
        line
    }
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of bytes, returning every complete line found (LF
    /// stripped, and a trailing CR stripped so CRLF output behaves the same
    /// as LF). Incomplete trailing data is retained for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let rest = self.buf.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.buf, rest);
            line.pop(); // trailing '\n'
            lines.push(String::from_utf8_lossy(strip_trailing_cr(&line)).into_owned());
        }
        if self.buf.len() > MAX_UNTERMINATED_BYTES {
            tracing::warn!(
                buffered_bytes = self.buf.len(),
                "unterminated line exceeded 1MiB, discarding"
            );
            self.buf.clear();
        }
        lines
    }

    /// Whatever partial line remains unflushed when the stream closes.
    /// Callers typically treat this as one final line if non-empty.
    pub fn flush_partial(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            None
        } else {
            let line = std::mem::take(&mut self.buf);
            Some(String::from_utf8_lossy(strip_trailing_cr(&line)).into_owned())
        }
    }
}

#[cfg(test)]
#[path = "line_splitter_tests.rs"]
mod tests;
