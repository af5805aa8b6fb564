//! Line-bounded read position over a byte stream.
//!
//! The cursor holds the current line and one line of lookahead. Reads are always truncated
//! to what is left of the current line; the next line is only reached through
//! [`Cursor::advance_line`]. Column offset resets to 0 on every line.
//!
//! Three conditions are tracked separately:
//!
//! - **eof**: `advance_line` found no further line.
//! - **dead read**: the last read returned zero bytes (line exhausted).
//! - **end of stream**: a read came up short on the final line of the stream. Record
//!   decoding stops at this point; repeated and nested fields stop early on it.

use std::io::{self, BufRead};

#[derive(Debug)]
pub struct Cursor<R> {
    reader: R,
    line: Vec<u8>,
    lookahead: Option<Vec<u8>>,
    primed: bool,
    line_no: usize,
    column: usize,
    eof: bool,
    dead_read: bool,
    end_of_stream: bool,
}

impl<R: BufRead> Cursor<R> {
    pub fn new(reader: R) -> Self {
        Cursor {
            reader,
            line: Vec::new(),
            lookahead: None,
            primed: false,
            line_no: 0,
            column: 0,
            eof: false,
            dead_read: false,
            end_of_stream: false,
        }
    }

    /// Pull one raw line from the reader, without its `\n` / `\r\n` terminator.
    fn fetch(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    /// Load the next line and reset the column. Returns `false` (and sets eof) when the
    /// stream has no further line. Must be called before the first read of every record.
    pub fn advance_line(&mut self) -> io::Result<bool> {
        if !self.primed {
            self.lookahead = self.fetch()?;
            self.primed = true;
        }
        self.column = 0;
        self.end_of_stream = false;
        match self.lookahead.take() {
            Some(line) => {
                self.line = line;
                self.lookahead = self.fetch()?;
                self.line_no += 1;
                self.dead_read = false;
                tracing::debug!(line_no = self.line_no, len = self.line.len(), "cursor: line loaded");
                Ok(true)
            }
            None => {
                self.line.clear();
                self.eof = true;
                self.dead_read = true;
                self.end_of_stream = true;
                Ok(false)
            }
        }
    }

    /// Read up to `n` bytes from the current line. Never crosses into the next line and
    /// never fails: a short (or empty) slice means the line ran out.
    pub fn read(&mut self, n: usize) -> &[u8] {
        if self.eof {
            self.dead_read = true;
            return &[];
        }
        let start = self.column.min(self.line.len());
        let end = start.saturating_add(n).min(self.line.len());
        let got = end - start;
        self.column = end;
        self.dead_read = n > 0 && got == 0;
        if got < n && self.lookahead.is_none() {
            self.end_of_stream = true;
        }
        &self.line[start..end]
    }

    /// [`read`](Self::read) decoded as text. Invalid UTF-8 is replaced, not rejected.
    pub fn read_text(&mut self, n: usize) -> String {
        String::from_utf8_lossy(self.read(n)).into_owned()
    }

    /// Consume `n` filler bytes (inter-field spacing).
    pub fn skip(&mut self, n: usize) {
        let _ = self.read(n);
    }

    /// Current column offset (0-based) within the line.
    pub fn position(&self) -> usize {
        self.column
    }

    /// 1-based number of the current line; 0 before the first `advance_line`.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Bytes left on the current line.
    pub fn remaining(&self) -> usize {
        self.line.len().saturating_sub(self.column)
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn dead_read(&self) -> bool {
        self.dead_read
    }

    pub fn at_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /// True when the current line is the last one the stream will produce.
    pub fn is_last_line(&self) -> bool {
        self.primed && self.lookahead.is_none()
    }

    /// Release the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
