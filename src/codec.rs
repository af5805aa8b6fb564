//! Decode byte streams into record sets and encode records back into fixed-width lines.
//!
//! Both directions are driven by the same [`Layout`], so a record decoded from a line
//! encodes back to that line as long as no lossy transformation (case folding,
//! translation, replacement) is configured.

use crate::cursor::Cursor;
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::field::encode_fields;
use crate::layout::{Layout, LayoutError};
use crate::record::{Record, RecordSet};
use crate::value::Lookup;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::iter::FusedIterator;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("Unknown layout: {0}")]
    UnknownLayout(String),
}

/// Drives a [`Cursor`] over a stream and decodes each line with one layout.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    layout: &'a Layout,
}

impl<'a> Decoder<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Decoder { layout }
    }

    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    /// Decode the whole stream into a record set.
    pub fn parse<R: BufRead>(&self, reader: R, source: Option<&str>) -> Result<RecordSet, CodecError> {
        let mut set = RecordSet::new(source.map(str::to_string));
        for record in self.records(reader, source) {
            set.push(record?);
        }
        tracing::info!(
            layout = self.layout.name(),
            source = source.unwrap_or("-"),
            records = set.len(),
            rejected = set.error_size(),
            errors = set.error_count(),
            "decoded stream"
        );
        Ok(set)
    }

    pub fn parse_str(&self, text: &str) -> Result<RecordSet, CodecError> {
        self.parse(text.as_bytes(), None)
    }

    /// Decode a file; its base name becomes the record set's source.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<RecordSet, CodecError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.parse(BufReader::new(file), Some(&source))
    }

    /// Decode one line of text (anything after the first line break is ignored).
    pub fn parse_line(&self, line: &str) -> Result<Record, CodecError> {
        let mut cursor = Cursor::new(line.as_bytes());
        cursor.advance_line()?;
        Ok(Record::decode(self.layout, &mut cursor, None))
    }

    /// Lazy, one-pass decode. The reader is dropped as soon as the stream ends or fails;
    /// re-reading requires a fresh call with a fresh reader.
    pub fn records<R: BufRead>(&self, reader: R, source: Option<&str>) -> Records<'a, R> {
        Records {
            layout: self.layout,
            cursor: Some(Cursor::new(reader)),
            source: source.map(str::to_string),
        }
    }
}

/// Iterator returned by [`Decoder::records`].
#[derive(Debug)]
pub struct Records<'a, R> {
    layout: &'a Layout,
    cursor: Option<Cursor<R>>,
    source: Option<String>,
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = Result<Record, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        match cursor.advance_line() {
            Ok(true) => {}
            Ok(false) => {
                self.cursor = None;
                return None;
            }
            Err(e) => {
                self.cursor = None;
                return Some(Err(e.into()));
            }
        }
        let record = Record::decode(self.layout, cursor, self.source.as_deref());
        if cursor.at_end_of_stream() && cursor.position() == 0 {
            // Blank trailing line: nothing was consumed, nothing to report.
            self.cursor = None;
            return None;
        }
        Some(Ok(record))
    }
}

impl<R: BufRead> FusedIterator for Records<'_, R> {}

/// A warning raised while encoding, tagged with the index of the input record.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeWarning {
    pub record: usize,
    pub diagnostic: Diagnostic,
}

impl fmt::Display for EncodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.record, self.diagnostic)
    }
}

/// Encoder output: the fixed-width text plus any warnings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoded {
    pub text: String,
    pub warnings: Vec<EncodeWarning>,
}

/// Encodes associative records into fixed-width lines with one layout.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    layout: &'a Layout,
}

impl<'a> Encoder<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Encoder { layout }
    }

    /// Encode a single record into one line (no terminator).
    pub fn encode_one<L: Lookup + ?Sized>(&self, record: &L, diag: &mut Diagnostics) -> String {
        let mut line = String::with_capacity(self.layout.width());
        encode_fields(self.layout.fields(), self.layout.spacing(), record, &mut line, diag);
        line
    }

    /// Encode records into lines joined by `\n`, with no terminator after the last line.
    pub fn encode<I, L>(&self, records: I) -> Encoded
    where
        I: IntoIterator<Item = L>,
        L: Lookup,
    {
        let mut out = Encoded::default();
        for (idx, record) in records.into_iter().enumerate() {
            if idx > 0 {
                out.text.push('\n');
            }
            let mut diag = Diagnostics::new();
            let line = self.encode_one(&record, &mut diag);
            out.text.push_str(&line);
            collect_warnings(idx, diag, &mut out.warnings);
        }
        out
    }

    /// Stream encoded lines to `writer`. Returns the encode warnings.
    pub fn encode_to<I, L, W>(&self, records: I, writer: &mut W) -> Result<Vec<EncodeWarning>, CodecError>
    where
        I: IntoIterator<Item = L>,
        L: Lookup,
        W: Write,
    {
        let mut warnings = Vec::new();
        for (idx, record) in records.into_iter().enumerate() {
            if idx > 0 {
                writer.write_all(b"\n")?;
            }
            let mut diag = Diagnostics::new();
            let line = self.encode_one(&record, &mut diag);
            writer.write_all(line.as_bytes())?;
            collect_warnings(idx, diag, &mut warnings);
        }
        writer.flush()?;
        Ok(warnings)
    }
}

fn collect_warnings(record: usize, diag: Diagnostics, out: &mut Vec<EncodeWarning>) {
    out.extend(
        diag.warnings
            .into_iter()
            .map(|diagnostic| EncodeWarning { record, diagnostic }),
    );
}
