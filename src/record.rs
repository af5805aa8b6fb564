//! Decoded records and record sets.

use crate::cursor::Cursor;
use crate::diagnostic::{format_list, Diagnostic, Diagnostics};
use crate::field::decode_fields;
use crate::layout::Layout;
use crate::value::{Fields, Lookup, Value};
use std::io::BufRead;

/// One decoded line: field values in declaration order plus that line's diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub values: Fields,
    pub line_no: usize,
    pub source: Option<String>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Record {
    /// Decode the cursor's current line against `layout`.
    pub fn decode<R: BufRead>(layout: &Layout, cursor: &mut Cursor<R>, source: Option<&str>) -> Record {
        let mut values = Fields::new();
        let mut diag = Diagnostics::new();
        decode_fields(layout.fields(), layout.spacing(), cursor, &mut values, &mut diag);
        Record {
            values,
            line_no: cursor.line_no(),
            source: source.map(str::to_string),
            errors: diag.errors,
            warnings: diag.warnings,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// `name: value` lines, names padded to a common width.
    pub fn format(&self) -> String {
        let pad = self.values.keys().map(str::len).max().unwrap_or(0);
        self.values
            .iter()
            .map(|(k, v)| format!("{:<pad$}: {}", k, render(v), pad = pad))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Line header, one error per line, and a `-----` trailer.
    pub fn format_errors(&self) -> String {
        let header = match &self.source {
            Some(src) => format!("line: {:05} ({})", self.line_no, src),
            None => format!("line: {:05}", self.line_no),
        };
        format!("{}\n{}\n-----\n", header, format_list(&self.errors, "\n"))
    }

    pub fn format_warnings(&self) -> String {
        format_list(&self.warnings, "\n")
    }
}

impl Lookup for Record {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

fn render(v: &Value) -> String {
    match v {
        Value::Null => "-".to_string(),
        Value::Str(s) => format!("{:?}", s),
        Value::Group(subs) => {
            let parts: Vec<String> = subs
                .iter()
                .map(|sub| {
                    let inner: Vec<String> = sub.iter().map(|(k, v)| format!("{}={}", k, render(v))).collect();
                    format!("{{{}}}", inner.join(", "))
                })
                .collect();
            format!("[{}]", parts.join(", "))
        }
        other => other.to_string(),
    }
}

/// Every record decoded from one stream, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub source: Option<String>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(source: Option<String>) -> Self {
        RecordSet {
            source,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records without errors, in order.
    pub fn accepted(&self) -> RecordSet {
        self.filtered(|r| !r.has_errors())
    }

    /// Records with at least one error, in order.
    pub fn rejected(&self) -> RecordSet {
        self.filtered(Record::has_errors)
    }

    fn filtered(&self, keep: impl Fn(&Record) -> bool) -> RecordSet {
        RecordSet {
            source: self.source.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Number of records with at least one error.
    pub fn error_size(&self) -> usize {
        self.records.iter().filter(|r| r.has_errors()).count()
    }

    /// Total errors over all records.
    pub fn error_count(&self) -> usize {
        self.records.iter().map(|r| r.errors.len()).sum()
    }

    /// Concatenated error reports of every rejected record.
    pub fn error_report(&self) -> String {
        self.records
            .iter()
            .filter(|r| r.has_errors())
            .map(Record::format_errors)
            .collect()
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl std::ops::Index<usize> for RecordSet {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}
