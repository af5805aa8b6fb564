//! Field specifications: the closed set of field kinds a layout is made of.
//!
//! Every kind reads exactly its width from the [`Cursor`] on decode and writes exactly its
//! width on encode. Scalar kinds live in [`text`](crate::text), [`numeric`](crate::numeric)
//! and [`temporal`](crate::temporal); this module adds the two compositions
//! ([`RepeatedField`], [`GroupField`]) and dispatches over all of them.

use crate::cursor::Cursor;
use crate::diagnostic::Diagnostics;
use crate::layout::LayoutError;
use crate::numeric::{DecimalField, IntegerField};
use crate::temporal::{check_pattern, DateField, DateTimeField};
use crate::text::StringField;
use crate::value::{Fields, Lookup, Value};
use std::collections::HashSet;
use std::io::BufRead;

/// Highest implied scale a decimal value can carry.
const MAX_SCALE: u32 = 28;

#[derive(Debug, Clone)]
pub enum FieldSpec {
    String(StringField),
    Integer(IntegerField),
    Decimal(DecimalField),
    Date(DateField),
    DateTime(DateTimeField),
    Repeated(RepeatedField),
    Group(GroupField),
}

/// `count` consecutive instances of one inner field, decoded into a list (or a single
/// joined string when a separator is configured).
#[derive(Debug, Clone)]
pub struct RepeatedField {
    inner: Box<FieldSpec>,
    count: usize,
    join: Option<String>,
    rstrip: bool,
}

impl RepeatedField {
    pub fn new(inner: impl Into<FieldSpec>, count: usize) -> Self {
        RepeatedField {
            inner: Box::new(inner.into()),
            count,
            join: None,
            rstrip: false,
        }
    }

    pub fn join(mut self, sep: impl Into<String>) -> Self {
        self.join = Some(sep.into());
        self
    }

    /// Trim trailing whitespace off the joined string.
    pub fn rstrip(mut self) -> Self {
        self.rstrip = true;
        self
    }

    pub fn inner(&self) -> &FieldSpec {
        &self.inner
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn decode<R: BufRead>(&self, cursor: &mut Cursor<R>, out: &mut Fields, diag: &mut Diagnostics) {
        let mut lists: Vec<(String, Vec<Value>)> = Vec::new();
        for _ in 0..self.count {
            if cursor.at_end_of_stream() {
                break;
            }
            let start = cursor.position();
            let mut scratch = Fields::new();
            let mut local = Diagnostics::new();
            self.inner.decode(cursor, &mut scratch, &mut local);
            if cursor.at_end_of_stream() && cursor.position() == start {
                break;
            }
            diag.append(local);
            for (key, value) in scratch {
                match lists.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, list)) => list.push(value),
                    None => lists.push((key, vec![value])),
                }
            }
        }
        if lists.is_empty() {
            lists.push((self.inner.name().to_string(), Vec::new()));
        }
        for (key, list) in lists {
            let value = match &self.join {
                Some(sep) => {
                    let parts: Vec<String> = list.iter().map(ToString::to_string).collect();
                    let mut joined = parts.join(sep);
                    if self.rstrip {
                        joined.truncate(joined.trim_end().len());
                    }
                    Value::Str(joined)
                }
                None => Value::List(list),
            };
            out.insert(key, value);
        }
    }

    /// A joined string is split back on the separator before filling the slots.
    fn encode_value(&self, value: &Value, out: &mut String, diag: &mut Diagnostics) {
        let split: Vec<Value>;
        let items: &[Value] = match (value, self.join.as_deref()) {
            (Value::Null, _) => &[],
            (Value::List(items), _) => items,
            (Value::Str(s), Some(sep)) if !sep.is_empty() => {
                split = s.split(sep).map(Value::from).collect();
                &split
            }
            (single, _) => std::slice::from_ref(single),
        };
        if items.len() > self.count {
            diag.warning(
                self.inner.name(),
                &value.to_string(),
                format!(
                    "too many values given for {}, only using the first {}",
                    self.inner.name(),
                    self.count
                ),
                None,
            );
        }
        for i in 0..self.count {
            let item = items.get(i).unwrap_or(&Value::Null);
            self.inner.encode_value(item, out, diag);
        }
    }
}

/// `count` consecutive fixed-width sub-records, each laid out by `fields`.
#[derive(Debug, Clone)]
pub struct GroupField {
    name: String,
    count: usize,
    fields: Vec<FieldSpec>,
}

impl GroupField {
    pub fn new(name: impl Into<String>, count: usize, fields: Vec<FieldSpec>) -> Self {
        GroupField {
            name: name.into(),
            count,
            fields,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn decode<R: BufRead>(&self, cursor: &mut Cursor<R>, out: &mut Fields, diag: &mut Diagnostics) {
        let mut subs = Vec::new();
        for i in 0..self.count {
            if cursor.at_end_of_stream() {
                break;
            }
            let mut sub = Fields::new();
            let mut local = Diagnostics::new();
            decode_fields(&self.fields, 0, cursor, &mut sub, &mut local);
            if cursor.at_end_of_stream() {
                tracing::debug!(group = %self.name, index = i, "dropping sub-record cut short by end of stream");
                break;
            }
            diag.append_scoped(&format!("{}[{}]", self.name, i), local);
            subs.push(sub);
        }
        out.insert(self.name.clone(), Value::Group(subs));
    }

    fn encode_value(&self, value: &Value, out: &mut String, diag: &mut Diagnostics) {
        let subs: &[Fields] = match value {
            Value::Group(subs) => subs,
            Value::Null => &[],
            other => {
                diag.warning(&self.name, &other.to_string(), "expected nested records", None);
                &[]
            }
        };
        if subs.len() > self.count {
            diag.warning(
                &self.name,
                &value.to_string(),
                format!("too many records given for {}, only using the first {}", self.name, self.count),
                None,
            );
        }
        let empty = Fields::new();
        for i in 0..self.count {
            let sub = subs.get(i).unwrap_or(&empty);
            let mut local = Diagnostics::new();
            encode_fields(&self.fields, 0, sub, out, &mut local);
            diag.append_scoped(&format!("{}[{}]", self.name, i), local);
        }
    }
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        match self {
            FieldSpec::String(f) => &f.name,
            FieldSpec::Integer(f) => &f.name,
            FieldSpec::Decimal(f) => &f.name,
            FieldSpec::Date(f) => &f.name,
            FieldSpec::DateTime(f) => &f.name,
            FieldSpec::Repeated(f) => f.inner.name(),
            FieldSpec::Group(f) => &f.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldSpec::String(_) => "string",
            FieldSpec::Integer(_) => "integer",
            FieldSpec::Decimal(_) => "decimal",
            FieldSpec::Date(_) => "date",
            FieldSpec::DateTime(_) => "datetime",
            FieldSpec::Repeated(_) => "repeat",
            FieldSpec::Group(_) => "group",
        }
    }

    /// Total columns this field occupies on a line.
    pub fn width(&self) -> usize {
        match self {
            FieldSpec::String(f) => f.width.total(),
            FieldSpec::Integer(f) => f.width,
            FieldSpec::Decimal(f) => f.width,
            FieldSpec::Date(f) => f.width,
            FieldSpec::DateTime(f) => f.width(),
            FieldSpec::Repeated(f) => f.inner.width() * f.count,
            FieldSpec::Group(f) => f.fields.iter().map(FieldSpec::width).sum::<usize>() * f.count,
        }
    }

    /// Insert this field's keys as absent.
    pub(crate) fn init(&self, out: &mut Fields) {
        match self {
            FieldSpec::Date(f) => f.init(out),
            FieldSpec::DateTime(f) => f.init(out),
            other => out.insert(other.name().to_string(), Value::Null),
        }
    }

    /// Read this field from the cursor into `out`, reporting problems to `diag`.
    pub fn decode<R: BufRead>(&self, cursor: &mut Cursor<R>, out: &mut Fields, diag: &mut Diagnostics) {
        let column = cursor.position();
        match self {
            FieldSpec::Repeated(f) => return f.decode(cursor, out, diag),
            FieldSpec::Group(f) => return f.decode(cursor, out, diag),
            _ => {}
        }
        if self.width() == 0 {
            self.init(out);
            return;
        }
        let raw = match self {
            FieldSpec::String(f) => f.read_raw(cursor),
            other => cursor.read_text(other.width()),
        };
        tracing::debug!(field = self.name(), column, raw = %raw, "read field");
        match self {
            FieldSpec::String(f) => out.insert(f.name.clone(), f.parse(&raw, column, diag)),
            FieldSpec::Integer(f) => out.insert(f.name.clone(), f.parse(&raw, column, diag)),
            FieldSpec::Decimal(f) => out.insert(f.name.clone(), f.parse(&raw, column, diag)),
            FieldSpec::Date(f) => {
                let date = f.parse(&raw, column, diag);
                f.assign(out, date);
            }
            FieldSpec::DateTime(f) => {
                let dt = f.parse(&raw, column, diag);
                f.assign(out, dt);
            }
            FieldSpec::Repeated(_) | FieldSpec::Group(_) => {}
        }
    }

    /// Encode this field's value from `input` (absent when the key is missing).
    pub fn encode<L: Lookup + ?Sized>(&self, input: &L, out: &mut String, diag: &mut Diagnostics) {
        let value = input.lookup(self.name()).unwrap_or(&Value::Null);
        self.encode_value(value, out, diag);
    }

    pub fn encode_value(&self, value: &Value, out: &mut String, diag: &mut Diagnostics) {
        let start = out.len();
        match self {
            FieldSpec::String(f) => f.encode_value(value, out, diag),
            FieldSpec::Integer(f) => f.encode_value(value, out, diag),
            FieldSpec::Decimal(f) => f.encode_value(value, out, diag),
            FieldSpec::Date(f) => f.encode_value(value, out, diag),
            FieldSpec::DateTime(f) => f.encode_value(value, out, diag),
            FieldSpec::Repeated(f) => f.encode_value(value, out, diag),
            FieldSpec::Group(f) => f.encode_value(value, out, diag),
        }
        tracing::trace!(field = self.name(), text = &out[start..], "encoded field");
    }

    /// Configuration checks run once when a layout is built.
    pub(crate) fn validate(&self) -> Result<(), LayoutError> {
        match self {
            FieldSpec::String(f) => check_pad(&f.name, f.pad),
            FieldSpec::Integer(_) => Ok(()),
            FieldSpec::Decimal(f) => {
                check_pad(&f.name, f.pad)?;
                match f.scale {
                    Some(s) if s > MAX_SCALE => Err(LayoutError::InvalidOption {
                        field: f.name.clone(),
                        option: "scale".to_string(),
                        reason: format!("implied scale {} exceeds {}", s, MAX_SCALE),
                    }),
                    _ => Ok(()),
                }
            }
            FieldSpec::Date(f) => {
                check_pattern(&f.name, &f.pattern)?;
                match &f.output {
                    Some(p) => check_pattern(&f.name, p),
                    None => Ok(()),
                }
            }
            FieldSpec::DateTime(f) => match &f.output {
                Some(p) => check_pattern(&f.name, p),
                None => Ok(()),
            },
            FieldSpec::Repeated(f) => f.inner.validate(),
            FieldSpec::Group(f) => check_fields(&f.fields),
        }
    }
}

fn check_pad(field: &str, pad: char) -> Result<(), LayoutError> {
    if pad.is_ascii() {
        Ok(())
    } else {
        Err(LayoutError::InvalidPad {
            field: field.to_string(),
            pad: pad.to_string(),
        })
    }
}

/// Unique names and per-field checks for one field list.
pub(crate) fn check_fields(fields: &[FieldSpec]) -> Result<(), LayoutError> {
    let mut seen = HashSet::new();
    for f in fields {
        if !seen.insert(f.name()) {
            return Err(LayoutError::DuplicateField(f.name().to_string()));
        }
        f.validate()?;
    }
    Ok(())
}

/// Decode `fields` in declaration order. Every field starts absent; decoding stops at the
/// first field that runs into the end of the stream. `spacing` filler bytes are consumed
/// between fields, never after the last one.
pub(crate) fn decode_fields<R: BufRead>(
    fields: &[FieldSpec],
    spacing: usize,
    cursor: &mut Cursor<R>,
    out: &mut Fields,
    diag: &mut Diagnostics,
) {
    for f in fields {
        f.init(out);
    }
    for (j, f) in fields.iter().enumerate() {
        f.decode(cursor, out, diag);
        if cursor.at_end_of_stream() {
            return;
        }
        if spacing > 0 && j + 1 < fields.len() {
            cursor.skip(spacing);
            if cursor.at_end_of_stream() {
                return;
            }
        }
    }
}

/// Encode `fields` in declaration order, `spacing` blanks between adjacent fields.
pub(crate) fn encode_fields<L: Lookup + ?Sized>(
    fields: &[FieldSpec],
    spacing: usize,
    input: &L,
    out: &mut String,
    diag: &mut Diagnostics,
) {
    for (j, f) in fields.iter().enumerate() {
        if j > 0 && spacing > 0 {
            out.extend(std::iter::repeat(' ').take(spacing));
        }
        f.encode(input, out, diag);
    }
}

impl From<StringField> for FieldSpec {
    fn from(f: StringField) -> Self {
        FieldSpec::String(f)
    }
}

impl From<IntegerField> for FieldSpec {
    fn from(f: IntegerField) -> Self {
        FieldSpec::Integer(f)
    }
}

impl From<DecimalField> for FieldSpec {
    fn from(f: DecimalField) -> Self {
        FieldSpec::Decimal(f)
    }
}

impl From<DateField> for FieldSpec {
    fn from(f: DateField) -> Self {
        FieldSpec::Date(f)
    }
}

impl From<DateTimeField> for FieldSpec {
    fn from(f: DateTimeField) -> Self {
        FieldSpec::DateTime(f)
    }
}

impl From<RepeatedField> for FieldSpec {
    fn from(f: RepeatedField) -> Self {
        FieldSpec::Repeated(f)
    }
}

impl From<GroupField> for FieldSpec {
    fn from(f: GroupField) -> Self {
        FieldSpec::Group(f)
    }
}
