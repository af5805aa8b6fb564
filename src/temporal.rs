//! Calendar date and date-time fields.
//!
//! Both kinds also populate two derived keys next to the field itself so consumers never
//! re-format dates: `<name>_fmt` (display form) and `<name>_iso` (compact sortable form).
//! The derived keys are empty strings when no value was parsed.

use crate::diagnostic::Diagnostics;
use crate::layout::LayoutError;
use crate::text::truncate_bytes;
use crate::value::{Fields, Value};
use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fmt::{self, Write};
use std::str::FromStr;

const DATE_DISPLAY: &str = "%m/%d/%Y";
const DATE_ISO: &str = "%Y%m%d";
const DATETIME_DISPLAY: &str = "%x %X";
const DATETIME_ISO: &str = "%Y%m%d %H:%M";

pub fn fmt_key(name: &str) -> String {
    format!("{}_fmt", name)
}

pub fn iso_key(name: &str) -> String {
    format!("{}_iso", name)
}

/// Render a date through a midnight date-time so time specifiers in `pattern` are valid.
fn render_date(date: NaiveDate, pattern: &str) -> String {
    match date.and_hms_opt(0, 0, 0) {
        Some(dt) => dt.format(pattern).to_string(),
        None => date.format(pattern).to_string(),
    }
}

/// Reject strftime patterns chrono cannot render against a naive date-time, such as
/// malformed specifiers or offset and timezone items (`%z`, `%Z`, `%+`).
pub(crate) fn check_pattern(field: &str, pattern: &str) -> Result<(), LayoutError> {
    let malformed = StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
    let sample = NaiveDate::from_ymd_opt(2000, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    let mut rendered = String::new();
    let renders = sample.map_or(false, |dt| write!(rendered, "{}", dt.format(pattern)).is_ok());
    if malformed || !renders {
        return Err(LayoutError::InvalidOption {
            field: field.to_string(),
            option: "pattern".to_string(),
            reason: format!("unsupported date pattern {:?}", pattern),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DateField {
    pub(crate) name: String,
    pub(crate) width: usize,
    pub(crate) pattern: String,
    pub(crate) output: Option<String>,
    min_year: Option<i32>,
    required: bool,
    none_if_invalid: bool,
}

impl DateField {
    pub fn new(name: impl Into<String>, width: usize, pattern: impl Into<String>) -> Self {
        DateField {
            name: name.into(),
            width,
            pattern: pattern.into(),
            output: None,
            min_year: None,
            required: false,
            none_if_invalid: false,
        }
    }

    /// Decode to a string rendered with this pattern instead of a date value.
    pub fn output(mut self, pattern: impl Into<String>) -> Self {
        self.output = Some(pattern.into());
        self
    }

    pub fn min_year(mut self, year: i32) -> Self {
        self.min_year = Some(year);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Unparsable content decodes to absent without an error.
    pub fn none_if_invalid(mut self) -> Self {
        self.none_if_invalid = true;
        self
    }

    /// Parse and validate. An all-zero field counts as blank.
    pub fn parse(&self, raw: &str, column: usize, diag: &mut Diagnostics) -> Option<NaiveDate> {
        let mut text = raw.trim();
        if text.bytes().all(|b| b == b'0') {
            text = "";
        }
        let col = Some(column);
        if text.is_empty() {
            if self.required {
                diag.error(&self.name, text, "missing required value", col);
            }
            return None;
        }
        let date = match NaiveDate::parse_from_str(text, &self.pattern) {
            Ok(d) => d,
            Err(_) => {
                if !self.none_if_invalid {
                    diag.error(&self.name, text, format!("invalid date, expected format {:?}", self.pattern), col);
                }
                return None;
            }
        };
        if let Some(min) = self.min_year {
            if date.year() < min {
                diag.error(&self.name, text, format!("expected year after {}", min), col);
                return None;
            }
        }
        Some(date)
    }

    pub(crate) fn init(&self, out: &mut Fields) {
        out.insert(self.name.clone(), Value::Null);
        out.insert(fmt_key(&self.name), "");
        out.insert(iso_key(&self.name), "");
    }

    pub(crate) fn assign(&self, out: &mut Fields, date: Option<NaiveDate>) {
        let Some(date) = date else {
            self.init(out);
            return;
        };
        let value = match &self.output {
            Some(p) => Value::Str(render_date(date, p)),
            None => Value::Date(date),
        };
        out.insert(self.name.clone(), value);
        out.insert(fmt_key(&self.name), date.format(DATE_DISPLAY).to_string());
        out.insert(iso_key(&self.name), date.format(DATE_ISO).to_string());
    }

    pub fn encode_value(&self, value: &Value, out: &mut String, diag: &mut Diagnostics) {
        let text = match value {
            Value::Null => String::new(),
            Value::Date(d) => render_date(*d, &self.pattern),
            Value::DateTime(dt) => dt.format(&self.pattern).to_string(),
            Value::Str(s) => s.clone(),
            other => {
                diag.warning(&self.name, &other.to_string(), "value is not a date", None);
                String::new()
            }
        };
        push_left_justified(&self.name, &text, self.width, out, diag);
    }
}

/// Fixed catalogue of date-time layouts. The width is implied by the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeFormat {
    Yyyymmdd,
    Yymmdd,
    Mmddyyyy,
    Yyyymmddhhmm,
    Yyyymmddhhmmss,
}

impl DateTimeFormat {
    pub const ALL: [DateTimeFormat; 5] = [
        DateTimeFormat::Yyyymmdd,
        DateTimeFormat::Yymmdd,
        DateTimeFormat::Mmddyyyy,
        DateTimeFormat::Yyyymmddhhmm,
        DateTimeFormat::Yyyymmddhhmmss,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DateTimeFormat::Yyyymmdd => "YYYYMMDD",
            DateTimeFormat::Yymmdd => "YYMMDD",
            DateTimeFormat::Mmddyyyy => "MMDDYYYY",
            DateTimeFormat::Yyyymmddhhmm => "YYYYMMDDHHMM",
            DateTimeFormat::Yyyymmddhhmmss => "YYYYMMDDHHMMSS",
        }
    }

    pub fn width(&self) -> usize {
        match self {
            DateTimeFormat::Yyyymmdd | DateTimeFormat::Mmddyyyy => 8,
            DateTimeFormat::Yymmdd => 6,
            DateTimeFormat::Yyyymmddhhmm => 12,
            DateTimeFormat::Yyyymmddhhmmss => 14,
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            DateTimeFormat::Yyyymmdd => "%Y%m%d",
            DateTimeFormat::Yymmdd => "%y%m%d",
            DateTimeFormat::Mmddyyyy => "%m%d%Y",
            DateTimeFormat::Yyyymmddhhmm => "%Y%m%d%H%M",
            DateTimeFormat::Yyyymmddhhmmss => "%Y%m%d%H%M%S",
        }
    }

    fn has_time(&self) -> bool {
        matches!(self, DateTimeFormat::Yyyymmddhhmm | DateTimeFormat::Yyyymmddhhmmss)
    }

    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        if self.has_time() {
            NaiveDateTime::parse_from_str(text, self.pattern()).ok()
        } else {
            NaiveDate::parse_from_str(text, self.pattern())
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
    }
}

impl fmt::Display for DateTimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DateTimeFormat {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTimeFormat::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| LayoutError::UnknownDateTimeFormat(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct DateTimeField {
    pub(crate) name: String,
    pub(crate) format: DateTimeFormat,
    pub(crate) output: Option<String>,
    min_year: Option<i32>,
    required: bool,
    none_if_invalid: bool,
}

impl DateTimeField {
    pub fn new(name: impl Into<String>, format: DateTimeFormat) -> Self {
        DateTimeField {
            name: name.into(),
            format,
            output: None,
            min_year: None,
            required: false,
            none_if_invalid: false,
        }
    }

    /// Build from a catalogue name such as `"YYYYMMDDHHMM"`; unknown names fail here,
    /// before any decoding.
    pub fn named(name: impl Into<String>, format: &str) -> Result<Self, LayoutError> {
        Ok(DateTimeField::new(name, format.parse()?))
    }

    pub fn output(mut self, pattern: impl Into<String>) -> Self {
        self.output = Some(pattern.into());
        self
    }

    pub fn min_year(mut self, year: i32) -> Self {
        self.min_year = Some(year);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn none_if_invalid(mut self) -> Self {
        self.none_if_invalid = true;
        self
    }

    pub fn width(&self) -> usize {
        self.format.width()
    }

    pub fn parse(&self, raw: &str, column: usize, diag: &mut Diagnostics) -> Option<NaiveDateTime> {
        let text = raw.trim();
        let col = Some(column);
        if text.is_empty() {
            if self.required {
                diag.error(&self.name, text, "missing required value", col);
            }
            return None;
        }
        let Some(dt) = self.format.parse(text) else {
            if !self.none_if_invalid {
                diag.error(
                    &self.name,
                    text,
                    format!("invalid datetime, expected format {:?}", self.format.pattern()),
                    col,
                );
            }
            return None;
        };
        if let Some(min) = self.min_year {
            if dt.year() < min {
                diag.error(&self.name, text, format!("expected year after {}", min), col);
                return None;
            }
        }
        Some(dt)
    }

    pub(crate) fn init(&self, out: &mut Fields) {
        out.insert(self.name.clone(), Value::Null);
        out.insert(fmt_key(&self.name), "");
        out.insert(iso_key(&self.name), "");
    }

    pub(crate) fn assign(&self, out: &mut Fields, dt: Option<NaiveDateTime>) {
        let Some(dt) = dt else {
            self.init(out);
            return;
        };
        let value = match &self.output {
            Some(p) => Value::Str(dt.format(p).to_string()),
            None => Value::DateTime(dt),
        };
        out.insert(self.name.clone(), value);
        out.insert(fmt_key(&self.name), dt.format(DATETIME_DISPLAY).to_string());
        out.insert(iso_key(&self.name), dt.format(DATETIME_ISO).to_string());
    }

    pub fn encode_value(&self, value: &Value, out: &mut String, diag: &mut Diagnostics) {
        let text = match value {
            Value::Null => String::new(),
            Value::DateTime(dt) => dt.format(self.format.pattern()).to_string(),
            Value::Date(d) => render_date(*d, self.format.pattern()),
            Value::Str(s) => s.clone(),
            other => {
                diag.warning(&self.name, &other.to_string(), "value is not a date-time", None);
                String::new()
            }
        };
        push_left_justified(&self.name, &text, self.format.width(), out, diag);
    }
}

fn push_left_justified(name: &str, text: &str, width: usize, out: &mut String, diag: &mut Diagnostics) {
    let kept = truncate_bytes(text, width);
    if kept.len() < text.len() {
        diag.warning(name, text, format!("truncating {:?} to {:?}", text, kept), None);
    }
    out.push_str(kept);
    out.extend(std::iter::repeat(' ').take(width - kept.len()));
}
