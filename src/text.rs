//! Fixed string fields: trimming, validation, transformation and justification.

use crate::cursor::Cursor;
use crate::diagnostic::Diagnostics;
use crate::layout::LayoutError;
use crate::value::Value;
use regex::Regex;
use std::collections::HashMap;
use std::io::BufRead;

/// Side of the column the text sits against; padding goes on the other side(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFold {
    #[default]
    None,
    Upper,
    Lower,
    Title,
}

/// Column extent of a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Columns(usize),
    /// Multi-line box: `lines` consecutive chunks of `columns` bytes each.
    Box { columns: usize, lines: usize },
}

impl Width {
    pub fn total(&self) -> usize {
        match *self {
            Width::Columns(n) => n,
            Width::Box { columns, lines } => columns * lines,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StringField {
    pub(crate) name: String,
    pub(crate) width: Width,
    align: Align,
    case: CaseFold,
    pub(crate) pad: char,
    allow_truncate: bool,
    strip_left: bool,
    strip_right: bool,
    required: bool,
    validate_blank: bool,
    values: Option<Vec<String>>,
    /// (source pattern, compiled start-anchored regex)
    regex: Option<(String, Regex)>,
    replace: Option<(Regex, String)>,
    tr: Option<HashMap<String, String>>,
    tr_strict: bool,
    line_sep: String,
}

impl StringField {
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        StringField {
            name: name.into(),
            width: Width::Columns(width),
            align: Align::Left,
            case: CaseFold::None,
            pad: ' ',
            allow_truncate: false,
            strip_left: false,
            strip_right: true,
            required: false,
            validate_blank: false,
            values: None,
            regex: None,
            replace: None,
            tr: None,
            tr_strict: true,
            line_sep: "\r\n".to_string(),
        }
    }

    /// A boxed field of `lines` rows, each `columns` wide. Input text is split on the line
    /// separator for encoding; decoded rows are re-joined with it.
    pub fn boxed(name: impl Into<String>, columns: usize, lines: usize) -> Self {
        let mut f = StringField::new(name, 0);
        f.width = Width::Box { columns, lines };
        f
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn case(mut self, case: CaseFold) -> Self {
        self.case = case;
        self
    }

    pub fn upper(self) -> Self {
        self.case(CaseFold::Upper)
    }

    pub fn lower(self) -> Self {
        self.case(CaseFold::Lower)
    }

    pub fn title(self) -> Self {
        self.case(CaseFold::Title)
    }

    pub fn pad(mut self, pad: char) -> Self {
        self.pad = pad;
        self
    }

    /// Silence the warning emitted when an over-length value is cut to width on encode.
    pub fn allow_truncate(mut self) -> Self {
        self.allow_truncate = true;
        self
    }

    pub fn strip_left(mut self) -> Self {
        self.strip_left = true;
        self
    }

    /// Keep trailing whitespace (right strip is on by default).
    pub fn keep_right(mut self) -> Self {
        self.strip_right = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Run pattern and allowed-value checks on blank values too.
    pub fn validate_blank(mut self) -> Self {
        self.validate_blank = true;
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Pattern the (trimmed) value must match at its start.
    pub fn regex(mut self, pattern: &str) -> Result<Self, LayoutError> {
        let compiled = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| LayoutError::InvalidRegex {
            field: self.name.clone(),
            reason: e.to_string(),
        })?;
        self.regex = Some((pattern.to_string(), compiled));
        Ok(self)
    }

    /// Replace every match of `pattern` with `replacement` after validation.
    pub fn replace(mut self, pattern: &str, replacement: &str) -> Result<Self, LayoutError> {
        let compiled = Regex::new(pattern).map_err(|e| LayoutError::InvalidRegex {
            field: self.name.clone(),
            reason: e.to_string(),
        })?;
        self.replace = Some((compiled, replacement.to_string()));
        Ok(self)
    }

    /// Translation map applied on decode (raw → value); encode applies it in reverse.
    pub fn translate<I, K, V>(mut self, map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tr = Some(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Pass unmapped values through instead of reporting them.
    pub fn lenient_translation(mut self) -> Self {
        self.tr_strict = false;
        self
    }

    pub fn line_sep(mut self, sep: impl Into<String>) -> Self {
        self.line_sep = sep.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub(crate) fn read_raw<R: BufRead>(&self, cursor: &mut Cursor<R>) -> String {
        match self.width {
            Width::Columns(n) => cursor.read_text(n),
            Width::Box { columns, lines } => {
                let mut rows = Vec::with_capacity(lines);
                for _ in 0..lines {
                    rows.push(cursor.read_text(columns).trim_end().to_string());
                }
                while rows.last().is_some_and(|r| r.is_empty()) {
                    rows.pop();
                }
                rows.join(&self.line_sep)
            }
        }
    }

    /// Validate and transform one raw slice. Problems are reported to `diag`; the
    /// best-effort value is returned either way.
    pub fn parse(&self, raw: &str, column: usize, diag: &mut Diagnostics) -> Value {
        let mut value = raw;
        if self.strip_left {
            value = value.trim_start();
        }
        if self.strip_right {
            value = value.trim_end();
        }
        let col = Some(column);

        if self.required && value.is_empty() {
            diag.error(&self.name, value, "missing required value", col);
            return Value::Null;
        }

        if !value.is_empty() || self.validate_blank {
            if let Some((pattern, re)) = &self.regex {
                if !re.is_match(value) {
                    diag.error(&self.name, value, format!("does not match pattern {}", pattern), col);
                }
            }
            if let Some(allowed) = &self.values {
                if !allowed.iter().any(|a| a == value) {
                    diag.error(&self.name, value, "unexpected value", col);
                }
            }
        }

        let mut value = match &self.replace {
            Some((re, rep)) => re.replace_all(value, rep.as_str()).into_owned(),
            None => value.to_string(),
        };

        if let Some(tr) = &self.tr {
            match tr.get(&value) {
                Some(mapped) => value = mapped.clone(),
                None if self.tr_strict => diag.error(&self.name, &value, "unexpected value", col),
                None => {}
            }
        }

        Value::Str(fold_case(&value, self.case))
    }

    pub fn encode_value(&self, value: &Value, out: &mut String, diag: &mut Diagnostics) {
        let mut text = match value {
            Value::Null => String::new(),
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        };
        text = fold_case(&text, self.case);
        if let Some(tr) = &self.tr {
            if let Some((raw, _)) = tr.iter().find(|(_, v)| **v == text) {
                text = raw.clone();
            }
        }
        if let Width::Columns(n) = self.width {
            if text.len() > n {
                let cut = truncate_bytes(&text, n).to_string();
                if !self.allow_truncate {
                    diag.warning(&self.name, &text, format!("truncating {:?} to {:?}", text, cut), None);
                }
                text = cut;
            }
        }
        match self.width {
            Width::Columns(n) => out.push_str(&justify(&text, n, self.align, self.pad)),
            Width::Box { columns, lines } => {
                let rows: Vec<&str> = text.split(self.line_sep.as_str()).collect();
                for i in 0..lines {
                    let row = rows.get(i).copied().unwrap_or("");
                    out.push_str(&justify(row, columns, self.align, self.pad));
                }
            }
        }
    }
}

/// Longest prefix of `s` that fits in `n` bytes without splitting a character.
pub(crate) fn truncate_bytes(s: &str, n: usize) -> &str {
    if s.len() <= n {
        return s;
    }
    let mut end = n;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Pad (or cut) `value` to exactly `width` bytes.
pub(crate) fn justify(value: &str, width: usize, align: Align, pad: char) -> String {
    let value = truncate_bytes(value, width);
    let margin = width - value.len();
    let left = match align {
        Align::Left => 0,
        Align::Right => margin,
        // Odd margins follow the classic centering rule: extra pad on the left only when
        // the total width is odd.
        Align::Center => margin / 2 + (margin & width & 1),
    };
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(pad).take(left));
    out.push_str(value);
    out.extend(std::iter::repeat(pad).take(margin - left));
    out
}

fn fold_case(value: &str, case: CaseFold) -> String {
    match case {
        CaseFold::None => value.to_string(),
        CaseFold::Upper => value.to_uppercase(),
        CaseFold::Lower => value.to_lowercase(),
        CaseFold::Title => {
            let mut out = String::with_capacity(value.len());
            let mut prev_alpha = false;
            for c in value.chars() {
                if prev_alpha {
                    out.extend(c.to_lowercase());
                } else {
                    out.extend(c.to_uppercase());
                }
                prev_alpha = c.is_alphabetic();
            }
            out
        }
    }
}
