//! Integer and implied-scale decimal fields.

use crate::diagnostic::Diagnostics;
use crate::value::Value;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone)]
pub struct IntegerField {
    pub(crate) name: String,
    pub(crate) width: usize,
    strip_nonnumeric: bool,
    required: bool,
}

impl IntegerField {
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        IntegerField {
            name: name.into(),
            width,
            strip_nonnumeric: true,
            required: false,
        }
    }

    /// Convert the trimmed text as-is instead of dropping every non-digit first.
    pub fn keep_nonnumeric(mut self) -> Self {
        self.strip_nonnumeric = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn parse(&self, raw: &str, column: usize, diag: &mut Diagnostics) -> Value {
        let mut value = raw.trim().to_string();
        if self.strip_nonnumeric {
            value.retain(|c| c.is_ascii_digit());
        }
        if value.is_empty() {
            if self.required {
                diag.error(&self.name, raw.trim(), "missing required value", Some(column));
            }
            return Value::Null;
        }
        match value.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => {
                diag.error(&self.name, &value, "cannot translate to number", Some(column));
                Value::Null
            }
        }
    }

    pub fn encode_value(&self, value: &Value, out: &mut String, diag: &mut Diagnostics) {
        let text = match value {
            Value::Null => String::new(),
            Value::Str(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if text.is_empty() {
            out.extend(std::iter::repeat('0').take(self.width));
            return;
        }
        push_right_justified(&self.name, &text, self.width, '0', out, diag);
    }
}

#[derive(Debug, Clone)]
pub struct DecimalField {
    pub(crate) name: String,
    pub(crate) width: usize,
    pub(crate) scale: Option<u32>,
    required: bool,
    nonzero: bool,
    pub(crate) pad: char,
}

impl DecimalField {
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        DecimalField {
            name: name.into(),
            width,
            scale: None,
            required: false,
            nonzero: false,
            pad: ' ',
        }
    }

    /// Number of fractional digits carried without a decimal point.
    pub fn implied_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Report a zero value as an error.
    pub fn nonzero(mut self) -> Self {
        self.nonzero = true;
        self
    }

    pub fn pad(mut self, pad: char) -> Self {
        self.pad = pad;
        self
    }

    pub fn parse(&self, raw: &str, column: usize, diag: &mut Diagnostics) -> Value {
        let text = raw.trim();
        let col = Some(column);
        if text.is_empty() {
            if self.required {
                diag.error(&self.name, text, "missing required value", col);
            }
            return Value::Null;
        }
        let mut value = match Decimal::from_str(text) {
            Ok(d) => d,
            Err(e) => {
                diag.error(&self.name, text, e.to_string(), col);
                return Value::Null;
            }
        };
        if self.nonzero && value.is_zero() {
            diag.error(&self.name, text, "value cannot be zero", col);
            return Value::Null;
        }
        if let Some(scale) = self.scale.filter(|s| *s > 0) {
            if let Err(e) = value.set_scale(value.scale() + scale) {
                diag.error(&self.name, text, e.to_string(), col);
                return Value::Null;
            }
        }
        Value::Decimal(value)
    }

    pub fn encode_value(&self, value: &Value, out: &mut String, diag: &mut Diagnostics) {
        let number = match value {
            Value::Null => None,
            Value::Decimal(d) => Some(*d),
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Str(s) if s.trim().is_empty() => None,
            Value::Str(s) => {
                let parsed = parse_decimal(s);
                if parsed.is_none() {
                    diag.warning(&self.name, s, "no number found in value", None);
                }
                parsed
            }
            other => {
                diag.warning(&self.name, &other.to_string(), "value is not numeric", None);
                None
            }
        };
        let Some(mut number) = number else {
            out.extend(std::iter::repeat(self.pad).take(self.width));
            return;
        };
        if let Some(scale) = self.scale {
            match to_implied(number, scale) {
                Some(n) => number = n,
                None => {
                    diag.warning(&self.name, &number.to_string(), "value overflows implied scale", None);
                    out.extend(std::iter::repeat(self.pad).take(self.width));
                    return;
                }
            }
        }
        push_right_justified(&self.name, &number.to_string(), self.width, self.pad, out, diag);
    }
}

/// Right-justify `text` into `width` columns. Values that do not fit keep their
/// low-order (rightmost) characters and raise a warning.
fn push_right_justified(name: &str, text: &str, width: usize, pad: char, out: &mut String, diag: &mut Diagnostics) {
    let mut kept = text;
    if text.len() > width {
        diag.warning(name, text, format!("value overflows {} columns", width), None);
        let mut start = text.len() - width;
        while !text.is_char_boundary(start) {
            start += 1;
        }
        kept = &text[start..];
    }
    out.extend(std::iter::repeat(pad).take(width - kept.len()));
    out.push_str(kept);
}

/// Shift `value` left by `scale` decimal places and round half-to-even to an integer:
/// `123.45` at scale 2 becomes `12345`, `8.6` at scale 3 becomes `8600`.
pub fn to_implied(value: Decimal, scale: u32) -> Option<Decimal> {
    let factor = Decimal::try_from_i128_with_scale(10i128.checked_pow(scale)?, 0).ok()?;
    value
        .checked_mul(factor)
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
}

/// Tried in order: bare fraction, first number with a fraction, first integer.
static NUMBER_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^(-?\.\d+)$").expect("static pattern"),
        Regex::new(r"^.*?(-?\d+\.\d+)").expect("static pattern"),
        Regex::new(r"^.*?(-?\d+)").expect("static pattern"),
    ]
});

/// Pull the first number out of free text such as `"$1,234.50 USD"`. Commas are
/// ignored. Returns `None` when no digits are present.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.replace(',', "");
    for p in NUMBER_PATTERNS.iter() {
        if let Some(m) = p.captures(&s).and_then(|c| c.get(1)) {
            return Decimal::from_str(m.as_str()).ok();
        }
    }
    Decimal::from_str(s.trim()).ok()
}
