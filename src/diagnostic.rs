//! Field-level errors and warnings collected during decode/encode.
//!
//! Diagnostics are data, not control flow: a field that fails validation records an entry
//! here and decoding carries on with the next field.

use std::fmt;

/// One error or warning: which field, the raw text that caused it, and where it started.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub field: String,
    pub raw: String,
    pub message: String,
    /// 0-based column where the field began; `None` on the encode path.
    pub column: Option<usize>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "[{}] {}={:?}: {}", col, self.field, self.raw, self.message),
            None => write!(f, "{}={:?}: {}", self.field, self.raw, self.message),
        }
    }
}

/// Error and warning sink threaded through field decode/encode calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn error(&mut self, field: &str, raw: &str, message: impl Into<String>, column: Option<usize>) {
        self.errors.push(Diagnostic {
            field: field.to_string(),
            raw: raw.to_string(),
            message: message.into(),
            column,
        });
    }

    pub fn warning(&mut self, field: &str, raw: &str, message: impl Into<String>, column: Option<usize>) {
        self.warnings.push(Diagnostic {
            field: field.to_string(),
            raw: raw.to_string(),
            message: message.into(),
            column,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Move everything from `other` into `self`.
    pub fn append(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Move everything from `other` into `self`, qualifying field names with `prefix`
    /// (nested group sub-records report as `group[i].field`).
    pub fn append_scoped(&mut self, prefix: &str, other: Diagnostics) {
        let scope = |mut d: Diagnostic| {
            d.field = format!("{}.{}", prefix, d.field);
            d
        };
        self.errors.extend(other.errors.into_iter().map(scope));
        self.warnings.extend(other.warnings.into_iter().map(scope));
    }
}

/// Render a list of diagnostics one per line.
pub fn format_list(items: &[Diagnostic], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}
