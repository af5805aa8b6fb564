//! Layout: an ordered, validated list of field specifications for one kind of line.

use crate::field::{check_fields, FieldSpec};
use std::collections::HashMap;

/// Configuration errors. These are raised while building a layout, before any data is
/// decoded; field-level data problems are [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid date-time format {0}: valid formats - YYYYMMDD YYMMDD MMDDYYYY YYYYMMDDHHMM YYYYMMDDHHMMSS")]
    UnknownDateTimeFormat(String),
    #[error("Pad for {field} must be a single one-byte character, got {pad:?}")]
    InvalidPad { field: String, pad: String },
    #[error("Invalid regex for {field}: {reason}")]
    InvalidRegex { field: String, reason: String },
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),
    #[error("Duplicate layout name: {0}")]
    DuplicateLayout(String),
    #[error("Unknown option {option} for {field}")]
    UnknownOption { field: String, option: String },
    #[error("Invalid option {option} for {field}: {reason}")]
    InvalidOption {
        field: String,
        option: String,
        reason: String,
    },
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct Layout {
    name: String,
    fields: Vec<FieldSpec>,
    spacing: usize,
    by_name: HashMap<String, usize>,
}

impl Layout {
    /// Validate `fields` and build the name index.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, LayoutError> {
        Layout::named("", fields)
    }

    pub fn named(name: impl Into<String>, fields: Vec<FieldSpec>) -> Result<Self, LayoutError> {
        check_fields(&fields)?;
        let by_name = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();
        Ok(Layout {
            name: name.into(),
            fields,
            spacing: 0,
            by_name,
        })
    }

    /// Filler bytes between adjacent fields (not after the last one).
    pub fn with_spacing(mut self, spacing: usize) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn spacing(&self) -> usize {
        self.spacing
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Full line width, spacing included.
    pub fn width(&self) -> usize {
        let fields: usize = self.fields.iter().map(FieldSpec::width).sum();
        fields + self.spacing * self.fields.len().saturating_sub(1)
    }
}
