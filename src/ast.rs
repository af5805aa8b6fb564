//! Abstract Syntax Tree for the layout definition language, and its resolution into
//! validated [`Layout`]s.

use crate::codec::CodecError;
use crate::field::{FieldSpec, GroupField, RepeatedField};
use crate::layout::{Layout, LayoutError};
use crate::numeric::{DecimalField, IntegerField};
use crate::temporal::{DateField, DateTimeField};
use crate::text::{Align, StringField};
use std::collections::HashMap;

/// Root of a layout file: one or more named layouts.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub layouts: Vec<LayoutSection>,
}

#[derive(Debug, Clone)]
pub struct LayoutSection {
    pub name: String,
    pub spacing: usize,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeDecl,
}

/// A field type plus its `[...]` options.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub spec: TypeSpec,
    pub options: Vec<OptionDecl>,
}

#[derive(Debug, Clone)]
pub enum TypeSpec {
    String { columns: usize, lines: Option<usize> },
    Integer(usize),
    Decimal(usize),
    Date { width: usize, pattern: String },
    DateTime(String),
    Repeat { count: usize, inner: Box<TypeDecl> },
    Group { count: usize, fields: Vec<FieldDecl> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionDecl {
    pub name: String,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(u64),
    Ident(String),
    Pair(String, String),
}

impl OptionDecl {
    fn invalid(&self, field: &str, reason: impl Into<String>) -> LayoutError {
        LayoutError::InvalidOption {
            field: field.to_string(),
            option: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn unknown(&self, field: &str) -> LayoutError {
        LayoutError::UnknownOption {
            field: field.to_string(),
            option: self.name.clone(),
        }
    }

    fn flag(&self, field: &str) -> Result<(), LayoutError> {
        if self.args.is_empty() {
            Ok(())
        } else {
            Err(self.invalid(field, "takes no arguments"))
        }
    }

    fn single(&self, field: &str) -> Result<&Arg, LayoutError> {
        match self.args.as_slice() {
            [arg] => Ok(arg),
            _ => Err(self.invalid(field, "expects exactly one argument")),
        }
    }

    fn str_arg(&self, field: &str) -> Result<&str, LayoutError> {
        match self.single(field)? {
            Arg::Str(s) => Ok(s),
            _ => Err(self.invalid(field, "expects a string")),
        }
    }

    fn int_arg(&self, field: &str) -> Result<u64, LayoutError> {
        match self.single(field)? {
            Arg::Int(n) => Ok(*n),
            _ => Err(self.invalid(field, "expects a number")),
        }
    }

    fn ident_arg(&self, field: &str) -> Result<&str, LayoutError> {
        match self.single(field)? {
            Arg::Ident(s) => Ok(s),
            _ => Err(self.invalid(field, "expects a bare word")),
        }
    }

    fn pad_arg(&self, field: &str) -> Result<char, LayoutError> {
        let s = self.str_arg(field)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c),
            _ => Err(LayoutError::InvalidPad {
                field: field.to_string(),
                pad: s.to_string(),
            }),
        }
    }

    fn strings(&self, field: &str) -> Result<Vec<String>, LayoutError> {
        self.args
            .iter()
            .map(|a| match a {
                Arg::Str(s) => Ok(s.clone()),
                _ => Err(self.invalid(field, "expects strings")),
            })
            .collect()
    }

    fn pairs(&self, field: &str) -> Result<Vec<(String, String)>, LayoutError> {
        self.args
            .iter()
            .map(|a| match a {
                Arg::Pair(k, v) => Ok((k.clone(), v.clone())),
                _ => Err(self.invalid(field, "expects \"from\" => \"to\" pairs")),
            })
            .collect()
    }

    fn year_arg(&self, field: &str) -> Result<i32, LayoutError> {
        let n = self.int_arg(field)?;
        i32::try_from(n).map_err(|_| self.invalid(field, "year out of range"))
    }
}

/// Resolved schema: validated layouts, indexed by name.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    layouts: Vec<Layout>,
    by_name: HashMap<String, usize>,
}

impl ResolvedSchema {
    pub fn resolve(schema: Schema) -> Result<Self, LayoutError> {
        let mut layouts = Vec::with_capacity(schema.layouts.len());
        let mut by_name = HashMap::new();
        for (i, section) in schema.layouts.into_iter().enumerate() {
            if by_name.insert(section.name.clone(), i).is_some() {
                return Err(LayoutError::DuplicateLayout(section.name));
            }
            let fields = section
                .fields
                .iter()
                .map(build_field)
                .collect::<Result<Vec<_>, _>>()?;
            layouts.push(Layout::named(section.name, fields)?.with_spacing(section.spacing));
        }
        Ok(ResolvedSchema { layouts, by_name })
    }

    pub fn get_layout(&self, name: &str) -> Option<&Layout> {
        self.by_name.get(name).map(|&i| &self.layouts[i])
    }

    /// Like [`get_layout`](Self::get_layout) but a missing name is an error.
    pub fn layout(&self, name: &str) -> Result<&Layout, CodecError> {
        self.get_layout(name)
            .ok_or_else(|| CodecError::UnknownLayout(name.to_string()))
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }
}

fn build_field(decl: &FieldDecl) -> Result<FieldSpec, LayoutError> {
    build_type(&decl.name, &decl.ty)
}

fn build_type(name: &str, ty: &TypeDecl) -> Result<FieldSpec, LayoutError> {
    let opts = &ty.options;
    let spec: FieldSpec = match &ty.spec {
        TypeSpec::String { columns, lines } => {
            let f = match lines {
                Some(h) => StringField::boxed(name, *columns, *h),
                None => StringField::new(name, *columns),
            };
            string_options(name, f, opts)?.into()
        }
        TypeSpec::Integer(width) => {
            let mut f = IntegerField::new(name, *width);
            for o in opts {
                f = match o.name.as_str() {
                    "required" => o.flag(name).map(|_| f.required())?,
                    "keep_nonnumeric" => o.flag(name).map(|_| f.keep_nonnumeric())?,
                    _ => return Err(o.unknown(name)),
                };
            }
            f.into()
        }
        TypeSpec::Decimal(width) => {
            let mut f = DecimalField::new(name, *width);
            for o in opts {
                f = match o.name.as_str() {
                    "scale" => {
                        let s = o.int_arg(name)?;
                        let s = u32::try_from(s).map_err(|_| o.invalid(name, "scale out of range"))?;
                        f.implied_scale(s)
                    }
                    "required" => o.flag(name).map(|_| f.required())?,
                    "nonzero" => o.flag(name).map(|_| f.nonzero())?,
                    "pad" => f.pad(o.pad_arg(name)?),
                    _ => return Err(o.unknown(name)),
                };
            }
            f.into()
        }
        TypeSpec::Date { width, pattern } => {
            let mut f = DateField::new(name, *width, pattern.clone());
            for o in opts {
                f = match o.name.as_str() {
                    "required" => o.flag(name).map(|_| f.required())?,
                    "none_if_invalid" => o.flag(name).map(|_| f.none_if_invalid())?,
                    "min_year" => f.min_year(o.year_arg(name)?),
                    "output" => f.output(o.str_arg(name)?),
                    _ => return Err(o.unknown(name)),
                };
            }
            f.into()
        }
        TypeSpec::DateTime(format) => {
            let mut f = DateTimeField::named(name, format)?;
            for o in opts {
                f = match o.name.as_str() {
                    "required" => o.flag(name).map(|_| f.required())?,
                    "none_if_invalid" => o.flag(name).map(|_| f.none_if_invalid())?,
                    "min_year" => f.min_year(o.year_arg(name)?),
                    "output" => f.output(o.str_arg(name)?),
                    _ => return Err(o.unknown(name)),
                };
            }
            f.into()
        }
        TypeSpec::Repeat { count, inner } => {
            let mut f = RepeatedField::new(build_type(name, inner)?, *count);
            for o in opts {
                f = match o.name.as_str() {
                    "join" => f.join(o.str_arg(name)?),
                    "rstrip" => o.flag(name).map(|_| f.rstrip())?,
                    _ => return Err(o.unknown(name)),
                };
            }
            f.into()
        }
        TypeSpec::Group { count, fields } => {
            if let Some(o) = opts.first() {
                return Err(o.unknown(name));
            }
            let subfields = fields.iter().map(build_field).collect::<Result<Vec<_>, _>>()?;
            GroupField::new(name, *count, subfields).into()
        }
    };
    Ok(spec)
}

fn string_options(name: &str, mut f: StringField, opts: &[OptionDecl]) -> Result<StringField, LayoutError> {
    for o in opts {
        f = match o.name.as_str() {
            "align" => {
                let align = match o.ident_arg(name)? {
                    "left" => Align::Left,
                    "right" => Align::Right,
                    "center" => Align::Center,
                    other => return Err(o.invalid(name, format!("unknown alignment {}", other))),
                };
                f.align(align)
            }
            "upper" => o.flag(name).map(|_| f.upper())?,
            "lower" => o.flag(name).map(|_| f.lower())?,
            "title" => o.flag(name).map(|_| f.title())?,
            "pad" => f.pad(o.pad_arg(name)?),
            "truncate" => o.flag(name).map(|_| f.allow_truncate())?,
            "strip_left" => o.flag(name).map(|_| f.strip_left())?,
            "keep_right" => o.flag(name).map(|_| f.keep_right())?,
            "required" => o.flag(name).map(|_| f.required())?,
            "validate_blank" => o.flag(name).map(|_| f.validate_blank())?,
            "values" => {
                let values = o.strings(name)?;
                if values.is_empty() {
                    return Err(o.invalid(name, "expects at least one value"));
                }
                f.values(values)
            }
            "regex" => f.regex(o.str_arg(name)?)?,
            "replace" => match o.args.as_slice() {
                [Arg::Str(pattern), Arg::Str(rep)] => f.replace(pattern, rep)?,
                _ => return Err(o.invalid(name, "expects a pattern and a replacement")),
            },
            "tr" => f.translate(o.pairs(name)?),
            "tr_lenient" => o.flag(name).map(|_| f.lenient_translation())?,
            "sep" => f.line_sep(o.str_arg(name)?),
            _ => return Err(o.unknown(name)),
        };
    }
    Ok(f)
}
