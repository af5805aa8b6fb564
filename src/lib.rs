//! # fwcodec: Fixed-Width Record Codec
//!
//! Declarative layouts for fixed-width positional text files (batch, mainframe and
//! bank-style record formats), with a PEST grammar for layout files and a symmetric
//! decoder/encoder driven by the same [`Layout`].
//!
//! ## Decoding model
//!
//! - Every line is one record; fields are read left to right at fixed byte widths.
//! - Data problems never abort a stream: each record carries its own errors and
//!   warnings, and a [`RecordSet`] partitions into accepted and rejected records.
//! - Configuration problems (bad pads, unknown date-time formats, invalid regexes)
//!   fail up front as [`LayoutError`].
//!
//! ## Field kinds
//!
//! - `string(W)` / `string(WxH)`: trimming, case folding, pattern and allowed-value
//!   checks, replacement, translation maps, alignment and padding
//! - `integer(W)`, `decimal(W)` with an optional implied scale
//! - `date(W, "pattern")`, `datetime("YYYYMMDDHHMM")` with derived `_fmt` / `_iso` keys
//! - `repeat(N, type)` and `group(N) { ... }` for repeated columns and nested sub-records
//!
//! ## Example layout
//!
//! ```text
//! layout customer {
//!   spacing = 0;
//!   id:      integer(6) [required];
//!   name:    string(20) [title];
//!   balance: decimal(9) [scale(2), pad("0")];
//!   opened:  date(8, "%Y%m%d") [min_year(1900)];
//!   phones:  repeat(2, string(10));
//! }
//! ```
//!
//! ## Usage
//!
//! ```
//! use fwcodec::{load, Decoder, Encoder};
//!
//! let schema = load(r#"layout l { code: string(3) [upper]; qty: integer(4); }"#).unwrap();
//! let layout = schema.get_layout("l").unwrap();
//! let set = Decoder::new(layout).parse_str("abc0042\nxyz0007").unwrap();
//! assert_eq!(set.len(), 2);
//! assert_eq!(set[0].get("code").and_then(|v| v.as_str()), Some("ABC"));
//!
//! let out = Encoder::new(layout).encode(&set);
//! assert_eq!(out.text, "ABC0042\nXYZ0007");
//! ```

pub mod ast;
pub mod codec;
pub mod cursor;
pub mod diagnostic;
pub mod field;
pub mod layout;
pub mod numeric;
pub mod parser;
pub mod record;
pub mod temporal;
pub mod text;
pub mod value;

pub use ast::{ResolvedSchema, Schema};
pub use codec::{CodecError, Decoder, EncodeWarning, Encoded, Encoder, Records};
pub use cursor::Cursor;
pub use diagnostic::{Diagnostic, Diagnostics};
pub use field::{FieldSpec, GroupField, RepeatedField};
pub use layout::{Layout, LayoutError};
pub use numeric::{parse_decimal, to_implied, DecimalField, IntegerField};
pub use parser::parse;
pub use record::{Record, RecordSet};
pub use temporal::{DateField, DateTimeField, DateTimeFormat};
pub use text::{Align, CaseFold, StringField, Width};
pub use value::{Fields, Lookup, Value};

/// Parse layout source and resolve every layout it declares.
pub fn load(source: &str) -> Result<ResolvedSchema, LayoutError> {
    ResolvedSchema::resolve(parse(source)?)
}
