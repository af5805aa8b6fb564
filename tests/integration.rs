//! Integration tests: build layouts (builders and layout language), decode, validate, encode.

use chrono::{NaiveDate, NaiveDateTime};
use fwcodec::{
    load, Align, DateField, DateTimeField, DateTimeFormat, DecimalField, Decoder, Diagnostics, Encoder, Fields,
    GroupField, IntegerField, Layout, LayoutError, RepeatedField, StringField, Value,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

const CUSTOMER: &str = r#"
layout Customer {
  id: integer(4);
  name: string(10);
  balance: decimal(7) [scale(2), pad("0")];
  opened: date(8, "%Y%m%d");
  codes: repeat(3, string(2));
}
"#;

fn str_of<'a>(fields: &'a Fields, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

// ==================== Round trip ====================

#[test]
fn test_round_trip_reproduces_lines() {
    let schema = load(CUSTOMER).expect("load");
    let layout = schema.layout("Customer").expect("layout");
    let input = "0042John Smith001234520011230AABBCC\n0007Jo        000000119991231XY    ";
    let set = Decoder::new(layout).parse_str(input).expect("decode");
    assert_eq!(set.len(), 2);
    assert_eq!(set.error_count(), 0);

    let first = &set[0];
    assert_eq!(first.get("id").and_then(Value::as_i64), Some(42));
    assert_eq!(first.get("name").and_then(Value::as_str), Some("John Smith"));
    assert_eq!(first.get("balance").and_then(Value::as_decimal), Some(Decimal::new(12345, 2)));
    assert_eq!(
        first.get("opened").and_then(Value::as_date),
        NaiveDate::from_ymd_opt(2001, 12, 30)
    );
    let codes = first.get("codes").and_then(Value::as_list).expect("codes");
    assert_eq!(codes, &[Value::from("AA"), Value::from("BB"), Value::from("CC")]);

    let encoded = Encoder::new(layout).encode(&set);
    assert!(encoded.warnings.is_empty(), "{:?}", encoded.warnings);
    assert_eq!(encoded.text, input);
}

#[test]
fn test_encode_joins_lines_without_trailing_terminator() {
    let layout = Layout::new(vec![StringField::new("c", 2).into()]).expect("layout");
    let rows = vec![
        Fields::new().with("c", "a"),
        Fields::new().with("c", "b"),
        Fields::new().with("c", "c"),
    ];
    let out = Encoder::new(&layout).encode(&rows);
    assert_eq!(out.text, "a \nb \nc ");
}

#[test]
fn test_encode_to_writer_streams_lines() {
    let layout = Layout::new(vec![IntegerField::new("n", 3).into()]).expect("layout");
    let rows = vec![Fields::new().with("n", 1i64), Fields::new().with("n", 22i64)];
    let mut buf = Vec::new();
    let warnings = Encoder::new(&layout).encode_to(&rows, &mut buf).expect("write");
    assert!(warnings.is_empty());
    assert_eq!(String::from_utf8(buf).expect("utf8"), "001\n022");
}

#[test]
fn test_encode_accepts_any_associative_source() {
    let layout = Layout::new(vec![StringField::new("a", 2).into(), IntegerField::new("b", 2).into()])
        .expect("layout");
    let enc = Encoder::new(&layout);
    let mut diag = Diagnostics::new();

    let mut hm: HashMap<String, Value> = HashMap::new();
    hm.insert("a".into(), "x".into());
    hm.insert("b".into(), Value::Int(5));
    assert_eq!(enc.encode_one(&hm, &mut diag), "x 05");

    let mut bt: BTreeMap<String, Value> = BTreeMap::new();
    bt.insert("b".into(), Value::Int(7));
    assert_eq!(enc.encode_one(&bt, &mut diag), "  07");

    let record = Decoder::new(&layout).parse_line("zz12").expect("line");
    assert_eq!(enc.encode_one(&record, &mut diag), "zz12");
    assert!(diag.is_empty());
}

// ==================== Strings ====================

#[test]
fn test_truncation_emits_exactly_one_warning() {
    let layout = Layout::new(vec![StringField::new("s", 3).into()]).expect("layout");
    let out = Encoder::new(&layout).encode([Fields::new().with("s", "abcdef")]);
    assert_eq!(out.text, "abc");
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].record, 0);
    assert_eq!(out.warnings[0].diagnostic.field, "s");

    let quiet = Layout::new(vec![StringField::new("s", 3).allow_truncate().into()]).expect("layout");
    let out = Encoder::new(&quiet).encode([Fields::new().with("s", "abcdef")]);
    assert_eq!(out.text, "abc");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_string_alignment_and_padding() {
    let layout = Layout::new(vec![
        StringField::new("l", 5).into(),
        StringField::new("r", 5).align(Align::Right).pad('*').into(),
        StringField::new("c", 5).align(Align::Center).into(),
    ])
    .expect("layout");
    let row = Fields::new().with("l", "ab").with("r", "ab").with("c", "ab");
    let out = Encoder::new(&layout).encode([row]);
    assert_eq!(out.text, "ab   ***ab  ab ");
}

#[test]
fn test_string_validation_errors() {
    let layout = Layout::new(vec![
        StringField::new("code", 3).required().into(),
        StringField::new("kind", 1).values(["A", "B"]).into(),
        StringField::new("zip", 5).regex(r"\d{5}").expect("regex").into(),
    ])
    .expect("layout");
    let rec = Decoder::new(&layout).parse_line("   C1234x").expect("line");
    assert_eq!(rec.errors.len(), 3, "{:?}", rec.errors);
    assert_eq!(rec.errors[0].message, "missing required value");
    assert_eq!(rec.errors[0].column, Some(0));
    assert_eq!(rec.errors[1].field, "kind");
    assert_eq!(rec.errors[1].message, "unexpected value");
    assert_eq!(rec.errors[2].column, Some(4));
    assert!(rec.errors[2].message.contains(r"\d{5}"));
    assert!(rec.get("code").map_or(false, Value::is_null));
}

#[test]
fn test_string_transformations() {
    let layout = Layout::new(vec![
        StringField::new("dept", 4)
            .translate([("SALE", "Sales"), ("ENGR", "Engineering")])
            .into(),
        StringField::new("name", 8).title().into(),
        StringField::new("phone", 8).replace("-", "").expect("replace").into(),
    ])
    .expect("layout");
    let rec = Decoder::new(&layout).parse_line("ENGRjOHN DOE555-1234").expect("line");
    assert!(rec.errors.is_empty(), "{:?}", rec.errors);
    assert_eq!(rec.get("dept").and_then(Value::as_str), Some("Engineering"));
    assert_eq!(rec.get("name").and_then(Value::as_str), Some("John Doe"));
    assert_eq!(rec.get("phone").and_then(Value::as_str), Some("5551234"));

    let rec = Decoder::new(&layout).parse_line("OPS ").expect("line");
    assert_eq!(rec.errors.len(), 1);
    assert_eq!(rec.errors[0].raw, "OPS");

    let out = Encoder::new(&layout).encode([Fields::new().with("dept", "Sales")]);
    assert!(out.text.starts_with("SALE"));
}

#[test]
fn test_boxed_string_spans_rows() {
    let layout = Layout::new(vec![StringField::boxed("notes", 4, 3).line_sep("|").into()]).expect("layout");
    let rec = Decoder::new(&layout).parse_line("ab  cd      ").expect("line");
    assert_eq!(rec.get("notes").and_then(Value::as_str), Some("ab|cd"));
    let out = Encoder::new(&layout).encode([&rec]);
    assert_eq!(out.text, "ab  cd      ");
}

// ==================== Numbers ====================

#[test]
fn test_decimal_implied_scale() {
    let layout = Layout::new(vec![DecimalField::new("amt", 5).implied_scale(2).into()]).expect("layout");
    let rec = Decoder::new(&layout).parse_line("12345").expect("line");
    assert_eq!(rec.get("amt").and_then(Value::as_decimal), Some(Decimal::new(12345, 2)));

    let padded = Layout::new(vec![DecimalField::new("amt", 7).implied_scale(2).pad('0').into()]).expect("layout");
    let out = Encoder::new(&padded).encode([Fields::new().with("amt", Decimal::new(12345, 2))]);
    assert_eq!(out.text, "0012345");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_decimal_round_trips_at_large_implied_scales() {
    let layout = Layout::new(vec![DecimalField::new("a", 25).implied_scale(19).pad('0').into()]).expect("layout");
    let line = format!("{:0>25}", "1");
    let rec = Decoder::new(&layout).parse_line(&line).expect("line");
    assert_eq!(rec.get("a").and_then(Value::as_decimal), Some(Decimal::new(1, 19)));
    let out = Encoder::new(&layout).encode([&rec]);
    assert_eq!(out.text, line);
    assert!(out.warnings.is_empty(), "{:?}", out.warnings);

    let widest = Layout::new(vec![DecimalField::new("a", 30).implied_scale(28).pad('0').into()]).expect("layout");
    let out = Encoder::new(&widest).encode([Fields::new().with("a", Decimal::new(1, 28))]);
    assert_eq!(out.text, format!("{:0>30}", "1"));
    assert!(out.warnings.is_empty(), "{:?}", out.warnings);

    assert!(Layout::new(vec![DecimalField::new("a", 30).implied_scale(29).into()]).is_err());
}

#[test]
fn test_decimal_encode_extracts_number_from_text() {
    let layout = Layout::new(vec![DecimalField::new("amt", 8).implied_scale(2).pad('0').into()]).expect("layout");
    let out = Encoder::new(&layout).encode([Fields::new().with("amt", "$1,234.50")]);
    assert_eq!(out.text, "00123450");
}

#[test]
fn test_decimal_validation() {
    let layout = Layout::new(vec![
        DecimalField::new("a", 3).nonzero().into(),
        DecimalField::new("b", 3).required().into(),
        DecimalField::new("c", 3).into(),
    ])
    .expect("layout");
    let rec = Decoder::new(&layout).parse_line("000   1x2").expect("line");
    assert_eq!(rec.errors.len(), 3, "{:?}", rec.errors);
    assert_eq!(rec.errors[0].message, "value cannot be zero");
    assert_eq!(rec.errors[1].message, "missing required value");
    assert_eq!(rec.errors[2].field, "c");
}

#[test]
fn test_integer_strips_non_digits() {
    let layout = Layout::new(vec![
        IntegerField::new("a", 5).into(),
        IntegerField::new("b", 3).keep_nonnumeric().into(),
        IntegerField::new("c", 3).into(),
    ])
    .expect("layout");
    let rec = Decoder::new(&layout).parse_line("1,234x1    ").expect("line");
    assert_eq!(rec.get("a").and_then(Value::as_i64), Some(1234));
    assert_eq!(rec.errors.len(), 1);
    assert_eq!(rec.errors[0].message, "cannot translate to number");
    assert!(rec.get("c").map_or(false, Value::is_null));

    let out = Encoder::new(&layout).encode([Fields::new().with("a", 12i64)]);
    assert_eq!(out.text, "00012000000");
}

#[test]
fn test_integer_overflow_keeps_low_digits() {
    let layout = Layout::new(vec![IntegerField::new("n", 3).into()]).expect("layout");
    let out = Encoder::new(&layout).encode([Fields::new().with("n", 12345i64)]);
    assert_eq!(out.text, "345");
    assert_eq!(out.warnings.len(), 1);
}

// ==================== Dates ====================

#[test]
fn test_date_min_year_and_derived_keys() {
    let layout = Layout::new(vec![DateField::new("d", 8, "%Y%m%d").min_year(1900).into()]).expect("layout");
    let dec = Decoder::new(&layout);

    let old = dec.parse_line("18950101").expect("line");
    assert!(old.get("d").map_or(false, Value::is_null));
    assert_eq!(old.errors.len(), 1);
    assert!(old.errors[0].message.contains("1900"));

    let ok = dec.parse_line("20011230").expect("line");
    assert!(ok.errors.is_empty());
    assert_eq!(ok.get("d").and_then(Value::as_date), NaiveDate::from_ymd_opt(2001, 12, 30));
    assert_eq!(str_of(&ok.values, "d_fmt"), Some("12/30/2001"));
    assert_eq!(str_of(&ok.values, "d_iso"), Some("20011230"));
}

#[test]
fn test_date_blank_invalid_and_output() {
    let layout = Layout::new(vec![
        DateField::new("a", 8, "%Y%m%d").into(),
        DateField::new("b", 8, "%Y%m%d").none_if_invalid().into(),
        DateField::new("c", 8, "%Y%m%d").output("%d.%m.%Y").into(),
        DateField::new("e", 8, "%Y%m%d").into(),
    ])
    .expect("layout");
    let rec = Decoder::new(&layout).parse_line("20011340garbage!2024030500000000").expect("line");
    assert_eq!(rec.errors.len(), 1, "{:?}", rec.errors);
    assert_eq!(rec.errors[0].field, "a");
    assert!(rec.get("b").map_or(false, Value::is_null));
    assert_eq!(str_of(&rec.values, "c"), Some("05.03.2024"));
    assert_eq!(str_of(&rec.values, "c_iso"), Some("20240305"));
    assert!(rec.get("e").map_or(false, Value::is_null));
    assert_eq!(str_of(&rec.values, "e_fmt"), Some(""));
}

#[test]
fn test_named_datetime_formats() {
    for f in DateTimeFormat::ALL {
        let parsed: DateTimeFormat = f.name().parse().expect("known name");
        assert_eq!(parsed, f);
    }
    assert_eq!(DateTimeFormat::Yymmdd.width(), 6);
    assert_eq!(DateTimeFormat::Yyyymmddhhmmss.width(), 14);
    assert_eq!(
        DateTimeField::named("t", "HHMM").unwrap_err(),
        LayoutError::UnknownDateTimeFormat("HHMM".into())
    );

    let layout = Layout::new(vec![DateTimeField::new("t", DateTimeFormat::Yyyymmddhhmm).into()]).expect("layout");
    let rec = Decoder::new(&layout).parse_line("202403051430").expect("line");
    let expected = NaiveDateTime::parse_from_str("2024-03-05 14:30", "%Y-%m-%d %H:%M").expect("fixture");
    assert_eq!(rec.get("t").and_then(Value::as_datetime), Some(expected));
    assert_eq!(str_of(&rec.values, "t_fmt"), Some("03/05/24 14:30:00"));
    assert_eq!(str_of(&rec.values, "t_iso"), Some("20240305 14:30"));

    let out = Encoder::new(&layout).encode([&rec]);
    assert_eq!(out.text, "202403051430");
}

// ==================== Repeated and nested ====================

#[test]
fn test_repeated_stops_at_end_of_stream() {
    let layout = Layout::new(vec![RepeatedField::new(StringField::new("r", 2), 3).into()]).expect("layout");
    let set = Decoder::new(&layout).parse_str("aabb").expect("decode");
    assert_eq!(set.len(), 1);
    assert_eq!(set.error_count(), 0);
    let list = set[0].get("r").and_then(Value::as_list).expect("list");
    assert_eq!(list.len(), 2);
}

#[test]
fn test_repeated_join_and_excess_values() {
    let layout = Layout::new(vec![RepeatedField::new(StringField::new("r", 3), 3)
        .join(",")
        .rstrip()
        .into()])
    .expect("layout");
    let rec = Decoder::new(&layout).parse_line("ab cd    ").expect("line");
    assert_eq!(rec.get("r").and_then(Value::as_str), Some("ab,cd,"));

    let values = Value::List(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
    let out = Encoder::new(&layout).encode([Fields::new().with("r", values)]);
    assert_eq!(out.text, "a  b  c  ");
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].diagnostic.message.contains("only using the first 3"));

    let short = Value::List(vec!["x".into()]);
    let out = Encoder::new(&layout).encode([Fields::new().with("r", short)]);
    assert_eq!(out.text, "x        ");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_joined_repeated_field_round_trips() {
    let layout = Layout::new(vec![RepeatedField::new(StringField::new("r", 2), 3).join(",").into()]).expect("layout");
    let rec = Decoder::new(&layout).parse_line("aabbcc").expect("line");
    assert_eq!(rec.get("r").and_then(Value::as_str), Some("aa,bb,cc"));

    let out = Encoder::new(&layout).encode([&rec]);
    assert_eq!(out.text, "aabbcc");
    assert!(out.warnings.is_empty(), "{:?}", out.warnings);

    let out = Encoder::new(&layout).encode([Fields::new().with("r", "x,,z,w")]);
    assert_eq!(out.text, "x   z ");
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_nested_group_decode_and_encode() {
    let schema = load(
        r#"
layout Order {
  id: integer(2);
  lines: group(2) {
    sku: string(3);
    qty: integer(2) [required];
  }
}
"#,
    )
    .expect("load");
    let layout = schema.layout("Order").expect("layout");
    let set = Decoder::new(layout)
        .parse_str("01AAA05BBB10\n02CCC  DDD03\n03EEE07")
        .expect("decode");
    assert_eq!(set.len(), 3);

    let subs = set[0].get("lines").and_then(Value::as_group).expect("group");
    assert_eq!(subs.len(), 2);
    assert_eq!(str_of(&subs[1], "sku"), Some("BBB"));
    assert_eq!(subs[1].get("qty").and_then(Value::as_i64), Some(10));

    assert_eq!(set[1].errors.len(), 1);
    assert_eq!(set[1].errors[0].field, "lines[0].qty");

    let cut = set[2].get("lines").and_then(Value::as_group).expect("group");
    assert_eq!(cut.len(), 1);
    assert_eq!(set[2].errors.len(), 0);

    let out = Encoder::new(layout).encode([&set[0]]);
    assert_eq!(out.text, "01AAA05BBB10");
}

#[test]
fn test_group_built_from_code() {
    let group = GroupField::new("g", 2, vec![StringField::new("a", 1).into()]);
    assert_eq!(group.count(), 2);
    let layout = Layout::new(vec![group.into()]).expect("layout");
    assert_eq!(layout.width(), 2);
}

// ==================== Spacing and stream edges ====================

#[test]
fn test_spacing_between_fields() {
    let layout = Layout::new(vec![StringField::new("a", 2).into(), IntegerField::new("b", 3).into()])
        .expect("layout")
        .with_spacing(1);
    assert_eq!(layout.width(), 6);
    let rec = Decoder::new(&layout).parse_line("ab|123").expect("line");
    assert_eq!(rec.get("b").and_then(Value::as_i64), Some(123));
    let out = Encoder::new(&layout).encode([&rec]);
    assert_eq!(out.text, "ab 123");
}

#[test]
fn test_two_lines_of_single_column_fields() {
    let layout = Layout::new(vec![
        StringField::new("x", 1).into(),
        StringField::new("y", 1).into(),
        StringField::new("z", 1).into(),
    ])
    .expect("layout");
    let set = Decoder::new(&layout).parse_str("abc\ndef").expect("decode");
    assert_eq!(set.len(), 2);
    assert_eq!(set.error_count(), 0);
    assert_eq!(set[1].get("z").and_then(Value::as_str), Some("f"));
    assert_eq!(set[1].line_no, 2);
}

#[test]
fn test_blank_lines_and_terminators() {
    let layout = Layout::new(vec![StringField::new("a", 2).into(), IntegerField::new("n", 2).into()])
        .expect("layout");
    let dec = Decoder::new(&layout);

    let set = dec.parse_str("ab01\r\ncd02\r\n\n").expect("decode");
    assert_eq!(set.len(), 2);

    let set = dec.parse_str("ab01\n\ncd02").expect("decode");
    assert_eq!(set.len(), 3);
    assert!(set[1].get("a").and_then(Value::as_str).map_or(false, str::is_empty));
    assert!(set[1].get("n").map_or(false, Value::is_null));

    let set = dec.parse_str("ab01\ncd").expect("decode");
    assert_eq!(set.len(), 2);
    assert_eq!(set[1].get("a").and_then(Value::as_str), Some("cd"));
    assert!(set[1].values.contains_key("n"));
    assert!(set[1].get("n").map_or(false, Value::is_null));

    assert!(dec.parse_str("").expect("decode").is_empty());
}

#[test]
fn test_lazy_records_are_one_pass() {
    let layout = Layout::new(vec![StringField::new("a", 1).into()]).expect("layout");
    let mut it = Decoder::new(&layout).records("x\ny\nz".as_bytes(), Some("mem"));
    let first = it.next().expect("first").expect("ok");
    assert_eq!(first.source.as_deref(), Some("mem"));
    assert_eq!(it.by_ref().count(), 2);
    assert!(it.next().is_none());
}

// ==================== Record sets and reports ====================

#[test]
fn test_accepted_and_rejected_partition() {
    let layout = Layout::new(vec![IntegerField::new("n", 2).required().into()]).expect("layout");
    let set = Decoder::new(&layout).parse_str("01\n  \n03\n  ").expect("decode");
    assert_eq!(set.len(), 4);
    let accepted = set.accepted();
    let rejected = set.rejected();
    assert_eq!(accepted.len() + rejected.len(), set.len());
    assert_eq!(accepted.iter().map(|r| r.line_no).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(rejected.iter().map(|r| r.line_no).collect::<Vec<_>>(), vec![2, 4]);
    assert!(accepted.iter().all(|r| !r.has_errors()));
    assert_eq!(set.error_size(), 2);
    assert_eq!(set.error_count(), 2);
}

#[test]
fn test_parse_file_and_error_report() {
    let layout = Layout::new(vec![
        StringField::new("code", 3).required().into(),
        IntegerField::new("qty", 2).into(),
    ])
    .expect("layout");
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, "ABC01\n   02\n").expect("write");
    let name = file
        .path()
        .file_name()
        .and_then(|n| n.to_str())
        .expect("name")
        .to_string();

    let set = Decoder::new(&layout).parse_file(file.path()).expect("decode");
    assert_eq!(set.source.as_deref(), Some(name.as_str()));
    assert_eq!(set.len(), 2);
    assert_eq!(set[1].source.as_deref(), Some(name.as_str()));

    let report = set.error_report();
    assert_eq!(
        report,
        format!("line: 00002 ({})\n[0] code=\"\": missing required value\n-----\n", name)
    );
    assert_eq!(set[0].format(), "code: \"ABC\"\nqty : 1");
}

#[test]
fn test_parse_file_missing_is_io_error() {
    let layout = Layout::new(vec![StringField::new("a", 1).into()]).expect("layout");
    let err = Decoder::new(&layout).parse_file("/nonexistent/fwcodec/data.txt").unwrap_err();
    assert!(matches!(err, fwcodec::CodecError::Io(_)));
}

// ==================== Configuration errors ====================

#[test]
fn test_layout_configuration_errors() {
    let err = Layout::new(vec![StringField::new("a", 1).pad('é').into()]).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidPad { .. }));

    let err = Layout::new(vec![StringField::new("a", 1).into(), IntegerField::new("a", 1).into()]).unwrap_err();
    assert_eq!(err, LayoutError::DuplicateField("a".into()));

    let err = Layout::new(vec![DateField::new("d", 8, "%Y%").into()]).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidOption { .. }));

    assert!(StringField::new("a", 1).regex("[").is_err());

    let err = Layout::new(vec![DateField::new("d", 14, "%Y%m%d%z").into()]).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidOption { .. }));
    let err = Layout::new(vec![DateField::new("d", 8, "%Y%m%d").output("%Y-%m-%d %z").into()]).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidOption { .. }));
    let err = Layout::new(vec![DateTimeField::new("t", DateTimeFormat::Yyyymmddhhmm).output("%+").into()]).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidOption { .. }));
    assert!(load(r#"layout l { d: date(8, "%Y%m%d") [output("%Z")]; }"#).is_err());
}

#[test]
fn test_zero_width_field_is_absent() {
    let layout = Layout::new(vec![StringField::new("gap", 0).into(), StringField::new("a", 2).into()])
        .expect("layout");
    let rec = Decoder::new(&layout).parse_line("xy").expect("line");
    assert!(rec.get("gap").map_or(false, Value::is_null));
    assert_eq!(rec.get("a").and_then(Value::as_str), Some("xy"));
}
