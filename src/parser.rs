//! Parse layout source into AST using PEST.

use crate::ast::*;
use crate::layout::LayoutError;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct LayoutParser;

/// Parse layout source into AST.
pub fn parse(source: &str) -> Result<Schema, LayoutError> {
    let pairs = LayoutParser::parse(Rule::schema, source).map_err(|e| LayoutError::Parse(e.to_string()))?;
    let pair = pairs
        .into_iter()
        .next()
        .ok_or_else(|| LayoutError::Parse("Empty parse".to_string()))?;
    build_schema(pair).map_err(LayoutError::Parse)
}

fn build_schema(pair: pest::iterators::Pair<Rule>) -> Result<Schema, String> {
    let mut layouts = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::layout_section {
            layouts.push(build_layout(inner)?);
        }
    }
    Ok(Schema { layouts })
}

fn build_layout(pair: pest::iterators::Pair<Rule>) -> Result<LayoutSection, String> {
    let mut name = String::new();
    let mut spacing = 0;
    let mut fields = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => name = inner.as_str().to_string(),
            Rule::spacing_decl => {
                let n = inner.into_inner().next().ok_or("spacing = n")?;
                spacing = parse_number(n.as_str())?;
            }
            Rule::field_decl => fields.push(build_field(inner)?),
            _ => {}
        }
    }
    if name.is_empty() {
        return Err("layout section: missing name".to_string());
    }
    Ok(LayoutSection { name, spacing, fields })
}

fn build_field(pair: pest::iterators::Pair<Rule>) -> Result<FieldDecl, String> {
    let mut it = pair.into_inner();
    let name = it.next().ok_or("field: name")?.as_str().to_string();
    let body = it.next().ok_or_else(|| format!("field {}: missing type", name))?;
    let ty = match body.as_rule() {
        Rule::group_type => build_group(body)?,
        Rule::type_decl => build_type_decl(body)?,
        other => return Err(format!("field {}: unexpected {:?}", name, other)),
    };
    Ok(FieldDecl { name, ty })
}

fn build_group(pair: pest::iterators::Pair<Rule>) -> Result<TypeDecl, String> {
    let mut it = pair.into_inner();
    let count = parse_number(it.next().ok_or("group(n)")?.as_str())?;
    let fields = it.map(build_field).collect::<Result<Vec<_>, _>>()?;
    Ok(TypeDecl {
        spec: TypeSpec::Group { count, fields },
        options: Vec::new(),
    })
}

fn build_type_decl(pair: pest::iterators::Pair<Rule>) -> Result<TypeDecl, String> {
    let mut it = pair.into_inner();
    let spec = build_type_spec(it.next().ok_or("Empty type")?)?;
    let options = match it.next() {
        Some(opts) => opts.into_inner().map(build_option).collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(TypeDecl { spec, options })
}

fn build_type_spec(inner: pest::iterators::Pair<Rule>) -> Result<TypeSpec, String> {
    match inner.as_rule() {
        Rule::string_type => {
            let width = inner.into_inner().next().ok_or("string(n)")?;
            match width.as_rule() {
                Rule::box_width => {
                    let mut it = width.into_inner();
                    let columns = parse_number(it.next().ok_or("string(WxH): columns")?.as_str())?;
                    let lines = parse_number(it.next().ok_or("string(WxH): lines")?.as_str())?;
                    Ok(TypeSpec::String {
                        columns,
                        lines: Some(lines),
                    })
                }
                _ => Ok(TypeSpec::String {
                    columns: parse_number(width.as_str())?,
                    lines: None,
                }),
            }
        }
        Rule::integer_type => {
            let n = inner.into_inner().next().ok_or("integer(n)")?;
            Ok(TypeSpec::Integer(parse_number(n.as_str())?))
        }
        Rule::decimal_type => {
            let n = inner.into_inner().next().ok_or("decimal(n)")?;
            Ok(TypeSpec::Decimal(parse_number(n.as_str())?))
        }
        Rule::date_type => {
            let mut it = inner.into_inner();
            let width = parse_number(it.next().ok_or("date(n, pattern): width")?.as_str())?;
            let pattern = build_string(it.next().ok_or("date(n, pattern): pattern")?)?;
            Ok(TypeSpec::Date { width, pattern })
        }
        Rule::datetime_type => {
            let format = build_string(inner.into_inner().next().ok_or("datetime(format)")?)?;
            Ok(TypeSpec::DateTime(format))
        }
        Rule::repeat_type => {
            let mut it = inner.into_inner();
            let count = parse_number(it.next().ok_or("repeat(n, type): count")?.as_str())?;
            let element = build_type_decl(it.next().ok_or("repeat(n, type): type")?)?;
            Ok(TypeSpec::Repeat {
                count,
                inner: Box::new(element),
            })
        }
        other => Err(format!("Unhandled type rule: {:?}", other)),
    }
}

fn build_option(pair: pest::iterators::Pair<Rule>) -> Result<OptionDecl, String> {
    let mut it = pair.into_inner();
    let name = it.next().ok_or("option: name")?.as_str().to_string();
    let args = it.map(build_arg).collect::<Result<Vec<_>, _>>()?;
    Ok(OptionDecl { name, args })
}

fn build_arg(pair: pest::iterators::Pair<Rule>) -> Result<Arg, String> {
    let inner = pair.into_inner().next().ok_or("Empty argument")?;
    match inner.as_rule() {
        Rule::pair => {
            let mut it = inner.into_inner();
            let from = build_string(it.next().ok_or("pair: left")?)?;
            let to = build_string(it.next().ok_or("pair: right")?)?;
            Ok(Arg::Pair(from, to))
        }
        Rule::string => Ok(Arg::Str(build_string(inner)?)),
        Rule::number => inner
            .as_str()
            .parse()
            .map(Arg::Int)
            .map_err(|e| format!("number {}: {}", inner.as_str(), e)),
        Rule::ident => Ok(Arg::Ident(inner.as_str().to_string())),
        other => Err(format!("Unhandled argument rule: {:?}", other)),
    }
}

fn build_string(pair: pest::iterators::Pair<Rule>) -> Result<String, String> {
    let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
    Ok(unescape(raw))
}

fn parse_number(s: &str) -> Result<usize, String> {
    s.parse().map_err(|e| format!("number {}: {}", s, e))
}

/// `\"`, `\\`, `\n`, `\t` and `\r` are unescaped; any other escape is kept verbatim so
/// regex classes like `\d` survive.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
