//! Decode, reformat and check fixed-width files against a layout schema.
//!
//! Usage:
//!   fwcodec decode <SCHEMA> <LAYOUT> <DATA> [--rejected] [--errors]
//!   fwcodec reformat <SCHEMA> <LAYOUT> <DATA>
//!   fwcodec check <SCHEMA>
//!
//! `decode` exits with status 1 when any record was rejected. Set `RUST_LOG` for
//! library tracing on stderr (default `warn`).

use anyhow::{bail, Context};
use fwcodec::{load, Decoder, Encoder, ResolvedSchema};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:
  fwcodec decode <SCHEMA> <LAYOUT> <DATA> [--rejected] [--errors]
  fwcodec reformat <SCHEMA> <LAYOUT> <DATA>
  fwcodec check <SCHEMA>";

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    match args.iter().position(|a| a == flag) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

fn load_schema(path: &Path) -> anyhow::Result<ResolvedSchema> {
    let src = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    load(&src).with_context(|| format!("in schema {}", path.display()))
}

fn positional<const N: usize>(args: Vec<String>) -> anyhow::Result<[String; N]> {
    let count = args.len();
    args.try_into()
        .map_err(|_| anyhow::anyhow!("expected {} arguments, got {}\n{}", N, count, USAGE))
}

fn decode(mut args: Vec<String>) -> anyhow::Result<ExitCode> {
    let rejected_only = take_flag(&mut args, "--rejected");
    let errors_only = take_flag(&mut args, "--errors");
    let [schema_path, layout_name, data_path] = positional::<3>(args)?;
    let schema = load_schema(Path::new(&schema_path))?;
    let layout = schema.layout(&layout_name)?;
    let set = Decoder::new(layout)
        .parse_file(&data_path)
        .with_context(|| format!("decoding {}", data_path))?;
    let (total, rejected, errors) = (set.len(), set.error_size(), set.error_count());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if errors_only {
        write!(out, "{}", set.error_report())?;
    } else {
        let shown = if rejected_only { set.rejected() } else { set };
        for record in &shown {
            writeln!(out, "# line {}", record.line_no)?;
            writeln!(out, "{}", record.format())?;
            for w in &record.warnings {
                writeln!(out, "warning: {}", w)?;
            }
            for e in &record.errors {
                writeln!(out, "error: {}", e)?;
            }
        }
    }
    out.flush()?;

    eprintln!("{} records, {} rejected, {} errors", total, rejected, errors);
    Ok(if rejected > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn reformat(args: Vec<String>) -> anyhow::Result<ExitCode> {
    let [schema_path, layout_name, data_path] = positional::<3>(args)?;
    let schema = load_schema(Path::new(&schema_path))?;
    let layout = schema.layout(&layout_name)?;
    let set = Decoder::new(layout)
        .parse_file(&data_path)
        .with_context(|| format!("decoding {}", data_path))?;
    for record in set.rejected().iter() {
        eprint!("{}", record.format_errors());
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let warnings = Encoder::new(layout).encode_to(&set, &mut out)?;
    if !set.is_empty() {
        writeln!(out)?;
    }
    for w in warnings {
        eprintln!("warning: {}", w);
    }
    Ok(ExitCode::SUCCESS)
}

fn check(args: Vec<String>) -> anyhow::Result<ExitCode> {
    let [schema_path] = positional::<1>(args)?;
    let schema = load_schema(Path::new(&schema_path))?;
    for layout in schema.layouts() {
        println!(
            "{}: {} fields, {} columns",
            layout.name(),
            layout.fields().len(),
            layout.width()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        bail!("missing command\n{}", USAGE);
    };
    let rest: Vec<String> = args.collect();
    match command.as_str() {
        "decode" => decode(rest),
        "reformat" => reformat(rest),
        "check" => check(rest),
        "-h" | "--help" => {
            println!("{}", USAGE);
            Ok(ExitCode::SUCCESS)
        }
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    }
}
