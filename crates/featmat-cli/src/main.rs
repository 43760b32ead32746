//! Command-line renderer for captured featmat runs.
//!
//! Loads a captured run (axis declarations plus outcome records), builds
//! the validated assemblies, and renders them with the selected writers.
//! All comparison semantics live in the library crates; this binary is a
//! thin I/O wrapper around them.

mod capture;

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::info;

use featmat::{HtmlOutput, JsonOutput, ResultOutput, write_all};

const DEFAULT_INPUT: &str = "featmat-run.json";
const DEFAULT_OUTPUT: &str = "reports";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Format {
    Json,
    Html,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    input: PathBuf,
    output: PathBuf,
    format: Format,
    show_help: bool,
}

fn main() {
    init_tracing();

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let exit_code = run(std::env::args_os(), &mut stdout, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run<I, W, E>(args: I, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            let _ = write_usage(err);
            return 2;
        }
    };

    if options.show_help {
        if write_usage(out).is_err() {
            return 1;
        }
        return 0;
    }

    let results = match capture::load(&options.input) {
        Ok(results) => results,
        Err(error) => {
            let _ = writeln!(err, "error: {error}");
            return error.exit_code();
        }
    };

    if let Err(error) = fs::create_dir_all(&options.output) {
        let _ = writeln!(err, "error: cannot create '{}': {error}", options.output.display());
        return 1;
    }

    let json = JsonOutput::new();
    let html = HtmlOutput::new();
    let writers: Vec<&dyn ResultOutput> = match options.format {
        Format::Json => vec![&json],
        Format::Html => vec![&html],
        Format::All => vec![&json, &html],
    };

    match write_all(&writers, &options.output, &results) {
        Ok(()) => {
            info!(
                assemblies = results.len(),
                output = %options.output.display(),
                "render complete"
            );
            0
        }
        Err(error) => {
            let _ = writeln!(err, "error: {error}");
            error.exit_code()
        }
    }
}

fn parse_args<I>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let _argv0 = iter.next();

    let mut input = PathBuf::from(DEFAULT_INPUT);
    let mut output = PathBuf::from(DEFAULT_OUTPUT);
    let mut format = Format::All;
    let mut show_help = false;

    while let Some(argument) = iter.next() {
        let arg = argument.to_string_lossy();
        match arg.as_ref() {
            "-h" | "--help" => {
                show_help = true;
            }
            "-i" | "--input" => {
                let next = iter
                    .next()
                    .ok_or_else(|| String::from("missing FILE argument for `-i/--input`"))?;
                input = PathBuf::from(next);
            }
            "-o" | "--output" => {
                let next = iter
                    .next()
                    .ok_or_else(|| String::from("missing DIR argument for `-o/--output`"))?;
                output = PathBuf::from(next);
            }
            "-f" | "--format" => {
                let next = iter
                    .next()
                    .ok_or_else(|| String::from("missing NAME argument for `-f/--format`"))?;
                format = parse_format(&next.to_string_lossy())?;
            }
            other => {
                return Err(format!("unrecognized argument `{other}`"));
            }
        }
    }

    Ok(CliOptions {
        input,
        output,
        format,
        show_help,
    })
}

fn parse_format(name: &str) -> Result<Format, String> {
    match name {
        "json" => Ok(Format::Json),
        "html" => Ok(Format::Html),
        "all" => Ok(Format::All),
        other => Err(format!(
            "unknown format `{other}` (expected `json`, `html`, or `all`)"
        )),
    }
}

fn write_usage<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w, "usage: featmat [options]")?;
    writeln!(w)?;
    writeln!(w, "Render a captured feature-comparison run into report artifacts.")?;
    writeln!(w)?;
    writeln!(w, "options:")?;
    writeln!(w, "  -i, --input FILE    captured run to render (default: {DEFAULT_INPUT})")?;
    writeln!(w, "  -o, --output DIR    destination directory (default: {DEFAULT_OUTPUT})")?;
    writeln!(w, "  -f, --format NAME   json, html, or all (default: all)")?;
    writeln!(w, "  -h, --help          show this help")?;
    Ok(())
}
