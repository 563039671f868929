//! Shared CLI plumbing for the csvkit-rs tool suite.
//!
//! Argument parsing and per-tool option structs are deliberately kept
//! out of `csvkit-core` (spec §1/§6); this crate is where they live,
//! alongside the small amount of glue every tool needs: turning a common
//! set of flags into a [`csvkit_core::Context`], opening the declared
//! input source, and reading (or synthesizing) the header.

use csvkit_core::context::Context;
use csvkit_core::errors::*;
use csvkit_core::numeric::Locale;
use csvkit_core::quickcheck::quick_check;
use csvkit_core::reader::Reader;
use csvkit_core::table::synthesize_header;
use csvkit_core::temporal::TemporalBackend;
use csvkit_core::trim::TrimPolicy;
use csvkit_core::util::CharSpecifier;
use std::error::Error as StdError;
use std::path::PathBuf;
use structopt::StructOpt;

/// Flags shared by every tool in the suite (spec §6's option table).
/// Each `#[derive(StructOpt)]` tool embeds this with `#[structopt(flatten)]`.
#[derive(Debug, StructOpt)]
pub struct CommonOpt {
    /// Input file (uses stdin if omitted, or if passed as "-").
    #[structopt(parse(from_os_str))]
    pub input: Option<PathBuf>,

    /// Field delimiter.
    #[structopt(value_name = "CHAR", short = "d", long = "delimiter", default_value = ",")]
    pub delimiter: CharSpecifier,

    /// Drop N preamble lines before the header.
    #[structopt(long = "skip-lines", default_value = "0")]
    pub skip_lines: usize,

    /// Treat the first row as data; synthesize a, b, c, ... header.
    #[structopt(short = "H", long = "no-header")]
    pub no_header: bool,

    /// Run quick-check (row-width consistency) before body processing.
    #[structopt(short = "K", long = "check-integrity")]
    pub check_integrity: bool,

    /// Per-cell character-count limit.
    #[structopt(long = "maxfieldsize")]
    pub maxfieldsize: Option<usize>,

    /// Declare the source encoding (consumed post-recode as UTF-8; the
    /// actual transcoding step is out of core scope, spec §4.2).
    #[structopt(short = "e", long = "encoding")]
    pub encoding: Option<String>,

    /// Numeric locale.
    #[structopt(short = "L", long = "locale", default_value = "c")]
    pub locale: String,

    /// Disable the extended null-token set (treat NA/N/A/NONE/NULL/. as
    /// literal text).
    #[structopt(short = "b", long = "blanks")]
    pub blanks: bool,

    /// Add a value to the null-token set (repeatable).
    #[structopt(long = "null-value")]
    pub null_value: Vec<String>,

    /// Force every column to text.
    #[structopt(short = "I", long = "no-inference")]
    pub no_inference: bool,

    /// Date parsing format string.
    #[structopt(long = "date-format")]
    pub date_format: Option<String>,

    /// Datetime parsing format string.
    #[structopt(long = "datetime-format")]
    pub datetime_format: Option<String>,

    /// Reject numerics with leading zeroes.
    #[structopt(long = "no-leading-zeroes")]
    pub no_leading_zeroes: bool,

    /// Use the strict format-string temporal backend instead of the
    /// library backend's tolerant parsing + ISO-8601 fallback (which is
    /// on by default).
    #[structopt(long = "no-date-lib-parser")]
    pub no_date_lib_parser: bool,

    /// Character used to quote entries. May be set to "none" to ignore
    /// all quoting.
    #[structopt(value_name = "CHAR", long = "quote", default_value = "\"")]
    pub quote: CharSpecifier,
}

impl CommonOpt {
    /// Build the frozen, run-wide [`Context`] from these flags (spec §5,
    /// §9: set once before any parallel work begins).
    pub fn build_context(&self) -> Result<Context> {
        let mut ctx = Context::new();
        if self.blanks {
            ctx = ctx.with_blanks_only();
        }
        for v in &self.null_value {
            ctx.add_null_value(v);
        }
        ctx.locale = Locale::by_name(&self.locale)?;
        ctx.date_format = self.date_format.clone();
        ctx.datetime_format = self.datetime_format.clone();
        ctx.no_leading_zeroes = self.no_leading_zeroes;
        ctx.no_inference = self.no_inference;
        ctx.temporal_backend = if self.no_date_lib_parser {
            TemporalBackend::FormatString
        } else {
            TemporalBackend::Library
        };
        Ok(ctx)
    }

    pub fn trim_policy(&self) -> TrimPolicy {
        TrimPolicy::None
    }
}

/// Read the declared input (a file path, `-`, or no argument at all,
/// meaning stdin) to a validated UTF-8 string.
pub fn read_input(path: &Option<PathBuf>) -> Result<String> {
    use csvkit_core::source::{open, read_to_utf8, SourceSpec};
    let spec = match path {
        None => SourceSpec::Stdin,
        Some(p) if p.as_os_str() == "-" => SourceSpec::Stdin,
        Some(p) => SourceSpec::Path(p.as_path()),
    };
    read_to_utf8(open(spec)?)
}

/// Skip the configured preamble, then read (or synthesize) the header,
/// returning it plus a `Reader` positioned at the first body row.
pub fn read_header<'a>(
    buf: &'a str,
    opt: &CommonOpt,
) -> Result<(Vec<String>, Reader<'a>)> {
    let quote = opt.quote.char();
    let delim = opt.delimiter.char().ok_or_else(|| {
        ErrorKind::ConfigurationError("field delimiter is required".to_string())
    })?;
    let mut reader = Reader::new(buf, delim, quote, opt.trim_policy());
    reader.skip_rows(opt.skip_lines)?;

    let (header, mut reader) = if opt.no_header {
        // Peek the first row to learn the width, then rewind by
        // re-creating the reader and skipping the preamble again (the
        // peeked row is still the first body row).
        let mut peek = Reader::new(buf, delim, quote, opt.trim_policy());
        peek.skip_rows(opt.skip_lines)?;
        let width = peek.next_row()?.map(|r| r.len()).unwrap_or(0);
        let header = synthesize_header(width)?;
        (header, reader)
    } else {
        let first = reader.next_row()?;
        let header = match first {
            Some(row) => row.iter().map(|f| f.slice(buf).to_string()).collect(),
            None => Vec::new(),
        };
        (header, reader)
    };

    if opt.check_integrity {
        check_integrity(buf, opt, delim, quote, header.len())?;
    }

    reader = reader.with_maxfieldsize(opt.maxfieldsize);
    Ok((header, reader))
}

/// `-K`/`--check-integrity`: a full pre-pass over the body, independent
/// of the reader the caller will actually stream from, raising
/// `RaggedRowError` before any output is produced (spec §4.7).
fn check_integrity(
    buf: &str,
    opt: &CommonOpt,
    delim: u8,
    quote: Option<u8>,
    expected_width: usize,
) -> Result<()> {
    let mut reader = Reader::new(buf, delim, quote, opt.trim_policy());
    reader.skip_rows(opt.skip_lines)?;
    if !opt.no_header {
        reader.skip_rows(1)?;
    }
    let mut rows = Vec::new();
    reader.run_rows(|row, _b| {
        rows.push(row.clone());
        Ok(())
    })?;
    quick_check(&rows, expected_width)
}

/// The teacher's `fn main` pattern: run `body`, print a class-prefixed
/// diagnostic and exit non-zero on error.
pub fn run_main(body: impl FnOnce() -> Result<()>) {
    env_logger::init();
    if let Err(err) = body() {
        eprintln!("{}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(err.to_exit_code());
    }
}
