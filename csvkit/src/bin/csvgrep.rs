//! `csvgrep`: filter rows by a pattern in one or more columns.

use csvkit::{read_header, read_input, run_main, CommonOpt};
use csvkit_core::errors::*;
use csvkit_core::select::{select_columns, ColumnSelection};
use log::debug;
use regex::Regex;
use std::io;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "csvgrep",
    about = "Search CSV files. Like the Unix grep command, but for tabular data."
)]
struct Opt {
    #[structopt(flatten)]
    common: CommonOpt,

    /// Columns to search (default: all).
    #[structopt(short = "c", long = "columns", default_value = "")]
    columns: String,

    /// A regular expression to match.
    #[structopt(short = "r", long = "regex")]
    regex: Option<String>,

    /// An exact string to match (mutually exclusive with `-r`).
    #[structopt(short = "m", long = "match")]
    pattern: Option<String>,

    /// Invert the match: keep rows that do NOT match.
    #[structopt(short = "i", long = "invert-match")]
    invert: bool,
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("Options: {:#?}", opt);

    if opt.regex.is_some() && opt.pattern.is_some() {
        return Err(ErrorKind::ConfigurationError(
            "-r/--regex and -m/--match are mutually exclusive".to_string(),
        )
        .into());
    }

    let re: Option<Regex> = match &opt.regex {
        Some(pattern) => Some(
            Regex::new(pattern).chain_err(|| "can't compile regular expression")?,
        ),
        None => None,
    };

    let buf = read_input(&opt.common.input)?;
    let (header, mut reader) = read_header(&buf, &opt.common)?;

    let includes = ColumnSelection::new(&opt.columns);
    let excludes = ColumnSelection::empty();
    let selected = select_columns(&includes, &excludes, &header, 0)?;

    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new().from_writer(stdout.lock());
    wtr.write_record(header.iter().map(|s| s.as_str()))?;

    let buf_ref = reader.buf();
    let mut write_err = None;
    reader.run_rows(|row, _b| {
        let matched = selected.iter().any(|&i| {
            let text = row.get(i).map(|f| f.slice(buf_ref)).unwrap_or("");
            match (&re, &opt.pattern) {
                (Some(re), _) => re.is_match(text),
                (None, Some(p)) => text == p,
                (None, None) => true,
            }
        });
        if matched != opt.invert {
            let record: Vec<&str> = row.iter().map(|f| f.slice(buf_ref)).collect();
            if let Err(e) = wtr.write_record(&record) {
                write_err = Some(e);
                return Err(csvkit_core::reader::StopIteration);
            }
        }
        Ok(())
    })?;
    if let Some(e) = write_err {
        return Err(e.into());
    }
    wtr.flush()?;
    Ok(())
}

fn main() {
    run_main(run);
}
