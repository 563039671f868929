//! `csvcut`: filter a CSV's columns.

use csvkit::{read_header, read_input, run_main, CommonOpt};
use csvkit_core::errors::*;
use csvkit_core::select::{select_columns, ColumnSelection};
use log::debug;
use std::io::{self, Write};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "csvcut",
    about = "Filter and truncate CSV files. Like the Unix cut command, but for tabular data."
)]
struct Opt {
    #[structopt(flatten)]
    common: CommonOpt,

    /// A comma-separated list of column indices, names, or ranges to include.
    #[structopt(short = "c", long = "columns", default_value = "")]
    columns: String,

    /// A comma-separated list of column indices, names, or ranges to exclude.
    #[structopt(short = "C", long = "not-columns", default_value = "")]
    not_columns: String,

    /// Print the header row and exit.
    #[structopt(short = "n", long = "names")]
    names: bool,
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("Options: {:#?}", opt);

    let buf = read_input(&opt.common.input)?;
    let (header, mut reader) = read_header(&buf, &opt.common)?;

    let includes = ColumnSelection::new(&opt.columns);
    let excludes = ColumnSelection::new(&opt.not_columns);
    let selected = select_columns(&includes, &excludes, &header, 0)?;

    if opt.names {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for (i, name) in header.iter().enumerate() {
            writeln!(out, "{}: {}", i + 1, name)?;
        }
        return Ok(());
    }

    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new().from_writer(stdout.lock());
    wtr.write_record(selected.iter().map(|&i| header[i].as_str()))?;

    let buf_ref = reader.buf();
    let mut write_err = None;
    reader.run_rows(|row, _b| {
        let record: Vec<&str> = selected
            .iter()
            .map(|&i| row.get(i).map(|f| f.slice(buf_ref)).unwrap_or(""))
            .collect();
        match wtr.write_record(&record) {
            Ok(()) => Ok(()),
            Err(e) => {
                write_err = Some(e);
                Err(csvkit_core::reader::StopIteration)
            }
        }
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
