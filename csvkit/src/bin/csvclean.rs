//! `csvclean`: the `--check-integrity` workflow as a standalone tool.
//!
//! Splits a CSV into a well-formed `<name>_out.csv` and a ragged
//! `<name>_err.csv`, or with `--dry-run`, just reports the ragged line
//! numbers to stderr without writing anything.

use csvkit::{read_header, read_input, run_main, CommonOpt};
use csvkit_core::errors::*;
use log::debug;
use std::fs::File;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "csvclean", about = "Check a CSV file for rows of inconsistent width and split the good from the bad.")]
struct Opt {
    #[structopt(flatten)]
    common: CommonOpt,

    /// Report ragged rows to stderr without writing any files.
    #[structopt(short = "n", long = "dry-run")]
    dry_run: bool,
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("Options: {:#?}", opt);

    let path = opt
        .common
        .input
        .clone()
        .ok_or_else(|| ErrorKind::ConfigurationError("csvclean requires an input file path".to_string()))?;

    let buf = read_input(&Some(path.clone()))?;
    let (header, mut reader) = read_header(&buf, &opt.common)?;
    let expected_width = header.len();

    let mut good_rows: Vec<Vec<String>> = Vec::new();
    let mut bad_rows: Vec<(u64, Vec<String>)> = Vec::new();

    let buf_ref = reader.buf();
    let mut line = 1u64; // header occupies line 1
    reader.run_rows(|row, _b| {
        line += 1;
        let width = row.len();
        let fields: Vec<String> = row.iter().map(|f| f.slice(buf_ref).to_string()).collect();
        if width == expected_width || (width == 1 && expected_width == 1) {
            good_rows.push(fields);
        } else {
            bad_rows.push((line, fields));
        }
        Ok(())
    })?;

    if opt.dry_run {
        for (line, fields) in &bad_rows {
            eprintln!("Line {}: expected {} columns, got {} ({})", line, expected_width, fields.len(), fields.join(","));
        }
        return Ok(());
    }

    let stem = stem_of(&path);
    write_csv(&format!("{}_out.csv", stem), &header, &good_rows)?;
    if !bad_rows.is_empty() {
        let mut err_header = vec!["line_number".to_string()];
        err_header.extend(header.iter().cloned());
        let annotated: Vec<Vec<String>> = bad_rows
            .iter()
            .map(|(line, fields)| {
                let mut row = vec![line.to_string()];
                row.extend(fields.iter().cloned());
                row
            })
            .collect();
        write_csv(&format!("{}_err.csv", stem), &err_header, &annotated)?;
        eprintln!(
            "{}",
            Error::from(ErrorKind::TooManyBadRows(bad_rows.len() as u64, (good_rows.len() + bad_rows.len()) as u64))
        );
    }
    Ok(())
}

fn stem_of(path: &PathBuf) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "csvclean".to_string())
}

fn write_csv(path: &str, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let file = File::create(path).chain_err(|| format!("cannot create {}", path))?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() {
    run_main(run);
}
