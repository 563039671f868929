//! `csvstack`: stack the rows of multiple CSV files into one.

use csvkit::{read_header, run_main, CommonOpt};
use csvkit_core::errors::*;
use csvkit_core::source::{open, read_to_utf8, SourceSpec};
use log::debug;
use std::io;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "csvstack", about = "Stack up the rows from multiple CSV files, optionally adding a grouping value.")]
struct Opt {
    #[structopt(flatten)]
    common: CommonOpt,

    /// Input files to stack (two or more).
    #[structopt(parse(from_os_str))]
    inputs: Vec<PathBuf>,

    /// A comma-separated list of group values, one per input file, in
    /// the same order as the input files.
    #[structopt(short = "g", long = "groups")]
    groups: Option<String>,

    /// The name of the grouping column (default: "group").
    #[structopt(short = "n", long = "group-name", default_value = "group")]
    group_name: String,

    /// Assume all input files share a header and do not repeat it.
    #[structopt(long = "filenames")]
    use_filenames: bool,
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("Options: {:#?}", opt);

    // `CommonOpt::input` is itself a positional argument, so clap hands
    // the first bare word to it and the rest to `inputs`; stitch them
    // back into one ordered list rather than silently dropping the
    // first file.
    let mut files: Vec<PathBuf> = opt.common.input.iter().cloned().collect();
    files.extend(opt.inputs.iter().cloned());

    let group_labels: Option<Vec<String>> = match &opt.groups {
        Some(g) => Some(g.split(',').map(|s| s.trim().to_string()).collect()),
        None => {
            if opt.use_filenames {
                Some(
                    files
                        .iter()
                        .map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default())
                        .collect(),
                )
            } else {
                None
            }
        }
    };

    if let Some(labels) = &group_labels {
        if labels.len() != files.len() {
            return Err(ErrorKind::ConfigurationError(format!(
                "{} group labels given for {} input files",
                labels.len(),
                files.len()
            ))
            .into());
        }
    }

    let mut bufs = Vec::with_capacity(files.len());
    for path in &files {
        let raw = open(SourceSpec::Path(path))?;
        bufs.push(read_to_utf8(raw)?);
    }

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();

    for (i, buf) in bufs.iter().enumerate() {
        let (this_header, mut reader) = read_header(buf, &opt.common)?;
        if header.is_none() {
            header = Some(this_header.clone());
        }
        let buf_ref = reader.buf();
        reader.run_rows(|row, _b| {
            rows.push((i, row.iter().map(|f| f.slice(buf_ref).to_string()).collect()));
            Ok(())
        })?;
    }

    let header = header.unwrap_or_default();
    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new().from_writer(stdout.lock());

    let mut out_header = Vec::new();
    if group_labels.is_some() {
        out_header.push(opt.group_name.clone());
    }
    out_header.extend(header.iter().cloned());
    wtr.write_record(&out_header)?;

    for (source_idx, fields) in &rows {
        let mut record = Vec::with_capacity(fields.len() + 1);
        if let Some(labels) = &group_labels {
            record.push(labels[*source_idx].clone());
        }
        record.extend(fields.iter().cloned());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() {
    run_main(run);
}
