//! `csvlook`: render a CSV file as a fixed-width text grid.

use csvkit::{read_header, read_input, run_main, CommonOpt};
use csvkit_core::errors::*;
use csvkit_core::table::Table;
use log::debug;
use std::io::{self, Write};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "csvlook", about = "Render a CSV file in the console as a Markdown-compatible, fixed-width table.")]
struct Opt {
    #[structopt(flatten)]
    common: CommonOpt,

    /// Right-align numeric-looking columns.
    #[structopt(long = "no-number-align")]
    no_number_align: bool,
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("Options: {:#?}", opt);

    let buf = read_input(&opt.common.input)?;
    let (header, reader) = read_header(&buf, &opt.common)?;
    let table = Table::materialize(reader, header.clone())?;

    let align_right = numeric_columns(&table, opt.no_number_align);
    let widths = column_widths(&table, &header);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_row(&mut out, &header, &widths, &align_right)?;
    write_separator(&mut out, &widths)?;
    for row in &table.rows {
        let cells: Vec<&str> = (0..header.len()).map(|i| row.get(i).unwrap_or("")).collect();
        write_row(&mut out, &cells, &widths, &align_right)?;
    }
    Ok(())
}

fn numeric_columns(table: &Table, disabled: bool) -> Vec<bool> {
    if disabled {
        return vec![false; table.num_cols()];
    }
    (0..table.num_cols())
        .map(|col| {
            table
                .rows
                .iter()
                .all(|row| row.get(col).map(|v| v.trim().parse::<f64>().is_ok() || v.trim().is_empty()).unwrap_or(true))
        })
        .collect()
}

fn column_widths(table: &Table, header: &[String]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, w) in widths.iter_mut().enumerate() {
            let len = row.get(i).unwrap_or("").chars().count();
            if len > *w {
                *w = len;
            }
        }
    }
    widths
}

fn write_row<W: Write>(out: &mut W, cells: &[impl AsRef<str>], widths: &[usize], align_right: &[bool]) -> Result<()> {
    write!(out, "|")?;
    for (i, cell) in cells.iter().enumerate() {
        let text = cell.as_ref();
        let width = widths.get(i).copied().unwrap_or(text.chars().count());
        let pad = width.saturating_sub(text.chars().count());
        if align_right.get(i).copied().unwrap_or(false) {
            write!(out, " {}{} |", " ".repeat(pad), text)?;
        } else {
            write!(out, " {}{} |", text, " ".repeat(pad))?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn write_separator<W: Write>(out: &mut W, widths: &[usize]) -> Result<()> {
    write!(out, "|")?;
    for w in widths {
        write!(out, "-{}-|", "-".repeat(*w))?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() {
    run_main(run);
}
