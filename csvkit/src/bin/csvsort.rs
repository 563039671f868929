//! `csvsort`: sort a CSV by one or more columns.

use csvkit::{read_header, read_input, run_main, CommonOpt};
use csvkit_core::errors::*;
use csvkit_core::inference::infer_column;
use csvkit_core::select::ColumnSelection;
use csvkit_core::sort::{par_sort_rows, sort_rows, stable_sort_rows, SortKey};
use csvkit_core::table::Table;
use log::debug;
use std::io;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "csvsort", about = "Sort CSV files. Like the Unix sort command, but for tabular data.")]
struct Opt {
    #[structopt(flatten)]
    common: CommonOpt,

    /// Columns to sort by, in priority order (default: all, left to right).
    #[structopt(short = "c", long = "columns", default_value = "")]
    columns: String,

    /// Sort in descending order.
    #[structopt(short = "r", long = "reverse")]
    reverse: bool,

    /// Perform a case-insensitive sort on text columns.
    #[structopt(short = "i", long = "ignore-case")]
    ignore_case: bool,

    /// Use a stable sort (preserves input order among equal keys).
    #[structopt(long = "stable")]
    stable: bool,

    /// Sort in parallel, using all available cores.
    #[structopt(long = "parallel")]
    parallel: bool,
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("Options: {:#?}", opt);

    let mut ctx = opt.common.build_context()?;
    ctx.case_insensitive = opt.ignore_case;

    let buf = read_input(&opt.common.input)?;
    let (header, reader) = read_header(&buf, &opt.common)?;

    let mut table = Table::materialize(reader, header.clone())?;

    let key_cols = ColumnSelection::new(&opt.columns).resolve(&header, 0)?;
    let transposed = table.transpose();
    let keys: Vec<SortKey> = key_cols
        .iter()
        .map(|&col| {
            let cells = transposed.typed_column(col, &ctx);
            let meta = infer_column(&cells, ctx.no_inference);
            SortKey {
                column: col,
                inferred_type: meta.inferred_type,
                descending: opt.reverse,
            }
        })
        .collect();
    drop(transposed);

    if opt.parallel {
        par_sort_rows(&mut table, &keys, &ctx);
    } else if opt.stable {
        stable_sort_rows(&mut table, &keys, &ctx);
    } else {
        sort_rows(&mut table, &keys, &ctx);
    }

    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new().from_writer(stdout.lock());
    wtr.write_record(table.header.iter().map(|s| s.as_str()))?;
    for row in &table.rows {
        wtr.write_record(row.fields.iter().map(|s| s.as_str()))?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() {
    run_main(run);
}
