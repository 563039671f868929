//! `csvstat`: print descriptive statistics for each column.

use csvkit::{read_header, read_input, run_main, CommonOpt};
use csvkit_core::errors::*;
use csvkit_core::inference::ColumnType;
use csvkit_core::select::ColumnSelection;
use csvkit_core::stats::{compute_stats, ColumnStats, FreqEntry, SingleOp, StatsOptions};
use csvkit_core::table::Table;
use log::debug;
use serde_json::json;
use std::io::{self, Write};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "csvstat", about = "Print descriptive statistics for each column in a CSV file.")]
struct Opt {
    #[structopt(flatten)]
    common: CommonOpt,

    /// Restrict to these columns (default: all).
    #[structopt(short = "c", long = "columns", default_value = "")]
    columns: String,

    /// Print only the row count and exit.
    #[structopt(long = "count")]
    count: bool,

    /// Number of frequent values to report per column.
    #[structopt(long = "freq-count", default_value = "5")]
    freq_count: usize,

    /// Emit one row of statistics per column, as CSV.
    #[structopt(long = "csv")]
    as_csv: bool,

    /// Emit statistics as a JSON object keyed by column name.
    #[structopt(long = "json")]
    as_json: bool,

    /// Print only the minimum.
    #[structopt(long = "min")]
    min: bool,
    /// Print only the maximum.
    #[structopt(long = "max")]
    max: bool,
    /// Print only the sum.
    #[structopt(long = "sum")]
    sum: bool,
    /// Print only the mean.
    #[structopt(long = "mean")]
    mean: bool,
    /// Print only the median.
    #[structopt(long = "median")]
    median: bool,
    /// Print only the standard deviation.
    #[structopt(long = "stdev")]
    stdev: bool,
    /// Print only the longest value's length.
    #[structopt(long = "len")]
    len: bool,
    /// Print only the null count.
    #[structopt(long = "nulls")]
    nulls: bool,
    /// Print only the unique-value count.
    #[structopt(long = "unique")]
    unique: bool,
    /// Print only the maximum precision.
    #[structopt(long = "max-precision")]
    max_precision: bool,
    /// Print only the frequency table.
    #[structopt(long = "freq")]
    freq: bool,
}

impl Opt {
    fn single_op(&self) -> Option<SingleOp> {
        if self.min {
            Some(SingleOp::Min)
        } else if self.max {
            Some(SingleOp::Max)
        } else if self.sum {
            Some(SingleOp::Sum)
        } else if self.mean {
            Some(SingleOp::Mean)
        } else if self.median {
            Some(SingleOp::Median)
        } else if self.stdev {
            Some(SingleOp::Stdev)
        } else if self.len {
            Some(SingleOp::Len)
        } else if self.nulls {
            Some(SingleOp::NullCount)
        } else if self.unique {
            Some(SingleOp::Unique)
        } else if self.max_precision {
            Some(SingleOp::MaxPrecision)
        } else if self.freq {
            Some(SingleOp::Freq)
        } else {
            None
        }
    }
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("Options: {:#?}", opt);

    let ctx = opt.common.build_context()?;
    let buf = read_input(&opt.common.input)?;
    let (header, reader) = read_header(&buf, &opt.common)?;

    if opt.count {
        let table = Table::materialize(reader, header)?;
        println!("{}", table.num_rows());
        return Ok(());
    }

    let table = Table::materialize(reader, header.clone())?;
    let transposed = table.transpose();
    let columns = ColumnSelection::new(&opt.columns).resolve(&header, 0)?;
    let stats_opts = StatsOptions {
        freq_count: opt.freq_count,
        single_op: opt.single_op(),
    };
    let results = compute_stats(&transposed, &header, &columns, &ctx, &stats_opts);

    if opt.as_json {
        print_json(&results)?;
    } else if opt.as_csv {
        print_csv(&results)?;
    } else if let Some(op) = stats_opts.single_op {
        print_single_op(&results, op)?;
    } else {
        print_plain(&results);
    }
    Ok(())
}

fn type_name(ty: Option<ColumnType>) -> &'static str {
    match ty {
        Some(ColumnType::Boolean) => "Boolean",
        Some(ColumnType::Number) => "Number",
        Some(ColumnType::Date) => "Date",
        Some(ColumnType::Datetime) => "DateTime",
        Some(ColumnType::Timedelta) => "TimeDelta",
        Some(ColumnType::Text) => "Text",
        None => "Text",
    }
}

fn print_plain(results: &[ColumnStats]) {
    for s in results {
        println!("{}. {}", s.column_id + 1, s.name);
        println!("\t{}", type_name(s.inferred_type));
        if let Some(v) = &s.min {
            println!("\tMin: {}", v);
        }
        if let Some(v) = &s.max {
            println!("\tMax: {}", v);
        }
        if let Some(v) = s.sum {
            println!("\tSum: {}", v);
        }
        if let Some(v) = s.mean {
            println!("\tMean: {}", v);
        }
        if let Some(v) = s.median {
            println!("\tMedian: {}", v);
        }
        if let Some(v) = s.stdev {
            println!("\tStandard Deviation: {}", v);
        }
        if let Some(v) = s.max_precision {
            println!("\tMax Precision: {}", v);
        }
        if let Some(v) = s.longest {
            println!("\tLongest value: {}", v);
        }
        println!("\tNull Values: {}", if s.nulls > 0 { "True" } else { "False" });
        println!("\tUnique Values: {}", s.unique);
        if !s.freq.is_empty() {
            println!("\t{} most frequent values:", s.freq.len());
            for entry in &s.freq {
                match entry {
                    FreqEntry::Value { text, count } => println!("\t\t{}:\t{}", text, count),
                    FreqEntry::None { count } => println!("\t\tNone:\t{}", count),
                }
            }
        }
        println!();
    }
    println!("Row count: {}", results.first().map(|s| s.count).unwrap_or(0));
}

fn print_single_op(results: &[ColumnStats], op: SingleOp) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for s in results {
        let value = match op {
            SingleOp::Min => s.min.clone().unwrap_or_default(),
            SingleOp::Max => s.max.clone().unwrap_or_default(),
            SingleOp::Sum => s.sum.map(|v| v.to_string()).unwrap_or_default(),
            SingleOp::Mean => s.mean.map(|v| v.to_string()).unwrap_or_default(),
            SingleOp::Median => s.median.map(|v| v.to_string()).unwrap_or_default(),
            SingleOp::Stdev => s.stdev.map(|v| v.to_string()).unwrap_or_default(),
            SingleOp::Len => s.longest.map(|v| v.to_string()).unwrap_or_default(),
            SingleOp::NullCount => s.nulls.to_string(),
            SingleOp::Unique => s.unique.to_string(),
            SingleOp::MaxPrecision => s.max_precision.map(|v| v.to_string()).unwrap_or_default(),
            SingleOp::Freq => s
                .freq
                .first()
                .map(|e| match e {
                    FreqEntry::Value { text, .. } => text.clone(),
                    FreqEntry::None { .. } => "None".to_string(),
                })
                .unwrap_or_default(),
        };
        writeln!(out, "{}", value)?;
    }
    Ok(())
}

fn print_csv(results: &[ColumnStats]) -> Result<()> {
    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new().from_writer(stdout.lock());
    wtr.write_record([
        "column_id", "column_name", "type", "nulls", "unique", "min", "max", "sum", "mean",
        "median", "stdev",
    ])?;
    for s in results {
        wtr.write_record(&[
            (s.column_id + 1).to_string(),
            s.name.clone(),
            type_name(s.inferred_type).to_string(),
            s.nulls.to_string(),
            s.unique.to_string(),
            s.min.clone().unwrap_or_default(),
            s.max.clone().unwrap_or_default(),
            s.sum.map(|v| v.to_string()).unwrap_or_default(),
            s.mean.map(|v| v.to_string()).unwrap_or_default(),
            s.median.map(|v| v.to_string()).unwrap_or_default(),
            s.stdev.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_json(results: &[ColumnStats]) -> Result<()> {
    let mut map = serde_json::Map::new();
    for s in results {
        let freq: Vec<serde_json::Value> = s
            .freq
            .iter()
            .map(|e| match e {
                FreqEntry::Value { text, count } => json!({"value": text, "count": count}),
                FreqEntry::None { count } => json!({"value": null, "count": count}),
            })
            .collect();
        map.insert(
            s.name.clone(),
            json!({
                "type": type_name(s.inferred_type),
                "nulls": s.nulls,
                "unique": s.unique,
                "min": s.min,
                "max": s.max,
                "sum": s.sum,
                "mean": s.mean,
                "median": s.median,
                "stdev": s.stdev,
                "max_precision": s.max_precision,
                "freq": freq,
            }),
        );
    }
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

fn main() {
    run_main(run);
}
