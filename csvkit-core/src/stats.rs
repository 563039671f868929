//! Statistics engine (spec §4.8).
//!
//! For a chosen column set, runs per-column in parallel (rayon, sized to
//! hardware concurrency per spec §5) and selects an aggregator by the
//! column's inferred type. Parallel results are re-ordered to match
//! input column order before emission (spec §5 "Ordering guarantees").

use crate::context::Context;
use crate::inference::{infer_column, ColumnMeta, ColumnType};
use crate::table::TransposedTable;
use rayon::prelude::*;
use std::collections::HashMap;

/// One frequency-table entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FreqEntry {
    Value { text: String, count: usize },
    /// The "None" row, standing in for null cells (spec §4.8 "Frequency
    /// table").
    None { count: usize },
}

/// The full set of aggregates computed for one column, gated by its
/// inferred type (spec §4.8's table).
#[derive(Debug, Clone, Default)]
pub struct ColumnStats {
    pub name: String,
    pub column_id: usize,
    pub inferred_type: Option<ColumnType>,
    pub count: usize,
    pub nulls: usize,
    pub unique: usize,
    pub min: Option<String>,
    pub max: Option<String>,
    pub sum: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub stdev: Option<f64>,
    pub max_precision: Option<usize>,
    pub longest: Option<usize>,
    pub freq: Vec<FreqEntry>,
}

/// Knobs that narrow the statistics engine's work (spec §4.8 "Single
/// operation mode" / "row count only").
#[derive(Debug, Clone, Copy)]
pub struct StatsOptions {
    pub freq_count: usize,
    /// When `Some`, skip every aggregate except this one (plus the
    /// common null/unique accounting).
    pub single_op: Option<SingleOp>,
}

impl Default for StatsOptions {
    fn default() -> Self {
        StatsOptions {
            freq_count: 5,
            single_op: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleOp {
    Min,
    Max,
    Sum,
    Mean,
    Median,
    Stdev,
    Len,
    NullCount,
    Unique,
    MaxPrecision,
    Freq,
}

/// Compute stats for every selected column, re-ordered to match input
/// column order (spec §5).
pub fn compute_stats(
    table: &TransposedTable<'_>,
    header: &[String],
    columns: &[usize],
    ctx: &Context,
    opts: &StatsOptions,
) -> Vec<ColumnStats> {
    let mut results: Vec<(usize, ColumnStats)> = columns
        .par_iter()
        .map(|&col| {
            let cells = table.typed_column(col, ctx);
            let meta = infer_column(&cells, ctx.no_inference);
            let stats = compute_column_stats(&cells, &meta, header[col].clone(), col, opts);
            (col, stats)
        })
        .collect();

    results.sort_by_key(|(col, _)| columns.iter().position(|c| c == col).unwrap_or(*col));
    results.into_iter().map(|(_, s)| s).collect()
}

fn compute_column_stats(
    cells: &[crate::cell::TypedCell<'_>],
    meta: &ColumnMeta,
    name: String,
    column_id: usize,
    opts: &StatsOptions,
) -> ColumnStats {
    let mut stats = ColumnStats {
        name,
        column_id,
        inferred_type: Some(meta.inferred_type),
        count: cells.len(),
        nulls: cells.iter().filter(|c| c.is_null()).count(),
        max_precision: if meta.inferred_type == ColumnType::Number {
            Some(meta.max_precision)
        } else {
            None
        },
        ..Default::default()
    };

    let texts: Vec<&str> = cells.iter().filter(|c| !c.is_null()).map(|c| c.text()).collect();
    stats.unique = {
        let mut seen: HashMap<&str, ()> = HashMap::new();
        for t in &texts {
            seen.insert(t, ());
        }
        seen.len()
    };

    match meta.inferred_type {
        ColumnType::Number => {
            let values: Vec<f64> = cells.iter().filter_map(|c| if c.is_null() { None } else { c.num() }).collect();
            numeric_stats(&mut stats, &values);
        }
        ColumnType::Timedelta => {
            let values: Vec<f64> = cells
                .iter()
                .filter_map(|c| if c.is_null() { None } else { c.timedelta_tuple().map(|t| t.total_seconds) })
                .collect();
            numeric_stats(&mut stats, &values);
        }
        ColumnType::Date => {
            let values: Vec<String> = cells
                .iter()
                .filter_map(|c| if c.is_null() { None } else { c.date().map(|d| d.to_string()) })
                .collect();
            stats.min = values.iter().min().cloned();
            stats.max = values.iter().max().cloned();
        }
        ColumnType::Datetime => {
            let values: Vec<String> = cells
                .iter()
                .filter_map(|c| if c.is_null() { None } else { c.datetime().map(|d| d.to_string()) })
                .collect();
            stats.min = values.iter().min().cloned();
            stats.max = values.iter().max().cloned();
        }
        ColumnType::Boolean => {
            // count/null/unique/freq only, per spec's table.
        }
        ColumnType::Text => {
            stats.longest = texts.iter().map(|t| t.chars().count()).max();
        }
    }

    let freq_count = if opts.single_op == Some(SingleOp::Freq) || opts.single_op.is_none() {
        opts.freq_count
    } else {
        0
    };
    if freq_count > 0 {
        stats.freq = frequency_table(&texts, stats.nulls, freq_count);
    }

    stats
}

fn numeric_stats(stats: &mut ColumnStats, values: &[f64]) {
    if values.is_empty() {
        return;
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return;
    }
    let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = finite.iter().sum();
    let mean = sum / finite.len() as f64;

    stats.min = Some(format_number(min));
    stats.max = Some(format_number(max));
    stats.sum = Some(sum);
    stats.mean = Some(mean);
    stats.median = Some(median(&finite));
    stats.stdev = Some(welford_stdev(&finite));
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Median via nth-element partitioning (spec: "median (via nth-element
/// partitioning, ignoring nulls)"), i.e. `select_nth_unstable`.
fn median(values: &[f64]) -> f64 {
    let mut v = values.to_vec();
    let n = v.len();
    let mid = n / 2;
    let (_, &mut mid_val, _) = v.select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap());
    if n % 2 == 1 {
        mid_val
    } else {
        let (_, &mut lower_val, _) = v.select_nth_unstable_by(mid - 1, |a, b| a.partial_cmp(b).unwrap());
        (lower_val + mid_val) / 2.0
    }
}

/// Welford's online algorithm for a numerically stable sample standard
/// deviation (spec: "stdev (Welford online)").
fn welford_stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mut mean = 0.0;
    let mut m2 = 0.0;
    let mut count = 0.0;
    for &x in values {
        count += 1.0;
        let delta = x - mean;
        mean += delta / count;
        let delta2 = x - mean;
        m2 += delta * delta2;
    }
    (m2 / (count - 1.0)).sqrt()
}

/// Build the top-`k` frequency table, with the "None" tie-break rule
/// transcribed from the original `csvstat.cpp`'s `mcv` helper (spec §9
/// Open Questions: preserve verbatim rather than re-derive):
///
/// entries are scanned in descending-count order; the first entry whose
/// count is *less than* the null count causes a `None` row to be emitted
/// immediately before it (once); if every entry's count is `>=` the null
/// count, `None` is appended after all printed entries, provided nulls
/// exist and the printed-entry budget wasn't already spent.
pub fn frequency_table(texts: &[&str], nulls: usize, k: usize) -> Vec<FreqEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for &t in texts {
        if !counts.contains_key(t) {
            order.push(t);
        }
        *counts.entry(t).or_insert(0) += 1;
    }
    // Sort by count descending, ties broken by insertion order.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    if order.is_empty() && nulls > 0 {
        return vec![FreqEntry::None { count: nulls }];
    }

    let mut out = Vec::new();
    let mut none_printed = false;
    let mut num_printed = 0usize;

    for value in &order {
        let count = counts[value];
        if count >= nulls {
            out.push(FreqEntry::Value {
                text: value.to_string(),
                count,
            });
            num_printed += 1;
        } else {
            if !none_printed {
                out.push(FreqEntry::None { count: nulls });
                none_printed = true;
                num_printed += 1;
            }
            if num_printed < k {
                out.push(FreqEntry::Value {
                    text: value.to_string(),
                    count,
                });
                num_printed += 1;
            }
        }
        if num_printed >= k {
            break;
        }
    }

    if num_printed != k && !none_printed && nulls > 0 {
        out.push(FreqEntry::None { count: nulls });
    }

    out
}
