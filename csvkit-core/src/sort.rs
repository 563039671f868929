//! Sort engine (spec §4.9).
//!
//! Builds a comparator from the selected key columns and their inferred
//! types: keys compare as their inferred type, falling back to ordinary
//! text comparison when inference was disabled. A stable sort is used by
//! `join`; an ordinary (not-guaranteed-stable) sort is used by
//! `csvsort`, with an explicit stable variant available for callers that
//! need it (spec: "A stable sort is used for join; a normal sort is
//! used for user-facing sort"). Parallel sorting uses rayon, sized to
//! the hardware concurrency count (spec §5).

use crate::cell::TypedCell;
use crate::context::Context;
use crate::inference::ColumnType;
use crate::table::{Table, TableRow};
use rayon::prelude::*;
use std::cmp::Ordering;

/// One sort key: a column index, its inferred type, and whether it
/// sorts descending.
#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    pub column: usize,
    pub inferred_type: ColumnType,
    pub descending: bool,
}

/// Compare two rows on `keys`, honoring each key's inferred type and
/// `case_insensitive` for text comparisons.
pub fn compare_rows(a: &TableRow, b: &TableRow, keys: &[SortKey], ctx: &Context) -> Ordering {
    for key in keys {
        let ord = compare_cell_text(
            a.get(key.column).unwrap_or(""),
            b.get(key.column).unwrap_or(""),
            key.inferred_type,
            ctx,
        );
        let ord = if key.descending { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Compare two raw field strings as a single column of the given
/// inferred type. Exposed for `join`'s `equal_range` search.
pub fn compare_rows_single_key(a: &str, b: &str, ty: ColumnType, ctx: &Context) -> Ordering {
    compare_cell_text(a, b, ty, ctx)
}

fn compare_cell_text(a: &str, b: &str, ty: ColumnType, ctx: &Context) -> Ordering {
    let ca = TypedCell::new(a.as_bytes(), false, ctx);
    let cb = TypedCell::new(b.as_bytes(), false, ctx);

    match ty {
        ColumnType::Number => match (ca.num(), cb.num()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_text(a, b, ctx.case_insensitive),
        },
        ColumnType::Date => match (ca.date(), cb.date()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_text(a, b, ctx.case_insensitive),
        },
        ColumnType::Datetime => match (ca.datetime(), cb.datetime()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_text(a, b, ctx.case_insensitive),
        },
        ColumnType::Timedelta => match (ca.timedelta_tuple(), cb.timedelta_tuple()) {
            (Some(x), Some(y)) => x.total_seconds.partial_cmp(&y.total_seconds).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_text(a, b, ctx.case_insensitive),
        },
        ColumnType::Boolean => match (ca.is_boolean(), cb.is_boolean()) {
            (true, true) => ca.unsafe_bool().cmp(&cb.unsafe_bool()),
            _ => compare_text(a, b, ctx.case_insensitive),
        },
        ColumnType::Text => compare_text(a, b, ctx.case_insensitive),
    }
}

fn compare_text(a: &str, b: &str, case_insensitive: bool) -> Ordering {
    if case_insensitive {
        a.to_lowercase().cmp(&b.to_lowercase())
    } else {
        a.cmp(b)
    }
}

/// Sort `table` in place by `keys`. Not guaranteed stable (matches
/// `csvsort`'s CLI contract); see [`stable_sort_rows`] for `join`.
pub fn sort_rows(table: &mut Table, keys: &[SortKey], ctx: &Context) {
    table.rows.sort_unstable_by(|a, b| compare_rows(a, b, keys, ctx));
}

/// Stable sort, as required by `join`'s `equal_range` contract.
pub fn stable_sort_rows(table: &mut Table, keys: &[SortKey], ctx: &Context) {
    table.rows.sort_by(|a, b| compare_rows(a, b, keys, ctx));
}

/// Parallel variant of [`sort_rows`], sized to the hardware concurrency
/// count via rayon's global pool (spec §5).
pub fn par_sort_rows(table: &mut Table, keys: &[SortKey], ctx: &Context) {
    table.rows.par_sort_unstable_by(|a, b| compare_rows(a, b, keys, ctx));
}
