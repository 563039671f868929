//! Join engine (spec §4.9, second paragraph).
//!
//! One pair of relations at a time. The right relation is sorted on its
//! key column; for each row of the left, `equal_range` on the sorted
//! right yields all matches. Keys compare successfully only when both
//! sides share the same inferred type (or inference is disabled). Unmatched
//! rows are emitted per the variant's contract; non-key columns from the
//! right replace the key column on output, and wider outputs are padded
//! with empty cells.

use crate::context::Context;
use crate::inference::ColumnType;
use crate::sort::{compare_rows_single_key, stable_sort_rows, SortKey};
use crate::table::{Table, TableRow};

/// Which rows to emit when a key has no partner on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
    /// Rows of the left relation with no match on the right.
    AntiLeft,
    /// Rows of the right relation with no match on the left.
    AntiRight,
}

/// Join `left` and `right` on `left_key`/`right_key`, which must share
/// the same inferred type (or inference must be disabled for both).
pub fn join(
    left: &Table,
    right: &Table,
    left_key: usize,
    right_key: usize,
    key_type: ColumnType,
    kind: JoinKind,
    ctx: &Context,
) -> Table {
    let mut right_sorted = right.clone();
    let right_sort_key = [SortKey {
        column: right_key,
        inferred_type: key_type,
        descending: false,
    }];
    stable_sort_rows(&mut right_sorted, &right_sort_key, ctx);

    let mut right_matched = vec![false; right_sorted.rows.len()];
    let mut out_rows = Vec::new();

    for left_row in &left.rows {
        let range = equal_range(&right_sorted.rows, right_key, left_row, left_key, key_type, ctx);
        if range.is_empty() {
            match kind {
                JoinKind::Left | JoinKind::Outer | JoinKind::AntiLeft => {
                    out_rows.push(pad_left_only(left_row, right.num_cols(), left_key));
                }
                _ => {}
            }
            continue;
        }
        if kind == JoinKind::AntiLeft {
            for idx in range.clone() {
                right_matched[idx] = true;
            }
            continue;
        }
        for idx in range {
            right_matched[idx] = true;
            if matches!(kind, JoinKind::AntiRight) {
                continue;
            }
            out_rows.push(merge_rows(left_row, &right_sorted.rows[idx], right_key));
        }
    }

    if matches!(kind, JoinKind::Right | JoinKind::Outer | JoinKind::AntiRight) {
        for (idx, matched) in right_matched.iter().enumerate() {
            if !*matched {
                out_rows.push(pad_right_only(&right_sorted.rows[idx], left.num_cols(), right_key));
            }
        }
    }

    let header = output_header(left, right, right_key);
    Table {
        header,
        rows: out_rows,
    }
}

fn output_header(left: &Table, right: &Table, right_key: usize) -> Vec<String> {
    let mut header = left.header.clone();
    for (i, name) in right.header.iter().enumerate() {
        if i != right_key {
            header.push(name.clone());
        }
    }
    header
}

fn merge_rows(left: &TableRow, right: &TableRow, right_key: usize) -> TableRow {
    let mut fields = left.fields.clone();
    let mut quoted = left.quoted.clone();
    for (i, (f, q)) in right.fields.iter().zip(right.quoted.iter()).enumerate() {
        if i != right_key {
            fields.push(f.clone());
            quoted.push(*q);
        }
    }
    TableRow { fields, quoted }
}

fn pad_left_only(left: &TableRow, right_cols: usize, _left_key: usize) -> TableRow {
    let mut fields = left.fields.clone();
    let mut quoted = left.quoted.clone();
    for _ in 0..right_cols.saturating_sub(1) {
        fields.push(String::new());
        quoted.push(false);
    }
    TableRow { fields, quoted }
}

fn pad_right_only(right: &TableRow, left_cols: usize, right_key: usize) -> TableRow {
    let mut fields = vec![String::new(); left_cols];
    let mut quoted = vec![false; left_cols];
    for (i, (f, q)) in right.fields.iter().zip(right.quoted.iter()).enumerate() {
        if i != right_key {
            fields.push(f.clone());
            quoted.push(*q);
        }
    }
    TableRow { fields, quoted }
}

/// Binary-search the sorted `right_rows` for the contiguous range of rows
/// whose key equals `left_row`'s key.
fn equal_range(
    right_rows: &[TableRow],
    right_key: usize,
    left_row: &TableRow,
    left_key: usize,
    key_type: ColumnType,
    ctx: &Context,
) -> std::ops::Range<usize> {
    let target = left_row.get(left_key).unwrap_or("");
    let lo = right_rows.partition_point(|r| {
        compare_rows_single_key(r.get(right_key).unwrap_or(""), target, key_type, ctx)
            == std::cmp::Ordering::Less
    });
    let hi = right_rows.partition_point(|r| {
        compare_rows_single_key(r.get(right_key).unwrap_or(""), target, key_type, ctx)
            != std::cmp::Ordering::Greater
    });
    lo..hi
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| TableRow {
                    fields: r.iter().map(|s| s.to_string()).collect(),
                    quoted: vec![false; r.len()],
                })
                .collect(),
        }
    }

    #[test]
    fn inner_join_keeps_only_matching_rows() {
        let ctx = Context::new();
        let left = table(&["id", "name"], &[&["1", "alice"], &["2", "bob"]]);
        let right = table(&["id", "age"], &[&["2", "30"]]);
        let result = join(&left, &right, 0, 0, ColumnType::Number, JoinKind::Inner, &ctx);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].fields, vec!["2", "bob", "30"]);
    }

    #[test]
    fn left_join_keeps_unmatched_left_rows_padded() {
        let ctx = Context::new();
        let left = table(&["id", "name"], &[&["1", "alice"], &["2", "bob"]]);
        let right = table(&["id", "age"], &[&["2", "30"]]);
        let result = join(&left, &right, 0, 0, ColumnType::Number, JoinKind::Left, &ctx);
        assert_eq!(result.rows.len(), 2);
        assert!(result.rows.iter().any(|r| r.fields == vec!["1", "alice", ""]));
    }

    #[test]
    fn anti_left_keeps_only_unmatched_left_rows() {
        let ctx = Context::new();
        let left = table(&["id"], &[&["1"], &["2"]]);
        let right = table(&["id"], &[&["2"]]);
        let result = join(&left, &right, 0, 0, ColumnType::Number, JoinKind::AntiLeft, &ctx);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].fields[0], "1");
    }

    #[test]
    fn outer_join_keeps_both_unmatched_sides() {
        let ctx = Context::new();
        let left = table(&["id", "name"], &[&["1", "alice"]]);
        let right = table(&["id", "age"], &[&["2", "30"]]);
        let result = join(&left, &right, 0, 0, ColumnType::Number, JoinKind::Outer, &ctx);
        assert_eq!(result.rows.len(), 2);
    }
}
