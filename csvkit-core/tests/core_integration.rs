//! Cross-module integration tests: tokenizer -> table -> inference ->
//! sort/join/stats working together the way a tool binary drives them,
//! without going through a CLI.

use csvkit_core::context::Context;
use csvkit_core::inference::{infer_column, ColumnType};
use csvkit_core::join::{join, JoinKind};
use csvkit_core::reader::Reader;
use csvkit_core::sort::{sort_rows, SortKey};
use csvkit_core::stats::{compute_stats, StatsOptions};
use csvkit_core::table::Table;
use csvkit_core::trim::TrimPolicy;

fn table_from(buf: &str) -> Table {
    let mut reader = Reader::new(buf, b',', Some(b'"'), TrimPolicy::None);
    let header = reader
        .next_row()
        .unwrap()
        .unwrap()
        .iter()
        .map(|f| f.slice(buf).to_string())
        .collect();
    Table::materialize(reader, header).unwrap()
}

#[test]
fn sort_then_infer_round_trip_preserves_typed_order() {
    let table = table_from("n\n10\n2\n33\n4\n");
    let mut table = table;
    let ctx = Context::new();
    let keys = [SortKey {
        column: 0,
        inferred_type: ColumnType::Number,
        descending: false,
    }];
    sort_rows(&mut table, &keys, &ctx);
    let values: Vec<&str> = table.rows.iter().map(|r| r.get(0).unwrap()).collect();
    assert_eq!(values, vec!["2", "4", "10", "33"]);
}

#[test]
fn inference_and_stats_agree_on_a_boolean_eligible_column() {
    let table = table_from("a,b,c\n1,2,3\n");
    let transposed = table.transpose();
    let ctx = Context::new();
    let columns: Vec<usize> = (0..table.num_cols()).collect();
    let opts = StatsOptions::default();
    let results = compute_stats(&transposed, &table.header, &columns, &ctx, &opts);
    assert_eq!(results[0].inferred_type, Some(ColumnType::Boolean));
    assert_eq!(results[1].inferred_type, Some(ColumnType::Number));
    assert_eq!(results[1].sum, Some(2.0));
}

#[test]
fn join_on_inferred_numeric_keys_merges_matching_rows() {
    let left = table_from("id,name\n1,alice\n2,bob\n");
    let right = table_from("id,age\n2,30\n");
    let ctx = Context::new();

    let left_t = left.transpose();
    let meta = infer_column(&left_t.typed_column(0, &ctx), false);
    assert_eq!(meta.inferred_type, ColumnType::Number);

    let result = join(&left, &right, 0, 0, meta.inferred_type, JoinKind::Inner, &ctx);
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].fields, vec!["2", "bob", "30"]);
}

#[test]
fn quoted_cells_survive_a_full_materialize_pass_as_text() {
    let table = table_from("a,b\n\"007\",\"true\"\n");
    let ctx = Context::new();
    assert!(table.rows[0].is_quoted(0));
    let cell = table.rows[0].typed_cell(0, &ctx);
    assert!(cell.is_str());
    assert!(!cell.is_num());
}

#[test]
fn ragged_rows_are_still_materialized_for_downstream_quick_check() {
    let table = table_from("a,b,c\n1,2,3\n4,5\n");
    assert_eq!(table.num_rows(), 2);
    assert_eq!(table.rows[1].fields.len(), 2);
}
