//! Type inference engine (spec §4.4).
//!
//! Scans a materialized column of [`TypedCell`]s and chooses the most
//! specific type that accepts every non-null cell, in the fixed
//! precedence boolean < timedelta < datetime < date < number < text.
//! Each column is independent, so callers can run inference for many
//! columns in parallel (the engine itself is a pure function of one
//! column's cells).

use crate::cell::{CellKind, TypedCell};

/// The inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    Number,
    Date,
    Datetime,
    Timedelta,
    Text,
}

/// Per-column metadata produced by inference (spec §3 "Column metadata").
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub inferred_type: ColumnType,
    pub contains_null: bool,
    /// Only meaningful when `inferred_type == Number`.
    pub max_precision: usize,
}

/// Run inference over one column's cells. `no_inference` forces `Text`
/// for every column (spec §4.4 step 3), except it still exposes
/// `contains_null` so downstream null accounting still works.
pub fn infer_column(cells: &[TypedCell<'_>], no_inference: bool) -> ColumnMeta {
    let contains_null = cells.iter().any(|c| c.is_null());

    if no_inference {
        return ColumnMeta {
            inferred_type: ColumnType::Text,
            contains_null,
            max_precision: 0,
        };
    }

    let non_null: Vec<&TypedCell<'_>> = cells.iter().filter(|c| !c.is_null()).collect();

    // Fixed precedence: boolean, timedelta, datetime, date, number, text.
    let inferred_type = if non_null.iter().all(|c| c.is_boolean()) {
        ColumnType::Boolean
    } else if non_null.iter().all(|c| c.timedelta_tuple().is_some()) {
        ColumnType::Timedelta
    } else if non_null.iter().all(|c| c.datetime().is_some()) {
        ColumnType::Datetime
    } else if non_null.iter().all(|c| c.date().is_some()) {
        ColumnType::Date
    } else if non_null.iter().all(|c| c.is_num()) {
        ColumnType::Number
    } else {
        ColumnType::Text
    };

    let max_precision = if inferred_type == ColumnType::Number {
        non_null.iter().map(|c| c.precision()).max().unwrap_or(0)
    } else {
        0
    };

    ColumnMeta {
        inferred_type,
        contains_null,
        max_precision,
    }
}

impl From<ColumnType> for CellKind {
    fn from(t: ColumnType) -> CellKind {
        match t {
            ColumnType::Boolean => CellKind::Boolean,
            ColumnType::Number => CellKind::Number,
            ColumnType::Date => CellKind::Date,
            ColumnType::Datetime => CellKind::Datetime,
            ColumnType::Timedelta => CellKind::Timedelta,
            ColumnType::Text => CellKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    fn cells<'a>(ctx: &'a Context, values: &'a [&'a str]) -> Vec<TypedCell<'a>> {
        values.iter().map(|v| TypedCell::new(v.as_bytes(), false, ctx)).collect()
    }

    #[test]
    fn pure_01_column_infers_boolean() {
        let ctx = Context::new();
        let c = cells(&ctx, &["1", "0", "1"]);
        let meta = infer_column(&c, false);
        assert_eq!(meta.inferred_type, ColumnType::Boolean);
    }

    #[test]
    fn mixed_01_and_other_numbers_infers_number() {
        let ctx = Context::new();
        let c = cells(&ctx, &["1", "0", "2"]);
        let meta = infer_column(&c, false);
        assert_eq!(meta.inferred_type, ColumnType::Number);
    }

    #[test]
    fn dates_precede_numbers_in_precedence() {
        let ctx = Context::new();
        // "20240101" is numeric AND could look date-ish, but only an
        // actual ISO date string should infer Date; plain digit strings
        // infer Number because they don't parse as a date separator form.
        let c = cells(&ctx, &["2024-01-01", "2024-02-01"]);
        let meta = infer_column(&c, false);
        assert_eq!(meta.inferred_type, ColumnType::Date);
    }

    #[test]
    fn non_null_flag_and_max_precision() {
        let ctx = Context::new();
        let c = cells(&ctx, &["1.5", "", "2.25"]);
        let meta = infer_column(&c, false);
        assert_eq!(meta.inferred_type, ColumnType::Number);
        assert!(meta.contains_null);
        assert_eq!(meta.max_precision, 2);
    }

    #[test]
    fn text_is_the_universal_fallback() {
        let ctx = Context::new();
        let c = cells(&ctx, &["hello", "42"]);
        let meta = infer_column(&c, false);
        assert_eq!(meta.inferred_type, ColumnType::Text);
    }

    #[test]
    fn no_inference_forces_text_but_still_tracks_nulls() {
        let ctx = Context::new();
        let c = cells(&ctx, &["1", ""]);
        let meta = infer_column(&c, true);
        assert_eq!(meta.inferred_type, ColumnType::Text);
        assert!(meta.contains_null);
    }
}
