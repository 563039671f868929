//! Row-width guard & field-size guard (spec §4.7).

use crate::errors::*;
use crate::reader::{RawField, Row};

/// Compares at least the first `K` body rows against `expected_width`
/// (the header's width, or the first body row's if no header). Per spec
/// §4.7, a solitary empty body line is valid only when the file has
/// exactly one column.
pub fn quick_check(rows: &[Row], expected_width: usize) -> Result<()> {
    let mut bad_rows = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let width = row.len();
        if width == expected_width {
            continue;
        }
        if width == 1 && expected_width == 1 {
            continue;
        }
        bad_rows.push(i as u64 + 1);
    }
    if !bad_rows.is_empty() {
        let got = rows
            .iter()
            .map(|r| r.len())
            .find(|&w| w != expected_width)
            .unwrap_or(expected_width);
        return Err(ErrorKind::RaggedRowError(expected_width, got, bad_rows).into());
    }
    Ok(())
}

/// Measures every field in `row` in Unicode *characters* (not bytes); the
/// first field exceeding `limit` fails with the exact 1-based input line
/// it appears on. `line` already accounts for any skipped preamble and
/// the header row, per spec §4.7.
pub fn check_field_sizes(row: &Row, buf: &str, limit: usize, line: u64) -> Result<()> {
    for field in row {
        if field_char_len(field, buf) > limit {
            return Err(ErrorKind::FieldSizeLimitError(limit, line).into());
        }
    }
    Ok(())
}

fn field_char_len(field: &RawField, buf: &str) -> usize {
    field.slice(buf).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use crate::trim::TrimPolicy;

    fn parse_all(buf: &str) -> Vec<Row> {
        let mut rdr = Reader::new(buf, b',', Some(b'"'), TrimPolicy::None);
        let mut out = Vec::new();
        while let Some(row) = rdr.next_row().unwrap() {
            out.push(row);
        }
        out
    }

    #[test]
    fn consistent_widths_pass() {
        let rows = parse_all("1,2,3\n4,5,6\n");
        assert!(quick_check(&rows, 3).is_ok());
    }

    #[test]
    fn ragged_row_reports_expected_and_got() {
        let rows = parse_all("1,2,3\n4,5\n");
        let err = quick_check(&rows, 3).unwrap_err();
        assert!(err.to_string().contains("RaggedRowError"));
    }

    #[test]
    fn single_column_file_tolerates_blank_lines() {
        let rows = parse_all("a\n\nb\n");
        assert!(quick_check(&rows, 1).is_ok());
    }

    #[test]
    fn field_size_exactly_at_limit_is_accepted() {
        let buf = "abcdefghijklm\n"; // 13 chars
        let mut rdr = Reader::new(buf, b',', Some(b'"'), TrimPolicy::None);
        let row = rdr.next_row().unwrap().unwrap();
        assert!(check_field_sizes(&row, buf, 13, 2).is_ok());
    }

    #[test]
    fn field_size_one_over_limit_is_rejected_with_character_count() {
        let buf = "abcdefghijklmn\n"; // 14 chars
        let mut rdr = Reader::new(buf, b',', Some(b'"'), TrimPolicy::None);
        let row = rdr.next_row().unwrap().unwrap();
        let err = check_field_sizes(&row, buf, 13, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "FieldSizeLimitError: CSV contains a field longer than the maximum length of 13 characters on line 2."
        );
    }

    #[test]
    fn field_size_counts_unicode_characters_not_bytes() {
        // 5 "e"-with-acute characters, each 2 bytes in UTF-8 = 10 bytes, 5 chars.
        let buf = "\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\n";
        let mut rdr = Reader::new(buf, b',', Some(b'"'), TrimPolicy::None);
        let row = rdr.next_row().unwrap().unwrap();
        assert!(check_field_sizes(&row, buf, 5, 1).is_ok());
        assert!(check_field_sizes(&row, buf, 4, 1).is_err());
    }
}
