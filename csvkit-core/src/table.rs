//! In-memory table (spec §3, §4.9).
//!
//! Materializes a stream into rows x columns for sort, join, and stat. A
//! transposed variant stores columns as contiguous sequences for
//! cache-friendly column operations (used by the stat engine).

use crate::context::Context;
use crate::errors::*;
use crate::reader::Reader;
use crate::trim::TrimPolicy;
use crate::cell::TypedCell;

/// One materialized row: an owned, fixed-width ordered sequence of
/// fields, each still holding its own quoting flag.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub fields: Vec<String>,
    pub quoted: Vec<bool>,
}

impl TableRow {
    pub fn get(&self, i: usize) -> Option<&str> {
        self.fields.get(i).map(|s| s.as_str())
    }

    pub fn is_quoted(&self, i: usize) -> bool {
        self.quoted.get(i).copied().unwrap_or(false)
    }

    pub fn typed_cell<'a>(&'a self, i: usize, ctx: &'a Context) -> TypedCell<'a> {
        let text = self.get(i).unwrap_or("");
        TypedCell::new(text.as_bytes(), self.is_quoted(i), ctx)
    }
}

/// An ordered sequence of rows, row-major.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Materialize `reader`'s remaining rows into a table. `header` has
    /// already been consumed by the caller (real or synthesized).
    pub fn materialize(mut reader: Reader<'_>, header: Vec<String>) -> Result<Table> {
        let mut rows = Vec::new();
        let buf = reader.buf();
        while let Some(row) = reader.next_row()? {
            let fields = row.iter().map(|f| f.slice(buf).to_string()).collect();
            let quoted = row.iter().map(|f| f.quoted).collect();
            rows.push(TableRow { fields, quoted });
        }
        Ok(Table { header, rows })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.header.len()
    }

    /// Column-major transposition: one contiguous `Vec<&str>` per column,
    /// cache-friendly for the stat engine's per-column aggregation.
    pub fn transpose(&self) -> TransposedTable<'_> {
        let mut columns: Vec<Vec<&str>> = (0..self.num_cols()).map(|_| Vec::with_capacity(self.rows.len())).collect();
        let mut quoted: Vec<Vec<bool>> = (0..self.num_cols()).map(|_| Vec::with_capacity(self.rows.len())).collect();
        for row in &self.rows {
            for col in 0..self.num_cols() {
                columns[col].push(row.get(col).unwrap_or(""));
                quoted[col].push(row.is_quoted(col));
            }
        }
        TransposedTable { columns, quoted }
    }
}

/// Columns stored contiguously (spec §3 "transposed variant").
pub struct TransposedTable<'a> {
    pub columns: Vec<Vec<&'a str>>,
    pub quoted: Vec<Vec<bool>>,
}

impl<'a> TransposedTable<'a> {
    pub fn typed_column<'b>(&'b self, col: usize, ctx: &'b Context) -> Vec<TypedCell<'b>> {
        self.columns[col]
            .iter()
            .zip(self.quoted[col].iter())
            .map(|(text, &quoted)| TypedCell::new(text.as_bytes(), quoted, ctx))
            .collect()
    }
}

/// Synthesize `a, b, c, …, z, aa, …` column names for a headerless
/// stream. Caps at 702 columns (`zz`); above that, synthesis fails.
pub fn synthesize_header(num_cols: usize) -> Result<Vec<String>> {
    const CAP: usize = 26 * 26 + 26; // "zz" == 702
    if num_cols > CAP {
        return Err(ErrorKind::ConfigurationError(format!(
            "cannot synthesize header names for {} columns (cap is {})",
            num_cols, CAP
        ))
        .into());
    }
    Ok((0..num_cols).map(spreadsheet_name).collect())
}

fn spreadsheet_name(mut index: usize) -> String {
    let mut chars = Vec::new();
    loop {
        let rem = index % 26;
        chars.push((b'a' + rem as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    chars.iter().rev().collect()
}

/// Split `buf` on the reader's trim policy and delimiter/quote settings,
/// reading the header (real or synthesized) and leaving the reader
/// positioned at the first body row.
pub fn read_header(
    reader: &mut Reader<'_>,
    no_header: bool,
) -> Result<Vec<String>> {
    if no_header {
        // We don't know the width until we peek the first body row; the
        // caller re-synthesizes once it knows. Return an empty header as
        // a placeholder the caller replaces.
        return Ok(Vec::new());
    }
    let buf = reader.buf();
    match reader.next_row()? {
        Some(row) => Ok(row.iter().map(|f| f.slice(buf).to_string()).collect()),
        None => Ok(Vec::new()),
    }
}

/// Build a reader with the trim policy and delimiter the tool was
/// configured with.
pub fn make_reader<'a>(buf: &'a str, delimiter: u8, quote: Option<u8>, trim: TrimPolicy) -> Reader<'a> {
    Reader::new(buf, delimiter, quote, trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_spreadsheet_style_names() {
        let header = synthesize_header(28).unwrap();
        assert_eq!(header[0], "a");
        assert_eq!(header[25], "z");
        assert_eq!(header[26], "aa");
        assert_eq!(header[27], "ab");
    }

    #[test]
    fn synthesis_cap_is_702_columns() {
        assert!(synthesize_header(702).is_ok());
        assert_eq!(synthesize_header(702).unwrap()[701], "zz");
        assert!(synthesize_header(703).is_err());
    }

    #[test]
    fn materializes_rows_and_transposes() {
        let buf = "1,2\n3,4\n5,6\n";
        let mut rdr = Reader::new(buf, b',', Some(b'"'), TrimPolicy::None);
        let header = vec!["a".to_string(), "b".to_string()];
        let table = Table::materialize(
            {
                rdr.skip_rows(0).unwrap();
                rdr
            },
            header,
        )
        .unwrap();
        assert_eq!(table.num_rows(), 3);
        let t = table.transpose();
        assert_eq!(t.columns[0], vec!["1", "3", "5"]);
        assert_eq!(t.columns[1], vec!["2", "4", "6"]);
    }
}
