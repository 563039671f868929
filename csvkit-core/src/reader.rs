//! CSV tokenizer (spec §4.1).
//!
//! Parses a UTF-8 character stream into rows of field spans, honoring
//! RFC-4180 quoting, a configurable delimiter, and the reader's trim
//! policy. Delimiter, quote character, and line terminators are always
//! single ASCII bytes, so the tokenizer can scan the underlying UTF-8
//! buffer byte-by-byte without ever splitting a multi-byte sequence: no
//! continuation byte of a UTF-8 encoding is ever equal to an ASCII byte.

use crate::errors::*;
use crate::quickcheck::check_field_sizes;
use crate::trim::TrimPolicy;

/// A view over the source bytes delimiting one field (spec §3
/// `cell_span`), plus whether the surrounding delimiters observed
/// quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField {
    pub start: usize,
    pub end: usize,
    pub quoted: bool,
}

impl RawField {
    pub fn slice<'a>(&self, buf: &'a str) -> &'a str {
        &buf[self.start..self.end]
    }
}

/// One row's fields, as spans into the owning buffer.
pub type Row = Vec<RawField>;

/// A signal a [`RowVisitor`] can return from `visit` to stop the scan
/// early (spec §4.1: "the visitor may throw a sentinel to request early
/// termination").
pub struct StopIteration;

pub trait RowVisitor {
    fn visit(&mut self, row: &Row, buf: &str) -> std::result::Result<(), StopIteration>;
}

impl<F> RowVisitor for F
where
    F: FnMut(&Row, &str) -> std::result::Result<(), StopIteration>,
{
    fn visit(&mut self, row: &Row, buf: &str) -> std::result::Result<(), StopIteration> {
        self(row, buf)
    }
}

/// A lazy sequence of rows over a fully-buffered, UTF-8-validated
/// string. Buffering the whole stream up front keeps the tokenizer
/// simple while still letting every downstream consumer (typed cells,
/// the in-memory table) borrow zero-copy slices of it.
pub struct Reader<'a> {
    buf: &'a str,
    bytes: &'a [u8],
    delimiter: u8,
    quote: Option<u8>,
    trim: TrimPolicy,
    pos: usize,
    line: u64,
    maxfieldsize: Option<usize>,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a str, delimiter: u8, quote: Option<u8>, trim: TrimPolicy) -> Self {
        Reader {
            buf,
            bytes: buf.as_bytes(),
            delimiter,
            quote,
            trim,
            pos: 0,
            line: 1,
            maxfieldsize: None,
        }
    }

    /// Enforce a per-cell character-count limit on every row parsed from
    /// this point on (spec §4.7's `--maxfieldsize`).
    pub fn with_maxfieldsize(mut self, limit: Option<usize>) -> Self {
        self.maxfieldsize = limit;
        self
    }

    pub fn buf(&self) -> &'a str {
        self.buf
    }

    /// Discard the next `n` rows without building field vectors.
    pub fn skip_rows(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            if self.next_row()?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Drive the full remaining sequence, calling `visitor` with each row.
    pub fn run_rows<V: RowVisitor>(&mut self, mut visitor: V) -> Result<()> {
        while let Some(row) = self.next_row()? {
            if visitor.visit(&row, self.buf).is_err() {
                break;
            }
        }
        Ok(())
    }

    /// Parse and return the next row, or `None` at end of input. An
    /// empty line after a properly closed record is not a row (spec
    /// §4.1); a short line is returned as a row of that width so
    /// quick-check can see the raggedness.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if self.pos >= self.bytes.len() {
            return Ok(None);
        }

        let row_line = self.line;
        let mut fields = Vec::new();
        loop {
            let (field, consumed_terminator) = self.next_field()?;
            fields.push(field);
            if consumed_terminator {
                break;
            }
            if self.pos >= self.bytes.len() {
                break;
            }
        }
        self.line += 1;
        if let Some(limit) = self.maxfieldsize {
            check_field_sizes(&fields, self.buf, limit, row_line)?;
        }
        Ok(Some(fields))
    }

    /// Parse one field, returning it plus whether a line terminator (not
    /// just a delimiter) ended it.
    fn next_field(&mut self) -> Result<(RawField, bool)> {
        let start_line = self.line;
        if self.quote.is_some() && self.bytes.get(self.pos) == self.quote.as_ref() {
            self.parse_quoted_field(start_line)
        } else {
            Ok(self.parse_unquoted_field())
        }
    }

    fn parse_quoted_field(&mut self, start_line: u64) -> Result<(RawField, bool)> {
        let quote = self.quote.unwrap();
        self.pos += 1; // consume opening quote
        let content_start = self.pos;
        let mut content_end;
        loop {
            match self.bytes.get(self.pos) {
                None => {
                    let col = (self.pos - self.line_start()) as u64 + 1;
                    return Err(ErrorKind::ParseError(start_line, col).into());
                }
                Some(&b) if b == quote => {
                    // Doubled quote => literal quote, keep scanning.
                    if self.bytes.get(self.pos + 1) == Some(&quote) {
                        self.pos += 2;
                        continue;
                    }
                    content_end = self.pos;
                    self.pos += 1; // consume closing quote
                    break;
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        // After the closing quote, consume up to the next delimiter or
        // terminator (RFC-4180 doesn't allow trailing garbage, but we're
        // lenient and just fold it into the field like real-world parsers
        // tend to for robustness).
        let terminator = self.consume_delimiter_or_terminator();
        let raw = RawField {
            start: content_start,
            end: content_end,
            quoted: true,
        };
        Ok((raw, terminator))
    }

    fn parse_unquoted_field(&mut self) -> (RawField, bool) {
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == self.delimiter || b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
        let end = self.pos;
        let terminator = self.consume_delimiter_or_terminator();
        let untrimmed = &self.bytes[start..end];
        let trimmed = self.trim.apply(untrimmed);
        let leading = trimmed.as_ptr() as usize - untrimmed.as_ptr() as usize;
        let trim_start = start + leading;
        let field = RawField {
            start: trim_start,
            end: trim_start + trimmed.len(),
            quoted: false,
        };
        (field, terminator)
    }

    /// Consume exactly one delimiter or one line terminator (LF, CRLF, or
    /// CR), returning `true` if a line terminator was consumed.
    fn consume_delimiter_or_terminator(&mut self) -> bool {
        match self.bytes.get(self.pos) {
            Some(&b) if b == self.delimiter => {
                self.pos += 1;
                false
            }
            Some(b'\r') => {
                self.pos += 1;
                if self.bytes.get(self.pos) == Some(&b'\n') {
                    self.pos += 1;
                }
                true
            }
            Some(b'\n') => {
                self.pos += 1;
                true
            }
            None => true,
            _ => false,
        }
    }

    fn line_start(&self) -> usize {
        self.bytes[..self.pos]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Total row count and the column count of the last-seen row,
    /// computed by a single forward pass (spec §4.1 `rows()`/`cols()`).
    /// Consumes the reader.
    pub fn count_rows_and_cols(mut self) -> Result<(u64, usize)> {
        let mut rows = 0u64;
        let mut cols = 0usize;
        while let Some(row) = self.next_row()? {
            rows += 1;
            cols = row.len();
        }
        Ok((rows, cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(buf: &str) -> Vec<Vec<String>> {
        let mut rdr = Reader::new(buf, b',', Some(b'"'), TrimPolicy::None);
        let mut out = Vec::new();
        rdr.run_rows(|row: &Row, b: &str| {
            out.push(row.iter().map(|f| f.slice(b).to_string()).collect::<Vec<_>>());
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn parses_simple_rows() {
        assert_eq!(rows("a,b,c\n1,2,3\n"), vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn recognizes_lf_crlf_and_cr_terminators() {
        assert_eq!(rows("a,b\n1,2\r\n3,4\r"), vec![
            vec!["a", "b"],
            vec!["1", "2"],
            vec!["3", "4"],
        ]);
    }

    #[test]
    fn quoted_fields_may_contain_delimiters_and_newlines() {
        assert_eq!(
            rows("a,b\n\"hello, world\",\"line1\nline2\"\n"),
            vec![vec!["a", "b"], vec!["hello, world", "line1\nline2"]]
        );
    }

    #[test]
    fn doubled_quotes_are_literal_quotes() {
        assert_eq!(rows("a\n\"she said \"\"hi\"\"\"\n"), vec![vec!["a"], vec![r#"she said "hi""#]]);
    }

    #[test]
    fn short_row_is_returned_as_a_row_of_that_width() {
        assert_eq!(rows("a,b,c\n1,2\n"), vec![vec!["a", "b", "c"], vec!["1", "2"]]);
    }

    #[test]
    fn trim_policy_applies_only_to_unquoted_fields() {
        let mut rdr = Reader::new("  a  , \"  b  \"\n", b',', Some(b'"'), TrimPolicy::AllTrim);
        let row = rdr.next_row().unwrap().unwrap();
        assert_eq!(row[0].slice(rdr.buf()), "a");
        assert_eq!(row[1].slice(rdr.buf()), "  b  ");
    }

    #[test]
    fn unterminated_quote_is_a_parse_error() {
        let mut rdr = Reader::new("a,b\n\"unterminated", b',', Some(b'"'), TrimPolicy::None);
        rdr.next_row().unwrap();
        assert!(rdr.next_row().is_err());
    }

    #[test]
    fn skip_rows_discards_without_materializing_fields() {
        let mut rdr = Reader::new("a,b\n1,2\n3,4\n", b',', Some(b'"'), TrimPolicy::None);
        rdr.skip_rows(2).unwrap();
        let row = rdr.next_row().unwrap().unwrap();
        assert_eq!(row[0].slice(rdr.buf()), "3");
    }

    #[test]
    fn empty_line_after_closed_record_is_not_emitted_as_a_row() {
        // A single trailing newline after the last real row must not
        // produce a spurious empty row.
        assert_eq!(rows("a\n1\n"), vec![vec!["a"], vec!["1"]]);
    }

    #[test]
    fn custom_delimiter_is_honored() {
        let mut rdr = Reader::new("a|b\n1|2\n", b'|', Some(b'"'), TrimPolicy::None);
        let row = rdr.next_row().unwrap().unwrap();
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn no_quoting_treats_quote_char_as_literal() {
        let mut rdr = Reader::new("a,\"b\n1,\"2\"\n", b',', None, TrimPolicy::None);
        let row = rdr.next_row().unwrap().unwrap();
        assert_eq!(row[1].slice(rdr.buf()), "\"b");
    }
}
