//! Error-handling support implemented using the `[error-chain][]` crate.
//!
//! The taxonomy below follows the tool suite's diagnostic convention:
//! every message printed to stderr begins with the error class name
//! (`ColumnIdentifierError:`, `FieldSizeLimitError:`, `LookupError:`,
//! `ValueError:`, ...), so each `display()` bakes that prefix in directly.
//!
//! [error-chain]: https://docs.rs/error-chain

use csv;
use std::io;

error_chain! {
    // Error types from other libraries that we want to just wrap
    // automatically.
    foreign_links {
        Csv(csv::Error);
        Io(io::Error);
        Json(serde_json::Error);
    }

    errors {
        /// Malformed quoting in the source (unterminated quoted field).
        ParseError(line: u64, column: u64) {
            description("malformed CSV quoting")
            display("ParseError: unterminated quoted field at line {}, column {}.", line, column)
        }

        /// The bytes handed to the transport are not valid UTF-8.
        EncodingError(byte: u8, position: u64) {
            description("input is not valid UTF-8")
            display(
                "EncodingError: invalid byte 0x{:02x} at byte offset {} while decoding input as UTF-8.",
                byte, position
            )
        }

        /// A row's width disagrees with the header (or first body row).
        RaggedRowError(expected: usize, got: usize, rows: Vec<u64>) {
            description("a row has the wrong number of columns")
            display(
                "RaggedRowError: CSV contains rows of length {}, expected {} (rows: {}). \
                 Try the --check-integrity option or the csvclean workflow.",
                got, expected, format_row_list(rows)
            )
        }

        /// A single cell exceeded `--maxfieldsize`.
        FieldSizeLimitError(limit: usize, line: u64) {
            description("a field exceeded the maximum field size")
            display(
                "FieldSizeLimitError: CSV contains a field longer than the maximum length of {} characters on line {}.",
                limit, line
            )
        }

        /// An atom in a column-selection expression is invalid.
        ColumnIdentifierError(atom: String, why: String) {
            description("invalid column identifier")
            display("ColumnIdentifierError: {:?}: {}", atom, why)
        }

        /// An unknown encoding or locale name was requested.
        LookupError(what: String, name: String) {
            description("unknown encoding or locale")
            display("LookupError: unknown {} {:?}.", what, name)
        }

        /// A semantic, post-parse failure (duplicate JSON key, bad grouping labels, ...).
        ValueError(message: String) {
            description("semantic value error")
            display("ValueError: {}", message)
        }

        /// Mutually exclusive options were requested together.
        ConfigurationError(message: String) {
            description("invalid combination of options")
            display("ConfigurationError: {}", message)
        }

        /// A large portion of input rows were malformed (scrubcsv-style guard,
        /// kept for `csvclean`'s dry-run summary).
        TooManyBadRows(bad: u64, total: u64) {
            description("a large portion of your rows were bad")
            display("a large portion of your rows ({} of {}) were bad", bad, total)
        }

        /// A `-d`/`--quote` character specifier was not a single byte, `\t`, or `none`.
        CannotParseCharacter(specifier: String) {
            description("not a single ASCII character")
            display("ConfigurationError: cannot parse {:?} as a single character.", specifier)
        }
    }
}

fn format_row_list(rows: &[u64]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Should we show a backtrace for this particular error?
    pub fn should_show_backtrace(&self) -> bool {
        !matches!(self.kind(), ErrorKind::TooManyBadRows(_, _))
    }

    /// What exit code should we return when the process exits?
    pub fn to_exit_code(&self) -> i32 {
        match *self.kind() {
            // This is only arguably an error, so return a special code for
            // people who want to try to ignore it.
            ErrorKind::TooManyBadRows(_, _) => 2,
            _ => 1,
        }
    }
}
