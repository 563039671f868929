//! `csvkit-core`: the shared CSV processing core behind the csvkit-rs
//! tool suite (csvcut, csvgrep, csvsort, csvstack, csvstat, csvjson,
//! csvlook, csvclean).
//!
//! This crate owns everything CLI-independent: the streaming tokenizer,
//! the column-identifier resolver, the locale-aware numeric and temporal
//! parsers, the lazy typed-cell view, the type inference engine, the
//! in-memory table used by sort/join/stat, and the row-width and
//! field-size guards. Argument parsing and per-tool output formatting
//! live in the `csvkit` binary crate, one layer up.

#![warn(clippy::all)]

#[macro_use]
extern crate error_chain;

pub mod cell;
pub mod context;
pub mod errors;
pub mod inference;
pub mod join;
pub mod numeric;
pub mod quickcheck;
pub mod reader;
pub mod select;
pub mod sort;
pub mod source;
pub mod stats;
pub mod table;
pub mod temporal;
pub mod trim;
pub mod util;

pub use cell::{CellKind, TypedCell};
pub use context::Context;
pub use errors::{Error, ErrorKind, Result};
pub use inference::{infer_column, ColumnMeta, ColumnType};
pub use reader::Reader;
pub use table::Table;
pub use trim::TrimPolicy;
