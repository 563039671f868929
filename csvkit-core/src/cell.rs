//! Typed-cell view (spec §3, §4.4): lazy, cached, zero-copy interpretation
//! of a single raw field.
//!
//! Every recognizer is idempotent and memoized on first call. Per spec
//! §9's design note, we cache with interior-mutable slots owned by the
//! cell itself (`std::cell::Cell`/`OnceCell`) rather than mutating the
//! cell in place; a `TypedCell` is thread-confined to the column that
//! created it, so no synchronization is required (spec §5).

use crate::context::Context;
use crate::numeric::ParsedNumber;
use crate::temporal::{self, Timedelta};
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::{Cell, OnceCell};
use std::str;

/// Every type a cell can resolve to, in the engine's fixed precedence
/// order (spec §4.4 step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CellKind {
    Boolean,
    Timedelta,
    Datetime,
    Date,
    Number,
    Text,
}

/// A lazily-interpreted view over one raw field.
pub struct TypedCell<'a> {
    raw: &'a [u8],
    quoted: bool,
    ctx: &'a Context,
    text: OnceCell<&'a str>,
    is_null: Cell<Option<bool>>,
    is_boolean: Cell<Option<bool>>,
    bool_value: Cell<Option<bool>>,
    number: OnceCell<Option<ParsedNumber>>,
    date: OnceCell<Option<NaiveDate>>,
    datetime: OnceCell<Option<NaiveDateTime>>,
    timedelta: OnceCell<Option<Timedelta>>,
}

impl<'a> TypedCell<'a> {
    /// `raw` must already have had the trim policy applied (if unquoted)
    /// and the enclosing quotes stripped (if quoted).
    pub fn new(raw: &'a [u8], quoted: bool, ctx: &'a Context) -> Self {
        TypedCell {
            raw,
            quoted,
            ctx,
            text: OnceCell::new(),
            is_null: Cell::new(None),
            is_boolean: Cell::new(None),
            bool_value: Cell::new(None),
            number: OnceCell::new(),
            date: OnceCell::new(),
            datetime: OnceCell::new(),
            timedelta: OnceCell::new(),
        }
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// The raw field as text. Non-UTF-8 bytes are replaced, matching the
    /// transport's guarantee that the stream is valid UTF-8 upstream of
    /// the tokenizer; this is just a defensive fallback for tests that
    /// build cells directly from arbitrary bytes.
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| {
            str::from_utf8(self.raw).unwrap_or("")
        })
    }

    /// Invariant (spec §3.2): quoted cells are never null.
    pub fn is_null(&self) -> bool {
        if let Some(v) = self.is_null.get() {
            return v;
        }
        let v = !self.quoted && self.ctx.is_null_token(self.text());
        self.is_null.set(Some(v));
        v
    }

    /// `true`/`false`/`yes`/`no`/`t`/`f`/`y`/`n`/`0`/`1`, case-insensitive.
    /// Invariant (spec §3.2): quoted cells are never boolean (except the
    /// `0`/`1` literal? no: quoted cells are never boolean at all, only
    /// numeric/text are reachable when quoted, per invariant 2).
    pub fn is_boolean(&self) -> bool {
        if let Some(v) = self.is_boolean.get() {
            return v;
        }
        let v = if self.is_null() || self.quoted {
            false
        } else {
            boolean_literal(self.text()).is_some()
        };
        self.is_boolean.set(Some(v));
        v
    }

    /// Panics if `is_boolean()` is false; mirrors the source's
    /// `unsafe_bool()` naming (an unchecked accessor, not a safety hole).
    pub fn unsafe_bool(&self) -> bool {
        if let Some(v) = self.bool_value.get() {
            return v;
        }
        let v = boolean_literal(self.text()).expect("cell is not boolean");
        self.bool_value.set(Some(v));
        v
    }

    /// `0`/`1` are boolean-eligible *and* numeric (spec invariant 1).
    pub fn is_zero_one_boolean(&self) -> bool {
        self.is_boolean() && matches!(self.text(), "0" | "1")
    }

    pub fn is_num(&self) -> bool {
        self.parsed_number().is_some()
    }

    pub fn num(&self) -> Option<f64> {
        self.parsed_number().map(|p| p.value)
    }

    /// Digits after the decimal point in the source text; 0 for
    /// non-numeric cells (spec invariant 3).
    pub fn precision(&self) -> usize {
        self.parsed_number().map(|p| p.precision).unwrap_or(0)
    }

    fn parsed_number(&self) -> Option<ParsedNumber> {
        if self.is_null() || self.quoted {
            return None;
        }
        *self.number.get_or_init(|| {
            crate::numeric::parse_number(self.text(), &self.ctx.locale, self.ctx.no_leading_zeroes)
        })
    }

    pub fn date(&self) -> Option<NaiveDate> {
        if self.is_null() || self.quoted {
            return None;
        }
        *self.date.get_or_init(|| {
            temporal::parse_date(
                self.text(),
                self.ctx.temporal_backend,
                self.ctx.date_format.as_deref(),
            )
        })
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        if self.is_null() || self.quoted {
            return None;
        }
        *self.datetime.get_or_init(|| {
            temporal::parse_datetime(
                self.text(),
                self.ctx.temporal_backend,
                self.ctx.datetime_format.as_deref(),
            )
        })
    }

    pub fn timedelta_tuple(&self) -> Option<Timedelta> {
        if self.is_null() || self.quoted {
            return None;
        }
        *self
            .timedelta
            .get_or_init(|| temporal::parse_timedelta(self.text()))
    }

    /// The fallback: every cell is text.
    pub fn is_str(&self) -> bool {
        !self.is_null() && !self.is_num()
    }

    /// The most specific type this cell satisfies, honoring the engine's
    /// fixed precedence (spec §4.4 step 2). Returns `None` for null
    /// cells, which are excluded from type tests upstream.
    pub fn kind(&self) -> Option<CellKind> {
        if self.is_null() {
            return None;
        }
        if self.is_boolean() {
            return Some(CellKind::Boolean);
        }
        if self.timedelta_tuple().is_some() {
            return Some(CellKind::Timedelta);
        }
        if self.datetime().is_some() {
            return Some(CellKind::Datetime);
        }
        if self.date().is_some() {
            return Some(CellKind::Date);
        }
        if self.is_num() {
            return Some(CellKind::Number);
        }
        Some(CellKind::Text)
    }
}

fn boolean_literal(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "t" | "y" | "1" => Some(true),
        "false" | "no" | "f" | "n" | "0" => Some(false),
        _ => None,
    }
}
