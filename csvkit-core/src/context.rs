//! Frozen, run-wide configuration.
//!
//! Per spec §5/§9: global configuration is set once per run before any
//! parallel work begins and is read-only thereafter. We model that as an
//! explicit struct carried by reference (or `Arc`) through every parse
//! path, rather than the source's static state and thread-local facets.

use crate::numeric::Locale;
use crate::temporal::TemporalBackend;
use std::collections::HashSet;

/// The default "extended" null tokens recognized when blank-recognition
/// is enabled (the default; `-b`/`--blanks` disables it).
const DEFAULT_NULL_TOKENS: &[&str] = &["", "na", "n/a", "none", "null", "."];

#[derive(Debug, Clone)]
pub struct Context {
    /// Lower-cased null tokens a cell's trimmed, unquoted text must match
    /// (case-insensitively) to be recognized as null.
    null_tokens: HashSet<String>,
    pub locale: Locale,
    pub date_format: Option<String>,
    pub datetime_format: Option<String>,
    pub temporal_backend: TemporalBackend,
    pub no_leading_zeroes: bool,
    pub case_insensitive: bool,
    pub no_inference: bool,
}

impl Context {
    /// The "extended null" default: `{"", "na", "n/a", "none", "null", "."}`.
    pub fn new() -> Self {
        Context {
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect(),
            locale: Locale::c(),
            date_format: None,
            datetime_format: None,
            temporal_backend: TemporalBackend::Library,
            no_leading_zeroes: false,
            case_insensitive: false,
            no_inference: false,
        }
    }

    /// `-b`/`--blanks`: restrict the null set to just `""`.
    pub fn with_blanks_only(mut self) -> Self {
        self.null_tokens = ["".to_string()].into_iter().collect();
        self
    }

    /// `--null-value V`, repeatable.
    pub fn add_null_value(&mut self, value: &str) {
        self.null_tokens.insert(value.to_ascii_lowercase());
    }

    pub fn is_null_token(&self, trimmed_unquoted_text: &str) -> bool {
        self.null_tokens
            .contains(&trimmed_unquoted_text.to_ascii_lowercase())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
