//! Trim policy: how whitespace is stripped from *unquoted* fields.
//!
//! Trimming never touches quoted content (spec invariant): the tokenizer
//! only calls [`TrimPolicy::apply`] on fields it already knows were
//! unquoted.

/// How to strip whitespace from unquoted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimPolicy {
    /// Do not touch the field at all.
    None,
    /// Strip a single trailing `\r`, nothing else. Useful when a stream
    /// was read in binary mode and CRLF line endings survived as literal
    /// `\r` bytes inside the last field of a line.
    CrTrim,
    /// Strip leading ASCII whitespace only.
    InitialSpaceTrim,
    /// Strip leading and trailing ASCII whitespace.
    AllTrim,
}

impl TrimPolicy {
    pub fn apply<'a>(self, field: &'a [u8]) -> &'a [u8] {
        match self {
            TrimPolicy::None => field,
            TrimPolicy::CrTrim => {
                if field.last() == Some(&b'\r') {
                    &field[..field.len() - 1]
                } else {
                    field
                }
            }
            TrimPolicy::InitialSpaceTrim => trim_start(field),
            TrimPolicy::AllTrim => trim_start(trim_end(field)),
        }
    }
}

fn trim_start(field: &[u8]) -> &[u8] {
    let first = field.iter().position(|b| !b.is_ascii_whitespace());
    match first {
        Some(i) => &field[i..],
        None => &[],
    }
}

fn trim_end(field: &[u8]) -> &[u8] {
    let last = field.iter().rposition(|b| !b.is_ascii_whitespace());
    match last {
        Some(i) => &field[..=i],
        None => &[],
    }
}

impl Default for TrimPolicy {
    fn default() -> Self {
        TrimPolicy::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_leaves_field_untouched() {
        assert_eq!(TrimPolicy::None.apply(b"  hi  "), b"  hi  ");
    }

    #[test]
    fn crtrim_strips_only_trailing_cr() {
        assert_eq!(TrimPolicy::CrTrim.apply(b"hi\r"), b"hi");
        assert_eq!(TrimPolicy::CrTrim.apply(b"  hi  "), b"  hi  ");
    }

    #[test]
    fn initial_space_trim_strips_leading_only() {
        assert_eq!(TrimPolicy::InitialSpaceTrim.apply(b"  hi  "), b"hi  ");
    }

    #[test]
    fn alltrim_strips_both_ends() {
        assert_eq!(TrimPolicy::AllTrim.apply(b"  hi  "), b"hi");
        assert_eq!(TrimPolicy::AllTrim.apply(b"   "), b"");
    }
}
