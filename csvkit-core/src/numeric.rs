//! Locale-aware numeric parsing (spec §4.5).
//!
//! Recognizes integers and floats under the `C` locale or a user-selected
//! locale, with optional rejection of leading zeroes and validation of
//! thousands-grouping. No diagnostic is ever raised here: a non-matching
//! string is simply "not a number", and the caller (the typed-cell layer)
//! decides what the cell actually is.

use crate::errors::*;

/// A decimal/grouping/currency convention. `Locale::c()` is the default
/// and matches plain C-locale numeric literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub decimal_sep: char,
    pub group_sep: Option<char>,
    pub currency_symbols: &'static [&'static str],
}

impl Locale {
    pub fn c() -> Self {
        Locale {
            decimal_sep: '.',
            group_sep: None,
            currency_symbols: &[],
        }
    }

    pub fn en_us() -> Self {
        Locale {
            decimal_sep: '.',
            group_sep: Some(','),
            currency_symbols: &["$"],
        }
    }

    pub fn de_de() -> Self {
        Locale {
            decimal_sep: ',',
            group_sep: Some('.'),
            currency_symbols: &["\u{20ac}"],
        }
    }

    pub fn fr_fr() -> Self {
        Locale {
            decimal_sep: ',',
            group_sep: Some('\u{a0}'),
            currency_symbols: &["\u{20ac}"],
        }
    }

    /// Resolve a locale name as accepted by the `-L` CLI flag.
    pub fn by_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "c" | "" => Ok(Locale::c()),
            "en_us" | "en-us" => Ok(Locale::en_us()),
            "de_de" | "de-de" => Ok(Locale::de_de()),
            "fr_fr" | "fr-fr" => Ok(Locale::fr_fr()),
            other => Err(ErrorKind::LookupError("locale".into(), other.to_string()).into()),
        }
    }
}

/// The parsed shape of a numeric cell: the value itself, plus the
/// precision (digits after the decimal point in the *source text*).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedNumber {
    pub value: f64,
    pub precision: usize,
}

/// Attempt to parse `text` as a number under `locale`.
///
/// Returns `None` (never an error) if `text` does not match the numeric
/// grammar; the caller falls through to the next type in the inference
/// precedence.
pub fn parse_number(text: &str, locale: &Locale, no_leading_zeroes: bool) -> Option<ParsedNumber> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(special) = parse_special(trimmed) {
        return Some(special);
    }

    let mut s = trimmed;

    // Trailing currency symbol.
    for sym in locale.currency_symbols {
        if let Some(rest) = s.strip_suffix(sym) {
            s = rest.trim_end();
            break;
        }
    }

    let mut chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return None;
    }

    let mut i = 0;
    let sign_negative = match chars.get(i) {
        Some('+') => {
            i += 1;
            false
        }
        Some('-') => {
            i += 1;
            true
        }
        _ => false,
    };

    let int_start = i;
    let mut group_positions: Vec<usize> = Vec::new();
    let mut digit_run_since_group = 0usize;
    let mut saw_int_digit = false;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            saw_int_digit = true;
            digit_run_since_group += 1;
            i += 1;
        } else if Some(c) == locale.group_sep {
            group_positions.push(i);
            digit_run_since_group = 0;
            i += 1;
        } else {
            break;
        }
    }
    let int_end = i;

    // Validate grouping: every group must be separated by exactly 3 digits,
    // and the leading group (closest to the start) may have 1-3 digits.
    if !group_positions.is_empty() {
        // distances between consecutive separators (and from the last
        // separator to the end of the integer part) must all be 3.
        let mut prev = int_end;
        for &pos in group_positions.iter().rev() {
            let run = prev - pos - 1;
            if run != 3 {
                return None;
            }
            prev = pos;
        }
        // Leading run (before the first separator) must be 1-3 digits.
        let leading_run = group_positions[0] - int_start;
        if leading_run == 0 || leading_run > 3 {
            return None;
        }
    }

    let has_decimal = chars.get(i) == Some(&locale.decimal_sep);
    let frac_start;
    let frac_end;
    if has_decimal {
        i += 1;
        frac_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        frac_end = i;
    } else {
        frac_start = i;
        frac_end = i;
    }

    if !saw_int_digit && frac_end == frac_start {
        return None;
    }
    // `decimal_sep digit+` is required when there's no integer part.
    if !saw_int_digit && has_decimal && frac_end == frac_start {
        return None;
    }

    let precision = frac_end - frac_start;

    // Optional exponent.
    let mantissa_end = i;
    let mut exp_value: Option<i32> = None;
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        let exp_negative = match chars.get(j) {
            Some('+') => {
                j += 1;
                false
            }
            Some('-') => {
                j += 1;
                true
            }
            _ => false,
        };
        let exp_digit_start = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_digit_start {
            let digits: String = chars[exp_digit_start..j].iter().collect();
            let mut value: i32 = digits.parse().ok()?;
            if exp_negative {
                value = -value;
            }
            exp_value = Some(value);
            i = j;
        }
    }

    if i != chars.len() {
        return None; // trailing garbage
    }

    if no_leading_zeroes {
        let int_digits: String = chars[int_start..int_end]
            .iter()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if int_digits.len() > 1 && int_digits.starts_with('0') {
            return None;
        }
    }

    // Rebuild a plain ASCII `[-]digits[.digits][e[-]digits]` string for
    // the stdlib parser, stripping group separators and normalizing the
    // decimal separator.
    let mut normalized = String::new();
    if sign_negative {
        normalized.push('-');
    }
    for &c in &chars[int_start..int_end] {
        if c.is_ascii_digit() {
            normalized.push(c);
        }
    }
    if normalized.is_empty() || normalized == "-" {
        normalized.push('0');
    }
    if has_decimal {
        normalized.push('.');
        for &c in &chars[frac_start..frac_end] {
            normalized.push(c);
        }
        if frac_end == frac_start {
            normalized.push('0');
        }
    }
    if let Some(exp) = exp_value {
        normalized.push('e');
        normalized.push_str(&exp.to_string());
    }
    let _ = mantissa_end;
    chars.clear();

    let value: f64 = normalized.parse().ok()?;
    Some(ParsedNumber { value, precision })
}

fn parse_special(s: &str) -> Option<ParsedNumber> {
    let lower = s.to_ascii_lowercase();
    match lower.as_str() {
        "nan" => Some(ParsedNumber {
            value: f64::NAN,
            precision: 0,
        }),
        "infinity" | "inf" | "+infinity" | "+inf" => Some(ParsedNumber {
            value: f64::INFINITY,
            precision: 0,
        }),
        "-infinity" | "-inf" => Some(ParsedNumber {
            value: f64::NEG_INFINITY,
            precision: 0,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(text: &str) -> Option<f64> {
        parse_number(text, &Locale::c(), false).map(|p| p.value)
    }

    #[test]
    fn parses_plain_integers_and_floats() {
        assert_eq!(num("42"), Some(42.0));
        assert_eq!(num("-3.5"), Some(-3.5));
        assert_eq!(num("+3.5"), Some(3.5));
        assert_eq!(num(".5"), Some(0.5));
    }

    #[test]
    fn parses_scientific_notation() {
        assert_eq!(num("1e10"), Some(1e10));
        assert_eq!(num("1.5E-3"), Some(1.5e-3));
    }

    #[test]
    fn parses_special_values_case_insensitively() {
        assert!(num("NaN").unwrap().is_nan());
        assert_eq!(num("Infinity"), Some(f64::INFINITY));
        assert_eq!(num("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(num("+Infinity"), Some(f64::INFINITY));
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(num("abc"), None);
        assert_eq!(num("12abc"), None);
        assert_eq!(num(""), None);
    }

    #[test]
    fn precision_counts_fractional_digits_in_source() {
        assert_eq!(parse_number("3.140", &Locale::c(), false).unwrap().precision, 3);
        assert_eq!(parse_number("3", &Locale::c(), false).unwrap().precision, 0);
    }

    #[test]
    fn thousands_grouping_is_validated() {
        let locale = Locale::en_us();
        assert_eq!(parse_number("1,234,567", &locale, false).unwrap().value, 1234567.0);
        assert_eq!(parse_number("1,23,4", &locale, false), None);
        assert_eq!(parse_number("12,34", &locale, false), None);
    }

    #[test]
    fn trailing_currency_symbol_is_consumed() {
        let locale = Locale::en_us();
        assert_eq!(parse_number("$1,234.50", &locale, false), None); // leading currency not supported
        assert_eq!(parse_number("1234.50$", &locale, false).unwrap().value, 1234.50);
    }

    #[test]
    fn leading_zero_rejection() {
        assert_eq!(parse_number("01", &Locale::c(), true), None);
        assert_eq!(parse_number("02.3", &Locale::c(), true), None);
        assert_eq!(parse_number("0.5", &Locale::c(), true).unwrap().value, 0.5);
        assert_eq!(parse_number("0", &Locale::c(), true).unwrap().value, 0.0);
    }

    #[test]
    fn locale_decimal_separator_is_honored() {
        let locale = Locale::de_de();
        assert_eq!(parse_number("1.234,56", &locale, false).unwrap().value, 1234.56);
    }
}
