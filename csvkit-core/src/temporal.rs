//! Temporal parsing (spec §4.6): dates, datetimes, and timedeltas.
//!
//! Two backends are selectable per stream. The format-string backend uses
//! `chrono`'s strptime-style parsing with a user-supplied format; the
//! library backend (the default) is more tolerant — it accepts 1-digit
//! month/day fields and always also attempts ISO-8601, regardless of the
//! configured format.

use chrono::{NaiveDate, NaiveDateTime};

/// Which facility parses date/datetime text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalBackend {
    /// `strptime`-style parsing using only the configured format string.
    FormatString,
    /// Tolerant parsing: the configured format, then an ISO-8601 fallback.
    Library,
}

/// `YYYY-MM-DD`.
pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DDTHH:MM:SS`.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Attempt to parse `text` as a date under the given backend/format.
pub fn parse_date(
    text: &str,
    backend: TemporalBackend,
    format: Option<&str>,
) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(fmt) = format {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
        if backend == TemporalBackend::FormatString {
            return None;
        }
    } else if backend == TemporalBackend::FormatString {
        return None;
    }

    // Library backend (or no format given): ISO-8601, tolerant of
    // 1-digit month/day.
    parse_iso_date(text)
}

/// Attempt to parse `text` as a datetime under the given backend/format.
pub fn parse_datetime(
    text: &str,
    backend: TemporalBackend,
    format: Option<&str>,
) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(fmt) = format {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
        if backend == TemporalBackend::FormatString {
            return None;
        }
    } else if backend == TemporalBackend::FormatString {
        return None;
    }

    parse_iso_datetime(text)
}

fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    // Tolerate 1-digit month/day by splitting manually.
    let parts: Vec<&str> = text.split(['-', '/']).collect();
    if parts.len() == 3 {
        let y: i32 = parts[0].parse().ok()?;
        let m: u32 = parts[1].parse().ok()?;
        let d: u32 = parts[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }
    None
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    if let Some((date_part, time_part)) = text.split_once(['T', ' ']) {
        let date = parse_iso_date(date_part)?;
        let time_parts: Vec<&str> = time_part.split(':').collect();
        if time_parts.len() == 3 {
            let h: u32 = time_parts[0].parse().ok()?;
            let mi: u32 = time_parts[1].parse().ok()?;
            let sec_str = time_parts[2];
            let sec_f: f64 = sec_str.parse().ok()?;
            let sec = sec_f.trunc() as u32;
            let nanos = ((sec_f.fract()) * 1_000_000_000.0).round() as u32;
            let time = date.and_hms_nano_opt(h, mi, sec, nanos)?;
            return Some(time);
        }
    }
    None
}

/// A parsed timedelta: `[D days, ]H:MM:SS[.ffffff]`, as a signed number
/// of seconds (floating point, per spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timedelta {
    pub total_seconds: f64,
}

/// Parse `[-][D day(s), ]H:MM:SS[.ffffff]` into a signed duration.
pub fn parse_timedelta(text: &str) -> Option<Timedelta> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let negative = text.starts_with('-');
    let text = text.strip_prefix('-').unwrap_or(text).trim();

    let (days, rest) = if let Some(idx) = text.find(',') {
        let (day_part, rest) = text.split_at(idx);
        let rest = rest[1..].trim();
        let day_part = day_part
            .trim()
            .trim_end_matches("days")
            .trim_end_matches("day")
            .trim();
        let days: f64 = day_part.parse().ok()?;
        (days, rest)
    } else {
        (0.0, text)
    };

    let fields: Vec<&str> = rest.split(':').collect();
    if fields.len() != 3 {
        return None;
    }
    let hours: f64 = fields[0].parse().ok()?;
    let minutes: f64 = fields[1].parse().ok()?;
    let seconds: f64 = fields[2].parse().ok()?;
    if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let mut total = days * 86_400.0 + hours * 3_600.0 + minutes * 60.0 + seconds;
    if negative {
        total = -total;
    }
    Some(Timedelta {
        total_seconds: total,
    })
}

/// Render a timedelta back to `[D day(s), ]H:MM:SS[.ffffff]`.
pub fn format_timedelta(td: &Timedelta) -> String {
    let negative = td.total_seconds < 0.0;
    let mut secs = td.total_seconds.abs();
    let days = (secs / 86_400.0).floor();
    secs -= days * 86_400.0;
    let hours = (secs / 3_600.0).floor();
    secs -= hours * 3_600.0;
    let minutes = (secs / 60.0).floor();
    secs -= minutes * 60.0;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0.0 {
        if days == 1.0 {
            out.push_str(&format!("{} day, ", days as i64));
        } else {
            out.push_str(&format!("{} days, ", days as i64));
        }
    }
    if secs.fract().abs() > 1e-9 {
        out.push_str(&format!("{}:{:02}:{:09.6}", hours as i64, minutes as i64, secs));
    } else {
        out.push_str(&format!("{}:{:02}:{:02}", hours as i64, minutes as i64, secs as i64));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let d = parse_date("2024-01-05", TemporalBackend::Library, None).unwrap();
        assert_eq!(format_date(&d), "2024-01-05");
    }

    #[test]
    fn library_backend_tolerates_single_digit_month_day() {
        let d = parse_date("2024-1-5", TemporalBackend::Library, None).unwrap();
        assert_eq!(format_date(&d), "2024-01-05");
    }

    #[test]
    fn format_string_backend_requires_exact_format() {
        assert!(parse_date("01/05/2024", TemporalBackend::FormatString, Some("%m/%d/%Y")).is_some());
        assert!(parse_date("2024-01-05", TemporalBackend::FormatString, Some("%m/%d/%Y")).is_none());
    }

    #[test]
    fn library_backend_falls_back_to_iso_after_custom_format_fails() {
        let d = parse_date("2024-01-05", TemporalBackend::Library, Some("%m/%d/%Y")).unwrap();
        assert_eq!(format_date(&d), "2024-01-05");
    }

    #[test]
    fn parses_datetime() {
        let dt = parse_datetime("2024-01-05T10:11:12", TemporalBackend::Library, None).unwrap();
        assert_eq!(format_datetime(&dt), "2024-01-05T10:11:12");
    }

    #[test]
    fn parses_timedelta_without_days() {
        let td = parse_timedelta("1:02:03").unwrap();
        assert_eq!(td.total_seconds, 3723.0);
    }

    #[test]
    fn parses_timedelta_with_days_and_fraction() {
        let td = parse_timedelta("2 days, 1:02:03.500").unwrap();
        assert_eq!(td.total_seconds, 2.0 * 86_400.0 + 3723.5);
    }

    #[test]
    fn parses_negative_timedelta() {
        let td = parse_timedelta("-1:00:00").unwrap();
        assert_eq!(td.total_seconds, -3600.0);
    }

    #[test]
    fn rejects_malformed_timedelta() {
        assert!(parse_timedelta("not a timedelta").is_none());
        assert!(parse_timedelta("1:99:00").is_none());
    }
}
