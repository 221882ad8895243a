//! Slug conventions shared by every entry kind.
//!
//! Content files are named after their slug. Date-bearing kinds (articles,
//! scraps, stream posts) prefix the slug with an ISO date, weeknotes start with
//! their week number, and projects carry no convention at all:
//!
//! - `2024-03-02-hello-world.md` → date 2024-03-02, remainder `hello-world`
//! - `42.md` → week 42
//! - `dotfiles.md` → plain slug
//!
//! ## URL Parts
//!
//! The remainder of a dated slug becomes the last URL segment, and the month
//! is always rendered with two digits: `2024-03-02-hello-world` →
//! `/2024/03/hello-world`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

/// Length of the `YYYY-MM-DD` date prefix.
const DATE_LEN: usize = 10;

/// Offset of the remainder in a dated slug (`YYYY-MM-DD-` is 11 characters).
pub const DATED_PREFIX_LEN: usize = DATE_LEN + 1;

/// Result of parsing a date-prefixed slug like `2024-03-02-hello-world`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedSlug {
    /// Calendar date from the first ten characters.
    pub date: NaiveDate,
    /// Everything after the `YYYY-MM-DD-` prefix. Never empty.
    pub rest: String,
}

impl DatedSlug {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Two-digit month, e.g. `"03"`.
    pub fn month(&self) -> String {
        format_month(self.date.month())
    }

    /// The slug date at midnight UTC.
    pub fn datetime(&self) -> DateTime<Utc> {
        self.date.and_time(NaiveTime::default()).and_utc()
    }
}

/// Parse a slug following the `YYYY-MM-DD-remainder` convention.
///
/// Handles these patterns:
/// - `"2024-03-02-hello-world"` → date=2024-03-02, rest="hello-world"
/// - `"2023-12-31-a"` → date=2023-12-31, rest="a"
/// - `"2024-02-30-nope"` → None (not a calendar date)
/// - `"2024-03-02"` / `"2024-03-02-"` → None (no remainder)
/// - `"hello-world"` → None
pub fn parse_dated_slug(slug: &str) -> Option<DatedSlug> {
    let prefix = slug.get(..DATE_LEN)?;
    if slug.as_bytes().get(DATE_LEN) != Some(&b'-') {
        return None;
    }
    // `%Y` alone would accept signs and short years
    if !prefix
        .bytes()
        .enumerate()
        .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() })
    {
        return None;
    }
    let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    let rest = &slug[DATED_PREFIX_LEN..];
    if rest.is_empty() {
        return None;
    }
    Some(DatedSlug {
        date,
        rest: rest.to_string(),
    })
}

/// Parse the leading integer of a slug, the way weeknote numbers are read.
///
/// - `"42"` → Some(42)
/// - `"007-catching-up"` → Some(7)
/// - `"summer-break"` → None
pub fn parse_week(slug: &str) -> Option<u32> {
    let digits: String = slug.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Format a 1-based month as two digits. This is padding, not rounding.
pub fn format_month(month: u32) -> String {
    format!("{:02}", month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_slug_with_multi_word_remainder() {
        let p = parse_dated_slug("2024-03-02-hello-world").unwrap();
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(p.rest, "hello-world");
        assert_eq!(p.year(), 2024);
        assert_eq!(p.month(), "03");
    }

    #[test]
    fn dated_slug_single_char_remainder() {
        let p = parse_dated_slug("2023-12-31-a").unwrap();
        assert_eq!(p.rest, "a");
        assert_eq!(p.month(), "12");
    }

    #[test]
    fn remainder_is_slug_from_offset_eleven() {
        let slug = "2021-07-19-some-long-title";
        let p = parse_dated_slug(slug).unwrap();
        assert_eq!(p.rest, &slug[DATED_PREFIX_LEN..]);
    }

    #[test]
    fn date_only_is_rejected() {
        assert_eq!(parse_dated_slug("2024-03-02"), None);
        assert_eq!(parse_dated_slug("2024-03-02-"), None);
    }

    #[test]
    fn impossible_date_is_rejected() {
        assert_eq!(parse_dated_slug("2024-02-30-nope"), None);
        assert_eq!(parse_dated_slug("2024-13-01-nope"), None);
    }

    #[test]
    fn leap_day_is_accepted() {
        let p = parse_dated_slug("2024-02-29-leap").unwrap();
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn undated_slug_is_rejected() {
        assert_eq!(parse_dated_slug("hello-world"), None);
        assert_eq!(parse_dated_slug("42"), None);
    }

    #[test]
    fn missing_separator_is_rejected() {
        assert_eq!(parse_dated_slug("2024-03-02hello"), None);
        assert_eq!(parse_dated_slug("2024/03/02-hello"), None);
    }

    #[test]
    fn multibyte_slug_does_not_panic() {
        assert_eq!(parse_dated_slug("ünïcödé-slug"), None);
    }

    #[test]
    fn week_from_number_only() {
        assert_eq!(parse_week("42"), Some(42));
    }

    #[test]
    fn week_from_leading_digits() {
        assert_eq!(parse_week("007-catching-up"), Some(7));
    }

    #[test]
    fn week_none_without_digits() {
        assert_eq!(parse_week("summer-break"), None);
        assert_eq!(parse_week(""), None);
    }

    #[test]
    fn month_is_zero_padded() {
        assert_eq!(format_month(3), "03");
        assert_eq!(format_month(9), "09");
        assert_eq!(format_month(10), "10");
        assert_eq!(format_month(12), "12");
    }
}
