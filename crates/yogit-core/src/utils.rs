// SPDX-License-Identifier: Apache-2.0

//! Text and date helpers shared by queries and commands.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::YogitError;

/// Display budget for titles in tables.
pub const TITLE_BUDGET: usize = 50;

const ELLIPSIS: &str = "...";

/// Shortens text to at most `width` characters, breaking on word boundaries.
///
/// Text that already fits is returned unchanged. Otherwise whole words are
/// kept while they fit alongside the `...` marker. When even the first word
/// does not fit, only the marker is returned.
///
/// # Examples
///
/// ```
/// use yogit_core::utils::shorten;
///
/// assert_eq!(shorten("Fix typo", 50), "Fix typo");
/// assert_eq!(shorten("Add support for custom key bindings", 20), "Add support for...");
/// ```
#[must_use]
pub fn shorten(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }

    let budget = width.saturating_sub(ELLIPSIS.len());
    let mut kept = String::new();
    for word in text.split_whitespace() {
        let extra = if kept.is_empty() { 0 } else { 1 };
        if kept.chars().count() + extra + word.chars().count() > budget {
            break;
        }
        if !kept.is_empty() {
            kept.push(' ');
        }
        kept.push_str(word);
    }
    format!("{kept}{ELLIPSIS}")
}

/// Parses a GitHub timestamp such as `2019-07-16T14:44:46Z`.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, YogitError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ")
        .map(|dt| dt.and_utc())
        .map_err(|e| YogitError::shape(format!("invalid timestamp `{value}`: {e}")))
}

/// Parses a `YYYY-MM-DD` date typed by the user.
pub fn parse_day(value: &str) -> Result<NaiveDate, YogitError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| YogitError::invalid("Bad date format, should be `%Y-%m-%d`"))
}

/// Formats the day of `now` as `YYYY-MM-DD`.
#[must_use]
pub fn today_str(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Formats the first second of the day of `now`, e.g. `2019-07-10T00:00:00`.
#[must_use]
pub fn today_earliest_str(now: DateTime<Utc>) -> String {
    day_earliest_str(now.date_naive())
}

/// Formats the first second of `day`, e.g. `2019-07-10T00:00:00`.
#[must_use]
pub fn day_earliest_str(day: NaiveDate) -> String {
    format!("{}T00:00:00", day.format("%Y-%m-%d"))
}

/// Human readable distance between `day` and the day of `now`.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use yogit_core::utils::days_ago_str;
///
/// let now = Utc.with_ymd_and_hms(2019, 7, 17, 1, 15, 59).unwrap();
/// let day = |d| NaiveDate::from_ymd_opt(2019, 7, d).unwrap();
/// assert_eq!(days_ago_str(day(17), now), "Today");
/// assert_eq!(days_ago_str(day(16), now), "Yesterday");
/// assert_eq!(days_ago_str(day(10), now), "7 days ago");
/// ```
#[must_use]
pub fn days_ago_str(day: NaiveDate, now: DateTime<Utc>) -> String {
    match (now.date_naive() - day).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        n => format!("{n} days ago"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // ========================================================================
    // shorten() tests
    // ========================================================================

    #[test]
    fn test_shorten_keeps_short_text() {
        let text = "a".repeat(TITLE_BUDGET);
        assert_eq!(shorten(&text, TITLE_BUDGET), text);
        assert_eq!(shorten("", TITLE_BUDGET), "");
    }

    #[test]
    fn test_shorten_breaks_on_words() {
        let title = "Refactor the statement preparer so that pagination tokens are resolved late";
        let result = shorten(title, TITLE_BUDGET);

        assert!(result.chars().count() <= TITLE_BUDGET);
        assert!(result.ends_with("..."));
        let kept = result.trim_end_matches("...");
        assert!(title.starts_with(kept));
        // The kept prefix ends exactly where a word ends.
        assert_eq!(title[kept.len()..].chars().next(), Some(' '));
    }

    #[test]
    fn test_shorten_long_first_word() {
        let word = "x".repeat(80);
        assert_eq!(shorten(&word, TITLE_BUDGET), "...");
    }

    #[test]
    fn test_shorten_multibyte() {
        let title = "Ajout de la gestion des émojis 🎉 dans les titres trop longs pour la table";
        let result = shorten(title, TITLE_BUDGET);
        assert!(result.chars().count() <= TITLE_BUDGET);
        assert!(result.ends_with("..."));
    }

    // ========================================================================
    // date helpers tests
    // ========================================================================

    #[test]
    fn test_parse_timestamp() {
        let dt = parse_timestamp("2019-07-16T14:44:46Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2019, 7, 16, 14, 44, 46).unwrap());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_day_error_message() {
        let err = parse_day("2019/07/16").unwrap_err();
        assert_eq!(err.to_string(), "Bad date format, should be `%Y-%m-%d`");
    }

    #[test]
    fn test_today_strings() {
        let now = Utc.with_ymd_and_hms(2019, 7, 10, 1, 15, 59).unwrap();
        assert_eq!(today_str(now), "2019-07-10");
        assert_eq!(today_earliest_str(now), "2019-07-10T00:00:00");
    }

    #[test]
    fn test_days_ago_str_many_days() {
        let now = Utc.with_ymd_and_hms(2019, 7, 17, 1, 15, 59).unwrap();
        let day = NaiveDate::from_ymd_opt(2019, 3, 10).unwrap();
        assert_eq!(days_ago_str(day, now), "129 days ago");
    }
}
