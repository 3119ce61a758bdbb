// File: ./src/lexicon.rs
//! Localized month names and free-text calendar label parsing.
//!
//! The booking site renders dates in German or French depending on the
//! session language, and the month names are not always spelled with their
//! accents ("fevrier", "aout"). Everything here is lenient: a label that
//! cannot be understood yields `None` and the caller skips it.
use crate::appointment::{Timestamp, slot};
use once_cell::sync::Lazy;
use regex::Regex;

// "Mittwoch 19 november 2025  07:30", weekday and extra spacing optional.
static LABELLED_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})\s+(\p{L}+)\s+(\d{4})\s+(\d{2}):(\d{2})").expect("valid regex")
});

// Calendar page header, e.g. "november 2025".
static MONTH_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{L}+)\s+(\d{4})").expect("valid regex"));

/// Maps a German or French month name to its number (1-12).
///
/// Lookup is case-insensitive. Returns `None` for anything not in the lexicon.
pub fn resolve_month(token: &str) -> Option<u32> {
    let month = match token.trim().to_lowercase().as_str() {
        // German
        "januar" | "jänner" => 1,
        "februar" => 2,
        "märz" | "maerz" => 3,
        "april" => 4,
        "mai" => 5,
        "juni" => 6,
        "juli" => 7,
        "august" => 8,
        "september" => 9,
        "oktober" => 10,
        "november" => 11,
        "dezember" => 12,
        // French
        "janvier" => 1,
        "février" | "fevrier" => 2,
        "mars" => 3,
        "avril" => 4,
        "juin" => 6,
        "juillet" => 7,
        "août" | "aout" => 8,
        "septembre" => 9,
        "octobre" => 10,
        "novembre" => 11,
        "décembre" | "decembre" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parses a label such as `"Mittwoch 19 november 2025 07:30"` into a slot.
///
/// Surrounding words (weekday names, prefixes) are ignored. Returns `None`
/// when the month is unknown or any numeric part is out of range.
pub fn parse_labelled_date(text: &str) -> Option<Timestamp> {
    let lowered = text.to_lowercase();
    let caps = LABELLED_DATE_RE.captures(&lowered)?;

    let day: u32 = caps[1].parse().ok()?;
    let month = resolve_month(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    let hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;

    slot(year, month, day, hour, minute)
}

/// Year and month shown in a calendar page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLabel {
    pub year: i32,
    /// `None` when the month name is not in the lexicon.
    pub month: Option<u32>,
}

/// Parses a calendar page header like `"November 2025"`.
///
/// Headers without a year fall back to `fallback_year` and use the first
/// word as the month name.
pub fn parse_month_label(text: &str, fallback_year: i32) -> MonthLabel {
    let lowered = text.trim().to_lowercase();

    if let Some(caps) = MONTH_LABEL_RE.captures(&lowered)
        && let Ok(year) = caps[2].parse::<i32>()
    {
        return MonthLabel {
            year,
            month: resolve_month(&caps[1]),
        };
    }

    let first = lowered.split_whitespace().next().unwrap_or_default();
    MonthLabel {
        year: fallback_year,
        month: resolve_month(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_german_months() {
        assert_eq!(resolve_month("Januar"), Some(1));
        assert_eq!(resolve_month("märz"), Some(3));
        assert_eq!(resolve_month("MÄRZ"), Some(3));
        assert_eq!(resolve_month("dezember"), Some(12));
    }

    #[test]
    fn test_resolve_french_months_with_and_without_accents() {
        assert_eq!(resolve_month("janvier"), Some(1));
        assert_eq!(resolve_month("décembre"), Some(12));
        assert_eq!(resolve_month("Décembre"), Some(12));
        assert_eq!(resolve_month("fevrier"), Some(2));
        assert_eq!(resolve_month("février"), Some(2));
        assert_eq!(resolve_month("aout"), Some(8));
        assert_eq!(resolve_month("août"), Some(8));
    }

    #[test]
    fn test_mai_is_shared() {
        assert_eq!(resolve_month("mai"), Some(5));
    }

    #[test]
    fn test_unknown_month() {
        assert_eq!(resolve_month("zzz"), None);
        assert_eq!(resolve_month(""), None);
        assert_eq!(resolve_month("may"), None);
    }

    #[test]
    fn test_parse_labelled_date() {
        assert_eq!(
            parse_labelled_date("mittwoch 19 november 2025 07:30"),
            slot(2025, 11, 19, 7, 30)
        );
    }

    #[test]
    fn test_parse_labelled_date_tolerates_case_and_spacing() {
        assert_eq!(
            parse_labelled_date("  Mittwoch 19 November 2025   07:30 "),
            slot(2025, 11, 19, 7, 30)
        );
        assert_eq!(
            parse_labelled_date("Vendredi 1 août 2025\n08:00"),
            slot(2025, 8, 1, 8, 0)
        );
    }

    #[test]
    fn test_parse_labelled_date_rejects_garbage() {
        assert_eq!(parse_labelled_date(""), None);
        assert_eq!(parse_labelled_date("kein Termin"), None);
        // Unknown month
        assert_eq!(parse_labelled_date("19 brumaire 2025 07:30"), None);
        // Impossible day / time
        assert_eq!(parse_labelled_date("31 februar 2025 07:30"), None);
        assert_eq!(parse_labelled_date("19 november 2025 25:30"), None);
    }

    #[test]
    fn test_parse_labelled_date_requires_two_digit_hour() {
        assert_eq!(parse_labelled_date("19 november 2025 7:30"), None);
        assert_eq!(
            parse_labelled_date("19 november 2025 07:30"),
            slot(2025, 11, 19, 7, 30)
        );
    }

    #[test]
    fn test_parse_month_label() {
        assert_eq!(
            parse_month_label("November 2025", 2000),
            MonthLabel {
                year: 2025,
                month: Some(11)
            }
        );
        assert_eq!(
            parse_month_label("décembre 2025", 2000),
            MonthLabel {
                year: 2025,
                month: Some(12)
            }
        );
    }

    #[test]
    fn test_parse_month_label_without_year() {
        assert_eq!(
            parse_month_label("Januar", 2026),
            MonthLabel {
                year: 2026,
                month: Some(1)
            }
        );
        assert_eq!(parse_month_label("", 2026).month, None);
        assert_eq!(parse_month_label("?", 2026).month, None);
    }
}
