//! Date parsing and display.
//!
//! # Responsibility
//! - Accept the handful of date shapes users type at the prompt.
//! - Render every stored date in one canonical display form.
//!
//! # Invariants
//! - Stored dates always round-trip through [`DISPLAY_FORMAT`].
//! - Inputs without a year are filled with the current year.

use chrono::{Datelike, Local, NaiveDate};

/// Canonical display and storage form, e.g. `Mar 05, 2026`.
pub const DISPLAY_FORMAT: &str = "%b %d, %Y";

/// Accepted input shapes that carry a year.
///
/// Two-digit year forms come before their four-digit twins so `%y`'s century
/// window applies; `%Y` would accept the same text as a literal small year.
/// ISO goes last or it would claim short dashed dates as year-one dates.
const PARSE_FORMATS: &[&str] = &[
    "%b %d, %y",
    "%b %d, %Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%Y-%m-%d",
];

/// Current local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Year used to complete date inputs that omit one.
pub fn current_year() -> i32 {
    today().year()
}

/// Renders a day in the canonical display form.
pub fn to_display(day: NaiveDate) -> String {
    day.format(DISPLAY_FORMAT).to_string()
}

/// Parses a day from the canonical display form only.
pub fn from_display(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DISPLAY_FORMAT).ok()
}

/// Parses any accepted user-facing date shape.
///
/// Month names match case-insensitively. A missing year means the current
/// year. Returns `None` for text that matches no shape, and for shapes that
/// name an impossible calendar day such as `Feb 31`.
pub fn parse_flexible(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for format in PARSE_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(text, format) {
            return Some(day);
        }
    }
    let year = current_year();
    let long = format!("{text}, {year}");
    if let Ok(day) = NaiveDate::parse_from_str(&long, "%b %d, %Y") {
        return Some(day);
    }
    let short = format!("{text}-{year}");
    NaiveDate::parse_from_str(&short, "%m-%d-%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn display_form_round_trips() {
        let input = day(2026, 3, 5);
        let text = to_display(input);
        assert_eq!(text, "Mar 05, 2026");
        assert_eq!(from_display(&text), Some(input));
    }

    #[test]
    fn parses_long_form_with_both_year_widths() {
        assert_eq!(parse_flexible("Mar 5, 2024"), Some(day(2024, 3, 5)));
        assert_eq!(parse_flexible("Mar 5, 24"), Some(day(2024, 3, 5)));
        assert_eq!(parse_flexible("Dec 31, 99"), Some(day(1999, 12, 31)));
    }

    #[test]
    fn parses_short_form_with_both_year_widths() {
        assert_eq!(parse_flexible("1-2-2020"), Some(day(2020, 1, 2)));
        assert_eq!(parse_flexible("1-2-20"), Some(day(2020, 1, 2)));
    }

    #[test]
    fn parses_iso_form() {
        assert_eq!(parse_flexible("2020-03-05"), Some(day(2020, 3, 5)));
    }

    #[test]
    fn month_names_are_case_insensitive() {
        assert_eq!(parse_flexible("mar 5, 2024"), Some(day(2024, 3, 5)));
        assert_eq!(parse_flexible("MAR 5, 2024"), Some(day(2024, 3, 5)));
    }

    #[test]
    fn missing_year_defaults_to_current_year() {
        let year = current_year();
        assert_eq!(parse_flexible("Mar 5"), Some(day(year, 3, 5)));
        assert_eq!(parse_flexible("12-25"), Some(day(year, 12, 25)));
    }

    #[test]
    fn impossible_calendar_days_are_rejected() {
        assert_eq!(parse_flexible("Feb 31, 2024"), None);
        assert_eq!(parse_flexible("Feb 31"), None);
        assert_eq!(parse_flexible("13-05-2024"), None);
    }

    #[test]
    fn unrelated_text_is_rejected() {
        assert_eq!(parse_flexible("tomorrow"), None);
        assert_eq!(parse_flexible(""), None);
    }
}
