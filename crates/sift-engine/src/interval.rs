//! Interval parsing: `<n> <unit>` lists and ISO-8601 durations.

use sift_common::Messages;

/// A calendar interval, applied through broken-down civil time so that
/// month and year components respect calendar lengths.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub microseconds: i32,
}

/// Parse an interval body.
///
/// `P…` selects the ISO-8601 duration form (`P1Y2M3DT4H5M6S`, weeks as
/// `W`); anything else is read as a unit list (`1 year 2 months`, unit
/// names case-insensitive, singular or plural). Unknown unit names are
/// skipped. ISO format errors are recorded on `messages`.
pub fn parse_interval(messages: &Messages, text: &str) -> Interval {
    let mut interval = Interval::default();
    if text.starts_with('P') {
        parse_iso8601(messages, &mut interval, text);
    } else {
        parse_unit_list(&mut interval, text);
    }
    interval
}

fn parse_unit_list(interval: &mut Interval, text: &str) {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let num_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let value: i32 = text[num_start..i].parse().unwrap_or(0);
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        let name = &text[name_start..i];

        if num_start == i {
            // Neither digits nor letters consumed; skip the stray byte.
            i += 1;
            continue;
        }
        apply_component(interval, name, value);
    }
}

fn apply_component(interval: &mut Interval, name: &str, value: i32) {
    if name.eq_ignore_ascii_case("year") || name.eq_ignore_ascii_case("years") {
        interval.years = value;
    } else if name.eq_ignore_ascii_case("month") || name.eq_ignore_ascii_case("months") {
        interval.months = value;
    } else if name.eq_ignore_ascii_case("day") || name.eq_ignore_ascii_case("days") {
        interval.days = value;
    } else if name.eq_ignore_ascii_case("hour") || name.eq_ignore_ascii_case("hours") {
        interval.hours = value;
    } else if name.eq_ignore_ascii_case("minute") || name.eq_ignore_ascii_case("minutes") {
        interval.minutes = value;
    } else if name.eq_ignore_ascii_case("second") || name.eq_ignore_ascii_case("seconds") {
        interval.seconds = value;
    } else if name.eq_ignore_ascii_case("microsecond") || name.eq_ignore_ascii_case("microseconds")
    {
        interval.microseconds = value;
    }
}

fn parse_iso8601(messages: &Messages, interval: &mut Interval, text: &str) {
    let bytes = text.as_bytes();
    let mut i = 0;

    if bytes.first() == Some(&b'P') {
        i += 1;
    } else {
        messages.error("Invalid ISO-8601 interval format: Missing 'P'");
        return;
    }

    let mut in_time_section = false;
    while i < bytes.len() {
        if bytes[i] == b'T' {
            in_time_section = true;
            i += 1;
            continue;
        }

        let num_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let value: i32 = text[num_start..i].parse().unwrap_or(0);

        let Some(&designator) = bytes.get(i) else {
            messages.error("Invalid ISO-8601 interval format: Missing designator");
            return;
        };
        i += 1;

        match (in_time_section, designator) {
            (false, b'Y') => interval.years = value,
            (false, b'M') => interval.months = value,
            (false, b'W') => interval.days = value * 7,
            (false, b'D') => interval.days = value,
            (true, b'H') => interval.hours = value,
            (true, b'M') => interval.minutes = value,
            (true, b'S') => interval.seconds = value,
            (_, c) => {
                messages.error(format!(
                    "Invalid ISO-8601 interval format: Unexpected '{}'",
                    c as char
                ));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Interval {
        let messages = Messages::new();
        let interval = parse_interval(&messages, text);
        assert!(!messages.has_errors(), "errors: {:?}", messages.errors());
        interval
    }

    #[test]
    fn unit_list_single() {
        assert_eq!(
            parse("1 day"),
            Interval {
                days: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn unit_list_multiple_and_plural() {
        let interval = parse("2 years 3 months 4 hours");
        assert_eq!(interval.years, 2);
        assert_eq!(interval.months, 3);
        assert_eq!(interval.hours, 4);
        assert_eq!(interval.days, 0);
    }

    #[test]
    fn unit_list_ignores_unknown_words() {
        // A leading keyword such as INTERVAL just reads as value 0 with an
        // unknown unit name.
        let interval = parse("INTERVAL 5 minutes");
        assert_eq!(interval.minutes, 5);
    }

    #[test]
    fn unit_names_are_case_insensitive() {
        assert_eq!(parse("7 DAYS").days, 7);
    }

    #[test]
    fn iso8601_date_and_time_sections() {
        let interval = parse("P1Y2M3DT4H5M6S");
        assert_eq!(
            interval,
            Interval {
                years: 1,
                months: 2,
                days: 3,
                hours: 4,
                minutes: 5,
                seconds: 6,
                microseconds: 0,
            }
        );
    }

    #[test]
    fn iso8601_weeks() {
        assert_eq!(parse("P2W").days, 14);
    }

    #[test]
    fn iso8601_bad_designator_records_error() {
        let messages = Messages::new();
        parse_interval(&messages, "P5Q");
        assert!(messages.has_errors());
    }
}
