use chrono::{NaiveTime, Timelike};

use crate::core::types::Session;

/// Classify a scraped time string into a market session.
///
/// A strict clock-time parse takes priority; the BMO/AMC/DMH session codes
/// apply only when the string does not parse as a time.
pub fn classify(raw_time: &str) -> Session {
    if let Some(time) = parse_clock_time(raw_time) {
        return match time.hour() {
            h if h < 10 => Session::BeforeOpen,
            h if h >= 16 => Session::AfterClose,
            _ => Session::DuringHours,
        };
    }

    match raw_time {
        "BMO" => Session::BeforeOpen,
        "AMC" => Session::AfterClose,
        "DMH" => Session::DuringHours,
        _ => Session::NotApplicable,
    }
}

/// Parse strings like "7:30 AM ET": a 12-hour clock time followed by a 2-3
/// letter timezone suffix, which is stripped before parsing.
fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let (clock, tz) = raw.trim().rsplit_once(' ')?;
    if !(2..=3).contains(&tz.len()) || !tz.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    NaiveTime::parse_from_str(clock, "%I:%M %p").ok()
}
