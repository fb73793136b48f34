use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::session::classify;

/// When an earnings release lands relative to regular trading hours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    BeforeOpen,
    DuringHours,
    AfterClose,
    /// Read back from a file whose session code we don't recognize.
    Unspecified,
    NotApplicable,
}

impl Session {
    /// Wire code used in the CSV `BTO/ATC` column.
    pub fn code(&self) -> &'static str {
        match self {
            Session::BeforeOpen => "BTO",
            Session::DuringHours => "DMH",
            Session::AfterClose => "ATC",
            Session::Unspecified | Session::NotApplicable => "n/a",
        }
    }

    pub fn from_code(code: &str) -> Session {
        match code {
            "BTO" => Session::BeforeOpen,
            "DMH" => Session::DuringHours,
            "ATC" => Session::AfterClose,
            "n/a" => Session::NotApplicable,
            _ => Session::Unspecified,
        }
    }
}

/// One company's reporting event on one day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub symbol: String,
    pub session: Session,
    /// Original time text as scraped, or "n/a" when the page gave none.
    pub raw_time: String,
}

impl Announcement {
    /// `session` is always derived from `raw_time`; there is no way to set
    /// the two inconsistently.
    pub fn new(symbol: impl Into<String>, raw_time: impl Into<String>) -> Announcement {
        let raw_time = raw_time.into();
        Announcement {
            symbol: symbol.into().to_uppercase(),
            session: classify(&raw_time),
            raw_time,
        }
    }
}

/// Business-day dates mapped to that day's announcements, in extraction order.
#[derive(Clone, Debug, Default)]
pub struct CalendarDataset {
    days: BTreeMap<NaiveDate, Vec<Announcement>>,
}

impl CalendarDataset {
    pub fn new() -> CalendarDataset {
        CalendarDataset::default()
    }

    /// Last write wins on a duplicate date key.
    pub fn insert(&mut self, date: NaiveDate, announcements: Vec<Announcement>) {
        self.days.insert(date, announcements);
    }

    /// Days in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<Announcement>)> {
        self.days.iter()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_announcements(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}
