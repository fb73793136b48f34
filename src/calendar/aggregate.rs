use anyhow::{Context, Result};
use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use tracing::info;

use crate::calendar::client::PageFetcher;
use crate::calendar::extract::extract;
use crate::core::types::{Announcement, CalendarDataset};

/// Advance `start` by `offset` business days. Weekends are skipped entirely:
/// Friday + 1 is Monday. An offset of 0 on a weekend rolls forward to the
/// next weekday, so the result is always a business day.
pub fn add_business_days(start: NaiveDate, offset: u32) -> NaiveDate {
    let mut date = start;
    for _ in 0..offset {
        date = next_weekday(date.checked_add_days(Days::new(1)).expect("date out of range"));
    }
    next_weekday(date)
}

fn next_weekday(mut date: NaiveDate) -> NaiveDate {
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date = date.checked_add_days(Days::new(1)).expect("date out of range");
    }
    date
}

/// Drives the fetch → extract → classify pipeline across a run of day
/// offsets and assembles the results keyed by business date.
pub struct CalendarAggregator<F: PageFetcher> {
    fetcher: F,
    show_more: bool,
}

impl<F: PageFetcher> CalendarAggregator<F> {
    pub fn new(fetcher: F, show_more: bool) -> Self {
        Self { fetcher, show_more }
    }

    /// One dataset covering offsets `[start_day, start_day + n_days)`,
    /// dated relative to today. Days are fetched sequentially; a page whose
    /// calendar container is missing aborts the run rather than being
    /// silently skipped.
    pub async fn aggregate(&self, n_days: u32, start_day: u32) -> Result<CalendarDataset> {
        anyhow::ensure!(n_days > 0, "n_days must be positive");

        let today = Local::now().date_naive();
        let mut dataset = CalendarDataset::new();

        for offset in start_day..start_day + n_days {
            let markup = self
                .fetcher
                .fetch(offset, self.show_more)
                .await
                .with_context(|| format!("fetching calendar for day offset {}", offset))?;

            let date = add_business_days(today, offset);
            let announcements: Vec<Announcement> = extract(&markup)
                .with_context(|| format!("extracting calendar for day offset {}", offset))?
                .into_iter()
                .map(|raw| Announcement::new(raw.symbol, raw.raw_time))
                .collect();

            info!(%date, count = announcements.len(), "collected earnings day");
            dataset.insert(date, announcements);
        }

        Ok(dataset)
    }
}
