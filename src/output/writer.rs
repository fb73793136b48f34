use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::core::types::CalendarDataset;

pub const HEADER: [&str; 4] = ["Date", "Symbol", "BTO/ATC", "Time"];

/// Serialize the dataset to a new CSV file under `dest_dir`.
///
/// The file name carries the first and last covered date; if a file with
/// that name already exists a `(1)`, `(2)`, ... suffix is probed until a
/// free path is found, so an existing file is never overwritten.
pub fn write(dataset: &CalendarDataset, base_name: &str, dest_dir: &Path) -> Result<PathBuf> {
    anyhow::ensure!(!dataset.is_empty(), "refusing to write an empty calendar dataset");

    fs::create_dir_all(dest_dir)
        .with_context(|| format!("creating output directory {}", dest_dir.display()))?;

    // first/last exist because the dataset is non-empty
    let first = dataset.first_date().unwrap().format("%Y%m%d");
    let last = dataset.last_date().unwrap().format("%Y%m%d");
    let stem = format!("{}_{}-{}", base_name, first, last);

    let mut path = dest_dir.join(format!("{}.csv", stem));
    let mut disambiguator = 1;
    while path.exists() {
        path = dest_dir.join(format!("{}({}).csv", stem, disambiguator));
        disambiguator += 1;
    }

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(HEADER)?;
    for (date, announcements) in dataset.iter() {
        let date_str = date.format("%a, %m/%d/%Y").to_string();
        for a in announcements {
            writer.write_record([date_str.as_str(), &a.symbol, a.session.code(), &a.raw_time])?;
        }
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!(path = %path.display(), rows = dataset.total_announcements(), "calendar written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Announcement;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "earnings-writer-{}-{}-{}",
            tag,
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_dataset() -> CalendarDataset {
        let mut ds = CalendarDataset::new();
        ds.insert(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            vec![
                Announcement::new("AAPL", "7:30 AM ET"),
                Announcement::new("MSFT", "AMC"),
            ],
        );
        ds.insert(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            vec![Announcement::new("NVDA", "4:05 PM ET")],
        );
        ds
    }

    #[test]
    fn test_file_name_carries_date_range() {
        let dir = scratch_dir("name");
        let path = write(&sample_dataset(), "earnings_calendar", &dir).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "earnings_calendar_20240304-20240305.csv"
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_second_write_gets_a_disambiguator() {
        let dir = scratch_dir("collide");
        let ds = sample_dataset();
        let first = write(&ds, "earnings_calendar", &dir).unwrap();
        let second = write(&ds, "earnings_calendar", &dir).unwrap();
        let third = write(&ds, "earnings_calendar", &dir).unwrap();

        assert_ne!(first, second);
        assert!(second.to_str().unwrap().ends_with("(1).csv"));
        assert!(third.to_str().unwrap().ends_with("(2).csv"));
        // the original is untouched
        assert!(first.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rows_are_date_sorted_with_readable_dates() {
        let dir = scratch_dir("rows");
        let path = write(&sample_dataset(), "cal", &dir).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(lines[0], "Date,Symbol,BTO/ATC,Time");
        assert_eq!(lines[1], "\"Mon, 03/04/2024\",AAPL,BTO,7:30 AM ET");
        assert_eq!(lines[2], "\"Mon, 03/04/2024\",MSFT,ATC,AMC");
        assert_eq!(lines[3], "\"Tue, 03/05/2024\",NVDA,ATC,4:05 PM ET");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_written_file_round_trips() {
        use crate::core::types::Session;

        let dir = scratch_dir("roundtrip");
        let ds = sample_dataset();
        let path = write(&ds, "cal", &dir).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let mut rebuilt = CalendarDataset::new();
        let mut current: Option<(NaiveDate, Vec<Announcement>)> = None;
        for record in reader.records() {
            let record = record.unwrap();
            let date = NaiveDate::parse_from_str(record.get(0).unwrap(), "%a, %m/%d/%Y").unwrap();
            let announcement = Announcement::new(
                record.get(1).unwrap(),
                record.get(3).unwrap(),
            );
            assert_eq!(announcement.session, Session::from_code(record.get(2).unwrap()));
            match &mut current {
                Some((d, rows)) if *d == date => rows.push(announcement),
                _ => {
                    if let Some((d, rows)) = current.take() {
                        rebuilt.insert(d, rows);
                    }
                    current = Some((date, vec![announcement]));
                }
            }
        }
        if let Some((d, rows)) = current {
            rebuilt.insert(d, rows);
        }

        let original: Vec<_> = ds.iter().collect();
        let reread: Vec<_> = rebuilt.iter().collect();
        assert_eq!(original, reread);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let dir = scratch_dir("empty");
        let err = write(&CalendarDataset::new(), "cal", &dir).unwrap_err();
        assert!(err.to_string().contains("empty"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
