use anyhow::{anyhow, Result};
use scraper::{Html, Selector};

/// A (ticker, time text) pair in document order. The extractor only ever
/// hands out fully paired records so ticker/time alignment cannot drift
/// after this point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAnnouncement {
    pub symbol: String,
    pub raw_time: String,
}

/// Pull all (ticker, time) pairs out of one calendar page.
///
/// Tickers and times are matched positionally. When their counts disagree
/// the page structure is inconsistent and every time on the page degrades to
/// "n/a" rather than risking a mis-paired row.
pub fn extract(markup: &str) -> Result<Vec<RawAnnouncement>> {
    let doc = Html::parse_document(markup);
    let sel_calendar = Selector::parse("ul#epscalendar").unwrap();
    let sel_ticker = Selector::parse(".ticker").unwrap();
    let sel_time = Selector::parse(".time").unwrap();

    let calendar = doc
        .select(&sel_calendar)
        .next()
        .ok_or_else(|| anyhow!("earnings calendar list not found in page"))?;

    let tickers: Vec<String> = calendar
        .select(&sel_ticker)
        .map(|n| n.text().collect::<String>().trim().to_string())
        .collect();
    let times: Vec<String> = calendar
        .select(&sel_time)
        .map(|n| n.text().collect::<String>().trim().to_string())
        .collect();

    let out = if tickers.len() != times.len() {
        tickers
            .into_iter()
            .map(|symbol| RawAnnouncement {
                symbol,
                raw_time: "n/a".to_string(),
            })
            .collect()
    } else {
        tickers
            .into_iter()
            .zip(times)
            .map(|(symbol, raw_time)| RawAnnouncement { symbol, raw_time })
            .collect()
    };

    Ok(out)
}
