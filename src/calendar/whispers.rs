use crate::calendar::client::PageFetcher;
use crate::config::config::CalendarCfg;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

pub struct EarningsWhispersClient {
    client: Client,
    cfg: CalendarCfg,
}

impl EarningsWhispersClient {
    pub fn new(cfg: CalendarCfg, client: Client) -> Self {
        Self { client, cfg }
    }
}

#[async_trait]
impl PageFetcher for EarningsWhispersClient {
    async fn fetch(&self, day_offset: u32, show_more: bool) -> Result<String> {
        let mut query = vec![
            ("sb".to_string(), "p".to_string()),
            ("d".to_string(), day_offset.to_string()),
        ];
        if show_more {
            query.push(("t".to_string(), "all".to_string()));
        }

        let resp = self
            .client
            .get(&self.cfg.base_url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("requesting calendar page for day {}", day_offset))?;

        if !resp.status().is_success() {
            anyhow::bail!("calendar page error for day {}: {}", day_offset, resp.status());
        }

        resp.text()
            .await
            .with_context(|| format!("reading calendar page body for day {}", day_offset))
    }
}
