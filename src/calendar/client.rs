use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    /// Raw markup for the calendar view `day_offset` business days out.
    /// `show_more` selects the extended listing over the default one.
    async fn fetch(&self, day_offset: u32, show_more: bool) -> Result<String>;
}
