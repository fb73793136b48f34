use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub http: HttpCfg,
    #[serde(default)]
    pub calendar: CalendarCfg,
    #[serde(default)]
    pub ycharts: YchartsCfg,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpCfg {
    #[serde(rename = "userAgent", default = "default_ua")]
    pub user_agent: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            user_agent: default_ua(),
            timeout: default_timeout(),
        }
    }
}
fn default_ua() -> String {
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/67.0.3396.99 Safari/537.36"
        .into()
}
fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalendarCfg {
    #[serde(rename = "baseUrl", default = "default_calendar_url")]
    pub base_url: String,
    #[serde(rename = "showMore", default = "default_show_more")]
    pub show_more: bool,
}

impl Default for CalendarCfg {
    fn default() -> Self {
        Self {
            base_url: default_calendar_url(),
            show_more: default_show_more(),
        }
    }
}
fn default_calendar_url() -> String {
    "https://www.earningswhispers.com/calendar".to_string()
}
fn default_show_more() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct YchartsCfg {
    #[serde(rename = "baseUrl", default = "default_ycharts_url")]
    pub base_url: String,
}

impl Default for YchartsCfg {
    fn default() -> Self {
        Self {
            base_url: default_ycharts_url(),
        }
    }
}
fn default_ycharts_url() -> String {
    "https://api.ycharts.com/v3".to_string()
}

impl AppCfg {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()
            .context("building config")?;

        let app: AppCfg = cfg.try_deserialize().context("deserializing config")?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.calendar.base_url.is_empty(), "calendar.baseUrl missing");
        anyhow::ensure!(!self.ycharts.base_url.is_empty(), "ycharts.baseUrl missing");
        anyhow::ensure!(!self.http.user_agent.is_empty(), "http.userAgent missing");
        Ok(())
    }
}
