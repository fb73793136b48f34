use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::config::YchartsCfg;
use crate::enrich::client::{DataProvider, FieldValues};

pub struct YChartsClient {
    client: Client,
    cfg: YchartsCfg,
    api_key: String,
}

impl YChartsClient {
    /// The API key is handed in explicitly; this client never touches the
    /// process environment itself.
    pub fn new(cfg: YchartsCfg, client: Client, api_key: String) -> Self {
        Self {
            client,
            cfg,
            api_key,
        }
    }

    fn points_url(&self, symbols: &[String], fields: &[String]) -> String {
        format!(
            "{}/companies/{}/points/{}",
            self.cfg.base_url,
            symbols.join(","),
            fields.join(",")
        )
    }
}

fn render_value(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Pick apart one symbol's entry of the points response. Anything short of
/// `meta.status == "ok"` counts as a failed lookup for that symbol.
fn symbol_values(entry: &Value, fields: &[String]) -> FieldValues {
    let ok = entry
        .pointer("/meta/status")
        .and_then(Value::as_str)
        .map(|s| s == "ok")
        .unwrap_or(false);
    if !ok {
        return fields.iter().map(|f| (f.clone(), None)).collect();
    }

    fields
        .iter()
        .map(|field| {
            // value lives at results.<field>.data[1] (index 0 is the date)
            let value = entry
                .pointer(&format!("/results/{}/data/1", field))
                .and_then(render_value);
            (field.clone(), value)
        })
        .collect()
}

#[async_trait]
impl DataProvider for YChartsClient {
    async fn fetch_points(
        &self,
        symbols: &[String],
        fields: &[String],
    ) -> Result<HashMap<String, FieldValues>> {
        let upper: Vec<String> = symbols.iter().map(|s| s.to_uppercase()).collect();
        let url = self.points_url(&upper, fields);

        let resp = self
            .client
            .get(&url)
            .header("X-YCHARTSAPIKEY", &self.api_key)
            .send()
            .await
            .context("requesting company data points")?;

        if !resp.status().is_success() {
            anyhow::bail!("data provider error: {}", resp.status());
        }

        let body: Value = resp.json().await.context("parsing data points response")?;

        // Every requested symbol gets an entry, so symbols the provider
        // dropped from the response still come back as all-missing.
        let mut out: HashMap<String, FieldValues> = upper
            .iter()
            .map(|s| (s.clone(), fields.iter().map(|f| (f.clone(), None)).collect()))
            .collect();

        if let Some(response) = body.get("response").and_then(Value::as_object) {
            for (symbol, entry) in response {
                out.insert(symbol.to_uppercase(), symbol_values(entry, fields));
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<String> {
        vec!["price".to_string(), "average_volume_30".to_string()]
    }

    #[test]
    fn test_ok_symbol_yields_values() {
        let entry = json!({
            "meta": {"status": "ok"},
            "results": {
                "price": {"data": ["2024-03-04", 182.52]},
                "average_volume_30": {"data": ["2024-03-04", 58012345]}
            }
        });
        let values = symbol_values(&entry, &fields());
        assert_eq!(values["price"], Some("182.52".to_string()));
        assert_eq!(values["average_volume_30"], Some("58012345".to_string()));
    }

    #[test]
    fn test_failed_symbol_yields_all_missing() {
        let entry = json!({"meta": {"status": "error"}});
        let values = symbol_values(&entry, &fields());
        assert_eq!(values.len(), 2);
        assert!(values.values().all(Option::is_none));
    }

    #[test]
    fn test_field_absent_from_results_is_missing() {
        let entry = json!({
            "meta": {"status": "ok"},
            "results": {"price": {"data": ["2024-03-04", "182.52"]}}
        });
        let values = symbol_values(&entry, &fields());
        assert_eq!(values["price"], Some("182.52".to_string()));
        assert_eq!(values["average_volume_30"], None);
    }
}
