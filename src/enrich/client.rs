use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

/// Field name -> value, `None` when the provider has no data for it.
pub type FieldValues = HashMap<String, Option<String>>;

/// External data provider: latest values for a set of fields across a set
/// of symbols. A symbol whose lookup failed maps every requested field to
/// `None`; only a transport-level failure of the whole batch is an `Err`.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn fetch_points(
        &self,
        symbols: &[String],
        fields: &[String],
    ) -> Result<HashMap<String, FieldValues>>;
}
