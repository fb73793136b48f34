use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use tracing::info;

use crate::enrich::client::DataProvider;

/// Left-join provider fields onto a persisted calendar file, in place.
///
/// Every original row survives; rows whose symbol the provider could not
/// serve get empty cells in the new columns. A field whose column already
/// exists is overwritten rather than appended, so re-running with the same
/// fields is idempotent. The rewrite goes through a temp sibling and a
/// rename, so a failure mid-way leaves the original file untouched.
pub async fn enrich(
    provider: &dyn DataProvider,
    file_path: &Path,
    fields: &[String],
) -> Result<()> {
    let mut reader = csv::Reader::from_path(file_path)
        .with_context(|| format!("opening {}", file_path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading calendar header")?
        .iter()
        .map(str::to_string)
        .collect();
    let records: Vec<StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .with_context(|| format!("reading rows from {}", file_path.display()))?;

    let symbol_col = headers
        .iter()
        .position(|h| h == "Symbol")
        .ok_or_else(|| anyhow!("no Symbol column in {}", file_path.display()))?;

    // distinct symbols, appearance order preserved
    let mut symbols: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for record in &records {
        let symbol = record.get(symbol_col).unwrap_or("").to_uppercase();
        if !symbol.is_empty() && seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }

    let data = provider
        .fetch_points(&symbols, fields)
        .await
        .context("fetching enrichment data")?;

    // map each requested field to its output column, reusing an existing
    // column of the same name
    let mut out_headers = headers.clone();
    let field_cols: Vec<(String, usize)> = fields
        .iter()
        .map(|field| {
            let col = match out_headers.iter().position(|h| h == field) {
                Some(i) => i,
                None => {
                    out_headers.push(field.clone());
                    out_headers.len() - 1
                }
            };
            (field.clone(), col)
        })
        .collect();

    let tmp_path = file_path.with_extension("csv.tmp");
    let mut writer = csv::Writer::from_path(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    writer.write_record(&out_headers)?;
    for record in &records {
        let mut row: Vec<String> = (0..out_headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        let symbol = record.get(symbol_col).unwrap_or("").to_uppercase();
        for (field, col) in &field_cols {
            row[*col] = data
                .get(&symbol)
                .and_then(|values| values.get(field))
                .and_then(Clone::clone)
                .unwrap_or_default();
        }
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", tmp_path.display()))?;
    drop(writer);

    fs::rename(&tmp_path, file_path)
        .with_context(|| format!("replacing {}", file_path.display()))?;

    info!(
        path = %file_path.display(),
        symbols = symbols.len(),
        fields = fields.len(),
        "calendar enriched"
    );
    Ok(())
}
