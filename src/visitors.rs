use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use tracing::warn;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const COUNT_COLUMNS: [&str; 3] = ["visits", "visitors", "count"];

/// Visitor count from a published spreadsheet CSV export.
///
/// Returns `None` on any failure; the caller shows "unavailable".
pub fn fetch_visitor_count(csv_url: &str) -> Option<u64> {
    match fetch_csv(csv_url).and_then(|body| parse_visitor_count(&body)) {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(url = csv_url, error = %format!("{e:#}"), "visitor count unavailable");
            None
        }
    }
}

fn fetch_csv(csv_url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;
    let response = client
        .get(csv_url)
        .send()
        .with_context(|| format!("Failed to fetch {csv_url}"))?;
    if !response.status().is_success() {
        return Err(anyhow!("CSV export returned {}", response.status()));
    }
    response.text().context("Failed to read CSV body")
}

/// If the sheet has a visits/visitors/count column, the last numeric value in
/// it wins; otherwise every data row counts as one visit.
pub fn parse_visitor_count(body: &str) -> Result<u64> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader.headers().context("CSV has no header row")?.clone();
    let count_column = headers
        .iter()
        .position(|h| COUNT_COLUMNS.contains(&h.to_lowercase().as_str()));

    let mut rows = 0u64;
    let mut last_count = None;
    for record in reader.records() {
        let record = record.context("Malformed CSV row")?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows += 1;
        if let Some(value) = count_column
            .and_then(|i| record.get(i))
            .and_then(|v| v.parse::<u64>().ok())
        {
            last_count = Some(value);
        }
    }

    Ok(last_count.unwrap_or(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_rows_without_count_column() {
        let body = "timestamp,page\n2026-01-01,hub\n2026-01-02,hub\n,\n2026-01-03,hub\n";
        assert_eq!(parse_visitor_count(body).unwrap(), 3);
    }

    #[test]
    fn test_uses_last_numeric_count() {
        let body = "date, Visits\n01.01.,10\n02.01.,14\n03.01.,n/a\n";
        assert_eq!(parse_visitor_count(body).unwrap(), 14);
    }

    #[test]
    fn test_header_only_is_zero() {
        assert_eq!(parse_visitor_count("timestamp\n").unwrap(), 0);
    }

    #[test]
    fn test_unreachable_url_is_none() {
        assert_eq!(fetch_visitor_count("http://127.0.0.1:9/visitors.csv"), None);
    }
}
