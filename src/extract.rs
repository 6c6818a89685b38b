use std::time::Duration;

use tracing::info;

use crate::config::{Config, HTTP_TIMEOUT_SECS};
use crate::error::{EtlError, Result};

/// Fetch the top `coin_count` coins by market cap from the `/coins/markets`
/// endpoint. One GET, no retries, no pagination beyond the single page.
/// Returns the raw JSON records for the transformer to validate.
pub async fn fetch_market_data(cfg: &Config) -> Result<Vec<serde_json::Value>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?;

    let url = format!(
        "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1",
        cfg.api_url, cfg.vs_currency, cfg.coin_count
    );

    info!("GET {url}");
    let resp = client.get(&url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(EtlError::Extraction(format!(
            "HTTP {status} from {url}"
        )));
    }

    let payload: serde_json::Value = resp.json().await?;
    parse_market_payload(payload, cfg.coin_count)
}

/// Validate the response shape: the body must be a JSON array. The API is
/// trusted to honor `per_page`, but any over-delivery is truncated here so
/// downstream stages never see more than the requested count.
pub fn parse_market_payload(
    payload: serde_json::Value,
    coin_count: usize,
) -> Result<Vec<serde_json::Value>> {
    let mut items = match payload {
        serde_json::Value::Array(a) => a,
        other => {
            return Err(EtlError::Extraction(format!(
                "expected a JSON array of market records, got {}",
                json_kind(&other)
            )))
        }
    };
    items.truncate(coin_count);
    Ok(items)
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
