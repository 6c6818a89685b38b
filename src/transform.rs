use tracing::warn;

use crate::error::{EtlError, Result};
use crate::types::{MarketRecord, RejectReason};

/// Required per-record fields. A record missing any of these is dropped.
const REQUIRED_FIELDS: &[&str] = &[
    "id",
    "symbol",
    "name",
    "current_price",
    "market_cap",
    "total_volume",
];

#[derive(Debug, Default)]
pub struct TransformStats {
    pub input_total: usize,
    pub cleaned: usize,
    pub dropped: usize,
    pub dropped_missing_field: usize,
    pub dropped_bad_number: usize,
    pub dropped_empty_id: usize,
    pub dropped_non_positive_price: usize,
    pub dropped_negative_market_cap: usize,
    pub dropped_negative_volume: usize,
}

impl TransformStats {
    fn record_reject(&mut self, reason: &RejectReason) {
        self.dropped += 1;
        match reason {
            RejectReason::MissingField(_) => self.dropped_missing_field += 1,
            RejectReason::BadNumber(_) => self.dropped_bad_number += 1,
            RejectReason::EmptyId => self.dropped_empty_id += 1,
            RejectReason::NonPositivePrice => self.dropped_non_positive_price += 1,
            RejectReason::NegativeMarketCap => self.dropped_negative_market_cap += 1,
            RejectReason::NegativeVolume => self.dropped_negative_volume += 1,
        }
    }
}

/// Validate and coerce the raw batch into typed records. Row-level problems
/// drop the row with a warning and the run continues; an empty input batch
/// is a structural failure and aborts the run.
pub fn clean_records(raw: &[serde_json::Value]) -> Result<(Vec<MarketRecord>, TransformStats)> {
    if raw.is_empty() {
        return Err(EtlError::Transformation(
            "raw batch is empty, nothing to transform".to_string(),
        ));
    }

    let mut stats = TransformStats {
        input_total: raw.len(),
        ..Default::default()
    };
    let mut cleaned = Vec::with_capacity(raw.len());

    for item in raw {
        match parse_record(item) {
            Ok(record) => cleaned.push(record),
            Err(reason) => {
                let id = item
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("<no id>");
                warn!("dropping record '{id}': {reason}");
                stats.record_reject(&reason);
            }
        }
    }

    stats.cleaned = cleaned.len();
    Ok((cleaned, stats))
}

/// Parse one raw record. Numeric fields accept JSON numbers or numeric
/// strings; anything else rejects the record.
pub fn parse_record(v: &serde_json::Value) -> std::result::Result<MarketRecord, RejectReason> {
    for &field in REQUIRED_FIELDS {
        match v.get(field) {
            None | Some(serde_json::Value::Null) => {
                return Err(RejectReason::MissingField(field))
            }
            Some(_) => {}
        }
    }

    let id = v
        .get("id")
        .and_then(|s| s.as_str())
        .unwrap_or("")
        .trim()
        .to_string();
    if id.is_empty() {
        return Err(RejectReason::EmptyId);
    }

    let symbol = string_field(v, "symbol");
    let name = string_field(v, "name");

    let current_price = numeric_field(v, "current_price")?;
    let market_cap = numeric_field(v, "market_cap")?;
    let total_volume = numeric_field(v, "total_volume")?;

    if current_price <= 0.0 {
        return Err(RejectReason::NonPositivePrice);
    }
    if market_cap < 0.0 {
        return Err(RejectReason::NegativeMarketCap);
    }
    if total_volume < 0.0 {
        return Err(RejectReason::NegativeVolume);
    }

    // Optional fields: percent change may legitimately be negative or absent.
    let price_change_pct_24h = v
        .get("price_change_percentage_24h")
        .and_then(coerce_f64)
        .unwrap_or(0.0);
    let last_updated = v
        .get("last_updated")
        .and_then(|s| s.as_str())
        .unwrap_or("")
        .to_string();

    Ok(MarketRecord {
        id,
        symbol,
        name,
        current_price,
        market_cap,
        total_volume,
        price_change_pct_24h,
        last_updated,
    })
}

fn string_field(v: &serde_json::Value, field: &str) -> String {
    v.get(field).and_then(|s| s.as_str()).unwrap_or("").to_string()
}

fn numeric_field(
    v: &serde_json::Value,
    field: &'static str,
) -> std::result::Result<f64, RejectReason> {
    v.get(field)
        .and_then(coerce_f64)
        .ok_or(RejectReason::BadNumber(field))
}

fn coerce_f64(v: &serde_json::Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}
