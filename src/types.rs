use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MarketRecord
// ---------------------------------------------------------------------------

/// One cryptocurrency's snapshot for a run, after validation.
/// Invariants: `id` is non-empty and unique within a batch, `current_price`
/// is positive, `market_cap` and `total_volume` are non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRecord {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub price_change_pct_24h: f64,
    /// ISO-8601 snapshot timestamp as delivered by the API. Empty if absent.
    pub last_updated: String,
}

// ---------------------------------------------------------------------------
// Row-level rejection
// ---------------------------------------------------------------------------

/// Why a raw record was dropped during transformation. Row-level problems
/// are filtered, not fatal; each reason is tallied and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingField(&'static str),
    BadNumber(&'static str),
    EmptyId,
    NonPositivePrice,
    NegativeMarketCap,
    NegativeVolume,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingField(field) => write!(f, "missing required field '{field}'"),
            RejectReason::BadNumber(field) => write!(f, "field '{field}' is not numeric"),
            RejectReason::EmptyId => write!(f, "empty identifier"),
            RejectReason::NonPositivePrice => write!(f, "current_price must be positive"),
            RejectReason::NegativeMarketCap => write!(f, "market_cap must be non-negative"),
            RejectReason::NegativeVolume => write!(f, "total_volume must be non-negative"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// The run is a single forward chain; any stage failure halts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extracting,
    Transforming,
    Loading,
    Verifying,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Extracting => "extracting",
            Stage::Transforming => "transforming",
            Stage::Loading => "loading",
            Stage::Verifying => "verifying",
        };
        write!(f, "{s}")
    }
}
