use crate::error::{EtlError, Result};

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// HTTP timeout for the market-data fetch (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Number of sample rows the verifier fetches back after a load.
pub const VERIFY_SAMPLE_ROWS: i64 = 5;

/// The verifier warns when the persisted row count falls below this
/// fraction of the cleaned batch size.
pub const VERIFY_LOW_COUNT_RATIO: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// Quote currency for prices (VS_CURRENCY)
    pub vs_currency: String,
    /// How many top-market-cap coins to request (COIN_COUNT)
    pub coin_count: usize,
    pub db_path: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let coin_count = std::env::var("COIN_COUNT")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<usize>()
            .unwrap_or(10);
        if coin_count == 0 {
            return Err(EtlError::Config(
                "COIN_COUNT must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_url: std::env::var("API_URL").unwrap_or_else(|_| COINGECKO_API_URL.to_string()),
            vs_currency: std::env::var("VS_CURRENCY").unwrap_or_else(|_| "usd".to_string()),
            coin_count,
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "crypto_data.db".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtlError;

    // Env vars are process-wide, so the from_env cases run in one test.
    #[test]
    fn env_defaults_and_lenient_count_parse() {
        for var in ["API_URL", "VS_CURRENCY", "COIN_COUNT", "DB_PATH", "LOG_LEVEL"] {
            std::env::remove_var(var);
        }

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.api_url, COINGECKO_API_URL);
        assert_eq!(cfg.vs_currency, "usd");
        assert_eq!(cfg.coin_count, 10);
        assert_eq!(cfg.db_path, "crypto_data.db");
        assert_eq!(cfg.log_level, "info");

        // Unparseable count falls back to the default rather than failing.
        std::env::set_var("COIN_COUNT", "abc");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.coin_count, 10);

        std::env::set_var("COIN_COUNT", "25");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.coin_count, 25);

        // Zero is explicit and unusable, not a parse fallback.
        std::env::set_var("COIN_COUNT", "0");
        assert!(matches!(Config::from_env(), Err(EtlError::Config(_))));

        std::env::remove_var("COIN_COUNT");
    }
}
