use tracing::{info, warn};

use crate::config::{Config, VERIFY_LOW_COUNT_RATIO, VERIFY_SAMPLE_ROWS};
use crate::db::models::CryptoRow;
use crate::error::Result;

#[derive(Debug)]
pub struct VerifySummary {
    pub row_count: i64,
    pub expected: usize,
    pub sample: Vec<CryptoRow>,
}

impl VerifySummary {
    /// False when the table is empty or the count is far below the cleaned
    /// batch size. Surfaced as a warning, never an error.
    pub fn ok(&self) -> bool {
        self.row_count > 0
            && (self.row_count as f64) >= (self.expected as f64) * VERIFY_LOW_COUNT_RATIO
    }
}

/// Re-query the store after a load: total row count plus a small sample of
/// the largest coins by market cap, to confirm well-formed persisted data.
pub async fn verify_load(cfg: &Config, expected: usize) -> Result<VerifySummary> {
    let pool = super::connect_read_only(&cfg.db_path).await?;
    let outcome = query_summary(&pool, expected).await;
    pool.close().await;

    let summary = outcome?;
    if summary.row_count == 0 {
        warn!("verification: crypto_data is empty — upstream stages produced no rows");
    } else if !summary.ok() {
        warn!(
            "verification: crypto_data holds {} rows, well below the {} expected",
            summary.row_count, summary.expected
        );
    } else {
        info!(
            "verification: {} rows persisted ({} expected this run)",
            summary.row_count, summary.expected
        );
    }
    for row in &summary.sample {
        info!(
            "  {} ({}) price={:.4} market_cap={:.0}",
            row.id, row.symbol, row.current_price, row.market_cap
        );
    }

    Ok(summary)
}

async fn query_summary(pool: &sqlx::SqlitePool, expected: usize) -> Result<VerifySummary> {
    let row_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crypto_data")
        .fetch_one(pool)
        .await?;

    let sample: Vec<CryptoRow> = sqlx::query_as(
        "SELECT * FROM crypto_data ORDER BY market_cap DESC LIMIT ?",
    )
    .bind(VERIFY_SAMPLE_ROWS)
    .fetch_all(pool)
    .await?;

    Ok(VerifySummary {
        row_count,
        expected,
        sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::loader::load_records;
    use crate::types::MarketRecord;

    fn test_cfg(tag: &str) -> Config {
        let path = std::env::temp_dir().join(format!(
            "crypto_etl_{tag}_{}.db",
            std::process::id()
        ));
        Config {
            api_url: "http://unused".to_string(),
            vs_currency: "usd".to_string(),
            coin_count: 10,
            db_path: path.to_string_lossy().into_owned(),
            log_level: "info".to_string(),
        }
    }

    fn record(id: &str, price: f64, cap: f64) -> MarketRecord {
        MarketRecord {
            id: id.to_string(),
            symbol: id[..3.min(id.len())].to_string(),
            name: id.to_string(),
            current_price: price,
            market_cap: cap,
            total_volume: 1_000_000.0,
            price_change_pct_24h: -0.5,
            last_updated: "2026-08-23T12:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn load_then_verify_round_trips() {
        let cfg = test_cfg("round_trip");
        let _ = std::fs::remove_file(&cfg.db_path);

        let batch = vec![
            record("bitcoin", 50000.0, 900_000_000_000.0),
            record("ethereum", 3000.0, 400_000_000_000.0),
        ];
        let written = load_records(&cfg, &batch).await.unwrap();
        assert_eq!(written, 2);

        let summary = verify_load(&cfg, batch.len()).await.unwrap();
        assert_eq!(summary.row_count, 2);
        assert!(summary.ok());
        // Sample is ordered by market cap descending.
        assert_eq!(summary.sample[0].id, "bitcoin");
        assert_eq!(summary.sample[1].id, "ethereum");

        let _ = std::fs::remove_file(&cfg.db_path);
    }

    #[tokio::test]
    async fn reloading_the_same_batch_does_not_double_rows() {
        let cfg = test_cfg("reload");
        let _ = std::fs::remove_file(&cfg.db_path);

        let batch = vec![
            record("bitcoin", 50000.0, 900_000_000_000.0),
            record("ethereum", 3000.0, 400_000_000_000.0),
        ];
        load_records(&cfg, &batch).await.unwrap();
        load_records(&cfg, &batch).await.unwrap();

        let summary = verify_load(&cfg, batch.len()).await.unwrap();
        assert_eq!(summary.row_count, 2);

        let _ = std::fs::remove_file(&cfg.db_path);
    }

    #[tokio::test]
    async fn reload_updates_the_row_for_an_existing_id() {
        let cfg = test_cfg("upsert");
        let _ = std::fs::remove_file(&cfg.db_path);

        load_records(&cfg, &[record("bitcoin", 50000.0, 900_000_000_000.0)])
            .await
            .unwrap();
        load_records(&cfg, &[record("bitcoin", 51000.0, 910_000_000_000.0)])
            .await
            .unwrap();

        let summary = verify_load(&cfg, 1).await.unwrap();
        assert_eq!(summary.row_count, 1);
        assert!((summary.sample[0].current_price - 51000.0).abs() < 1e-9);

        let _ = std::fs::remove_file(&cfg.db_path);
    }

    #[tokio::test]
    async fn verifying_a_missing_store_errors_without_creating_it() {
        let cfg = test_cfg("missing_store");
        let _ = std::fs::remove_file(&cfg.db_path);

        assert!(verify_load(&cfg, 1).await.is_err());
        // The verifier only reads; it must not create the store file.
        assert!(!std::path::Path::new(&cfg.db_path).exists());
    }

    #[tokio::test]
    async fn empty_load_verifies_with_a_warning_not_an_error() {
        let cfg = test_cfg("empty");
        let _ = std::fs::remove_file(&cfg.db_path);

        load_records(&cfg, &[]).await.unwrap();
        let summary = verify_load(&cfg, 0).await.unwrap();
        assert_eq!(summary.row_count, 0);
        assert!(!summary.ok());

        let _ = std::fs::remove_file(&cfg.db_path);
    }
}
