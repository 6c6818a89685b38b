use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::config::Config;
use crate::error::{EtlError, Result};
use crate::types::MarketRecord;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS crypto_data (
    id                   TEXT PRIMARY KEY,
    symbol               TEXT NOT NULL,
    name                 TEXT NOT NULL,
    current_price        REAL NOT NULL,
    market_cap           REAL NOT NULL,
    total_volume         REAL NOT NULL,
    price_change_pct_24h REAL NOT NULL,
    last_updated         TEXT NOT NULL,
    loaded_at            INTEGER NOT NULL
)
"#;

/// Write the cleaned batch to the store. Opens a scoped pool, ensures the
/// schema exists, and upserts every row keyed on `id` inside one
/// transaction. Rows for coins that fell out of the requested set keep
/// their last snapshot. Returns the number of rows written.
pub async fn load_records(cfg: &Config, records: &[MarketRecord]) -> Result<u64> {
    let pool = super::connect(&cfg.db_path)
        .await
        .map_err(|e| EtlError::Load(format!("cannot open store at {}: {e}", cfg.db_path)))?;
    let outcome = write_all(&pool, records).await;
    // Released on every exit path, success or not.
    pool.close().await;
    outcome.map_err(|e| EtlError::Load(format!("write to crypto_data failed: {e}")))
}

async fn write_all(pool: &sqlx::SqlitePool, records: &[MarketRecord]) -> Result<u64> {
    sqlx::query(CREATE_TABLE_SQL).execute(pool).await?;

    let loaded_at = now_secs();
    let mut tx = pool.begin().await?;
    for record in records {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO crypto_data (
                id, symbol, name, current_price, market_cap, total_volume,
                price_change_pct_24h, last_updated, loaded_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.symbol)
        .bind(&record.name)
        .bind(record.current_price)
        .bind(record.market_cap)
        .bind(record.total_volume)
        .bind(record.price_change_pct_24h)
        .bind(&record.last_updated)
        .bind(loaded_at)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!("wrote {} rows to crypto_data", records.len());
    Ok(records.len() as u64)
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
