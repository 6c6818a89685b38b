/// Row type for the `crypto_data` table, used by sqlx for typed reads.
#[derive(Debug, sqlx::FromRow)]
pub struct CryptoRow {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub price_change_pct_24h: f64,
    pub last_updated: String,
    pub loaded_at: i64,
}
