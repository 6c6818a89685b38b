mod config;
mod db;
mod error;
mod extract;
mod transform;
mod types;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::types::Stage;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if run(cfg).await.is_err() {
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let mut stage = Stage::Extracting;
    match etl_process(&cfg, &mut stage).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("pipeline failed during {stage}: {e}");
            Err(e)
        }
    }
}

/// The four-stage batch run: extract → transform → load → verify.
/// Strictly sequential; the first failing stage aborts the run.
async fn etl_process(cfg: &Config, stage: &mut Stage) -> Result<()> {
    info!(
        "starting ETL run: top {} coins in {} → {}",
        cfg.coin_count, cfg.vs_currency, cfg.db_path
    );

    *stage = Stage::Extracting;
    let raw = extract::fetch_market_data(cfg).await?;
    info!("extracted {} raw records", raw.len());

    *stage = Stage::Transforming;
    let (cleaned, stats) = transform::clean_records(&raw)?;
    info!(
        "transformed: {} cleaned, {} dropped (missing_field={} bad_number={} empty_id={} bad_price={} bad_cap={} bad_volume={})",
        stats.cleaned,
        stats.dropped,
        stats.dropped_missing_field,
        stats.dropped_bad_number,
        stats.dropped_empty_id,
        stats.dropped_non_positive_price,
        stats.dropped_negative_market_cap,
        stats.dropped_negative_volume,
    );

    *stage = Stage::Loading;
    let written = db::loader::load_records(cfg, &cleaned).await?;
    info!("loaded {written} rows into crypto_data");

    *stage = Stage::Verifying;
    let summary = db::verifier::verify_load(cfg, cleaned.len()).await?;

    info!(
        "ETL run complete: {} rows persisted, verification {}",
        summary.row_count,
        if summary.ok() { "ok" } else { "flagged low row count" }
    );
    Ok(())
}
