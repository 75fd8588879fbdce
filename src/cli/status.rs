use crate::app::App;
use crate::cli::StatusArgs;
use crate::backend::RecordStore;
use crate::utils::redaction::redact_connection_string;
use anyhow::{Context, Result};
use secrecy::ExposeSecret;

pub async fn execute(app: &App, args: &StatusArgs) -> Result<()> {
    let config = app.config();
    let key = &config.cache.snapshot_key;

    let records = app
        .store()
        .count()
        .await
        .context("Failed to count student records")?;

    let cache = app.cache();
    let cache_status = match cache.ping().await {
        Ok(()) => "✅ REACHABLE".to_string(),
        Err(e) => format!("❌ UNREACHABLE ({})", e),
    };
    let snapshot = match cache.get(key).await {
        Ok(Some(bytes)) => format!("present ({} bytes)", bytes.len()),
        Ok(None) => "absent".to_string(),
        Err(e) => format!("unknown ({})", e),
    };

    println!("=== Student Records Status ===\n");
    println!("Records:         {}", records);
    println!("Seeded:          {}", if records > 0 { "yes" } else { "no" });
    println!("Cache:           {}", cache_status);
    println!("Snapshot '{}':  {}", key, snapshot);

    if args.verbose {
        println!();
        println!(
            "Database:        {}",
            redact_connection_string(config.database.url.expose_secret())
        );
        println!("Cache Backend:   {:?}", config.cache.cache_type);
        if config.cache.cache_type == crate::config::CacheType::Redis {
            println!(
                "Redis:           {}",
                redact_connection_string(config.cache.connection_string.expose_secret())
            );
        }
        println!("Dataset:         {}", config.bootstrap.dataset_path.display());
        println!("Prediction:      {}", config.prediction.endpoint);
    }

    Ok(())
}
