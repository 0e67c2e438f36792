pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::cache::RateCache;
use crate::core::config::AppConfig;
use crate::core::pipeline::{BatchOptions, convert_statement};
use crate::core::rates::RateResolver;
use crate::providers::NbpProvider;
use crate::store::{DiskCache, MemoryCache};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Convert {
        input: PathBuf,
        output: Option<PathBuf>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("EUR statement converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Convert { input, output } => {
            convert(&config, &input, output.as_deref()).await
        }
    }
}

async fn convert(config: &AppConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let rows = core::statement::read_statement(input)?;

    let cache = open_rate_cache(config);
    let base_url = config
        .providers
        .nbp
        .as_ref()
        .map_or("https://api.nbp.pl", |p| &p.base_url);
    let provider = NbpProvider::new(base_url);
    let resolver = RateResolver::new(provider, cache, &config.currency, config.max_rate_fallbacks);

    let interest_rows = rows.iter().filter(|r| r.is_interest()).count() as u64;
    let pb = cli::ui::new_progress_bar(interest_rows);
    pb.set_message("Fetching NBP rates...");

    let options = BatchOptions {
        chunk_size: config.batch.chunk_size,
        chunk_delay: Duration::from_millis(config.batch.chunk_delay_ms),
    };
    let report = convert_statement(rows, &resolver, &options, &pb).await;
    pb.finish_and_clear();

    println!("{}", cli::report::display_as_table(&report));

    if let Some(path) = output {
        core::export::export_csv(&report, path)?;
        println!("\nExported to {}", path.display());
    }

    Ok(())
}

/// Opens the persistent rate cache, degrading to an in-memory cache for the
/// session when the disk store is unavailable.
fn open_rate_cache(config: &AppConfig) -> Arc<dyn RateCache> {
    let cache_dir = config.default_data_path().map(|path| path.join("cache"));
    match cache_dir.and_then(|dir| DiskCache::open(&dir)) {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            warn!(error = %e, "Could not open rate cache on disk, using in-memory cache");
            Arc::new(MemoryCache::new())
        }
    }
}
