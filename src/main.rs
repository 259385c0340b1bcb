// Main entry point - Dependency injection and pipeline wiring
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;

use crate::application::coordinator::{ChartCoordinator, CoordinatorSettings};
use crate::application::series_cache::SeriesCache;
use crate::domain::series::Parameters;
use crate::infrastructure::config::{load_chart_config, load_providers_config};
use crate::infrastructure::http_provider::HttpSeriesProvider;
use crate::presentation::log_view::{LogChartRenderer, LogNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let providers_config = load_providers_config()?;
    let chart_config = load_chart_config()?;
    let population_country = providers_config.population.country.clone();

    // Create the provider and cache (infrastructure layer)
    let provider = Arc::new(HttpSeriesProvider::new(providers_config));
    let cache = Arc::new(SeriesCache::new(provider));

    // Start the coordinator (application layer); it loads the default
    // series immediately.
    let settings = CoordinatorSettings {
        defaults: Parameters {
            series: chart_config.defaults.series,
            threshold: chart_config.defaults.threshold,
            max_points: chart_config.defaults.max_points,
        },
        population_country,
        debounce: Duration::from_millis(chart_config.timing.debounce_ms),
        notice_duration: Duration::from_millis(chart_config.timing.notice_ms),
    };
    let handle = ChartCoordinator::spawn(
        cache,
        Arc::new(LogChartRenderer),
        Arc::new(LogNotifier),
        settings,
    );

    println!("series-dashboard running, ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;

    Ok(())
}
