// Main entry point - Dependency injection and benchmark run
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::application::anomaly_detector::AnomalyDetector;
use crate::application::benchmark_service::BenchmarkService;
use crate::application::city_pipeline::CityAnalysisService;
use crate::application::clock::{Clock, FixedClock};
use crate::application::seasonal_profiler::SeasonalProfiler;
use crate::domain::benchmark::Strategy;
use crate::infrastructure::config::{OutputFormat, load_monitor_config};
use crate::infrastructure::csv_dataset;
use crate::infrastructure::openweather_client::OpenWeatherClient;
use crate::infrastructure::system_clock::SystemClock;
use crate::presentation::console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_monitor_config()?;

    // Load dataset; a malformed file stops the run before any city work
    let dataset = match csv_dataset::load(&config.dataset.path) {
        Ok(dataset) => Arc::new(dataset),
        Err(e) => {
            tracing::error!("Unsupported dataset {}: {:#}", config.dataset.path, e);
            return Err(e);
        }
    };

    let cities = if config.cities.is_empty() {
        dataset.cities()
    } else {
        config.cities.clone()
    };

    // Wire services
    let source = Arc::new(OpenWeatherClient::new(
        config.weather.base_url.clone(),
        Duration::from_secs(config.weather.timeout_secs),
    )?);
    let clock: Arc<dyn Clock> = match config.analysis.reference_date {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    };
    let pipeline = CityAnalysisService::new(
        AnomalyDetector::new(config.analysis.window, config.analysis.sigma),
        SeasonalProfiler::new(config.analysis.sigma),
        source,
        clock,
    );
    let benchmark = BenchmarkService::new(pipeline);

    tracing::info!("Analyzing {} cities", cities.len());
    let outcome = benchmark
        .run(&cities, dataset, config.weather.api_key())
        .await?;

    let analyses = outcome
        .analyses
        .get(&Strategy::OffloadedParallel)
        .cloned()
        .unwrap_or_default();

    match config.output.format {
        OutputFormat::Text => {
            for analysis in &analyses {
                println!("{}", console::render_city(analysis));
            }
            println!("{}", console::render_report(&outcome.report));
        }
        OutputFormat::Json => {
            println!("{}", console::render_json(&analyses, &outcome.report)?);
        }
    }

    Ok(())
}
