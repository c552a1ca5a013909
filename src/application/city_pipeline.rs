// City analysis service - Composes the analysis steps for one city
use crate::application::anomaly_detector::AnomalyDetector;
use crate::application::clock::Clock;
use crate::application::seasonal_profiler::SeasonalProfiler;
use crate::application::temperature_source::TemperatureSource;
use crate::application::trend_estimator::estimate_trend;
use crate::domain::analysis::{CityAnalysis, FetchResult, TemperatureSummary};
use crate::domain::error::AnalysisError;
use crate::domain::observation::Dataset;
use anyhow::Context;
use std::sync::Arc;

/// Where the rolling-statistics step runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Blocking thread pool, so other city tasks keep making progress
    Offloaded,
    /// Directly on the calling task
    Inline,
}

#[derive(Clone)]
pub struct CityAnalysisService {
    detector: AnomalyDetector,
    profiler: SeasonalProfiler,
    source: Arc<dyn TemperatureSource>,
    clock: Arc<dyn Clock>,
}

impl CityAnalysisService {
    pub fn new(
        detector: AnomalyDetector,
        profiler: SeasonalProfiler,
        source: Arc<dyn TemperatureSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            detector,
            profiler,
            source,
            clock,
        }
    }

    /// Run every analysis step for `city` against a private copy of its rows.
    ///
    /// Only a failed worker hand-off is an error; every per-city shortfall is
    /// recorded in `CityAnalysis::diagnostics` and leaves the field unset.
    pub async fn analyze(
        &self,
        city: &str,
        dataset: &Dataset,
        api_key: Option<&str>,
        mode: ExecutionMode,
    ) -> anyhow::Result<CityAnalysis> {
        let mut diagnostics = Vec::new();

        // 1. Owned copy; the shared dataset is never written to
        let series = dataset.for_city(city);
        tracing::debug!("Analyzing {} ({} observations, {:?})", city, series.len(), mode);

        // 2. Rolling statistics
        let (series, rolling) = match mode {
            ExecutionMode::Offloaded => {
                let detector = self.detector;
                tokio::task::spawn_blocking(move || {
                    let rolling = detector.detect_series(&series);
                    (series, rolling)
                })
                .await
                .with_context(|| format!("Rolling statistics worker failed for {}", city))?
            }
            ExecutionMode::Inline => {
                let rolling = self.detector.detect_series(&series);
                (series, rolling)
            }
        };

        if series.len() < self.detector.window() {
            diagnostics.push(AnalysisError::InsufficientHistory(format!(
                "{} has {} observations, rolling window needs {}",
                city,
                series.len(),
                self.detector.window()
            )));
        }

        let summary = TemperatureSummary::from_series(&series, &rolling);

        // 3. Seasonal profile and trend
        let seasonal = self.profiler.profile(&series);
        let trend = match estimate_trend(&series) {
            Ok(trend) => Some(trend),
            Err(e) => {
                diagnostics.push(e);
                None
            }
        };

        // 4. Current temperature
        let api_key = api_key.map(str::trim).filter(|k| !k.is_empty());
        let fetch = match api_key {
            Some(key) => self.source.fetch(city, Some(key)).await,
            None => FetchResult::NoApiKey,
        };

        match &fetch {
            FetchResult::Temperature(t) => tracing::debug!("Current temperature in {}: {}", city, t),
            FetchResult::NoApiKey => tracing::debug!("No API key, skipping fetch for {}", city),
            FetchResult::HttpError { status, body } => {
                tracing::warn!("Weather API returned {} for {}: {}", status, city, body)
            }
            FetchResult::NetworkError(message) => {
                tracing::warn!("Weather lookup failed for {}: {}", city, message)
            }
        }

        // 5. Seasonal normality of the current temperature
        let (current_season, normality) = match fetch.temperature() {
            Some(temperature) => {
                let season = self.clock.current_season();
                match self.profiler.is_normal(temperature, &seasonal, season) {
                    Ok(normal) => (Some(season), Some(normal)),
                    Err(e) => {
                        diagnostics.push(e);
                        (Some(season), None)
                    }
                }
            }
            None => (None, None),
        };

        for diagnostic in &diagnostics {
            tracing::warn!("{}: {}", city, diagnostic);
        }

        Ok(CityAnalysis {
            city: city.to_string(),
            series,
            rolling,
            summary,
            seasonal,
            trend,
            fetch,
            current_season,
            normality,
            diagnostics,
        })
    }
}
