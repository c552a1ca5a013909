// Per-city analysis result models
use super::error::AnalysisError;
use super::observation::{Season, Series};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rolling statistics at one index of a series.
/// Mean and std stay `None` until the window is filled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RollingPoint {
    pub rolling_mean: Option<f64>,
    pub rolling_std: Option<f64>,
    pub anomaly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonStats {
    pub count: usize,
    pub mean: f64,
    /// `None` with fewer than two observations
    pub std: Option<f64>,
}

pub type SeasonalStats = BTreeMap<Season, SeasonStats>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendResult {
    pub slope_per_day: f64,
    pub slope_per_year: f64,
}

impl TrendResult {
    pub fn new(slope_per_day: f64) -> Self {
        Self {
            slope_per_day,
            slope_per_year: slope_per_day * 365.0,
        }
    }

    pub fn direction(&self) -> TrendDirection {
        if self.slope_per_day > 0.0 {
            TrendDirection::Positive
        } else {
            TrendDirection::Negative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FetchResult {
    Temperature(f64),
    NoApiKey,
    HttpError { status: u16, body: String },
    NetworkError(String),
}

impl FetchResult {
    pub fn temperature(&self) -> Option<f64> {
        match self {
            FetchResult::Temperature(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub anomaly_count: usize,
}

impl TemperatureSummary {
    pub fn from_series(series: &Series, rolling: &[RollingPoint]) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let temperatures = series.temperatures();

        let count = temperatures.len();
        let mean = temperatures.iter().sum::<f64>() / count as f64;
        let min = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count,
            mean,
            min,
            max,
            anomaly_count: rolling.iter().filter(|p| p.anomaly).count(),
        })
    }
}

/// Everything computed for one city in one pipeline run.
/// Fields whose producing step was skipped or failed stay `None`; the reason
/// is recorded in `diagnostics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityAnalysis {
    pub city: String,
    pub series: Series,
    pub rolling: Vec<RollingPoint>,
    pub summary: Option<TemperatureSummary>,
    pub seasonal: SeasonalStats,
    pub trend: Option<TrendResult>,
    pub fetch: FetchResult,
    pub current_season: Option<Season>,
    pub normality: Option<bool>,
    pub diagnostics: Vec<AnalysisError>,
}

impl CityAnalysis {
    /// Indices flagged as anomalous
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.rolling
            .iter()
            .enumerate()
            .filter(|(_, p)| p.anomaly)
            .map(|(i, _)| i)
            .collect()
    }
}
