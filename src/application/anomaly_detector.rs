// Anomaly detector - Rolling mean/std with a sigma band
use crate::application::statistics::{mean, sample_std, within_band};
use crate::domain::analysis::RollingPoint;
use crate::domain::observation::Series;

pub const DEFAULT_WINDOW: usize = 30;
pub const DEFAULT_SIGMA: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyDetector {
    window: usize,
    sigma: f64,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_SIGMA)
    }
}

impl AnomalyDetector {
    pub fn new(window: usize, sigma: f64) -> Self {
        Self { window, sigma }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn detect_series(&self, series: &Series) -> Vec<RollingPoint> {
        self.detect(&series.temperatures())
    }

    /// One entry per input value, same order.
    ///
    /// Each filled window is evaluated from scratch so the flag at `i` depends
    /// only on `temperatures[i + 1 - window..=i]`. A value exactly on the band
    /// edge is not anomalous.
    pub fn detect(&self, temperatures: &[f64]) -> Vec<RollingPoint> {
        if self.window == 0 {
            return vec![RollingPoint::default(); temperatures.len()];
        }

        temperatures
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                if i + 1 < self.window {
                    return RollingPoint::default();
                }

                let window = &temperatures[i + 1 - self.window..=i];
                let rolling_mean = mean(window);
                let rolling_std = sample_std(window);
                let anomaly = match (rolling_mean, rolling_std) {
                    (Some(m), Some(s)) if !s.is_nan() => !within_band(value, m, s, self.sigma),
                    _ => false,
                };

                RollingPoint {
                    rolling_mean,
                    rolling_std,
                    anomaly,
                }
            })
            .collect()
    }
}
