// Seasonal profiler - Per-season mean/std and normality checks
use crate::application::anomaly_detector::DEFAULT_SIGMA;
use crate::application::statistics::{mean, sample_std, within_band};
use crate::domain::analysis::{SeasonStats, SeasonalStats};
use crate::domain::error::AnalysisError;
use crate::domain::observation::{Season, Series};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalProfiler {
    sigma: f64,
}

impl Default for SeasonalProfiler {
    fn default() -> Self {
        Self::new(DEFAULT_SIGMA)
    }
}

impl SeasonalProfiler {
    pub fn new(sigma: f64) -> Self {
        Self { sigma }
    }

    pub fn profile(&self, series: &Series) -> SeasonalStats {
        let mut groups: BTreeMap<Season, Vec<f64>> = BTreeMap::new();
        for observation in series.observations() {
            groups
                .entry(observation.season)
                .or_default()
                .push(observation.temperature);
        }

        groups
            .into_iter()
            .filter_map(|(season, temps)| {
                let stats = SeasonStats {
                    count: temps.len(),
                    mean: mean(&temps)?,
                    std: sample_std(&temps),
                };
                Some((season, stats))
            })
            .collect()
    }

    /// Whether `temperature` falls inside the season's sigma band (edges included).
    pub fn is_normal(
        &self,
        temperature: f64,
        stats: &SeasonalStats,
        season: Season,
    ) -> Result<bool, AnalysisError> {
        let entry = stats
            .get(&season)
            .ok_or(AnalysisError::InsufficientSeasonData(season))?;

        match entry.std {
            Some(std) if std.is_finite() && entry.mean.is_finite() => {
                Ok(within_band(temperature, entry.mean, std, self.sigma))
            }
            _ => Err(AnalysisError::InsufficientSeasonData(season)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::{Dataset, Observation};
    use chrono::NaiveDate;

    fn paris(rows: &[(Season, f64)]) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let observations = rows
            .iter()
            .enumerate()
            .map(|(i, (season, t))| {
                Observation::new(
                    "Paris".to_string(),
                    start + chrono::Days::new(i as u64),
                    *t,
                    *season,
                )
            })
            .collect();
        Dataset::new(observations).for_city("Paris")
    }

    fn winter_stats(mean: f64, std: Option<f64>) -> SeasonalStats {
        let mut stats = SeasonalStats::new();
        stats.insert(Season::Winter, SeasonStats { count: 3, mean, std });
        stats
    }

    #[test]
    fn test_profile_groups_by_season() {
        let series = paris(&[
            (Season::Winter, -1.0),
            (Season::Summer, 20.0),
            (Season::Winter, 2.0),
            (Season::Summer, 24.0),
            (Season::Winter, 5.0),
        ]);

        let stats = SeasonalProfiler::default().profile(&series);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[&Season::Winter].mean, 2.0);
        assert_eq!(stats[&Season::Winter].std, Some(3.0));
        assert_eq!(stats[&Season::Winter].count, 3);
        assert_eq!(stats[&Season::Summer].mean, 22.0);
    }

    #[test]
    fn test_is_normal_boundaries() {
        let profiler = SeasonalProfiler::default();
        let stats = winter_stats(2.0, Some(3.0));

        assert_eq!(profiler.is_normal(8.0, &stats, Season::Winter), Ok(true));
        assert_eq!(profiler.is_normal(-4.0, &stats, Season::Winter), Ok(true));
        assert_eq!(profiler.is_normal(9.0, &stats, Season::Winter), Ok(false));
        assert_eq!(profiler.is_normal(-4.0 - 1e-9, &stats, Season::Winter), Ok(false));
    }

    #[test]
    fn test_is_normal_from_profiled_series() {
        let series = paris(&[
            (Season::Winter, -1.0),
            (Season::Winter, 2.0),
            (Season::Winter, 5.0),
            (Season::Spring, 12.0),
        ]);
        let profiler = SeasonalProfiler::default();
        let stats = profiler.profile(&series);

        assert_eq!(profiler.is_normal(8.0, &stats, Season::Winter), Ok(true));
        assert_eq!(profiler.is_normal(9.0, &stats, Season::Winter), Ok(false));
    }

    #[test]
    fn test_missing_season_is_insufficient() {
        let stats = winter_stats(2.0, Some(3.0));
        assert_eq!(
            SeasonalProfiler::default().is_normal(10.0, &stats, Season::Summer),
            Err(AnalysisError::InsufficientSeasonData(Season::Summer))
        );
    }

    #[test]
    fn test_single_observation_season_is_insufficient() {
        let series = paris(&[(Season::Autumn, 11.0)]);
        let profiler = SeasonalProfiler::default();
        let stats = profiler.profile(&series);

        assert_eq!(stats[&Season::Autumn].std, None);
        assert_eq!(
            profiler.is_normal(11.0, &stats, Season::Autumn),
            Err(AnalysisError::InsufficientSeasonData(Season::Autumn))
        );
    }
}
