// Console presenter - Renders analyses and benchmark timings
use crate::domain::analysis::{CityAnalysis, FetchResult, TrendDirection};
use crate::domain::benchmark::{BenchmarkReport, Strategy};
use std::fmt;

pub fn render_city(analysis: &CityAnalysis) -> String {
    CityView(analysis).to_string()
}

pub fn render_report(report: &BenchmarkReport) -> String {
    ReportView(report).to_string()
}

struct CityView<'a>(&'a CityAnalysis);

impl fmt::Display for CityView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;
        writeln!(f, "== {} ==", analysis.city)?;

        match &analysis.summary {
            Some(summary) => {
                writeln!(f, "Mean temperature: {:.2} °C", summary.mean)?;
                writeln!(f, "Min temperature: {:.2} °C", summary.min)?;
                writeln!(f, "Max temperature: {:.2} °C", summary.max)?;
                writeln!(f, "Anomalies: {} of {}", summary.anomaly_count, summary.count)?;
            }
            None => writeln!(f, "No observations")?,
        }

        for index in analysis.anomaly_indices() {
            let observation = &analysis.series.observations()[index];
            writeln!(f, "  {} {:.1} °C", observation.timestamp, observation.temperature)?;
        }

        for (season, stats) in &analysis.seasonal {
            let std = stats
                .std
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "n/a".to_string());
            writeln!(
                f,
                "Season {}: mean {:.2} °C, std {} ({} obs)",
                season, stats.mean, std, stats.count
            )?;
        }

        match &analysis.trend {
            Some(trend) => {
                let label = match trend.direction() {
                    TrendDirection::Positive => "positive",
                    TrendDirection::Negative => "negative",
                };
                writeln!(
                    f,
                    "Trend {}: {:.5} °C/day, {:.4} °C/year",
                    label, trend.slope_per_day, trend.slope_per_year
                )?;
            }
            None => writeln!(f, "Trend: not enough history")?,
        }

        match &analysis.fetch {
            FetchResult::Temperature(temperature) => {
                writeln!(f, "Current temperature: {} °C", temperature)?;
                if let Some(season) = analysis.current_season {
                    let verdict = match analysis.normality {
                        Some(true) => "normal",
                        Some(false) => "abnormal",
                        None => "unknown",
                    };
                    writeln!(f, "Temperature is {} for {}", verdict, season)?;
                }
            }
            FetchResult::NoApiKey => {}
            FetchResult::HttpError { status, body } => {
                writeln!(f, "Current temperature unavailable (HTTP {}): {}", status, body)?;
            }
            FetchResult::NetworkError(message) => {
                writeln!(f, "Current temperature unavailable: {}", message)?;
            }
        }

        Ok(())
    }
}

struct ReportView<'a>(&'a BenchmarkReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Benchmark")?;
        for strategy in Strategy::ALL {
            if let Some(elapsed) = self.0.elapsed(strategy) {
                writeln!(f, "- {}: {:.2} s", strategy, elapsed.as_secs_f64())?;
            }
        }
        Ok(())
    }
}

pub fn render_json(analyses: &[CityAnalysis], report: &BenchmarkReport) -> anyhow::Result<String> {
    let timings: serde_json::Map<String, serde_json::Value> = report
        .entries()
        .iter()
        .map(|(strategy, elapsed)| {
            (
                strategy.name().to_string(),
                serde_json::json!(elapsed.as_secs_f64()),
            )
        })
        .collect();

    let document = serde_json::json!({
        "cities": analyses,
        "benchmark": timings,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}
