// Trend estimator - OLS slope of temperature over elapsed days
use crate::domain::analysis::TrendResult;
use crate::domain::error::AnalysisError;
use crate::domain::observation::Series;

/// Fits `temperature = a + b * days` where `days` counts whole days since the
/// earliest timestamp in the series. Repeated days contribute several points
/// at the same x.
pub fn estimate_trend(series: &Series) -> Result<TrendResult, AnalysisError> {
    let observations = series.observations();
    let Some(start) = observations.iter().map(|o| o.timestamp).min() else {
        return Err(AnalysisError::InsufficientHistory(format!(
            "no observations for {}",
            series.city()
        )));
    };

    let points: Vec<(f64, f64)> = observations
        .iter()
        .map(|o| ((o.timestamp - start).num_days() as f64, o.temperature))
        .collect();

    if points.iter().all(|(x, _)| *x == 0.0) {
        return Err(AnalysisError::InsufficientHistory(format!(
            "{} needs observations on at least 2 distinct days",
            series.city()
        )));
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    let sxy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    Ok(TrendResult::new(sxy / sxx))
}
