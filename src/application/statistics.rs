// Descriptive statistics shared by the analysis steps

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (divisor n - 1). Needs at least two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// True iff `value` lies in `[mean - sigma*std, mean + sigma*std]`.
pub fn within_band(value: f64, mean: f64, std: f64, sigma: f64) -> bool {
    let lower = mean - sigma * std;
    let upper = mean + sigma * std;
    lower <= value && value <= upper
}
