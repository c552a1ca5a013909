// Application layer - Analysis steps, ports and orchestration
pub mod anomaly_detector;
pub mod benchmark_service;
pub mod city_pipeline;
pub mod clock;
pub mod seasonal_profiler;
pub mod statistics;
pub mod temperature_source;
pub mod trend_estimator;

#[cfg(test)]
pub mod test_support;
