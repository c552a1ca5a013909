// Shared fixtures for application-layer tests
use crate::application::temperature_source::TemperatureSource;
use crate::domain::analysis::FetchResult;
use crate::domain::observation::{Dataset, Observation, Season};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned `TemperatureSource` that records which cities it was asked about.
#[derive(Default)]
pub struct StubSource {
    results: HashMap<String, FetchResult>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn with_temperature(city: &str, temperature: f64) -> Self {
        Self::with_result(city, FetchResult::Temperature(temperature))
    }

    pub fn with_result(city: &str, result: FetchResult) -> Self {
        Self::default().and(city, result)
    }

    pub fn and(mut self, city: &str, result: FetchResult) -> Self {
        self.results.insert(city.to_string(), result);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most fetches ever outstanding at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl TemperatureSource for StubSource {
    async fn fetch(&self, city: &str, api_key: Option<&str>) -> FetchResult {
        if api_key.is_none_or(|k| k.trim().is_empty()) {
            return FetchResult::NoApiKey;
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(city.to_string());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.results
            .get(city)
            .cloned()
            .unwrap_or_else(|| FetchResult::NetworkError(format!("no canned result for {}", city)))
    }
}

pub fn dataset_from(rows: &[(&str, &str, f64, Season)]) -> Dataset {
    Dataset::new(
        rows.iter()
            .map(|(city, date, temperature, season)| {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
                Observation::new(city.to_string(), date, *temperature, *season)
            })
            .collect(),
    )
}

/// 40 daily Paris readings at 15 degrees with a single 40 degree spike at index 35
pub fn paris_spike_dataset() -> Dataset {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    Dataset::new(
        (0..40u64)
            .map(|i| {
                let date = start + chrono::Days::new(i);
                let temperature = if i == 35 { 40.0 } else { 15.0 };
                Observation::new("Paris".to_string(), date, temperature, Season::for_date(date))
            })
            .collect(),
    )
}

/// A few cities with varied shapes for strategy comparisons
pub fn multi_city_dataset() -> Dataset {
    let start = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
    let mut rows = Vec::new();
    for (c, city) in ["Paris", "Berlin", "Cairo", "Lima"].iter().enumerate() {
        for i in 0..120u64 {
            let date = start + chrono::Days::new(i);
            let wave = ((i as f64) * 0.37 + c as f64).sin() * 4.0;
            let spike = if i % 47 == 13 { 18.0 } else { 0.0 };
            let temperature = 5.0 + c as f64 * 6.0 + 0.02 * i as f64 + wave + spike;
            rows.push(Observation::new(
                city.to_string(),
                date,
                temperature,
                Season::for_date(date),
            ));
        }
    }
    Dataset::new(rows)
}
