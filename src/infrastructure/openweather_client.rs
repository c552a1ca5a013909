// OpenWeatherMap client - Current temperature by city name
use crate::application::temperature_source::TemperatureSource;
use crate::domain::analysis::FetchResult;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainSection,
}

#[derive(Debug, Deserialize)]
struct MainSection {
    temp: f64,
}

impl OpenWeatherClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build weather HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    fn build_query_url(&self, city: &str, api_key: &str) -> String {
        format!(
            "{}?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(api_key)
        )
    }

    fn describe_transport_error(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            format!("request timed out after {:?}: {}", self.timeout, error)
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else {
            error.to_string()
        }
    }
}

#[async_trait]
impl TemperatureSource for OpenWeatherClient {
    /// Exactly one GET per call, no retries.
    async fn fetch(&self, city: &str, api_key: Option<&str>) -> FetchResult {
        let Some(api_key) = api_key.map(str::trim).filter(|k| !k.is_empty()) else {
            return FetchResult::NoApiKey;
        };

        let url = self.build_query_url(city, api_key);
        tracing::debug!("Requesting current weather for {}", city);

        let response = match self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return FetchResult::NetworkError(self.describe_transport_error(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Failed to read {} error body for {}: {}", status, city, e);
                    format!("<unreadable body: {}>", self.describe_transport_error(&e))
                }
            };
            return FetchResult::HttpError {
                status: status.as_u16(),
                body,
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchResult::NetworkError(self.describe_transport_error(&e)),
        };

        match serde_json::from_str::<WeatherResponse>(&body) {
            Ok(data) => FetchResult::Temperature(data.main.temp),
            Err(e) => FetchResult::NetworkError(format!("malformed weather response: {}", e)),
        }
    }
}
