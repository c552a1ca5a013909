// Port for live current-temperature lookups
use crate::domain::analysis::FetchResult;
use async_trait::async_trait;

#[async_trait]
pub trait TemperatureSource: Send + Sync {
    /// Look up the current temperature for `city`.
    ///
    /// A missing or blank `api_key` must yield `FetchResult::NoApiKey` without
    /// any outbound call. Failures are returned as variants, never as errors.
    async fn fetch(&self, city: &str, api_key: Option<&str>) -> FetchResult;
}
