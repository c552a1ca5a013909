// Benchmark service - Runs the city pipeline under each execution strategy
use crate::application::city_pipeline::{CityAnalysisService, ExecutionMode};
use crate::domain::analysis::CityAnalysis;
use crate::domain::benchmark::{BenchmarkReport, Strategy};
use crate::domain::observation::Dataset;
use anyhow::Context;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct BenchmarkOutcome {
    pub report: BenchmarkReport,
    /// Per-city results for each strategy, in the caller's city order
    pub analyses: BTreeMap<Strategy, Vec<CityAnalysis>>,
}

#[derive(Clone)]
pub struct BenchmarkService {
    pipeline: CityAnalysisService,
}

impl BenchmarkService {
    pub fn new(pipeline: CityAnalysisService) -> Self {
        Self { pipeline }
    }

    /// Time every strategy over the same cities, one strategy after another.
    pub async fn run(
        &self,
        cities: &[String],
        dataset: Arc<Dataset>,
        api_key: Option<String>,
    ) -> anyhow::Result<BenchmarkOutcome> {
        let mut entries = Vec::with_capacity(Strategy::ALL.len());
        let mut analyses = BTreeMap::new();

        for strategy in Strategy::ALL {
            let start_time = Instant::now();
            let results = self
                .run_strategy(strategy, cities, dataset.clone(), api_key.clone())
                .await?;
            let elapsed = start_time.elapsed();

            tracing::info!(
                "{}: {} cities in {:.3}s",
                strategy,
                results.len(),
                elapsed.as_secs_f64()
            );

            entries.push((strategy, elapsed));
            analyses.insert(strategy, results);
        }

        Ok(BenchmarkOutcome {
            report: BenchmarkReport::new(entries),
            analyses,
        })
    }

    async fn run_strategy(
        &self,
        strategy: Strategy,
        cities: &[String],
        dataset: Arc<Dataset>,
        api_key: Option<String>,
    ) -> anyhow::Result<Vec<CityAnalysis>> {
        match strategy {
            Strategy::OffloadedParallel => {
                self.run_parallel(cities, dataset, api_key, ExecutionMode::Offloaded)
                    .await
            }
            Strategy::DirectParallel => self.run_direct(cities, &dataset, api_key.as_deref()).await,
            Strategy::Sequential => {
                let mut results = Vec::with_capacity(cities.len());
                for city in cities {
                    let analysis = self
                        .pipeline
                        .analyze(city, &dataset, api_key.as_deref(), ExecutionMode::Offloaded)
                        .await?;
                    results.push(analysis);
                }
                Ok(results)
            }
        }
    }

    /// All cities polled together on the calling task, detector inline.
    /// Nothing is spawned, so the CPU step of one city holds up the others.
    async fn run_direct(
        &self,
        cities: &[String],
        dataset: &Dataset,
        api_key: Option<&str>,
    ) -> anyhow::Result<Vec<CityAnalysis>> {
        let pending = cities
            .iter()
            .map(|city| self.pipeline.analyze(city, dataset, api_key, ExecutionMode::Inline));

        futures::future::join_all(pending)
            .await
            .into_iter()
            .collect()
    }

    /// One spawned task per city; waits for all of them before returning.
    async fn run_parallel(
        &self,
        cities: &[String],
        dataset: Arc<Dataset>,
        api_key: Option<String>,
        mode: ExecutionMode,
    ) -> anyhow::Result<Vec<CityAnalysis>> {
        let handles: Vec<_> = cities
            .iter()
            .map(|city| {
                let pipeline = self.pipeline.clone();
                let dataset = dataset.clone();
                let api_key = api_key.clone();
                let city = city.clone();

                tokio::spawn(async move {
                    pipeline
                        .analyze(&city, &dataset, api_key.as_deref(), mode)
                        .await
                })
            })
            .collect();

        // join_all keeps handle order, so results line up with `cities`
        let joined = futures::future::join_all(handles).await;

        let mut results = Vec::with_capacity(joined.len());
        for (city, outcome) in cities.iter().zip(joined) {
            let analysis = outcome.with_context(|| format!("City task for {} panicked", city))??;
            results.push(analysis);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::anomaly_detector::AnomalyDetector;
    use crate::application::clock::FixedClock;
    use crate::application::seasonal_profiler::SeasonalProfiler;
    use crate::application::test_support::{StubSource, multi_city_dataset};
    use crate::domain::analysis::FetchResult;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn service(source: Arc<StubSource>) -> BenchmarkService {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        BenchmarkService::new(CityAnalysisService::new(
            AnomalyDetector::default(),
            SeasonalProfiler::default(),
            source,
            Arc::new(clock),
        ))
    }

    fn cities() -> Vec<String> {
        ["Paris", "Berlin", "Cairo", "Lima"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn canned_source() -> StubSource {
        StubSource::with_temperature("Paris", 6.5)
            .and("Berlin", FetchResult::Temperature(12.0))
            .and(
                "Cairo",
                FetchResult::HttpError {
                    status: 404,
                    body: "{\"message\":\"city not found\"}".to_string(),
                },
            )
            .and("Lima", FetchResult::NetworkError("timed out".to_string()))
            .delayed(Duration::from_millis(5))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_strategies_produce_identical_results() {
        let source = Arc::new(canned_source());
        let outcome = service(source.clone())
            .run(&cities(), Arc::new(multi_city_dataset()), Some("key".to_string()))
            .await
            .unwrap();

        let offloaded = &outcome.analyses[&Strategy::OffloadedParallel];
        let direct = &outcome.analyses[&Strategy::DirectParallel];
        let sequential = &outcome.analyses[&Strategy::Sequential];

        assert_eq!(offloaded.len(), 4);
        assert_eq!(offloaded, direct);
        assert_eq!(offloaded, sequential);

        let names: Vec<&str> = offloaded.iter().map(|a| a.city.as_str()).collect();
        assert_eq!(names, vec!["Paris", "Berlin", "Cairo", "Lima"]);
        assert!(offloaded.iter().any(|a| !a.anomaly_indices().is_empty()));

        // one fetch per city per strategy
        assert_eq!(source.calls(), 12);
    }

    #[tokio::test]
    async fn test_report_has_every_strategy_in_order() {
        let outcome = service(Arc::new(canned_source()))
            .run(&cities(), Arc::new(multi_city_dataset()), None)
            .await
            .unwrap();

        let order: Vec<Strategy> = outcome.report.entries().iter().map(|(s, _)| *s).collect();
        assert_eq!(order, Strategy::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_failures_stay_isolated_per_city() {
        let outcome = service(Arc::new(canned_source()))
            .run(&cities(), Arc::new(multi_city_dataset()), Some("key".to_string()))
            .await
            .unwrap();

        for results in outcome.analyses.values() {
            assert!(results[0].normality.is_some());
            assert!(matches!(results[2].fetch, FetchResult::HttpError { status: 404, .. }));
            assert!(matches!(results[3].fetch, FetchResult::NetworkError(_)));
            assert!(results.iter().all(|a| a.trend.is_some()));
        }
    }

    #[tokio::test]
    async fn test_sequential_keeps_caller_order() {
        let source = Arc::new(canned_source());
        let mut reversed = cities();
        reversed.reverse();

        let results = service(source.clone())
            .run_strategy(
                Strategy::Sequential,
                &reversed,
                Arc::new(multi_city_dataset()),
                Some("key".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(source.log(), reversed);
        let names: Vec<String> = results.into_iter().map(|a| a.city).collect();
        assert_eq!(names, reversed);
    }

    #[tokio::test]
    async fn test_direct_parallel_overlaps_fetches_without_spawning() {
        let source = Arc::new(canned_source().delayed(Duration::from_millis(50)));
        let service = service(source.clone());
        let dataset = Arc::new(multi_city_dataset());

        let results = service
            .run_strategy(
                Strategy::DirectParallel,
                &cities(),
                dataset.clone(),
                Some("key".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(source.peak_in_flight(), 4);

        let source = Arc::new(canned_source().delayed(Duration::from_millis(50)));
        self::service(source.clone())
            .run_strategy(Strategy::Sequential, &cities(), dataset, Some("key".to_string()))
            .await
            .unwrap();
        assert_eq!(source.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_empty_city_list() {
        let source = Arc::new(canned_source());
        let outcome = service(source.clone())
            .run(&[], Arc::new(multi_city_dataset()), Some("key".to_string()))
            .await
            .unwrap();

        assert_eq!(outcome.report.entries().len(), 3);
        assert!(outcome.analyses.values().all(|v| v.is_empty()));
        assert!(
            outcome
                .report
                .entries()
                .iter()
                .all(|(_, d)| *d >= Duration::ZERO)
        );
        assert_eq!(source.calls(), 0);
    }
}
