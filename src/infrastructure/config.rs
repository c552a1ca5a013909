use crate::application::anomaly_detector::{DEFAULT_SIGMA, DEFAULT_WINDOW};
use chrono::NaiveDate;
use serde::Deserialize;

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MonitorConfig {
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub weather: WeatherSettings,
    /// Empty means every city in the dataset
    #[serde(default, deserialize_with = "city_list")]
    pub cities: Vec<String>,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSettings {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisSettings {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// Pins "today" for season selection instead of the system clock
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherSettings {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

/// A list from the config file, or a comma-separated string from the environment
#[derive(Deserialize)]
#[serde(untagged)]
enum CityList {
    List(Vec<String>),
    Joined(String),
}

fn city_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let cities = match CityList::deserialize(deserializer)? {
        CityList::List(cities) => cities,
        CityList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(cities
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect())
}

fn default_dataset_path() -> String {
    "data/temperature_data.csv".to_string()
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            sigma: DEFAULT_SIGMA,
            reference_date: None,
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl WeatherSettings {
    /// Blank keys count as absent
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.analysis.window == 0 {
            anyhow::bail!("analysis.window must be at least 1");
        }
        if !(self.analysis.sigma.is_finite() && self.analysis.sigma > 0.0) {
            anyhow::bail!("analysis.sigma must be a positive number, got {}", self.analysis.sigma);
        }
        if self.weather.timeout_secs == 0 {
            anyhow::bail!("weather.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// `config/monitor.{toml,...}` if present, then `MONITOR__SECTION__KEY` variables.
pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(environment())
        .build()?;

    parse_monitor_config(settings)
}

/// Values stay raw strings, so a key like `12e4` is never read as a number.
fn environment() -> config::Environment {
    config::Environment::with_prefix("MONITOR").separator("__")
}

pub fn parse_monitor_config(settings: config::Config) -> anyhow::Result<MonitorConfig> {
    let config: MonitorConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
