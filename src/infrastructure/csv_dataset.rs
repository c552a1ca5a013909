// CSV ingestion - Builds a validated Dataset from historical temperature rows
use crate::domain::error::AnalysisError;
use crate::domain::observation::{Dataset, Observation, Season};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::Read;
use std::path::Path;

struct Columns {
    timestamp: usize,
    city: usize,
    temperature: usize,
    season: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, AnalysisError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let (Some(timestamp), Some(city)) = (find("timestamp"), find("city")) else {
            return Err(AnalysisError::InvalidInput(
                "dataset must have 'timestamp' and 'city' columns".to_string(),
            ));
        };
        let temperature = find("temperature").ok_or_else(|| {
            AnalysisError::InvalidInput("dataset has no 'temperature' column".to_string())
        })?;

        Ok(Self {
            timestamp,
            city,
            temperature,
            season: find("season"),
        })
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open dataset: {:?}", path))?;
    let dataset = parse(file)?;
    tracing::info!(
        "Loaded {} observations for {} cities from {:?}",
        dataset.observations().len(),
        dataset.cities().len(),
        path
    );
    Ok(dataset)
}

pub fn parse<R: Read>(reader: R) -> Result<Dataset, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::InvalidInput(format!("unreadable header row: {}", e)))?
        .clone();
    let columns = Columns::from_headers(&headers)?;

    let mut observations = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AnalysisError::InvalidInput(format!("unreadable row: {}", e)))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        observations.push(parse_row(&record, &columns, line)?);
    }

    Ok(Dataset::new(observations))
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &Columns,
    line: u64,
) -> Result<Observation, AnalysisError> {
    let invalid = |message: String| AnalysisError::InvalidInput(format!("line {}: {}", line, message));
    let field = |index: usize| record.get(index).unwrap_or("");

    let city = field(columns.city);
    if city.is_empty() {
        return Err(invalid("empty city".to_string()));
    }

    let raw_timestamp = field(columns.timestamp);
    let timestamp = parse_day(raw_timestamp)
        .ok_or_else(|| invalid(format!("unparseable timestamp '{}'", raw_timestamp)))?;

    let raw_temperature = field(columns.temperature);
    let temperature: f64 = raw_temperature
        .parse()
        .map_err(|_| invalid(format!("unparseable temperature '{}'", raw_temperature)))?;

    let season = match columns.season.map(field).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<Season>().map_err(invalid)?,
        None => Season::for_date(timestamp),
    };

    Ok(Observation::new(city.to_string(), timestamp, temperature, season))
}

/// Day-granularity date from a plain date or a datetime
fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.date_naive())
}
