// Observation domain models
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Dec-Feb winter, Mar-May spring, Jun-Aug summer, Sep-Nov autumn
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            other => Err(format!("unknown season '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub city: String,
    pub timestamp: NaiveDate,
    pub temperature: f64,
    pub season: Season,
}

impl Observation {
    pub fn new(city: String, timestamp: NaiveDate, temperature: f64, season: Season) -> Self {
        Self {
            city,
            timestamp,
            temperature,
            season,
        }
    }
}

/// Observations for a single city, ascending by timestamp.
/// Duplicate timestamps are kept in their original relative order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    city: String,
    observations: Vec<Observation>,
}

impl Series {
    /// Keeps only the rows belonging to `city` and sorts them stably.
    pub fn for_city<'a, I>(city: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut observations: Vec<Observation> = rows
            .into_iter()
            .filter(|o| o.city == city)
            .cloned()
            .collect();
        observations.sort_by_key(|o| o.timestamp);

        Self {
            city: city.to_string(),
            observations,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.temperature).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// The full, read-only input table shared by every city task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct cities in first-appearance order
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = Vec::new();
        for observation in &self.observations {
            if !cities.iter().any(|c| c == &observation.city) {
                cities.push(observation.city.clone());
            }
        }
        cities
    }

    /// Owned copy of one city's rows; the dataset itself is left untouched.
    pub fn for_city(&self, city: &str) -> Series {
        Series::for_city(city, &self.observations)
    }
}
