// Analysis error taxonomy
use super::observation::Season;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AnalysisError {
    /// Dataset-level rejection; aborts the run before any city work starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("insufficient history: {0}")]
    InsufficientHistory(String),

    #[error("insufficient data for season {0}")]
    InsufficientSeasonData(Season),
}
