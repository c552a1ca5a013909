// Benchmark domain models
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One task per city, rolling statistics on the blocking pool
    OffloadedParallel,
    /// One task per city, everything inline
    DirectParallel,
    Sequential,
}

impl Strategy {
    /// Execution order used by the harness
    pub const ALL: [Strategy; 3] = [
        Strategy::OffloadedParallel,
        Strategy::DirectParallel,
        Strategy::Sequential,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::OffloadedParallel => "offloaded-parallel",
            Strategy::DirectParallel => "direct-parallel",
            Strategy::Sequential => "sequential",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wall-clock time per strategy, in the order the strategies ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkReport {
    entries: Vec<(Strategy, Duration)>,
}

impl BenchmarkReport {
    pub fn new(entries: Vec<(Strategy, Duration)>) -> Self {
        Self { entries }
    }

    pub fn elapsed(&self, strategy: Strategy) -> Option<Duration> {
        self.entries
            .iter()
            .find(|(s, _)| *s == strategy)
            .map(|(_, d)| *d)
    }

    pub fn entries(&self) -> &[(Strategy, Duration)] {
        &self.entries
    }
}
