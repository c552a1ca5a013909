// Reference clock used to pick the current season
use crate::domain::observation::Season;
use chrono::NaiveDate;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn current_season(&self) -> Season {
        Season::for_date(self.today())
    }
}

/// Always reports the same day; used when a reference date is configured.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
