use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta};
use ecount_core::series::{at_midnight, Domain};

/// Weekly steps from a start, yielding up to and including the first step
/// that passes `limit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekSteps {
    next: Option<NaiveDateTime>,
    limit: NaiveDateTime,
}

impl WeekSteps {
    pub fn new(start: NaiveDateTime, limit: NaiveDateTime) -> Self {
        Self {
            next: Some(start),
            limit,
        }
    }
}

impl Iterator for WeekSteps {
    type Item = NaiveDateTime;
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current <= self.limit {
            TimeDelta::try_weeks(1).and_then(|week| current.checked_add_signed(week))
        } else {
            None
        };
        Some(current)
    }
}

/// Final calendar day of the month after `date`'s month.
pub fn last_day_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?
        .checked_add_months(Months::new(2))?
        .pred_opt()
}

/// Week-spaced x ticks from the first sample, overshooting the data to the
/// end of the following month.
pub fn week_ticks(domain: &Domain) -> Vec<NaiveDateTime> {
    let limit = match last_day_of_next_month(domain.last_sample.date()) {
        Some(last) => at_midnight(last),
        None => return vec![domain.start_date],
    };
    WeekSteps::new(domain.start_date, limit).collect()
}

/// Six evenly spaced y ticks, 0 through `max_y`.
pub fn y_ticks(max_y: f64) -> Vec<f64> {
    (0..=5).map(|i| i as f64 * (max_y / 5.0)).collect()
}
