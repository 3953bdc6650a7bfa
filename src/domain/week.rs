//! Calendar weeks and the per-week view of the forecast order.

use chrono::{Datelike, Days, NaiveDate};
use uuid::Uuid;

use super::common::Displayable;
use crate::errors::{ForecastError, Result};

/// A week number paired with the date its week starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    number: u32,
    start: NaiveDate,
}

impl WeekKey {
    /// Resolves `number` within `year`. Week numbers start at 1; numbers past
    /// the end of `year` roll into the following years.
    pub fn new(number: u32, year: i32) -> Result<Self> {
        if number == 0 {
            return Err(ForecastError::InvalidWeek(number));
        }
        let start = iso_week_start(number, year).ok_or(ForecastError::InvalidWeek(number))?;
        Ok(Self { number, start })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }
}

/// Monday starting ISO-8601 week `week` of `year`.
///
/// Approximates the week as `1 Jan + (week - 1) * 7` days, then applies the
/// Thursday rule: weekdays Sunday..Thursday back up to that week's Monday,
/// Friday and Saturday advance to the next Monday.
pub fn iso_week_start(week: u32, year: i32) -> Option<NaiveDate> {
    let offset = u64::from(week.checked_sub(1)?) * 7;
    let approximate = NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_days(Days::new(offset))?;
    let weekday = u64::from(approximate.weekday().num_days_from_sunday());
    if weekday <= 4 {
        approximate
            .checked_sub_days(Days::new(weekday))?
            .checked_add_days(Days::new(1))
    } else {
        approximate.checked_add_days(Days::new(8 - weekday))
    }
}

/// Ordered references to the transactions booked in one calendar week.
///
/// A week never owns transactions and never computes balances; it only
/// mirrors the slice of the global order that falls inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    key: WeekKey,
    transactions: Vec<Uuid>,
}

impl Week {
    pub fn new(key: WeekKey) -> Self {
        Self {
            key,
            transactions: Vec::new(),
        }
    }

    pub fn key(&self) -> WeekKey {
        self.key
    }

    pub fn week_number(&self) -> u32 {
        self.key.number()
    }

    pub fn week_start(&self) -> NaiveDate {
        self.key.start()
    }

    /// Inserts `id` at `local_index`, appending when no index is given or the
    /// index lies past the end. Returns the position actually used.
    pub fn add_transaction(&mut self, id: Uuid, local_index: Option<usize>) -> usize {
        let len = self.transactions.len();
        let index = local_index.filter(|index| *index <= len).unwrap_or(len);
        self.transactions.insert(index, id);
        index
    }

    pub fn remove_transaction(&mut self, local_index: usize) -> Result<Uuid> {
        if local_index >= self.transactions.len() {
            return Err(ForecastError::IndexOutOfRange {
                index: local_index,
                len: self.transactions.len(),
            });
        }
        Ok(self.transactions.remove(local_index))
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transaction_ids(&self) -> &[Uuid] {
        &self.transactions
    }

    /// Start date as `Jan 6`.
    pub fn start_label(&self) -> String {
        self.week_start().format("%b %-d").to_string()
    }

    pub fn label(&self) -> String {
        format!("Week of {}", self.start_label())
    }
}

impl Displayable for Week {
    fn display_label(&self) -> String {
        self.label()
    }
}
