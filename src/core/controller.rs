//! Orchestration between calendar weeks and the global balance engine.
//!
//! The UI speaks in `(week, position inside week)` coordinates while the
//! [`Forecast`] engine speaks in global indices. Weeks are kept in a
//! `BTreeMap` so the global offset of a week is the sum of the counts of all
//! lower-numbered weeks, which keeps every week a contiguous block of the
//! global order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::observer::{ForecastObserver, NullObserver, Placement};
use crate::domain::{Transaction, Week, WeekKey};
use crate::errors::{ForecastError, Result};
use crate::ledger::Forecast;

/// Per-week balances: what the week starts with and ends with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSummary {
    pub week_number: u32,
    pub week_start: NaiveDate,
    pub transaction_count: usize,
    pub opening_balance: i64,
    pub closing_balance: i64,
}

#[derive(Debug, Clone)]
pub struct ForecastController<O: ForecastObserver = NullObserver> {
    forecast: Forecast,
    weeks: BTreeMap<u32, Week>,
    year: i32,
    observer: O,
}

impl ForecastController<NullObserver> {
    /// Creates an empty forecast whose week numbers are resolved in `year`.
    pub fn new(year: i32) -> Self {
        Self::with_observer(year, NullObserver)
    }
}

impl<O: ForecastObserver> ForecastController<O> {
    pub fn with_observer(year: i32, observer: O) -> Self {
        Self {
            forecast: Forecast::default(),
            weeks: BTreeMap::new(),
            year,
            observer,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn week(&self, week_number: u32) -> Option<&Week> {
        self.weeks.get(&week_number)
    }

    /// Existing weeks in ascending week order.
    pub fn weeks(&self) -> impl Iterator<Item = &Week> + '_ {
        self.weeks.values()
    }

    /// The contiguous slice of the global order that belongs to `week_number`.
    pub fn week_transactions(&self, week_number: u32) -> &[Transaction] {
        let count = self.week_count(week_number);
        let offset = self.week_offset(week_number);
        self.forecast
            .transactions()
            .get(offset..offset + count)
            .unwrap_or(&[])
    }

    pub fn transaction(&self, week_number: u32, local_index: usize) -> Option<&Transaction> {
        self.week_transactions(week_number).get(local_index)
    }

    /// Appends a transaction to the end of `week_number`, creating the week on
    /// first use.
    pub fn add_transaction(
        &mut self,
        week_number: u32,
        name: impl Into<String>,
        value: i64,
    ) -> Result<Uuid> {
        let key = self.resolve_key(week_number)?;
        let global_index = self.week_offset(week_number) + self.week_count(week_number);
        let transaction = Transaction::new(name, value, week_number);
        let id = transaction.id();
        let changed = self
            .forecast
            .add_transaction(transaction, Some(global_index))?;

        let created = !self.weeks.contains_key(&week_number);
        let week = self
            .weeks
            .entry(week_number)
            .or_insert_with(|| Week::new(key));
        week.add_transaction(id, None);
        if created {
            info!(week = week_number, start = %key.start(), "created week");
            self.observer.on_week_created(week);
        }
        if let Some(transaction) = self.forecast.get(global_index) {
            debug!(
                week = week_number,
                global_index,
                value,
                "added transaction"
            );
            self.observer.on_transaction_added(week, transaction);
        }
        self.notify_balances(&changed);
        Ok(id)
    }

    /// Removes the transaction at `local_index` of `week_number`. The week
    /// itself is kept, even when it becomes empty.
    pub fn remove_transaction(&mut self, week_number: u32, local_index: usize) -> Result<Transaction> {
        let count = self.week_count(week_number);
        if count == 0 {
            return Err(ForecastError::UnknownWeek(week_number));
        }
        if local_index >= count {
            return Err(ForecastError::IndexOutOfRange {
                index: local_index,
                len: count,
            });
        }
        let global_index = self.week_offset(week_number) + local_index;
        let (removed, changed) = self.forecast.remove_transaction(global_index)?;
        let week = self
            .weeks
            .get_mut(&week_number)
            .ok_or(ForecastError::UnknownWeek(week_number))?;
        week.remove_transaction(local_index)?;

        debug!(week = week_number, global_index, "removed transaction");
        if let Some(week) = self.weeks.get(&week_number) {
            self.observer.on_transaction_removed(week, &removed);
        }
        self.notify_balances(&changed);
        Ok(removed)
    }

    /// Moves the transaction at `(from_week, from_local_index)` onto the row
    /// at `(to_week, to_local_index)`.
    ///
    /// The destination is counted before the move. Moving down the list, the
    /// transaction lands after the target row; moving up, before it.
    /// `to_local_index == count(to_week)` addresses the end of that week,
    /// which is also the only slot of an empty or not yet created week.
    pub fn move_transaction(
        &mut self,
        from_week: u32,
        from_local_index: usize,
        to_week: u32,
        to_local_index: usize,
    ) -> Result<()> {
        let source_count = self.week_count(from_week);
        if source_count == 0 {
            return Err(ForecastError::UnknownWeek(from_week));
        }
        if from_local_index >= source_count {
            return Err(ForecastError::IndexOutOfRange {
                index: from_local_index,
                len: source_count,
            });
        }
        let to_key = self.resolve_key(to_week)?;
        let target_count = self.week_count(to_week);
        if to_local_index > target_count {
            return Err(ForecastError::IndexOutOfRange {
                index: to_local_index,
                len: target_count,
            });
        }

        let from_index = self.week_offset(from_week) + from_local_index;
        let slot = self.week_offset(to_week) + to_local_index;
        let to_index = if to_local_index == target_count && slot > from_index {
            slot - 1
        } else {
            slot
        };

        // The engine checks the balance range before reordering; once it has
        // moved, the week bookkeeping below cannot fail.
        let changed = self.forecast.move_transaction(from_index, to_index)?;
        let source = self
            .weeks
            .get_mut(&from_week)
            .ok_or(ForecastError::UnknownWeek(from_week))?;
        let id = source.remove_transaction(from_local_index)?;
        let target_local = to_index - self.week_offset(to_week);
        let created = !self.weeks.contains_key(&to_week);
        let target = self
            .weeks
            .entry(to_week)
            .or_insert_with(|| Week::new(to_key));
        target.add_transaction(id, Some(target_local));
        if created {
            info!(week = to_week, start = %to_key.start(), "created week");
            self.observer.on_week_created(target);
        }

        if let Some(transaction) = self.forecast.get_mut(to_index) {
            transaction.reassign_week(to_week);
        }
        debug!(from_index, to_index, "moved transaction");
        if let Some(transaction) = self.forecast.get(to_index) {
            self.observer.on_transaction_moved(
                transaction,
                Placement::new(from_week, from_local_index),
                Placement::new(to_week, target_local),
            );
        }
        self.notify_balances(&changed);
        Ok(())
    }

    pub fn set_opening_balance(&mut self, balance: i64) -> Result<()> {
        let changed = self.forecast.set_opening_balance(balance)?;
        debug!(balance, changed = changed.len(), "opening balance set");
        self.observer.on_opening_balance_changed(balance);
        self.notify_balances(&changed);
        Ok(())
    }

    /// Full balance recompute; returns how many stored balances were stale.
    pub fn recompute_all(&mut self) -> Result<usize> {
        let changed = self.forecast.recompute_all()?;
        self.notify_balances(&changed);
        Ok(changed.len())
    }

    /// Global index of the transaction at `(week_number, local_index)`.
    pub fn global_index(&self, week_number: u32, local_index: usize) -> Result<usize> {
        let count = self.week_count(week_number);
        if count == 0 {
            return Err(ForecastError::UnknownWeek(week_number));
        }
        if local_index >= count {
            return Err(ForecastError::IndexOutOfRange {
                index: local_index,
                len: count,
            });
        }
        Ok(self.week_offset(week_number) + local_index)
    }

    /// Week coordinates of the transaction at `global_index`.
    pub fn locate(&self, global_index: usize) -> Option<Placement> {
        let mut offset = 0;
        for week in self.weeks.values() {
            let count = week.transaction_count();
            if global_index < offset + count {
                return Some(Placement::new(week.week_number(), global_index - offset));
            }
            offset += count;
        }
        None
    }

    pub fn week_summaries(&self) -> Vec<WeekSummary> {
        let mut offset = 0;
        self.weeks
            .values()
            .map(|week| {
                let count = week.transaction_count();
                let summary = WeekSummary {
                    week_number: week.week_number(),
                    week_start: week.week_start(),
                    transaction_count: count,
                    opening_balance: self.forecast.balance_before(offset),
                    closing_balance: self.forecast.balance_before(offset + count),
                };
                offset += count;
                summary
            })
            .collect()
    }

    /// Audits balances, week ordering and week bookkeeping. Empty means the
    /// forecast is consistent.
    pub fn consistency_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let transactions = self.forecast.transactions();

        for index in self.forecast.balance_violations() {
            if let Some(txn) = transactions.get(index) {
                let expected = self
                    .forecast
                    .expected_balance(index)
                    .map_or_else(|| "an overflow".to_string(), |balance| balance.to_string());
                warnings.push(format!(
                    "transaction `{}` at index {} has balance {:?}, expected {}",
                    txn.name(),
                    index,
                    txn.balance(),
                    expected
                ));
            }
        }

        for pair in transactions.windows(2) {
            if pair[1].week() < pair[0].week() {
                warnings.push(format!(
                    "transaction `{}` (week {}) is ordered after `{}` (week {})",
                    pair[1].name(),
                    pair[1].week(),
                    pair[0].name(),
                    pair[0].week()
                ));
            }
        }

        let mut offset = 0;
        for week in self.weeks.values() {
            for (local, id) in week.transaction_ids().iter().enumerate() {
                match transactions.get(offset + local) {
                    Some(txn) if txn.id() != *id => warnings.push(format!(
                        "week {} position {} disagrees with global index {}",
                        week.week_number(),
                        local,
                        offset + local
                    )),
                    Some(txn) if txn.week() != week.week_number() => warnings.push(format!(
                        "transaction `{}` is filed under week {} but tagged week {}",
                        txn.name(),
                        week.week_number(),
                        txn.week()
                    )),
                    Some(_) => {}
                    None => warnings.push(format!(
                        "week {} position {} has no transaction in the global order",
                        week.week_number(),
                        local
                    )),
                }
            }
            offset += week.transaction_count();
        }
        if offset != transactions.len() {
            warnings.push(format!(
                "weeks reference {} transactions but the forecast holds {}",
                offset,
                transactions.len()
            ));
        }
        warnings
    }

    fn resolve_key(&self, week_number: u32) -> Result<WeekKey> {
        match self.weeks.get(&week_number) {
            Some(week) => Ok(week.key()),
            None => WeekKey::new(week_number, self.year),
        }
    }

    fn week_count(&self, week_number: u32) -> usize {
        self.weeks
            .get(&week_number)
            .map_or(0, Week::transaction_count)
    }

    /// Number of transactions in all existing weeks before `week_number`.
    fn week_offset(&self, week_number: u32) -> usize {
        self.weeks
            .range(..week_number)
            .map(|(_, week)| week.transaction_count())
            .sum()
    }

    fn notify_balances(&mut self, changed: &[usize]) {
        for &index in changed {
            if let Some(transaction) = self.forecast.get(index) {
                self.observer.on_transaction_balance_changed(transaction);
            }
        }
    }
}
