//! The balance-propagation engine.
//!
//! [`Forecast`] owns the single ordered sequence of transactions across all
//! weeks and keeps every running balance equal to
//! `value + balance of the predecessor` (or `value + opening balance` for the
//! first entry). The engine knows nothing about week boundaries: callers pick
//! indices that keep weeks contiguous.

use std::iter;

use tracing::debug;
use uuid::Uuid;

use crate::domain::Transaction;
use crate::errors::{ForecastError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forecast {
    opening_balance: i64,
    transactions: Vec<Transaction>,
}

impl Forecast {
    pub fn new(opening_balance: i64) -> Self {
        Self {
            opening_balance,
            transactions: Vec::new(),
        }
    }

    pub fn opening_balance(&self) -> i64 {
        self.opening_balance
    }

    /// Replaces the opening balance and recomputes the whole sequence.
    ///
    /// Returns the indices whose balance changed. Fails with
    /// `BalanceOverflow`, leaving the forecast untouched, when a running
    /// balance would leave the `i64` range.
    pub fn set_opening_balance(&mut self, balance: i64) -> Result<Vec<usize>> {
        check_running(balance, self.values(0))?;
        self.opening_balance = balance;
        self.recompute_from(0, 0)
    }

    /// Inserts `transaction` at `index`, appending when `index` is `None`.
    ///
    /// Returns the indices whose balance changed, the inserted one included.
    pub fn add_transaction(
        &mut self,
        transaction: Transaction,
        index: Option<usize>,
    ) -> Result<Vec<usize>> {
        let len = self.transactions.len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(ForecastError::IndexOutOfRange { index, len });
        }
        check_running(
            self.balance_before(index),
            iter::once(transaction.value()).chain(self.values(index)),
        )?;
        let mut transaction = transaction;
        transaction.clear_balance();
        self.transactions.insert(index, transaction);
        self.recompute_from(index, index + 1)
    }

    /// Removes and returns the entry at `index`. The returned transaction no
    /// longer carries a balance.
    pub fn remove_transaction(&mut self, index: usize) -> Result<(Transaction, Vec<usize>)> {
        self.check_index(index)?;
        check_running(self.balance_before(index), self.values(index + 1))?;
        let mut removed = self.transactions.remove(index);
        removed.clear_balance();
        let changed = self.recompute_from(index, index)?;
        Ok((removed, changed))
    }

    /// Moves the entry at `old_index` so that it ends up at `new_index`.
    ///
    /// Only balances in `min(old, new)..=max(old, new)` can change: the set of
    /// values before any later index is the same as before the move.
    pub fn move_transaction(&mut self, old_index: usize, new_index: usize) -> Result<Vec<usize>> {
        self.check_index(old_index)?;
        self.check_index(new_index)?;
        if old_index == new_index {
            return Ok(Vec::new());
        }
        let start = old_index.min(new_index);
        let end = old_index.max(new_index);

        let mut reordered: Vec<i64> = self.values(start).collect();
        let moved = reordered.remove(old_index - start);
        reordered.insert(new_index - start, moved);
        check_running(self.balance_before(start), reordered)?;

        let transaction = self.transactions.remove(old_index);
        self.transactions.insert(new_index, transaction);
        self.recompute_from(start, end)
    }

    /// Full recompute pass that never stops early. Returns the indices whose
    /// stored balance was stale.
    pub fn recompute_all(&mut self) -> Result<Vec<usize>> {
        self.recompute_from(0, self.transactions.len())
    }

    /// Recomputes balances from `start` onwards. Once the walk reaches
    /// `settled_from`, it stops at the first index whose balance is already
    /// correct: every later balance was correct before the mutation and its
    /// prefix sum is unchanged.
    ///
    /// New balances are collected before any is written, so an overflow
    /// leaves every stored balance as it was.
    fn recompute_from(&mut self, start: usize, settled_from: usize) -> Result<Vec<usize>> {
        let mut running = self.balance_before(start);
        let mut updates = Vec::new();
        for (index, transaction) in self.transactions.iter().enumerate().skip(start) {
            running = running
                .checked_add(transaction.value())
                .ok_or(ForecastError::BalanceOverflow)?;
            if transaction.balance() == Some(running) {
                if index >= settled_from {
                    break;
                }
                continue;
            }
            updates.push((index, running));
        }

        let mut changed = Vec::with_capacity(updates.len());
        for (index, balance) in updates {
            if let Some(transaction) = self.transactions.get_mut(index) {
                transaction.set_balance(balance);
                changed.push(index);
            }
        }
        debug!(
            start,
            changed = changed.len(),
            "recomputed forecast balances"
        );
        Ok(changed)
    }

    fn values(&self, from: usize) -> impl Iterator<Item = i64> + '_ {
        self.transactions
            .get(from..)
            .unwrap_or(&[])
            .iter()
            .map(Transaction::value)
    }

    /// Balance carried into `index`: the predecessor's balance, or the
    /// opening balance for the first entry.
    pub fn balance_before(&self, index: usize) -> i64 {
        index
            .checked_sub(1)
            .and_then(|previous| self.transactions.get(previous))
            .and_then(Transaction::balance)
            .unwrap_or(self.opening_balance)
    }

    /// Balance after the last entry, or the opening balance when empty.
    pub fn closing_balance(&self) -> i64 {
        self.balance_before(self.transactions.len())
    }

    /// Indices whose stored balance breaks the running-balance invariant.
    pub fn balance_violations(&self) -> Vec<usize> {
        let mut carried = Some(self.opening_balance);
        let mut violations = Vec::new();
        for (index, transaction) in self.transactions.iter().enumerate() {
            let expected = carried.and_then(|balance| balance.checked_add(transaction.value()));
            if expected.is_none() || transaction.balance() != expected {
                violations.push(index);
            }
            carried = transaction.balance().or(expected);
        }
        violations
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Transaction> {
        self.transactions.get_mut(index)
    }

    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id() == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Balance `index` should hold given its predecessor, `None` when that
    /// sum leaves the `i64` range.
    pub fn expected_balance(&self, index: usize) -> Option<i64> {
        let transaction = self.transactions.get(index)?;
        self.balance_before(index).checked_add(transaction.value())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.transactions.len() {
            Ok(())
        } else {
            Err(ForecastError::IndexOutOfRange {
                index,
                len: self.transactions.len(),
            })
        }
    }
}

/// Walks running balances from `running` over `values`, failing on the first
/// sum outside the `i64` range.
fn check_running(mut running: i64, values: impl IntoIterator<Item = i64>) -> Result<()> {
    for value in values {
        running = running
            .checked_add(value)
            .ok_or(ForecastError::BalanceOverflow)?;
    }
    Ok(())
}
