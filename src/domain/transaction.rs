//! Forecast entries: a named, signed amount assigned to a calendar week.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Displayable;

/// A single planned cash movement.
///
/// Amounts are signed integers in currency minor units. The running balance
/// is owned by [`crate::ledger::Forecast`]: it can be read here but only the
/// engine writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    name: String,
    value: i64,
    week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    balance: Option<i64>,
}

impl Transaction {
    pub fn new(name: impl Into<String>, value: i64, week: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            value,
            week,
            balance: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// Running balance including this entry, `None` until the entry has been
    /// placed in a forecast.
    pub fn balance(&self) -> Option<i64> {
        self.balance
    }

    pub(crate) fn set_balance(&mut self, balance: i64) {
        self.balance = Some(balance);
    }

    pub(crate) fn clear_balance(&mut self) {
        self.balance = None;
    }

    pub(crate) fn reassign_week(&mut self, week: u32) {
        self.week = week;
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        match self.balance {
            Some(balance) => format!("{} ({:+}) -> {}", self.name, self.value, balance),
            None => format!("{} ({:+})", self.name, self.value),
        }
    }
}
