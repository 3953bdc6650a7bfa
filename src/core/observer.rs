//! Outbound notifications for the presentation layer.
//!
//! The controller calls these hooks after every state change that affects a
//! displayed value. All hooks are fire-and-forget and default to no-ops so a
//! view only implements what it renders.

use tracing::debug;

use crate::domain::{Displayable, Transaction, Week};

/// Where a transaction sits: week number and position inside that week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub week: u32,
    pub local_index: usize,
}

impl Placement {
    pub const fn new(week: u32, local_index: usize) -> Self {
        Self { week, local_index }
    }
}

pub trait ForecastObserver: Send + Sync {
    fn on_week_created(&mut self, _week: &Week) {}

    fn on_transaction_added(&mut self, _week: &Week, _transaction: &Transaction) {}

    fn on_transaction_removed(&mut self, _week: &Week, _transaction: &Transaction) {}

    fn on_transaction_moved(&mut self, _transaction: &Transaction, _from: Placement, _to: Placement) {
    }

    /// Fired once per transaction whose running balance changed, in global
    /// order.
    fn on_transaction_balance_changed(&mut self, _transaction: &Transaction) {}

    fn on_opening_balance_changed(&mut self, _balance: i64) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ForecastObserver for NullObserver {}

/// Observer that forwards notifications to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ForecastObserver for TracingObserver {
    fn on_week_created(&mut self, week: &Week) {
        debug!(week = week.week_number(), label = %week.display_label(), "week created");
    }

    fn on_transaction_added(&mut self, week: &Week, transaction: &Transaction) {
        debug!(
            week = week.week_number(),
            name = transaction.name(),
            value = transaction.value(),
            "transaction added"
        );
    }

    fn on_transaction_removed(&mut self, week: &Week, transaction: &Transaction) {
        debug!(
            week = week.week_number(),
            name = transaction.name(),
            "transaction removed"
        );
    }

    fn on_transaction_moved(&mut self, transaction: &Transaction, from: Placement, to: Placement) {
        debug!(
            name = transaction.name(),
            from_week = from.week,
            from_index = from.local_index,
            to_week = to.week,
            to_index = to.local_index,
            "transaction moved"
        );
    }

    fn on_transaction_balance_changed(&mut self, transaction: &Transaction) {
        debug!(transaction = %transaction.display_label(), "balance changed");
    }

    fn on_opening_balance_changed(&mut self, balance: i64) {
        debug!(balance, "opening balance changed");
    }
}

/// A notification captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastEvent {
    WeekCreated(u32),
    TransactionAdded { week: u32, name: String },
    TransactionRemoved { week: u32, name: String },
    TransactionMoved { name: String, from: Placement, to: Placement },
    BalanceChanged { name: String, balance: Option<i64> },
    OpeningBalanceChanged(i64),
}

/// Observer that keeps every notification, for hosts that batch redraws and
/// for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Vec<ForecastEvent>,
}

impl RecordingObserver {
    pub fn events(&self) -> &[ForecastEvent] {
        &self.events
    }

    /// Returns the recorded events and starts a fresh log.
    pub fn take(&mut self) -> Vec<ForecastEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ForecastObserver for RecordingObserver {
    fn on_week_created(&mut self, week: &Week) {
        self.events
            .push(ForecastEvent::WeekCreated(week.week_number()));
    }

    fn on_transaction_added(&mut self, week: &Week, transaction: &Transaction) {
        self.events.push(ForecastEvent::TransactionAdded {
            week: week.week_number(),
            name: transaction.name().to_string(),
        });
    }

    fn on_transaction_removed(&mut self, week: &Week, transaction: &Transaction) {
        self.events.push(ForecastEvent::TransactionRemoved {
            week: week.week_number(),
            name: transaction.name().to_string(),
        });
    }

    fn on_transaction_moved(&mut self, transaction: &Transaction, from: Placement, to: Placement) {
        self.events.push(ForecastEvent::TransactionMoved {
            name: transaction.name().to_string(),
            from,
            to,
        });
    }

    fn on_transaction_balance_changed(&mut self, transaction: &Transaction) {
        self.events.push(ForecastEvent::BalanceChanged {
            name: transaction.name().to_string(),
            balance: transaction.balance(),
        });
    }

    fn on_opening_balance_changed(&mut self, balance: i64) {
        self.events.push(ForecastEvent::OpeningBalanceChanged(balance));
    }
}
