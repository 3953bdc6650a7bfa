#![doc(test(attr(deny(warnings))))]

//! Cash Calendar core: a week-by-week cash-flow forecast whose running
//! balances stay consistent across adds, removals and drag-style moves.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{ForecastController, ForecastObserver, SharedController};
pub use crate::domain::{Transaction, Week, WeekKey};
pub use crate::errors::{ForecastError, StorageError};
pub use crate::ledger::Forecast;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cash Calendar tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
