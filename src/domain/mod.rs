//! Forecast domain models: transactions and the calendar weeks they belong to.

pub mod common;
pub mod transaction;
pub mod week;

pub use common::Displayable;
pub use transaction::Transaction;
pub use week::{iso_week_start, Week, WeekKey};
