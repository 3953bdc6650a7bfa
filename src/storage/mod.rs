//! Export and import of forecasts as versioned JSON snapshots.
//!
//! A snapshot stores only what the user entered: the opening balance and each
//! week's `(name, value)` pairs in order. Balances are never persisted; a
//! restore replays every add so the engine re-derives them.

pub mod json_backend;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{ForecastController, ForecastObserver};
use crate::errors::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Abstraction over places snapshots can be written to and read from.
pub trait StorageBackend: Send + Sync {
    /// Stores `snapshot` under `name` and returns the file written.
    fn save(&self, snapshot: &ForecastSnapshot, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<ForecastSnapshot>;
    fn list(&self) -> Result<Vec<String>>;

    fn save_to_path(&self, snapshot: &ForecastSnapshot, path: &Path) -> Result<()> {
        json_backend::save_snapshot_to_path(snapshot, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<ForecastSnapshot> {
        json_backend::load_snapshot_from_path(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSnapshot {
    pub week_number: u32,
    #[serde(default)]
    pub transactions: Vec<EntrySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub opening_balance: i64,
    #[serde(default)]
    pub weeks: Vec<WeekSnapshot>,
}

impl ForecastSnapshot {
    /// Captures every non-empty week of `controller` in week order.
    pub fn capture<O: ForecastObserver>(controller: &ForecastController<O>) -> Self {
        let weeks = controller
            .weeks()
            .filter(|week| !week.is_empty())
            .map(|week| WeekSnapshot {
                week_number: week.week_number(),
                transactions: controller
                    .week_transactions(week.week_number())
                    .iter()
                    .map(|txn| EntrySnapshot {
                        name: txn.name().to_string(),
                        value: txn.value(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            created_at: Utc::now(),
            opening_balance: controller.forecast().opening_balance(),
            weeks,
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.weeks.iter().map(|week| week.transactions.len()).sum()
    }

    /// Rebuilds a controller by replaying the opening balance and then every
    /// entry in week order. Weeks listed out of order are sorted; entries of
    /// a week listed twice are concatenated in file order.
    pub fn restore<O: ForecastObserver>(
        &self,
        observer: O,
        year: i32,
    ) -> Result<ForecastController<O>> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedSchema(self.schema_version));
        }
        let mut weeks: Vec<&WeekSnapshot> = self.weeks.iter().collect();
        weeks.sort_by_key(|week| week.week_number);

        let mut controller = ForecastController::with_observer(year, observer);
        controller.set_opening_balance(self.opening_balance)?;
        for week in weeks {
            for entry in &week.transactions {
                controller.add_transaction(week.week_number, entry.name.clone(), entry.value)?;
            }
        }

        for warning in controller.consistency_warnings() {
            warn!(%warning, "restored forecast is inconsistent");
        }
        info!(
            transactions = controller.forecast().len(),
            year,
            "restored forecast snapshot"
        );
        Ok(controller)
    }
}

pub use json_backend::{load_snapshot_from_path, save_snapshot_to_path, JsonStorage};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NullObserver, RecordingObserver};
    use crate::errors::ForecastError;

    fn snapshot(weeks: Vec<(u32, Vec<(&str, i64)>)>) -> ForecastSnapshot {
        ForecastSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            created_at: Utc::now(),
            opening_balance: 100,
            weeks: weeks
                .into_iter()
                .map(|(week_number, entries)| WeekSnapshot {
                    week_number,
                    transactions: entries
                        .into_iter()
                        .map(|(name, value)| EntrySnapshot {
                            name: name.into(),
                            value,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn capture_skips_empty_weeks() {
        let mut controller = ForecastController::new(2024);
        controller.set_opening_balance(10).unwrap();
        controller.add_transaction(1, "a", 1).unwrap();
        controller.add_transaction(2, "b", 2).unwrap();
        controller.remove_transaction(2, 0).unwrap();

        let captured = ForecastSnapshot::capture(&controller);
        assert_eq!(captured.opening_balance, 10);
        assert_eq!(captured.weeks.len(), 1);
        assert_eq!(captured.transaction_count(), 1);
    }

    #[test]
    fn restore_sorts_weeks_and_concatenates_duplicates() {
        let snap = snapshot(vec![
            (3, vec![("c1", 30)]),
            (1, vec![("a1", -10)]),
            (3, vec![("c2", 5)]),
        ]);
        let controller = snap.restore(NullObserver, 2024).unwrap();
        let names: Vec<&str> = controller
            .forecast()
            .transactions()
            .iter()
            .map(|txn| txn.name())
            .collect();
        assert_eq!(names, vec!["a1", "c1", "c2"]);
        assert_eq!(controller.forecast().closing_balance(), 125);
        assert!(controller.consistency_warnings().is_empty());
    }

    #[test]
    fn restore_notifies_observer() {
        let snap = snapshot(vec![(2, vec![("x", 1)])]);
        let controller = snap.restore(RecordingObserver::default(), 2024).unwrap();
        assert!(!controller.observer().events().is_empty());
    }

    #[test]
    fn restore_rejects_newer_schema() {
        let mut snap = snapshot(Vec::new());
        snap.schema_version = SNAPSHOT_SCHEMA_VERSION + 1;
        assert!(matches!(
            snap.restore(NullObserver, 2024),
            Err(StorageError::UnsupportedSchema(2))
        ));
    }

    #[test]
    fn restore_rejects_week_zero() {
        let snap = snapshot(vec![(0, vec![("bad", 1)])]);
        assert!(matches!(
            snap.restore(NullObserver, 2024),
            Err(StorageError::Forecast(ForecastError::InvalidWeek(0)))
        ));
    }
}
