#![allow(dead_code)]

use std::sync::Mutex;

use cashcal_core::core::{ForecastController, ForecastObserver};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the whole test run.
static TEST_DIRS: Mutex<Vec<TempDir>> = Mutex::new(Vec::new());

/// Creates an isolated application directory for one test.
pub fn temp_home() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn names<O: ForecastObserver>(controller: &ForecastController<O>) -> Vec<String> {
    controller
        .forecast()
        .transactions()
        .iter()
        .map(|txn| txn.name().to_string())
        .collect()
}

pub fn balances<O: ForecastObserver>(controller: &ForecastController<O>) -> Vec<i64> {
    controller
        .forecast()
        .transactions()
        .iter()
        .map(|txn| txn.balance().expect("placed transaction has a balance"))
        .collect()
}

/// Running balances recomputed from scratch, for comparison with stored ones.
pub fn expected_balances<O: ForecastObserver>(controller: &ForecastController<O>) -> Vec<i64> {
    let mut running = controller.forecast().opening_balance();
    controller
        .forecast()
        .transactions()
        .iter()
        .map(|txn| {
            running = running
                .checked_add(txn.value())
                .expect("running balance fits in i64");
            running
        })
        .collect()
}
