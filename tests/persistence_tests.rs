mod common;

use std::fs;

use chrono::Datelike;

use cashcal_core::config::{Config, ConfigManager};
use cashcal_core::core::{ForecastController, NullObserver};
use cashcal_core::errors::{ForecastError, StorageError};
use cashcal_core::storage::{
    load_snapshot_from_path, ForecastSnapshot, JsonStorage, StorageBackend,
};

use common::{balances, names, temp_home};

#[test]
fn export_then_import_preserves_order_and_balances() {
    let home = temp_home();
    let storage = JsonStorage::new(Some(home.clone())).expect("storage");

    let mut controller = ForecastController::new(2024);
    controller.set_opening_balance(2_500).unwrap();
    controller.add_transaction(1, "rent", -1_200).unwrap();
    controller.add_transaction(1, "salary", 3_000).unwrap();
    controller.add_transaction(4, "insurance", -450).unwrap();
    controller.move_transaction(1, 0, 4, 1).unwrap();

    let path = storage
        .save(&ForecastSnapshot::capture(&controller), "march")
        .expect("save");
    assert!(path.starts_with(&home));

    let restored = storage
        .load("march")
        .expect("load")
        .restore(NullObserver, 2024)
        .expect("restore");
    assert_eq!(names(&restored), names(&controller));
    assert_eq!(balances(&restored), balances(&controller));
    assert_eq!(
        restored.week(4).unwrap().transaction_count(),
        controller.week(4).unwrap().transaction_count()
    );
}

#[test]
fn hand_written_snapshot_is_normalised() {
    let home = temp_home();
    let path = home.join("manual.json");
    fs::write(
        &path,
        r#"{
  "schema_version": 1,
  "created_at": "2024-03-01T09:00:00Z",
  "opening_balance": 1000,
  "weeks": [
    { "week_number": 5, "transactions": [ { "name": "late", "value": -100 } ] },
    { "week_number": 2, "transactions": [ { "name": "early", "value": 50 } ] },
    { "week_number": 5, "transactions": [ { "name": "later", "value": -25 } ] },
    { "week_number": 7 }
  ]
}"#,
    )
    .unwrap();

    let controller = load_snapshot_from_path(&path)
        .expect("load")
        .restore(NullObserver, 2024)
        .expect("restore");
    assert_eq!(names(&controller), vec!["early", "late", "later"]);
    assert_eq!(balances(&controller), vec![1050, 950, 925]);
    assert!(controller.week(7).is_none());
    assert!(controller.consistency_warnings().is_empty());
}

#[test]
fn future_schema_and_bad_json_are_errors() {
    let home = temp_home();
    let future = home.join("future.json");
    fs::write(
        &future,
        r#"{"schema_version": 7, "created_at": "2024-01-01T00:00:00Z", "weeks": []}"#,
    )
    .unwrap();
    assert!(matches!(
        load_snapshot_from_path(&future),
        Err(StorageError::UnsupportedSchema(7))
    ));

    let garbage = home.join("garbage.json");
    fs::write(&garbage, "not json").unwrap();
    assert!(matches!(
        load_snapshot_from_path(&garbage),
        Err(StorageError::Serde(_))
    ));

    assert!(matches!(
        load_snapshot_from_path(&home.join("missing.json")),
        Err(StorageError::Io(_))
    ));
}

#[test]
fn snapshots_that_cannot_be_replayed_are_errors() {
    let home = temp_home();
    let path = home.join("extreme.json");
    fs::write(
        &path,
        r#"{
  "schema_version": 1,
  "created_at": "2024-03-01T09:00:00Z",
  "weeks": [
    { "week_number": 1, "transactions": [
      { "name": "big", "value": 9223372036854775807 },
      { "name": "one", "value": 1 }
    ] }
  ]
}"#,
    )
    .unwrap();
    let snapshot = load_snapshot_from_path(&path).expect("load");
    assert!(matches!(
        snapshot.restore(NullObserver, 2024),
        Err(StorageError::Forecast(ForecastError::BalanceOverflow))
    ));

    let mut controller = ForecastController::new(2024);
    controller.add_transaction(60, "late", 7).unwrap();
    let snapshot = ForecastSnapshot::capture(&controller);
    let last_year = chrono::NaiveDate::MAX.year();
    assert!(matches!(
        snapshot.restore(NullObserver, last_year),
        Err(StorageError::Forecast(ForecastError::InvalidWeek(60)))
    ));
}

#[test]
fn config_round_trips_through_disk() {
    let home = temp_home();
    let manager = ConfigManager::with_base_dir(home.clone()).expect("config manager");
    assert_eq!(manager.load().expect("defaults"), Config::default());

    let mut config = Config::default();
    config.set("currency_symbol", "€").unwrap();
    config.set("minor_units", "0").unwrap();
    config.set("year", "2025").unwrap();
    manager.save(&config).expect("save config");

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.forecast_year(), 2025);
    assert_eq!(loaded.amount_format().format(-1234), "-€1,234");
}
