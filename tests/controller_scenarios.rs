mod common;

use cashcal_core::core::{ForecastController, ForecastEvent, Placement, RecordingObserver};
use cashcal_core::errors::ForecastError;

use common::{balances, expected_balances, names};

#[test]
fn opening_balance_carries_into_first_week() {
    let mut controller = ForecastController::new(2024);
    controller.set_opening_balance(1000).unwrap();
    controller.add_transaction(1, "rent", -500).unwrap();
    assert_eq!(balances(&controller), vec![500]);

    controller.add_transaction(1, "salary", 2000).unwrap();
    assert_eq!(balances(&controller), vec![500, 2500]);
}

#[test]
fn balances_chain_across_weeks() {
    let mut controller = ForecastController::new(2024);
    controller.add_transaction(1, "week one", -100).unwrap();
    controller.add_transaction(2, "week two", -100).unwrap();
    assert_eq!(balances(&controller), vec![-100, -200]);

    let summaries = controller.week_summaries();
    assert_eq!(summaries[1].opening_balance, -100);
    assert_eq!(summaries[1].closing_balance, -200);
}

#[test]
fn forward_move_lands_after_target_row() {
    let mut controller = ForecastController::with_observer(2024, RecordingObserver::default());
    controller.add_transaction(1, "moved", -30).unwrap();
    controller.add_transaction(2, "existing", 50).unwrap();
    controller.observer_mut().take();

    controller.move_transaction(1, 0, 2, 0).unwrap();

    assert_eq!(names(&controller), vec!["existing", "moved"]);
    assert_eq!(balances(&controller), vec![50, 20]);
    assert!(controller.week(1).unwrap().is_empty());
    assert_eq!(controller.week(2).unwrap().transaction_count(), 2);
    assert_eq!(controller.forecast().get(1).unwrap().week(), 2);
    assert!(controller.consistency_warnings().is_empty());

    let events = controller.observer_mut().take();
    assert_eq!(
        events,
        vec![
            ForecastEvent::TransactionMoved {
                name: "moved".into(),
                from: Placement::new(1, 0),
                to: Placement::new(2, 1),
            },
            ForecastEvent::BalanceChanged {
                name: "existing".into(),
                balance: Some(50),
            },
            ForecastEvent::BalanceChanged {
                name: "moved".into(),
                balance: Some(20),
            },
        ]
    );
}

#[test]
fn failing_calls_leave_state_untouched() {
    let mut controller = ForecastController::with_observer(2024, RecordingObserver::default());
    controller.add_transaction(1, "a", 10).unwrap();
    controller.add_transaction(3, "b", 20).unwrap();
    controller.observer_mut().take();
    let before = controller.forecast().clone();

    assert_eq!(
        controller.remove_transaction(2, 0),
        Err(ForecastError::UnknownWeek(2))
    );
    assert_eq!(
        controller.move_transaction(1, 1, 3, 0),
        Err(ForecastError::IndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(
        controller.move_transaction(1, 0, 9, 1),
        Err(ForecastError::IndexOutOfRange { index: 1, len: 0 })
    );
    assert_eq!(
        controller.move_transaction(4, 0, 1, 0),
        Err(ForecastError::UnknownWeek(4))
    );

    assert_eq!(controller.forecast(), &before);
    assert!(controller.week(9).is_none());
    assert!(controller.observer().events().is_empty());
}

#[test]
fn opening_balance_change_propagates_everywhere() {
    let mut controller = ForecastController::with_observer(2024, RecordingObserver::default());
    controller.add_transaction(1, "a", 10).unwrap();
    controller.add_transaction(2, "b", 20).unwrap();
    controller.observer_mut().take();

    controller.set_opening_balance(-5).unwrap();
    assert_eq!(balances(&controller), vec![5, 25]);
    let events = controller.observer_mut().take();
    assert_eq!(events[0], ForecastEvent::OpeningBalanceChanged(-5));
    assert_eq!(events.len(), 3);
}

#[test]
fn removal_in_earlier_week_repairs_later_weeks() {
    let mut controller = ForecastController::new(2024);
    controller.set_opening_balance(100).unwrap();
    controller.add_transaction(1, "a", -10).unwrap();
    controller.add_transaction(1, "b", -20).unwrap();
    controller.add_transaction(2, "c", -30).unwrap();
    controller.add_transaction(5, "d", 40).unwrap();

    let removed = controller.remove_transaction(1, 0).unwrap();
    assert_eq!(removed.name(), "a");
    assert_eq!(names(&controller), vec!["b", "c", "d"]);
    assert_eq!(balances(&controller), vec![80, 50, 90]);
    assert_eq!(balances(&controller), expected_balances(&controller));
}

#[test]
fn week_labels_follow_forecast_year() {
    let mut controller = ForecastController::new(2026);
    controller.add_transaction(1, "new year", 1).unwrap();
    controller.add_transaction(53, "year end", 1).unwrap();

    let week = controller.week(1).unwrap();
    assert_eq!(week.label(), "Week of Dec 29");
    assert_eq!(
        controller.week(53).unwrap().week_start(),
        chrono::NaiveDate::from_ymd_opt(2026, 12, 28).unwrap()
    );
}
