mod common;

use cashcal_core::core::ForecastController;
use cashcal_core::domain::Transaction;
use cashcal_core::errors::ForecastError;
use cashcal_core::ledger::Forecast;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use common::{balances, expected_balances, names};

const WEEKS: u32 = 12;

/// One controller call. Picks are reduced modulo whatever is populated when
/// the operation runs.
#[derive(Debug, Clone)]
enum Op {
    Add { week: u32, value: i64 },
    Remove { week_pick: usize, pick: usize },
    Move {
        week_pick: usize,
        pick: usize,
        to_week: u32,
        to_pick: usize,
    },
    Opening(i64),
}

fn op_strategy(value: BoxedStrategy<i64>) -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (1..=WEEKS, value.clone()).prop_map(|(week, value)| Op::Add { week, value }),
        2 => (any::<usize>(), any::<usize>())
            .prop_map(|(week_pick, pick)| Op::Remove { week_pick, pick }),
        2 => (any::<usize>(), any::<usize>(), 1..=WEEKS, any::<usize>()).prop_map(
            |(week_pick, pick, to_week, to_pick)| Op::Move {
                week_pick,
                pick,
                to_week,
                to_pick,
            }
        ),
        1 => value.prop_map(Op::Opening),
    ]
}

fn small_values() -> BoxedStrategy<i64> {
    (-1_000i64..=1_000).boxed()
}

fn extreme_values() -> BoxedStrategy<i64> {
    prop_oneof![
        Just(i64::MAX),
        Just(i64::MIN),
        Just(i64::MAX / 2),
        Just(i64::MIN / 2),
        -1_000i64..=1_000,
    ]
    .boxed()
}

fn apply(controller: &mut ForecastController, op: &Op, step: usize) -> Result<(), ForecastError> {
    let populated: Vec<u32> = controller
        .weeks()
        .filter(|week| !week.is_empty())
        .map(|week| week.week_number())
        .collect();
    let count_of = |controller: &ForecastController, week: u32| {
        controller.week(week).map_or(0, |week| week.transaction_count())
    };

    match *op {
        Op::Add { week, value } => controller
            .add_transaction(week, format!("t{step}"), value)
            .map(drop),
        Op::Remove { week_pick, pick } if !populated.is_empty() => {
            let week = populated[week_pick % populated.len()];
            let count = count_of(controller, week);
            controller.remove_transaction(week, pick % count).map(drop)
        }
        Op::Move {
            week_pick,
            pick,
            to_week,
            to_pick,
        } if !populated.is_empty() => {
            let from_week = populated[week_pick % populated.len()];
            let from_count = count_of(controller, from_week);
            let to_count = count_of(controller, to_week);
            controller.move_transaction(
                from_week,
                pick % from_count,
                to_week,
                to_pick % (to_count + 1),
            )
        }
        Op::Opening(balance) => controller.set_opening_balance(balance),
        _ => Ok(()),
    }
}

fn check_invariants(controller: &ForecastController, step: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(
        balances(controller),
        expected_balances(controller),
        "balances drifted at step {}",
        step
    );
    let weeks: Vec<u32> = controller
        .forecast()
        .transactions()
        .iter()
        .map(|txn| txn.week())
        .collect();
    prop_assert!(
        weeks.windows(2).all(|pair| pair[0] <= pair[1]),
        "weeks out of order at step {}: {:?}",
        step,
        weeks
    );
    let warnings = controller.consistency_warnings();
    prop_assert!(warnings.is_empty(), "step {}: {:?}", step, warnings);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn operation_sequences_keep_every_invariant(
        opening in -1_000i64..=1_000,
        ops in prop::collection::vec(op_strategy(small_values()), 1..150),
    ) {
        let mut controller = ForecastController::new(2024);
        controller.set_opening_balance(opening).unwrap();

        for (step, op) in ops.iter().enumerate() {
            prop_assert_eq!(apply(&mut controller, op, step), Ok(()), "step {}: {:?}", step, op);
            check_invariants(&controller, step)?;
        }
    }

    #[test]
    fn extreme_values_are_rejected_whole(
        ops in prop::collection::vec(op_strategy(extreme_values()), 1..60),
    ) {
        let mut controller = ForecastController::new(2024);

        for (step, op) in ops.iter().enumerate() {
            let before = controller.forecast().clone();
            match apply(&mut controller, op, step) {
                Ok(()) => {}
                Err(ForecastError::BalanceOverflow) => {
                    prop_assert_eq!(controller.forecast(), &before, "step {}: {:?}", step, op);
                }
                Err(other) => {
                    return Err(TestCaseError::fail(format!("step {step}: {op:?} failed with {other}")));
                }
            }
            check_invariants(&controller, step)?;
        }
    }
}

#[test]
fn forward_then_back_move_restores_order() {
    let mut controller = ForecastController::new(2024);
    for (week, name) in [(1, "a"), (1, "b"), (2, "c"), (3, "d")] {
        controller.add_transaction(week, name, 10).unwrap();
    }
    let original = names(&controller);

    controller.move_transaction(1, 0, 3, 1).unwrap();
    assert_eq!(names(&controller), vec!["b", "c", "d", "a"]);
    controller.move_transaction(3, 1, 1, 0).unwrap();
    assert_eq!(names(&controller), original);
}

#[test]
fn engine_move_round_trip_is_identity() {
    let mut forecast = Forecast::new(50);
    for idx in 0..8 {
        forecast
            .add_transaction(Transaction::new(format!("t{idx}"), idx * 7 - 20, 1), None)
            .unwrap();
    }
    let original = forecast.clone();
    for (from, to) in [(0, 7), (3, 1), (6, 2)] {
        forecast.move_transaction(from, to).unwrap();
        forecast.move_transaction(to, from).unwrap();
        assert_eq!(forecast, original);
    }
}

#[test]
fn recompute_all_twice_changes_nothing() {
    let mut controller = ForecastController::new(2024);
    controller.set_opening_balance(12).unwrap();
    for week in 1..=5 {
        controller.add_transaction(week, "x", week as i64 * -3).unwrap();
    }
    let snapshot = balances(&controller);
    assert_eq!(controller.recompute_all(), Ok(0));
    assert_eq!(controller.recompute_all(), Ok(0));
    assert_eq!(balances(&controller), snapshot);
}
