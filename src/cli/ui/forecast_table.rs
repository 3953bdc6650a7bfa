//! Table views over a forecast controller.

use crate::cli::output::amount_cell;
use crate::core::{ForecastController, ForecastObserver, WeekSummary};
use crate::currency::AmountFormat;

use super::table_renderer::{Table, TableColumn};

const NAME_WIDTH: usize = 28;

/// One row per transaction, grouped by week with a rule between weeks.
/// Positions are shown 1-based, as the shell commands expect them.
pub fn forecast_table<O: ForecastObserver>(
    controller: &ForecastController<O>,
    format: &AmountFormat,
) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Week"),
        TableColumn::right("#"),
        TableColumn::left("Transaction").max_width(NAME_WIDTH),
        TableColumn::right("Amount"),
        TableColumn::right("Balance"),
    ]);

    for week in controller.weeks() {
        let heading = format!("{:>2} {}", week.week_number(), week.start_label());
        let transactions = controller.week_transactions(week.week_number());
        if transactions.is_empty() {
            table.push_row(vec![heading, String::new(), "(no transactions)".into()]);
            continue;
        }
        for (local, txn) in transactions.iter().enumerate() {
            let week_cell = if local == 0 { heading.clone() } else { String::new() };
            let balance = txn.balance().unwrap_or_default();
            table.push_row(vec![
                week_cell,
                (local + 1).to_string(),
                txn.name().to_string(),
                amount_cell(txn.value(), format.format(txn.value())),
                amount_cell(balance, format.format(balance)),
            ]);
        }
        table.push_rule();
    }
    table
}

pub fn week_summary_table(summaries: &[WeekSummary], format: &AmountFormat) -> Table {
    let mut table = Table::new(vec![
        TableColumn::right("Week"),
        TableColumn::left("Starts"),
        TableColumn::right("Entries"),
        TableColumn::right("Opening"),
        TableColumn::right("Closing"),
    ]);
    for summary in summaries {
        table.push_row(vec![
            summary.week_number.to_string(),
            summary.week_start.format("%Y-%m-%d").to_string(),
            summary.transaction_count.to_string(),
            amount_cell(summary.opening_balance, format.format(summary.opening_balance)),
            amount_cell(summary.closing_balance, format.format(summary.closing_balance)),
        ]);
    }
    table
}
