use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::forecast_table::{forecast_table, week_summary_table};
use crate::currency::AmountFormat;

use super::{parse_position, parse_week, require_args};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Add a transaction at the end of a week",
            "add <week> <name> <amount>",
            cmd_add,
        ),
        CommandEntry::new(
            "remove",
            "Remove a transaction from a week",
            "remove <week> <position>",
            cmd_remove,
        ),
        CommandEntry::new(
            "move",
            "Move a transaction onto another row or week",
            "move <from-week> <from-position> <to-week> <to-position>",
            cmd_move,
        ),
        CommandEntry::new(
            "opening",
            "Set the opening balance",
            "opening <amount>",
            cmd_opening,
        ),
        CommandEntry::new("show", "Show the forecast by week", "show", cmd_show),
        CommandEntry::new(
            "weeks",
            "Show opening and closing balance per week",
            "weeks",
            cmd_weeks,
        ),
        CommandEntry::new(
            "check",
            "Audit balances and week ordering",
            "check",
            cmd_check,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add <week> <name> <amount>";
    let Some((amount_raw, rest)) = args.split_last() else {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    };
    let Some((week_raw, name_parts)) = rest.split_first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    };
    let name = name_parts.join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    let week = parse_week(week_raw)?;
    let format = context.amount_format();
    let value = parse_amount(&format, amount_raw)?;

    let mut controller = context.controller_mut();
    let id = controller.add_transaction(week, name.trim(), value)?;
    let balance = controller
        .forecast()
        .position_of(id)
        .and_then(|index| controller.forecast().get(index))
        .and_then(|txn| txn.balance())
        .unwrap_or_default();
    output::success(format!(
        "Added `{}` ({}) to week {}; balance {}.",
        name.trim(),
        format.format(value),
        week,
        format.format(balance)
    ));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "remove <week> <position>")?;
    let week = parse_week(args[0])?;
    let local = parse_position(args[1])?;
    let removed = context.controller_mut().remove_transaction(week, local)?;
    output::success(format!("Removed `{}` from week {}.", removed.name(), week));
    Ok(())
}

fn cmd_move(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(
        args,
        4,
        "move <from-week> <from-position> <to-week> <to-position>",
    )?;
    let from_week = parse_week(args[0])?;
    let from_local = parse_position(args[1])?;
    let to_week = parse_week(args[2])?;
    let to_local = parse_position(args[3])?;

    let format = context.amount_format();
    let mut controller = context.controller_mut();
    let name = controller
        .transaction(from_week, from_local)
        .map(|txn| txn.name().to_string())
        .unwrap_or_default();
    controller.move_transaction(from_week, from_local, to_week, to_local)?;
    output::success(format!(
        "Moved `{}` to week {}; closing balance {}.",
        name,
        to_week,
        format.format(controller.forecast().closing_balance())
    ));
    Ok(())
}

fn cmd_opening(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "opening <amount>")?;
    let format = context.amount_format();
    let balance = parse_amount(&format, args[0])?;
    context.controller_mut().set_opening_balance(balance)?;
    output::success(format!("Opening balance set to {}.", format.format(balance)));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 0, "show")?;
    let format = context.amount_format();
    let controller = context.controller();
    if controller.forecast().is_empty() {
        output::info(format!(
            "No transactions yet. Opening balance {}. Use `add <week> <name> <amount>`.",
            format.format(controller.forecast().opening_balance())
        ));
        return Ok(());
    }
    output::section(format!("Forecast {}", controller.year()));
    output::block(forecast_table(&*controller, &format).render());
    output::info(format!(
        "Opening balance {}, closing balance {}.",
        format.format(controller.forecast().opening_balance()),
        format.format(controller.forecast().closing_balance())
    ));
    Ok(())
}

fn cmd_weeks(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 0, "weeks")?;
    let format = context.amount_format();
    let summaries = context.controller().week_summaries();
    if summaries.is_empty() {
        output::info("No weeks yet.");
        return Ok(());
    }
    output::section("Weeks");
    output::block(week_summary_table(&summaries, &format).render());
    Ok(())
}

fn cmd_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 0, "check")?;
    let warnings = context.controller().consistency_warnings();
    if warnings.is_empty() {
        output::success("Forecast is consistent.");
    } else {
        for warning in &warnings {
            output::warning(warning);
        }
    }
    Ok(())
}

fn parse_amount(format: &AmountFormat, raw: &str) -> Result<i64, CommandError> {
    format.parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "`{}` is not an amount (up to {} decimal places)",
            raw, format.minor_units
        ))
    })
}
