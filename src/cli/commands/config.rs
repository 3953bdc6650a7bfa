use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::CommandEntry;
use crate::core::TracingObserver;
use crate::storage::ForecastSnapshot;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View or change preferences",
        "config [set <currency_symbol|minor_units|year|plain_output> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Configuration");
            for (key, value) in context.config.entries() {
                output::info(format!("  {:<16} {}", key, value));
            }
            output::info(format!("  stored at {}", context.config_manager.path().display()));
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            set_value(context, key, &value.join(" "))
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [set <key> <value>]".into(),
        )),
    }
}

fn set_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let previous = context.config.clone();
    context.config.set(key, value)?;

    // Week start dates depend on the year, so a new year rebuilds the
    // forecast. Nothing is stored or swapped in until the rebuild succeeds.
    let year = context.config.forecast_year();
    let rebuilt = if key == "year" && year != previous.forecast_year() {
        let snapshot = ForecastSnapshot::capture(&*context.controller());
        match snapshot.restore(TracingObserver, year) {
            Ok(rebuilt) => Some(rebuilt),
            Err(err) => {
                context.config = previous;
                return Err(err.into());
            }
        }
    } else {
        None
    };

    if let Err(err) = context.persist_config() {
        context.config = previous;
        return Err(err);
    }
    if let Some(rebuilt) = rebuilt {
        context.forecast.replace(rebuilt);
    }
    if key == "plain_output" {
        output::set_preferences(OutputPreferences {
            plain_mode: context.config.plain_output || context.mode == CliMode::Script,
            ..output::current_preferences()
        });
    }
    output::success(format!("Set {} = {}.", key, value));
    Ok(())
}
