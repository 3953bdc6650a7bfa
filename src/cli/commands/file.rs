use std::path::PathBuf;

use dialoguer::Confirm;

use crate::cli::core::{CliMode, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::TracingObserver;
use crate::storage::{ForecastSnapshot, StorageBackend};

use super::require_args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write the forecast to a JSON snapshot",
            "export <file|name>",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Replace the forecast with a JSON snapshot",
            "import <file|name>",
            cmd_import,
        ),
    ]
}

/// A bare name resolves inside the managed exports directory; anything that
/// looks like a path is used as given.
fn resolve_target(context: &ShellContext, raw: &str) -> PathBuf {
    let looks_like_path =
        raw.contains(std::path::MAIN_SEPARATOR) || raw.contains('/') || raw.ends_with(".json");
    if looks_like_path {
        PathBuf::from(raw)
    } else {
        context.storage.snapshot_path(raw)
    }
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "export <file|name>")?;
    let path = resolve_target(context, args[0]);
    let snapshot = ForecastSnapshot::capture(&*context.controller());
    context.storage.save_to_path(&snapshot, &path)?;

    context.config.last_export = Some(path.clone());
    context.persist_config()?;
    output::success(format!(
        "Exported {} transactions to {}.",
        snapshot.transaction_count(),
        path.display()
    ));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "import <file|name>")?;
    let path = resolve_target(context, args[0]);
    let snapshot = context.storage.load_from_path(&path)?;

    let has_data = !context.controller().forecast().is_empty();
    if has_data && context.mode == CliMode::Interactive {
        let replace = Confirm::with_theme(&context.theme)
            .with_prompt("Replace the current forecast?")
            .default(false)
            .interact()?;
        if !replace {
            output::info("Import cancelled.");
            return Ok(());
        }
    }

    let controller = snapshot.restore(TracingObserver, context.config.forecast_year())?;
    let warnings = controller.consistency_warnings();
    context.forecast.replace(controller);
    for warning in warnings {
        output::warning(warning);
    }

    context.config.last_export = Some(path.clone());
    context.persist_config()?;
    output::success(format!(
        "Imported {} transactions from {}.",
        snapshot.transaction_count(),
        path.display()
    ));
    Ok(())
}
