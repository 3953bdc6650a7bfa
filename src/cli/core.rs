//! Core CLI loop, dispatch, and shell context helpers.

use std::{
    io,
    sync::{RwLockReadGuard, RwLockWriteGuard},
};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::ConfigManager,
    core::{ForecastController, SharedController, TracingObserver},
    currency::AmountFormat,
    errors::{ForecastError, StorageError},
    storage::JsonStorage,
};

use super::commands;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failures that end the shell itself.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let storage = JsonStorage::new_default()?;
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            plain_mode: config.plain_output || mode == CliMode::Script,
            quiet_mode: false,
        });

        let controller = ForecastController::with_observer(config.forecast_year(), TracingObserver);
        tracing::debug!(year = controller.year(), ?mode, "shell context ready");

        Ok(ShellContext {
            mode,
            registry,
            forecast: SharedController::new(controller),
            theme: ColorfulTheme::default(),
            storage,
            config_manager,
            config,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn controller(&self) -> RwLockReadGuard<'_, ForecastController<TracingObserver>> {
        self.forecast.read()
    }

    pub(crate) fn controller_mut(
        &self,
    ) -> RwLockWriteGuard<'_, ForecastController<TracingObserver>> {
        self.forecast.write()
    }

    pub(crate) fn amount_format(&self) -> AmountFormat {
        self.config.amount_format()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn prompt(&self) -> String {
        let count = self.controller().forecast().len();
        format!("cashcal [{} txn]> ", count)
    }

    /// `(name, usage)` pairs for completion and inline hints.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Forecast(err) => output::error(describe_forecast_error(&err)),
            other => output::error(other),
        }
    }
}

/// Rephrases engine errors in the shell's 1-based positions.
fn describe_forecast_error(err: &ForecastError) -> String {
    match err {
        ForecastError::IndexOutOfRange { index, len } => format!(
            "position {} is out of range (the week has {} transaction{})",
            index + 1,
            len,
            if *len == 1 { "" } else { "s" }
        ),
        ForecastError::UnknownWeek(week) => format!("week {} has no transactions", week),
        ForecastError::InvalidWeek(week) => {
            format!("week {} is not a valid week number", week)
        }
        ForecastError::BalanceOverflow => {
            "that change would push a running balance out of range".to_string()
        }
    }
}
