use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{app_data_dir, ensure_dir},
    currency::{AmountFormat, MAX_MINOR_UNITS},
    errors::StorageError,
    storage::json_backend::write_json,
};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub minor_units: u8,
    /// Year used to resolve week start dates; the current year when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub plain_output: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_export: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            minor_units: 2,
            year: None,
            plain_output: false,
            last_export: None,
        }
    }
}

impl Config {
    pub fn forecast_year(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year())
    }

    pub fn amount_format(&self) -> AmountFormat {
        AmountFormat::new(self.currency_symbol.clone(), self.minor_units)
    }

    /// Applies a `config set <key> <value>` assignment.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match key {
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "minor_units" => {
                let units: u8 = value
                    .parse()
                    .map_err(|_| StorageError::Config(format!("`{}` is not a number", value)))?;
                if units > MAX_MINOR_UNITS {
                    return Err(StorageError::Config(format!(
                        "minor_units must be at most {}",
                        MAX_MINOR_UNITS
                    )));
                }
                self.minor_units = units;
            }
            "year" => {
                self.year = match value {
                    "auto" | "none" => None,
                    other => Some(
                        other
                            .parse::<i32>()
                            .ok()
                            .filter(|year| NaiveDate::from_ymd_opt(*year, 1, 1).is_some())
                            .ok_or_else(|| {
                                StorageError::Config(format!("`{}` is not a valid year", other))
                            })?,
                    ),
                }
            }
            "plain_output" => {
                self.plain_output = value
                    .parse()
                    .map_err(|_| StorageError::Config(format!("`{}` is not true/false", value)))?;
            }
            other => {
                return Err(StorageError::Config(format!(
                    "unknown configuration key `{}`",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Settable keys with their current values, for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency_symbol", self.currency_symbol.clone()),
            ("minor_units", self.minor_units.to_string()),
            (
                "year",
                self.year
                    .map_or_else(|| "auto".to_string(), |year| year.to_string()),
            ),
            ("plain_output", self.plain_output.to_string()),
            (
                "last_export",
                self.last_export
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |path| path.display().to_string()),
            ),
        ]
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, StorageError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, StorageError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, StorageError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), StorageError> {
        write_json(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
