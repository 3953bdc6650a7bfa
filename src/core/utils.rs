use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".cashcal";
const HOME_VAR: &str = "CASHCAL_HOME";
const HISTORY_FILE: &str = "history.txt";

/// Returns the application data directory, defaulting to `~/.cashcal`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_VAR) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Line-editor history for the interactive shell.
pub fn history_file() -> PathBuf {
    app_data_dir().join(HISTORY_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
