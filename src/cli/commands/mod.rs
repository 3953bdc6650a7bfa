pub mod config;
pub mod file;
pub mod forecast;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    let entries = forecast::definitions()
        .into_iter()
        .chain(file::definitions())
        .chain(config::definitions())
        .chain(system::definitions());
    for entry in entries {
        registry.register(entry);
    }
}

pub(crate) fn require_args(args: &[&str], count: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!("usage: {}", usage)))
    }
}

pub(crate) fn parse_week(raw: &str) -> Result<u32, CommandError> {
    raw.parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a week number", raw)))
}

/// Converts a 1-based position typed by the user into a 0-based index.
pub(crate) fn parse_position(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` is not a position (positions start at 1)",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_position("1").unwrap(), 0);
        assert!(parse_position("0").is_err());
        assert!(parse_position("-1").is_err());
        assert!(parse_week("x").is_err());
    }
}
