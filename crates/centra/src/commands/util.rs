//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::DateTime;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` becomes mandatory.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Render an epoch-millisecond timestamp as UTC, or empty when unknown.
pub fn format_millis(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
