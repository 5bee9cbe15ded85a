//! Rendering of command results for `--output`.
//!
//! Lists become `tabled` tables, single objects use a hand-written detail
//! view. JSON and YAML always serialize the API models themselves, and
//! `plain` prints one identifier per line for piping into other commands.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Whether ANSI colors should be written to stdout (`NO_COLOR` wins in
/// auto mode).
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Render a collection. `to_row` builds the table row, `id_fn` the
/// identifier printed in plain mode.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    if let Some(out) = structured(format, data) {
        return out;
    }
    Ok(match format {
        OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
        _ => Table::new(data.iter().map(to_row))
            .with(Style::rounded())
            .to_string(),
    })
}

/// Render one object. `detail_fn` produces the human-readable view.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError> {
    if let Some(out) = structured(format, data) {
        return out;
    }
    Ok(match format {
        OutputFormat::Plain => id_fn(data),
        _ => detail_fn(data),
    })
}

/// Write `output` plus a newline to stdout unless quiet or empty.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Serde-backed formats; `None` for the human-oriented ones.
fn structured<T: Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Option<Result<String, CliError>> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(CliError::from),
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(CliError::from),
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(CliError::from),
        OutputFormat::Table | OutputFormat::Plain => return None,
    };
    Some(out)
}
