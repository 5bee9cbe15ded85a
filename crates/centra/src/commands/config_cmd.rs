//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

/// A copy of `cfg` that is safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
    cfg
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n# {e}")),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let password = rpassword::prompt_password(format!("Password for '{profile_name}': "))
                .map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            centra_config::store_password(&profile_name, &password)?;
            if !global.quiet {
                eprintln!("Password for profile '{profile_name}' stored in the system keyring");
            }
            Ok(())
        }
    }
}
