mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use centra_api::{CentraClient, Session};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a management server
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "centra", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the management server
        cmd => {
            let cfg = config::load_config_or_default();
            let profile = config::active_profile_name(&cli.global, &cfg);
            let session_config = config::resolve_session_config(&cli.global, &cfg)?;

            let session = Session::new(session_config)
                .await
                .map_err(|e| CliError::from_api(e, &profile))?;
            let client = CentraClient::new(session);

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &client, &cli.global).await;

            if let Err(e) = client.into_session().close().await {
                tracing::debug!(error = %e, "logout failed");
            }
            result.map_err(|e| e.with_profile(&profile))
        }
    }
}
