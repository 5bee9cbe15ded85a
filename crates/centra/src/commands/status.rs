//! Connectivity check.

use owo_colors::OwoColorize;
use serde::Serialize;

use centra_api::CentraClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Status {
    url: String,
    username: String,
    connected: bool,
    two_factor: bool,
}

fn detail(status: &Status, color: bool) -> String {
    let state = match (status.connected, color) {
        (true, true) => "connected".green().bold().to_string(),
        (true, false) => "connected".into(),
        (false, true) => "unreachable".red().bold().to_string(),
        (false, false) => "unreachable".into(),
    };
    let mut out = format!(
        "{state}\n  URL:       {}\n  Username:  {}",
        status.url, status.username
    );
    if status.two_factor {
        out.push_str("\n  Two-factor authentication was used");
    }
    out
}

pub async fn handle(client: &CentraClient, global: &GlobalOpts) -> Result<(), CliError> {
    let session = client.session();
    let status = Status {
        url: session.base_url().to_string(),
        username: session.config().username.clone(),
        connected: client.is_connected().await,
        two_factor: session.two_factor_required(),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &status,
        |s| detail(s, color),
        |s| String::from(if s.connected { "connected" } else { "unreachable" }),
    )?;
    output::print_output(&out, global.quiet);

    if status.connected {
        Ok(())
    } else {
        Err(CliError::ConnectionFailed {
            url: status.url,
            source: "the management server did not answer the status probe".into(),
        })
    }
}
