//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod assets;
pub mod config_cmd;
pub mod labels;
pub mod status;
pub mod util;

use centra_api::CentraClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &CentraClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Assets(args) => assets::handle(client, args, global).await,
        Command::Labels(args) => labels::handle(client, args, global).await,
        Command::Status => status::handle(client, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
