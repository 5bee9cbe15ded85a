//! Clap derive structures for the `centra` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// centra -- command-line access to the Guardicore Centra management API
#[derive(Debug, Parser)]
#[command(
    name = "centra",
    version,
    about = "Query and label Guardicore Centra assets from the command line",
    long_about = "A CLI for the Guardicore Centra management REST API (v3.0).\n\n\
        Lists assets and labels, labels assets, and deletes labels using\n\
        credentials from a config profile, the system keyring, or the environment.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "CENTRA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Management server host name or IP (overrides profile)
    #[arg(long, short = 'a', env = "CENTRA_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Management server HTTPS port (overrides profile)
    #[arg(long, env = "CENTRA_PORT", global = true)]
    pub port: Option<u16>,

    /// API username (overrides profile)
    #[arg(long, short = 'u', env = "CENTRA_USERNAME", global = true)]
    pub username: Option<String>,

    /// API password; prefer the keyring or CENTRA_PASSWORD
    #[arg(long, global = true, hide = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CENTRA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates (weakens transport security)
    #[arg(long, short = 'k', env = "CENTRA_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CENTRA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Do not re-authenticate when the session token is rejected
    #[arg(long, global = true)]
    pub no_reconnect: bool,

    /// Answer a two-factor challenge on the terminal
    #[arg(long = "2fa", global = true)]
    pub two_factor: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List assets
    #[command(alias = "a")]
    Assets(AssetsArgs),

    /// List, assign and delete labels
    #[command(alias = "l")]
    Labels(LabelsArgs),

    /// Check that the management server answers API calls
    Status,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Assets ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AssetsArgs {
    #[command(subcommand)]
    pub command: AssetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AssetsCommand {
    /// List assets, newest activity first
    #[command(alias = "ls")]
    List(AssetListArgs),
}

#[derive(Debug, Args)]
pub struct AssetListArgs {
    /// Only assets whose name or IPs contain this text
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only assets in these states (repeatable)
    #[arg(long, value_enum)]
    pub status: Vec<AssetStatusArg>,

    /// Only assets carrying this label id (repeatable)
    #[arg(long)]
    pub label: Vec<String>,

    /// Sort attribute, e.g. "-last_seen"
    #[arg(long)]
    pub sort: Option<String>,

    /// Stop after this many assets
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Assets fetched per request
    #[arg(long, default_value = "1000")]
    pub page_size: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AssetStatusArg {
    On,
    Off,
    Deleted,
}

// ── Labels ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LabelsArgs {
    #[command(subcommand)]
    pub command: LabelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LabelsCommand {
    /// List labels
    #[command(alias = "ls")]
    List(LabelListArgs),

    /// Put a label on one or more assets
    Add {
        /// Label key, e.g. "Environment"
        key: String,

        /// Label value, e.g. "Production"
        value: String,

        /// Asset ids to label
        #[arg(required = true)]
        asset_ids: Vec<String>,
    },

    /// Delete a label by name
    #[command(alias = "rm")]
    Delete {
        /// Label name as "Key: Value"
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct LabelListArgs {
    /// Only labels with this key
    #[arg(long)]
    pub key: Option<String>,

    /// Only labels with this value
    #[arg(long)]
    pub value: Option<String>,

    /// Only labels whose "Key: Value" contains this text
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Stop after this many labels
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the configuration with secrets masked
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
