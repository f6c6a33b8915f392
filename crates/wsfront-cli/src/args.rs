use crate::types::{IdeStateArg, LogLevel, OutputFormat, WorkspaceTypeArg};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wsfront_types::InstancePhase;

#[derive(Parser)]
#[command(name = "wsfront")]
#[command(about = "Inspect and simulate the workspace IDE frontend supervisor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to $WSFRONT_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scripted session through the supervisor
    Simulate {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Session id reported in analytics (random if omitted)
        #[arg(long)]
        session_id: Option<String>,
    },

    /// Evaluate the presentation state machine for a phase sequence
    Compute {
        /// Comma-separated instance phases, e.g. pending,creating,running
        #[arg(long, value_delimiter = ',', required = true)]
        phases: Vec<InstancePhase>,

        /// Desktop hand-off link offered once the IDE is ready
        #[arg(long, conflicts_with = "readiness_pending")]
        handoff: Option<String>,

        /// Treat IDE readiness as not yet resolved
        #[arg(long)]
        readiness_pending: bool,

        #[arg(long, default_value = "uninitialized")]
        ide: IdeStateArg,

        /// The user already chose the web IDE
        #[arg(long)]
        prefer_local: bool,

        #[arg(long, default_value = "regular")]
        workspace_type: WorkspaceTypeArg,
    },

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,

    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
