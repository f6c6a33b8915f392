use super::args::{Cli, Commands, ConfigCommand};
use super::handlers;
use crate::logging;
use anyhow::Result;
use wsfront_runtime::{FrontendConfig, config::resolve_config_path};

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    match cli.command {
        Commands::Simulate {
            scenario,
            session_id,
        } => {
            let config = FrontendConfig::load(cli.config.as_deref())?;
            handlers::simulate::handle(config, &scenario, session_id, cli.format)
        }

        Commands::Compute {
            phases,
            handoff,
            readiness_pending,
            ide,
            prefer_local,
            workspace_type,
        } => handlers::compute::handle(
            handlers::compute::ComputeArgs {
                phases,
                handoff,
                readiness_pending,
                ide: ide.into(),
                prefer_local,
                workspace_type: workspace_type.into(),
            },
            cli.format,
        ),

        Commands::Config { command } => {
            let path = resolve_config_path(cli.config.as_deref())?;
            match command {
                ConfigCommand::Show => handlers::config::show(&path, cli.format),
                ConfigCommand::Init { force } => handlers::config::init(&path, force),
            }
        }
    }
}
