use anyhow::Result;
use clap::Parser;
use tracing::Instrument;

mod cli;

use cli::commands::demo::DemoCommand;
use cli::commands::landing::{LandingCommand, StakeholdersCommand};
use cli::commands::track::TrackCommand;
use cli::commands::verify::VerifyCommand;
use cli::commands::Command;
use cli::{Cli, Commands};
use herbtrace::telemetry::{create_session_span, generate_correlation_id, init_telemetry, shutdown_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = herbtrace::config()?.clone();
    init_telemetry(&config.observability)?;
    herbtrace::init_config()?;

    let command = cli.command.unwrap_or(Commands::Landing);
    let span = create_session_span(command.view_name(), &generate_correlation_id());

    let result = tokio::runtime::Runtime::new()?.block_on(
        async move {
            match command {
                Commands::Landing => LandingCommand.execute().await,
                Commands::Stakeholders => StakeholdersCommand.execute().await,
                Commands::Verify { image } => VerifyCommand { image, config }.execute().await,
                Commands::Track => TrackCommand { config }.execute().await,
                Commands::Demo {
                    steps,
                    delay_ms,
                    json,
                } => {
                    DemoCommand {
                        steps,
                        delay_ms,
                        json,
                        config,
                    }
                    .execute()
                    .await
                }
            }
        }
        .instrument(span),
    );

    shutdown_telemetry();
    result
}
