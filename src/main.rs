use std::process::ExitCode;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reaction_issues::config::{Config, ConfigError, Secrets, config_path};
use reaction_issues::github::OctocrabClient;
use reaction_issues::middleware::Middleware;
use reaction_issues::server::{AppState, build_router};
use reaction_issues::slack::{SlackClient, SlackClientError};

#[derive(Debug, Error)]
enum StartupError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("failed to create Slack client: {0}")]
    Slack(#[from] SlackClientError),

    #[error("failed to create GitHub client: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reaction_issues=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let path = config_path();
    let config = Config::load(&path)?;
    let secrets = Secrets::from_env()?;
    info!(
        path = %path.display(),
        rules = config.rules.len(),
        github_user = %config.github_user,
        "configuration loaded"
    );

    let slack = SlackClient::new(
        secrets.slack_bot_token.clone(),
        config.success_reaction.clone(),
        config.slack_timeout,
    )?;
    let github = OctocrabClient::from_token(
        secrets.github_token.clone(),
        config.github_user.clone(),
        config.github_timeout,
    )?;

    // Without these the bot still works, with ids for channel names and
    // permalinks from reactions.get only.
    match slack.refresh_channels().await {
        Ok(count) => info!(channels = count, "channel directory loaded"),
        Err(e) => warn!(error = %e, "failed to load channel list"),
    }
    match slack.refresh_team_domain().await {
        Ok(domain) => info!(domain = %domain, "team domain loaded"),
        Err(e) => warn!(error = %e, "failed to load team domain"),
    }

    let channels = slack.channels().clone();
    let middleware = Middleware::new(config.rules, config.success_reaction, slack, github);
    let app = build_router(AppState::new(
        middleware,
        channels,
        secrets.slack_signing_secret,
    ));

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(secrets.listen_addr).await?;
    info!("listening on {}", secrets.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("shut down");
    Ok(())
}

async fn wait_for_signal(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("received Ctrl-C, shutting down");
            shutdown.cancel();
        }
        Err(e) => error!(error = %e, "failed to listen for Ctrl-C"),
    }
}
