//! Command line front end.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use plaza_config::{ClientConfig, ConfigLoad, ConfigLoader};
use plaza_model::{ProfileField, UserId, Visibility};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domains::profile::{
    StatusDraft, StatusExpiry, UsernameCheck, UsernameChecker, UsernameStatus,
    VisibilityController,
};
use crate::infra::{
    ApiClient,
    services::{ProfileApiAdapter, ProfileService},
};

#[derive(Parser, Debug)]
#[command(name = "plaza")]
#[command(about = "Inspect and edit your Plaza profile")]
pub struct Cli {
    /// Path to plaza.toml (overrides PLAZA_CONFIG and the default locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a profile as JSON
    Show {
        /// Another user's id; defaults to the signed-in user
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Read username candidates from stdin, one per line, and print every
    /// availability status change
    CheckUsername {
        /// Persisted username; fetched from the server when omitted
        #[arg(long)]
        baseline: Option<String>,
    },
    /// Set the status line shown under your name
    SetStatus {
        text: String,
        #[arg(long)]
        emoji: Option<String>,
        /// never, 30m, 1h, 4h, today, this-week, or any duration like 90m
        #[arg(long, default_value = "never")]
        expires: StatusExpiry,
    },
    /// Remove the current status line
    ClearStatus,
    /// Change who can see a profile field
    Visibility {
        field: ProfileField,
        /// public, friends or only-me
        visibility: Visibility,
    },
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,plaza_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn load_config(path: Option<PathBuf>) -> Result<ClientConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad { config, warnings } =
        loader.load().context("failed to load configuration")?;

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        debug!(path = %path.display(), "configuration file in use");
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config)?;
    let client = Arc::new(
        ApiClient::from_config(&config).context("failed to build API client")?,
    );
    let service = Arc::new(ProfileApiAdapter::new(client));

    match cli.command {
        Command::Show { user } => {
            let profile = match user {
                Some(id) => service.fetch_profile(id).await?,
                None => service.fetch_me().await?,
            };
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::CheckUsername { baseline } => {
            let baseline = match baseline {
                Some(baseline) => baseline,
                None => service.fetch_me().await?.basic.username,
            };
            let checker =
                UsernameChecker::from_config(baseline, &config.username, service)
                    .context("invalid username pattern")?;
            let stdin = BufReader::new(tokio::io::stdin());
            check_usernames(&checker, stdin, print_check).await?;
        }
        Command::SetStatus {
            text,
            emoji,
            expires,
        } => {
            let mut draft = StatusDraft::new(text).with_expiry(expires);
            if let Some(emoji) = emoji {
                draft = draft.with_emoji(emoji);
            }
            let status = draft.publish(&*service, Utc::now()).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::ClearStatus => {
            service.clear_status().await?;
            println!("status cleared");
        }
        Command::Visibility { field, visibility } => {
            let profile = service.fetch_me().await?;
            let mut controller =
                VisibilityController::new(service, profile.visibility);
            controller.set_field(field, visibility).await?;
            println!("{field}: {}", controller.get(field));
        }
    }

    Ok(())
}

/// Feed input lines to the checker until input ends and the last candidate
/// has settled, reporting each status the checker publishes.
pub async fn check_usernames<R>(
    checker: &UsernameChecker,
    input: R,
    mut report: impl FnMut(&UsernameCheck),
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut updates = checker.subscribe();
    report(&updates.borrow_and_update());

    let mut input_open = true;
    loop {
        tokio::select! {
            biased;

            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let check = updates.borrow_and_update().clone();
                report(&check);
            }
            line = lines.next_line(), if input_open => match line? {
                Some(line) => checker.on_edit(&line),
                None => input_open = false,
            },
        }

        let settled = checker.current().status != UsernameStatus::Pending;
        if !input_open && settled && !updates.has_changed().unwrap_or(false) {
            break;
        }
    }

    checker.shutdown();
    Ok(())
}

fn print_check(check: &UsernameCheck) {
    match &check.message {
        Some(message) => {
            println!("{:<14} {:<30} {message}", check.status, check.candidate)
        }
        None => println!("{:<14} {}", check.status, check.candidate),
    }
}
