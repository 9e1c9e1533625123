//! zurri: command-line client for the Zurri agent marketplace.

mod chat_loop;
mod cli;
mod commands;
mod render;

use std::path::Path;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use zurri_chat::api::AgentQuery;
use zurri_chat::{AuthContext, ClientConfig, ZurriClient};
use zurri_config::ZurriConfig;

use crate::cli::{Args, Command};

const LOG_TARGETS: [&str; 4] = ["zurri_cli", "zurri_chat", "zurri_config", "zurri_common"];

/// Filter directive for our own crates at `level`.
fn log_directive(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn init_logging(args: &Args, config: &ZurriConfig) {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_directive());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> (ZurriConfig, Option<zurri_common::ConfigError>) {
    let result = match &args.config {
        Some(path) => zurri_config::load_config_from(path),
        None => zurri_config::load_config(),
    };
    match result {
        Ok(config) => (config, None),
        Err(e) => (ZurriConfig::default(), Some(e)),
    }
}

fn build_client(args: &Args, config: &ZurriConfig, token_path: Option<&Path>) -> ZurriClient {
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.api.base_url.clone());
    let client_config = ClientConfig::new(base_url).with_timeouts(
        Duration::from_secs(u64::from(config.api.connect_timeout_secs)),
        Duration::from_secs(u64::from(config.api.request_timeout_secs)),
    );
    ZurriClient::new(client_config, AuthContext::from_env(token_path))
}

async fn run(args: Args, config: ZurriConfig) -> zurri_common::Result<()> {
    let token_path = commands::token_path();
    let client = build_client(&args, &config, token_path.as_deref());

    match args.command {
        Command::Login { email, password } => {
            commands::login(&client, token_path.as_deref(), &email, password).await
        }
        Command::Register {
            email,
            password,
            name,
        } => {
            commands::register(
                &client,
                token_path.as_deref(),
                &email,
                password,
                name.as_deref(),
            )
            .await
        }
        Command::Logout => commands::logout(token_path.as_deref()),
        Command::Whoami => commands::whoami(&client).await,
        Command::Agents {
            search,
            category,
            min_reputation,
            page,
            limit,
        } => {
            let query = AgentQuery {
                page,
                limit,
                category,
                search,
                min_reputation,
            };
            commands::agents(&client, query).await
        }
        Command::Agent { action } => commands::agent(&client, action).await,
        Command::Wallet {
            transactions,
            action,
        } => commands::wallet(&client, transactions, action).await,
        Command::BecomeCreator => commands::become_creator(&client).await,
        Command::Chat { agent_id } => chat_loop::run(client, &config.chat, &agent_id).await,
        Command::Config => {
            println!("{}", zurri_config::config_to_json(&config));
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let (config, config_error) = load_config(&args);
    init_logging(&args, &config);
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    tracing::debug!("zurri v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args, config).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
