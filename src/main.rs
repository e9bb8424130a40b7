//! subgate — local gateway that serves the canonical chat protocol on top
//! of subscription OAuth backends.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use std::str::FromStr as _;
use std::sync::Arc;
use std::time::Duration;
use subgate_auth::AuthManager;
use subgate_config::Config;
use subgate_provider::{
    AdapterRouter, CodexAdapter, GeminiAdapter, IFlowAdapter, PassthroughAdapter, ProviderHttp,
};
use subgate_proxy::{AppState, app};
use subgate_store::FileTokenStore;
use subgate_types::ProviderId;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "subgate", version, about = "Subscription-to-API chat gateway")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the gateway server.
    Serve {
        /// Listen address (overrides SUBGATE_HOST).
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides SUBGATE_PORT).
        #[arg(long)]
        port: Option<u16>,
        /// Credential directory (overrides SUBGATE_CREDENTIALS_DIR).
        #[arg(long)]
        credentials_dir: Option<String>,
    },
    /// Log in to a provider (codex, gemini, iflow).
    Login { provider: String },
    /// Delete a provider's stored credential.
    Logout { provider: String },
    /// Show which providers have a stored credential.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("loading configuration")?;

    match cli.command {
        Command::Serve {
            host,
            port,
            credentials_dir,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(dir) = credentials_dir {
                config.credentials_dir = dir;
            }
            serve(config).await
        }
        Command::Login { provider } => {
            let provider = ProviderId::from_str(&provider)?;
            let manager = build_auth(&config)?;
            subgate_auth::flow::login(&manager, &provider).await?;
            println!("Logged in to {provider}.");
            Ok(())
        }
        Command::Logout { provider } => {
            let provider = ProviderId::from_str(&provider)?;
            let manager = build_auth(&config)?;
            manager.logout(&provider).await?;
            println!("Removed credential for {provider}.");
            Ok(())
        }
        Command::Status => {
            let manager = build_auth(&config)?;
            for provider in ProviderId::all() {
                match manager.peek(provider).await? {
                    Some(token) => {
                        let state = if token.is_expired() { "stale" } else { "valid" };
                        println!("{provider}: logged in ({state})");
                    }
                    None => println!("{provider}: not logged in"),
                }
            }
            Ok(())
        }
    }
}

fn build_auth(config: &Config) -> anyhow::Result<AuthManager> {
    config.validate()?;
    let store = Arc::new(FileTokenStore::open(
        &config.credentials_dir,
        &config.encryption_secret,
        &config.encryption_salt,
    )?);
    Ok(AuthManager::new(store)
        .with_gemini_client(&config.gemini_client_id, &config.gemini_client_secret))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let auth = Arc::new(build_auth(&config)?);
    let http = ProviderHttp::new(Duration::from_secs(config.request_timeout_secs));

    let router = AdapterRouter::new(
        vec![
            Arc::new(CodexAdapter::new(http.clone(), auth.clone())),
            Arc::new(GeminiAdapter::new(http.clone(), auth.clone())),
            Arc::new(IFlowAdapter::new(http.clone(), auth)),
        ],
        Arc::new(PassthroughAdapter::new(http)),
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, router));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "subgate listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
