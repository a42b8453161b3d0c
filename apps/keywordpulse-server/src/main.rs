//! KeywordPulse HTTP server

use anyhow::{Context, Result};
use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use keyword_pulse::{Config, KeywordPulseModule};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "keyword_pulse=info,keywordpulse_server=info,tower_http=info";
const ENV_PREFIX: &str = "KEYWORDPULSE__";

/// Plain environment variables of the hosted deployment, applied verbatim
const PLAIN_ENV: [&str; 6] = [
    "TELEGRAM_BOT_TOKEN",
    "TELEGRAM_CHAT_ID",
    "TELEGRAM_ADMIN_CHAT_ID",
    "NEXT_PUBLIC_SUPABASE_URL",
    "NEXT_PUBLIC_SUPABASE_ANON_KEY",
    "GOOGLE_SERVICE_ACCOUNT",
];

#[derive(Debug, Parser)]
#[command(name = "keywordpulse-server", version, about = "KeywordPulse API server")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides the configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;

    let module = KeywordPulseModule::new();
    module.init(config)?;
    let app = module.register_rest(axum::Router::new())?;

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "KeywordPulse listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Defaults, then the YAML file, then `KEYWORDPULSE__*`, then the plain variables
fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::new();
    if let Some(path) = path {
        figment = figment.merge(Yaml::file_exact(path));
    }
    let mut config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("failed to load configuration")?;

    apply_plain_env(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Overlay the plain deployment variables as raw strings
fn apply_plain_env(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    for name in PLAIN_ENV {
        let Some(value) = lookup(name).filter(|v| !v.is_empty()) else {
            continue;
        };
        let slot = match name {
            "TELEGRAM_BOT_TOKEN" => &mut config.telegram.bot_token,
            "TELEGRAM_CHAT_ID" => &mut config.telegram.chat_id,
            "TELEGRAM_ADMIN_CHAT_ID" => &mut config.telegram.admin_chat_id,
            "NEXT_PUBLIC_SUPABASE_URL" => &mut config.supabase.url,
            "NEXT_PUBLIC_SUPABASE_ANON_KEY" => &mut config.supabase.anon_key,
            _ => &mut config.google.service_account,
        };
        *slot = Some(value);
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
    cancel.cancel();
}
