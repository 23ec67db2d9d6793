use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gopin_router::{server, Dispatcher, GithubRefSource, RouterOptions};

/// Serve version-pinned Go packages straight from GitHub.
#[derive(Debug, Parser)]
#[command(name = "gopin", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000", env = "GOPIN_LISTEN")]
    listen: SocketAddr,

    /// Public domain of this proxy, as it appears in import paths.
    #[arg(long, default_value = "localhost:3000", env = "GOPIN_DOMAIN")]
    domain: String,

    /// Advertise `http` instead of `https` to `go get`.
    #[arg(long, env = "GOPIN_DEV")]
    dev: bool,

    /// Base URL refs are fetched from and upload-pack is redirected to.
    #[arg(long, default_value = "https://github.com", env = "GOPIN_GITHUB_URL")]
    github_url: String,

    /// Timeout of upstream ref fetches, in seconds.
    #[arg(long, default_value_t = 10, env = "GOPIN_FETCH_TIMEOUT")]
    fetch_timeout: u64,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info", env = "GOPIN_LOG_LEVEL")]
    log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "GOPIN_LOG_FORMAT")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().with_target(true).init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    let options = RouterOptions::new()
        .with_listen(args.listen)
        .with_domain(args.domain)
        .with_dev(args.dev)
        .with_github_url(args.github_url)
        .with_fetch_timeout(Duration::from_secs(args.fetch_timeout));

    let source = Arc::new(GithubRefSource::new(&options).context("failed to create the GitHub client")?);
    let dispatcher = Arc::new(Dispatcher::new(options, source)?);
    let options = dispatcher.options();

    let listener = tokio::net::TcpListener::bind(options.listen)
        .await
        .with_context(|| format!("failed to bind {}", options.listen))?;
    info!(
        listen = %options.listen,
        domain = %options.domain,
        dev = options.dev,
        version = gopin_router::VERSION,
        "serving packages"
    );

    axum::serve(listener, server::router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;
    Ok(())
}
