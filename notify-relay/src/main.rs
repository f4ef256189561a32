use clap::Parser;
use notify_relay::server::ConnectionLimits;
use notify_relay::sink::DispatchOptions;
use notify_relay::{
    Dispatcher, HostOs, PolicyConfig, PolicyEngine, PolicyLoader, RelayServer, RelayServerConfig,
    DEFAULT_PORT,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "notify-relay")]
#[command(about = "Relays desktop notifications from a sandboxed guest to the host")]
struct Args {
    /// Loopback TCP port to listen on
    #[arg(long, short = 'p', env = "NOTIFY_RELAY_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Notification policy file (TOML)
    #[arg(long, short = 'c', env = "NOTIFY_RELAY_POLICY")]
    policy: Option<PathBuf>,

    /// Seconds an external notifier may run before it is killed
    #[arg(long, default_value = "10")]
    tool_timeout: u64,

    /// Seconds to wait for a client's request line
    #[arg(long, default_value = "30")]
    read_timeout: u64,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let env_filter = if args.verbose {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::DEBUG.into())
    } else {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let policy = PolicyLoader::load(args.policy);

    let options = DispatchOptions {
        enable_sound: policy.enable_sound,
        tool_timeout: Duration::from_secs(args.tool_timeout),
    };
    let host_os = HostOs::detect();
    let dispatcher = Dispatcher::for_host(host_os, &options);

    let server_config = RelayServerConfig {
        port: args.port,
        engine: Arc::new(PolicyEngine::new(policy)),
        dispatcher: Arc::new(dispatcher),
        limits: ConnectionLimits {
            read_timeout: Duration::from_secs(args.read_timeout),
            ..Default::default()
        },
    };

    // Bind failures end startup before anything is accepted
    let server = RelayServer::bind(server_config).await?;
    log_banner(server.config(), host_os);

    tracing::info!("Guests can now send notifications to this host. Press Ctrl+C to stop.");
    server.serve(shutdown_signal()).await;

    Ok(())
}

fn log_banner(config: &RelayServerConfig, host_os: HostOs) {
    let policy = config.engine.policy();
    let show_types: Vec<&str> = policy.show_types.iter().map(String::as_str).collect();

    tracing::info!("Show types: {}", show_types.join(", "));
    tracing::info!(
        "Default timeout: {}",
        PolicyConfig::describe_timeout(policy.default_timeout)
    );
    tracing::info!("Require URL: {}", policy.require_url);
    tracing::info!(
        "Notifiers ({}): {}",
        host_os,
        config.dispatcher.sink_names().join(" -> ")
    );
}

/// Resolve on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
