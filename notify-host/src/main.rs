use anyhow::Context;
use clap::Parser;
use notify_relay::client::send_request;
use notify_relay::{NotificationRequest, Response, DEFAULT_PORT};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "notify-host")]
#[command(about = "Ask the host's notify-relay to show a desktop notification")]
struct Args {
    /// Host running notify-relay, as seen from the guest
    #[arg(long, env = "NOTIFY_RELAY_HOST", default_value = "10.0.2.2")]
    host: String,

    /// notify-relay port
    #[arg(long, short = 'p', env = "NOTIFY_RELAY_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// URL opened when the notification is clicked
    #[arg(long)]
    url: Option<String>,

    /// Seconds before the notification is dismissed (0 = keep until dismissed)
    #[arg(long)]
    timeout: Option<u64>,

    /// Notification type: info, success, error, warning, needs_input, task_complete, task_start
    #[arg(long = "type", short = 't', default_value = "info")]
    kind: String,

    /// Seconds to wait for the relay
    #[arg(long, default_value = "5")]
    wait: u64,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Notification title; used as the body when no message is given
    title: String,

    /// Notification body
    message: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging - only if NOTIFY_LOG env var or verbose flag
    let _ = if args.verbose || std::env::var("NOTIFY_LOG").is_ok() {
        let filter = std::env::var("NOTIFY_LOG").unwrap_or_else(|_| "debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::ERROR)
            .with_writer(std::io::stderr)
            .try_init()
    };

    let request = NotificationRequest {
        title: args.title,
        message: args.message.unwrap_or_default(),
        url: args.url,
        timeout_secs: args.timeout,
        kind: args.kind,
    };

    let addr = format!("{}:{}", args.host, args.port);
    tracing::debug!("Sending {:?} to {}", request.to_line(), addr);

    let response = send_request(addr.as_str(), &request, Duration::from_secs(args.wait))
        .await
        .with_context(|| format!("Failed to reach notify-relay at {}", addr))?;

    println!("{}", response);

    if let Response::Error(_) = response {
        std::process::exit(1);
    }

    Ok(())
}
