//! pushover-send — deliver a single Pushover notification from the shell.
//!
//! Reads defaults from `PUSHOVER_*` environment variables (and `.env`),
//! prints the normalized result as JSON, and exits non-zero when the
//! provider did not accept the message.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use pushover_gateway::{
    load_dotenv, GatewayConfig, NotificationRequest, Notifier, Overrides, Priority,
    PushoverNotifier,
};

// ── CLI ─────────────────────────────────────────────────────────────

/// Send a push notification through the Pushover API.
#[derive(Parser, Debug)]
#[command(name = "pushover-send", version, about)]
struct Cli {
    /// Pushover user or group key.
    recipient: String,

    /// Message body.
    #[arg(required_unless_present = "test")]
    message: Option<String>,

    /// Application token (defaults to PUSHOVER_API_TOKEN).
    #[arg(long, env = "PUSHOVER_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Message title.
    #[arg(long)]
    title: Option<String>,

    /// Target device name.
    #[arg(long)]
    device: Option<String>,

    /// Notification sound (unknown names fall back to "pushover").
    #[arg(long)]
    sound: Option<String>,

    /// Supplementary URL.
    #[arg(long)]
    url: Option<String>,

    /// Title for the supplementary URL.
    #[arg(long)]
    url_title: Option<String>,

    /// lowest, low, normal or high.
    #[arg(long)]
    priority: Option<Priority>,

    /// Render the message body as HTML.
    #[arg(long)]
    html: bool,

    /// Send the built-in test message instead of MESSAGE.
    #[arg(long)]
    test: bool,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();

    let config = GatewayConfig::from_env_with_token(cli.token.clone())
        .context("failed to build Pushover configuration")?;

    let notifier = PushoverNotifier::from_config(config)?;

    let result = if cli.test {
        info!(recipient = %cli.recipient, "sending test notification");
        notifier.test(&cli.recipient).await?
    } else {
        let request = NotificationRequest::new(cli.recipient, cli.message.unwrap_or_default())
            .with_overrides(Overrides {
                token: None,
                device: cli.device,
                title: cli.title,
                sound: cli.sound,
                url: cli.url,
                url_title: cli.url_title,
                html: cli.html.then_some(true),
                priority: cli.priority,
            });
        notifier.notify(&request).await?
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
