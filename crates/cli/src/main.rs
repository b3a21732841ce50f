//! hellanzb-remote - Command-line remote control for a hellanzb queue daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hella_core::domain::{ItemId, QueueItem, StatusSnapshot};
use hella_core::{QueueControlClient, QueueError};
use hella_sdk::{HellanzbClient, RemoteConfig, DEFAULT_RPC_URL, DEFAULT_TIMEOUT_SECS};
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hellanzb-remote")]
#[command(about = "Remote control for the hellanzb download queue", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "HELLANZB_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// RPC server password
    #[arg(long, env = "HELLANZB_RPC_PASSWORD", hide_env_values = true)]
    rpc_password: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "HELLANZB_RPC_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List queued NZBs
    List,

    /// Remove an NZB from the queue
    Dequeue {
        /// Item id, or a <prefix>_<id> composite
        id: String,
    },

    /// Set the maximum download rate (KB/s, 0 = unlimited)
    Maxrate {
        #[arg(allow_negative_numbers = true)]
        kbps: String,
    },

    /// Enqueue an NZB by URL (the last path segment is the id)
    Enqueue { url: String },

    /// Show download rate and queue length
    Status,

    /// Print the daemon's ascii art
    Asciiart,
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "Pos")]
    position: u32,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Size")]
    size: String,
}

impl From<&QueueItem> for QueueRow {
    fn from(item: &QueueItem) -> Self {
        Self {
            position: item.position,
            id: item.id.to_string(),
            name: item.name.clone(),
            state: item.state.to_string(),
            size: format!("{:.1} MB", item.size_mb()),
        }
    }
}

fn init_logging() -> Result<()> {
    let log_format = std::env::var("HELLANZB_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("hella=warn"))
        .context("Failed to create env filter")?;

    let installed = match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.context("Failed to install tracing subscriber")
}

fn print_status(status: &StatusSnapshot) {
    let max_rate = if status.is_unlimited() {
        "unlimited".to_string()
    } else {
        format!("{} KB/s", status.max_rate_kbps)
    };

    println!("{}", "Queue Status".cyan().bold());
    println!();
    println!("  {} {}", "Max Rate:".bold(), max_rate);
    println!("  {} {:.1} KB/s", "Current Rate:".bold(), status.current_rate_kbps);
    println!("  {} {}", "Queued:".bold(), status.queue_length);
}

async fn run(command: Commands, client: &QueueControlClient) -> hella_core::Result<()> {
    match command {
        Commands::List => {
            let items = client.list_queue().await?;
            if items.is_empty() {
                println!("{}", "Queue is empty".yellow());
            } else {
                let rows: Vec<QueueRow> = items.iter().map(QueueRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Dequeue { id } => {
            let id = if id.contains('_') {
                client.dequeue_composite(&id).await?
            } else {
                let id = ItemId::parse(&id)?;
                client.dequeue(&id).await?;
                id
            };
            println!("{}", format!("✓ Dequeued {}", id).green().bold());
        }

        Commands::Maxrate { kbps } => {
            let rate = client.set_max_rate_from_form(&kbps).await?;
            println!("{}", format!("✓ Maximum rate set to {}", rate).green().bold());
        }

        Commands::Enqueue { url } => {
            let id = client.enqueue_from_url(&url).await?;
            println!("{}", format!("✓ Enqueued {}", id).green().bold());
        }

        Commands::Status => {
            let status = client.refresh_status().await?;
            print_status(&status);
        }

        Commands::Asciiart => {
            println!("{}", client.ascii_art().await?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let mut config = RemoteConfig::new(&cli.rpc_url).with_timeout(Duration::from_secs(cli.timeout));
    if let Some(password) = cli.rpc_password {
        config = config.with_password(password);
    }
    let client = HellanzbClient::connect(config).context("Failed to configure RPC client")?;

    if let Err(e) = run(cli.command, &client).await {
        debug!(kind = e.kind(), error = ?e, url = %cli.rpc_url, "Command failed");
        eprintln!("{} [{}] {}", "✗".red(), e.kind(), e);
        if matches!(e, QueueError::RemoteUnavailable(_)) {
            eprintln!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
        }
        std::process::exit(1);
    }

    Ok(())
}
