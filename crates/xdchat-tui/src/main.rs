//! XDchat terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Stored settings (or defaults), connect with F2 or /connect
//! xdchat
//!
//! # Override the stored identity and connect right away
//! xdchat --nick alice --channel '#rust' --connect
//! ```

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use xdchat_app::{App, DEFAULT_SETTINGS_FILE, Runtime, SettingsStore};
use xdchat_client::{Session, SessionConfig, TcpConnector};
use xdchat_tui::TerminalDriver;

/// XDchat terminal IRC client
#[derive(Parser, Debug)]
#[command(name = "xdchat")]
#[command(about = "Minimal terminal client for IRC-style chat")]
#[command(version)]
struct Args {
    /// Server host (overrides the settings file)
    #[arg(short, long)]
    server: Option<String>,

    /// Server port (overrides the settings file)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,

    /// Nickname (overrides the settings file)
    #[arg(short, long)]
    nick: Option<String>,

    /// Channel to join (overrides the settings file)
    #[arg(short, long)]
    channel: Option<String>,

    /// Settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Connect immediately on start
    #[arg(long)]
    connect: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file (the terminal is owned by the UI)
    #[arg(long, default_value = "xdchat.log")]
    log_file: PathBuf,
}

impl Args {
    /// Apply command line overrides on top of stored settings.
    fn apply(&self, mut config: SessionConfig) -> Result<SessionConfig, xdchat_client::ConfigError> {
        if let Some(server) = &self.server {
            config = config.with_server(server)?;
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(nick) = &self.nick {
            config = config.with_nickname(nick)?;
        }
        if let Some(channel) = &self.channel {
            config = config.with_channel(channel)?;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = OpenOptions::new().create(true).append(true).open(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file)))
        .with(filter)
        .init();

    tracing::info!("XDchat starting");

    let store = SettingsStore::new(&args.settings);
    let config = args.apply(store.load(SessionConfig::default()))?;
    tracing::info!("Session configured: {config}");

    let (sink, events) = xdchat_client::channel();
    let session = Session::new(TcpConnector, config.clone(), sink);
    let app = App::new(config).with_settings_path(store.path());
    let driver = TerminalDriver::new()?;

    Runtime::new(driver, app, session, events)
        .with_settings(store)
        .connect_on_start(args.connect)
        .run()
        .await?;

    tracing::info!("XDchat exiting");
    Ok(())
}
