//! jeanserv - concurrent TCP server.
//!
//! Run with: cargo run -p jeanserv-server -- --port 6000
//!
//! Then connect with `nc 127.0.0.1 6000` and type `ping` or `help`.

use std::{net::IpAddr, path::PathBuf};

use clap::Parser;
use jeanserv_core::{ConfigError, ServerConfig};
use jeanserv_server::{Server, WriterSink};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "jeanserv")]
#[command(version, about = "Concurrent TCP server with a multiplexed event log")]
struct Args {
    /// Path to a JSON configuration file.
    #[arg(long, env = "JEANSERV_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to.
    #[arg(long, env = "JEANSERV_HOST")]
    host: Option<IpAddr>,

    /// Port to listen on.
    #[arg(long, env = "JEANSERV_PORT")]
    port: Option<u16>,

    /// Receive buffer size per session, in bytes.
    #[arg(long, env = "JEANSERV_BUFFER_SIZE")]
    buffer_size: Option<usize>,

    /// Seconds without events before a heartbeat line is logged.
    #[arg(long, env = "JEANSERV_IDLE_SECS")]
    idle_secs: Option<u64>,

    /// Branding sent to every client on connect.
    #[arg(long, env = "JEANSERV_BANNER")]
    banner: Option<String>,

    /// Disable colours in the event log and replies.
    #[arg(long, env = "JEANSERV_NO_COLOR")]
    no_color: bool,

    /// Output diagnostics as JSON.
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Defaults, then the config file, then env/CLI overrides.
    fn resolve_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(buffer_size) = self.buffer_size {
            config.buffer_size = buffer_size;
        }
        if let Some(idle_secs) = self.idle_secs {
            config.idle_interval_secs = idle_secs;
        }
        if let Some(banner) = &self.banner {
            config.banner.clone_from(banner);
        }
        if self.no_color {
            config.color = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Diagnostics go to stderr; stdout carries only the event stream.
fn init_tracing(default_filter: &str, log_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing("jeanserv_server=info,jeanserv_commands=info", args.log_json);

    let config = args.resolve_config()?;
    let commands = jeanserv_commands::default_table()?;

    match jeanserv_commands::ascii::render(&config.banner) {
        Some(art) => println!("{art}"),
        None => println!("{}", config.banner),
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.listen_addr(),
        "Starting jeanserv"
    );

    if let Err(err) = Server::new(config, commands).run(WriterSink::stdout()).await {
        error!(error = %err, "Server stopped");
        return Err(err.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let args = Args::try_parse_from([
            "jeanserv",
            "--port",
            "7001",
            "--banner",
            "Hi",
            "--no-color",
        ])
        .unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config.port, 7001);
        assert_eq!(config.banner, "Hi");
        assert!(!config.color);
        assert_eq!(config.buffer_size, 1024);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = Args::try_parse_from(["jeanserv", "--buffer-size", "0"]).unwrap();
        assert!(matches!(args.resolve_config(), Err(ConfigError::Invalid(_))));
    }
}
