//! smartplug CLI - switch and query port-9999 smart plugs from the command line
//!
//! Every failure, including bad arguments, exits with status 100.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgGroup, Parser};
use colored::Colorize;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod actions;

/// Exit status for every kind of failure
const EXIT_FAILURE: i32 = 100;

/// smartplug - control smart plugs and power strips on the local network
#[derive(Parser, Debug)]
#[command(name = "smartplug")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["get_state", "on", "off", "info", "meter", "daystat"])
))]
struct Cli {
    /// Device hostname or IP address
    #[arg(long, env = "SMARTPLUG_HOST", value_parser = non_blank)]
    host: String,

    /// Print whether the relay is on or off
    #[arg(long)]
    get_state: bool,

    /// Switch the relay on
    #[arg(long)]
    on: bool,

    /// Switch the relay off
    #[arg(long)]
    off: bool,

    /// Print the device's system information as JSON
    #[arg(long)]
    info: bool,

    /// Print realtime energy meter readings
    #[arg(long)]
    meter: bool,

    /// Print per-day energy totals for --month of --year
    #[arg(long, requires_all = ["month", "year"])]
    daystat: bool,

    /// Month for --daystat (1-12)
    #[arg(long, requires = "daystat", value_parser = clap::value_parser!(u8).range(1..=12))]
    month: Option<u8>,

    /// Year for --daystat
    #[arg(long, requires = "daystat")]
    year: Option<u16>,

    /// Address one outlet of a power strip (0-based)
    #[arg(long, conflicts_with_all = ["info", "meter", "daystat"])]
    child: Option<u32>,

    /// Device port
    #[arg(long, env = "SMARTPLUG_PORT", default_value_t = smartplug_core::DEFAULT_PORT)]
    port: u16,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "2000")]
    connect_timeout_ms: u64,

    /// Reply deadline in milliseconds (0 waits forever)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Treat non-zero err_code fields in replies as failures
    #[arg(long)]
    check_errors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    fn read_timeout(&self) -> Option<Duration> {
        match self.read_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

fn non_blank(value: &str) -> std::result::Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("host must not be blank".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                std::process::exit(0);
            }
            _ => {
                let _ = e.print();
                std::process::exit(EXIT_FAILURE);
            }
        },
    };

    if let Err(e) = setup_logging(&cli.log_level, cli.json_logs) {
        fail(e);
    }

    if let Err(e) = actions::run(&cli).await {
        fail(e);
    }
}

fn fail(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "error:".red().bold(), err);
    std::process::exit(EXIT_FAILURE);
}

fn setup_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Failed to parse log level")?;

    // stdout carries command output, so logs go to stderr
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
