//! Terminal driver for shakeball.
//!
//! Reads one input event per line from stdin (see `shakeball_input::parse_event`
//! for the format) and prints whatever the arbiter publishes. Motion sensing is
//! simulated; pick how with `--motion` and `--permission`.

mod terminal;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use shakeball_application::{spawn_arbiter, Settings};
use shakeball_detect::{MotionPlatformRef, NullPlatform, SimulatedPlatform, SimulatedResponse};
use shakeball_input::parse_event;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalEventBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MotionArg {
    /// No motion sensing.
    None,
    /// Motion sensing without a permission step.
    Ungated,
    /// Motion sensing behind a permission prompt.
    Gated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PermissionArg {
    Grant,
    Deny,
    /// The permission call itself errors.
    Fail,
}

#[derive(Debug, Parser)]
#[command(name = "shakeball", version, about = "Ask a question, shake for an answer")]
struct Args {
    /// How the simulated platform exposes motion events.
    #[arg(long, value_enum, default_value_t = MotionArg::None)]
    motion: MotionArg,

    /// Answer to permission requests when motion is gated.
    #[arg(long, value_enum, default_value_t = PermissionArg::Grant)]
    permission: PermissionArg,

    /// Delay before the permission prompt answers, in milliseconds.
    #[arg(long, default_value_t = 0)]
    permission_delay_ms: u64,

    /// JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print published events as JSON lines.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn platform(&self) -> MotionPlatformRef {
        let response = match self.permission {
            PermissionArg::Grant => SimulatedResponse::Grant,
            PermissionArg::Deny => SimulatedResponse::Deny,
            PermissionArg::Fail => SimulatedResponse::Fail("permission prompt failed".to_string()),
        };
        let latency = Duration::from_millis(self.permission_delay_ms);

        match self.motion {
            MotionArg::None => Arc::new(NullPlatform),
            MotionArg::Ungated => Arc::new(SimulatedPlatform::ungated()),
            MotionArg::Gated => {
                Arc::new(SimulatedPlatform::gated(response).with_latency(latency))
            }
        }
    }

    fn settings(&self) -> anyhow::Result<Settings> {
        match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display())),
            None => Ok(Settings::default()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shakeball=debug")),
        )
        .init();

    let args = Args::parse();
    let settings = args.settings()?;
    tracing::info!(motion = ?args.motion, ?settings, "starting shakeball");

    let handle = spawn_arbiter(
        settings,
        args.platform(),
        Arc::new(TerminalEventBus::new(args.json)),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if matches!(line, "quit" | "exit") {
            break;
        }

        let event = match parse_event(line, chrono::Utc::now().timestamp_millis()) {
            Ok(event) => event,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if !handle.dispatch(event)? {
            tracing::debug!(line, "input ignored in current mode");
        }
    }

    handle.flush().await?;
    handle.shutdown().await?;
    Ok(())
}
