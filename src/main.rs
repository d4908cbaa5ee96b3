//! svcpanel - terminal control panel for a system service
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use svcpanel::{load_settings, ExitReason};
use svcpanel_core::prelude::*;

/// svcpanel - watch and control one system service
#[derive(Parser, Debug)]
#[command(name = "svcpanel")]
#[command(about = "Live log view and start/stop controls for a system service", long_about = None)]
struct Args {
    /// Service to supervise (overrides the config file)
    #[arg(short, long)]
    service: Option<String>,

    /// Log channel to display, when it differs from the service name
    #[arg(long)]
    channel: Option<String>,

    /// Status poll interval in milliseconds
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Config file to load instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    svcpanel::init()?;

    let settings = load_settings(args.config.as_deref()).with_overrides(
        args.service,
        args.channel,
        args.tick_ms,
    );

    let outcome = svcpanel::run(settings).await?;

    // The elevated instance now owns the service; mirror its exit status
    if outcome.exit == ExitReason::Elevated {
        std::process::exit(outcome.exit_code);
    }
    Ok(())
}
