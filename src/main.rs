//! FilamentScout — finds slicer filament profiles and summarises them.
//!
//! Thin binary entry point. All logic lives in the `filament-core`
//! and `filament-console` crates.

use anyhow::Context;
use clap::Parser;
use filament_console::{ConsoleOptions, OutputFormat};
use filament_core::platform::{PathEnvironment, Platform};
use filament_core::scanner::progress::ScanOutcome;
use filament_core::ScanConfig;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "filament-scout", version, about)]
struct Args {
    /// Use this directory as the home directory instead of the current user's
    #[arg(long, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Resolve slicer folders as if running on this platform
    #[arg(long, value_name = "PLATFORM", value_parser = parse_platform)]
    platform: Option<Platform>,

    /// Slicer application folder to search (repeatable; replaces the default set)
    #[arg(long = "slicer", value_name = "NAME")]
    slicers: Vec<String>,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the file listing to a CSV file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Keep index entries for files that have disappeared since the last scan
    #[arg(long)]
    keep_stale: bool,

    /// Give up on a single profile read after this many seconds (0 disables)
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    read_timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    Platform::from_name(value).ok_or_else(|| format!("unsupported platform: {value}"))
}

fn build_config(args: &Args) -> anyhow::Result<ScanConfig> {
    let mut config = match args.home {
        Some(ref home) => ScanConfig::new(
            Platform::current(),
            PathEnvironment::from_process_with_home(home.clone()),
        ),
        None => ScanConfig::detect().context("could not read the user environment")?,
    };
    if let Some(platform) = args.platform {
        config.platform = platform;
    }
    config.read_timeout = match args.read_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    config.clear_before_scan = !args.keep_stale;
    Ok(config.with_slicers(args.slicers.iter().cloned()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialise structured logging. Logs go to stderr so `--json` output
    // on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("FilamentScout starting");

    let mut options = ConsoleOptions::new(build_config(&args)?);
    options.format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    options.csv_path = args.csv;

    let interrupt = options.interrupt.clone();
    ctrlc::set_handler(move || {
        interrupt.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    let stdout = std::io::stdout();
    let outcome = filament_console::run(options, &mut stdout.lock())?;

    if outcome == ScanOutcome::Failed {
        anyhow::bail!("scan did not complete");
    }
    Ok(())
}
