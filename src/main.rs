//! upvibe CLI
//!
//! Usage:
//!   upvibe --id gxvdih                      # Monitor a thread with cached/default settings
//!   upvibe -p gxvdih -m 0.3 -u 250          # Override minimum intensity and full-scale score
//!   upvibe -k "knot,choke" -x 2.0           # Custom keyword triggers and boost
//!   upvibe --reset                          # Forget cached settings first

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upvibe::core::{
    load_credentials, ButtplugSink, MonitorLoop, MonitorTiming, RedditSource, SettingsCache,
    SettingsResolver,
};
use upvibe::types::{MonitorError, MonitorReport, MonitorResult, PartialSettings};
use upvibe::{CREDENTIALS_FILE, PULSE_HOLD_SECS, SETTINGS_CACHE_FILE, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "upvibe",
    version = VERSION,
    about = "Pulse a connected device as a Reddit thread gains upvotes and comments",
    long_about = "upvibe watches one Reddit thread. Every new comment triggers a pulse on\n\
                  the first connected device: the level grows with the thread's score and\n\
                  is boosted when the comment contains a trigger keyword.\n\n\
                  Settings given on the command line are cached and reused on the next run.\n\
                  Credentials and the device server address are read from config.json."
)]
struct Args {
    /// Reddit post ID (e.g. 'gxvdih')
    #[arg(short = 'p', long = "id")]
    id: Option<String>,

    /// Minimum intensity (0.0-1.0)
    #[arg(short, long)]
    minimum: Option<f64>,

    /// Upvote count where intensity hits 1.0
    #[arg(short = 'u', long)]
    max_upvotes: Option<u32>,

    /// Comma-separated keyword triggers (e.g. 'knot,choke,gock')
    #[arg(short, long)]
    keywords: Option<String>,

    /// Intensity multiplier when a keyword is detected (e.g. 1.5)
    #[arg(short = 'x', long)]
    multiplier: Option<f64>,

    /// Reset cached settings to default
    #[arg(short, long)]
    reset: bool,

    /// Credentials file
    #[arg(long, default_value = CREDENTIALS_FILE)]
    config: PathBuf,

    /// Settings cache file
    #[arg(long, default_value = SETTINGS_CACHE_FILE)]
    cache: PathBuf,

    /// Seconds each pulse holds its level
    #[arg(long, default_value_t = PULSE_HOLD_SECS)]
    hold: f64,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

impl Args {
    /// Overrides supplied on this run
    fn overrides(&self) -> PartialSettings {
        PartialSettings {
            thread_id: self.id.clone(),
            min_intensity: self.minimum,
            max_score: self.max_upvotes,
            keywords: self.keywords.as_deref().map(PartialSettings::parse_keywords),
            multiplier: self.multiplier,
        }
    }

    fn pulse_hold(&self) -> MonitorResult<Duration> {
        Duration::try_from_secs_f64(self.hold)
            .map_err(|e| MonitorError::Config(format!("invalid hold {}: {}", self.hold, e)))
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    print_header();

    match run(&args).await {
        Ok(report) => {
            print_report(&report, &args);
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Resolve configuration and run the monitor until Ctrl-C
async fn run(args: &Args) -> MonitorResult<MonitorReport> {
    let credentials = load_credentials(&args.config)?;
    let resolver = SettingsResolver::new(SettingsCache::new(&args.cache));
    let settings = resolver.resolve(&args.overrides(), args.reset)?;
    let timing = MonitorTiming { pulse_hold: args.pulse_hold()?, ..MonitorTiming::default() };

    let source = RedditSource::new(credentials.clone())?;
    let sink = ButtplugSink::new();
    let mut monitor = MonitorLoop::new(settings, credentials.server_url, source, sink).with_timing(timing);

    let report = monitor
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;
    Ok(report)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Print header
fn print_header() {
    println!("{}", "========================================".bold());
    println!("{}", format!("  upvibe v{}", VERSION).bold());
    println!("{}", "========================================".bold());
    println!();
}

/// Print the run summary
fn print_report(report: &MonitorReport, args: &Args) {
    if args.json {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Cannot serialize report: {}", e),
        }
        return;
    }

    println!();
    if args.no_color {
        println!("{}", report.to_parseable_string());
    } else {
        println!("{}", report.to_terminal_string());
    }
    if let Some(reason) = &report.fatal_error {
        println!("{} {}", "✗".red(), reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("upvibe").chain(extra.iter().copied()))
    }

    #[test]
    fn test_default_hold() {
        assert_eq!(args(&[]).pulse_hold().unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_fractional_hold() {
        assert_eq!(args(&["--hold", "0.5"]).pulse_hold().unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn test_huge_hold_is_config_error() {
        let err = args(&["--hold", "1e20"]).pulse_hold().unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)));
    }

    #[test]
    fn test_negative_or_nan_hold_rejected() {
        assert!(args(&["--hold=-1"]).pulse_hold().is_err());
        assert!(args(&["--hold", "NaN"]).pulse_hold().is_err());
    }

    #[test]
    fn test_overrides_from_flags() {
        let overrides = args(&["-p", "abc", "-k", "Leash, Bark"]).overrides();
        assert_eq!(overrides.thread_id.as_deref(), Some("abc"));
        assert_eq!(overrides.keywords, Some(vec!["leash".to_string(), "bark".to_string()]));
        assert!(overrides.min_intensity.is_none());
    }
}
