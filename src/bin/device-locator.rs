use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use log::{info, LevelFilter};
use device_locator::{init_logging, run, RunOptions};
use device_locator::error::{report_error, AppRunError};

#[derive(Parser, Debug)]
#[command(author, version)]
#[command(about = "Scans for bluetooth peripherals and reports them as found/lost devices.", long_about = None)]
struct Args {
    /// Path to the JSON config file. Defaults to a file next to the executable, or the per-user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop scanning after this long, for example "30s" or "5m". Scans until Ctrl-C if omitted.
    #[arg(long, value_parser = humantime::parse_duration)]
    duration: Option<Duration>,

    /// Log every found/lost event and stack notification.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppRunError> {
    let args = Args::parse();
    init_logging(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info });
    info!(concat!("device-locator ", env!("CARGO_PKG_VERSION")));

    let options = RunOptions {
        config_path: args.config,
        duration: args.duration,
    };

    match run(options).await {
        Err(AppRunError::ConfigError { source }) if source.is_misconfiguration() => {
            report_error("Misconfiguration, check the identifiers in the config file", &source);
            Err(AppRunError::ConfigError { source })
        },
        Err(err) => {
            report_error("Unexpected error", &err);
            Err(err)
        },
        Ok(_) => Ok(()),
    }
}
