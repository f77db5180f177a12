use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use clap::Parser;
use log::{info, LevelFilter};
use device_locator::init_logging;
use device_locator::config::io::ConfigIO;
use device_locator::config::types::LocatorSettings;
use device_locator::packaging::render_info_plist;

#[derive(Parser, Debug)]
#[command(author, version)]
#[command(about = "Generates the Info.plist entries matching the device-locator config.\n\nExample: ./target/release/generate-extension-plist --config device-locator.json target/Info.plist", long_about = None)]
struct Args {
    /// Write the generated Info.plist to this path
    output_path: PathBuf,

    /// Path to the JSON config file to take the identifiers from
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LevelFilter::Info);
    let args = Args::parse();

    let config = ConfigIO::new(args.config)?.read().await?;
    let settings = LocatorSettings::from_config(&config)?;

    let mut info_plist = File::create(&args.output_path)?;
    info_plist.write_all(render_info_plist(&settings).as_bytes())?;

    info!("{} has been created", args.output_path.to_string_lossy());
    Ok(())
}
