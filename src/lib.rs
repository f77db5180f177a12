use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use futures::StreamExt;
use futures::channel::mpsc::channel;
use log::{info, warn};
use tokio::spawn;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::config::io::ConfigIO;
use crate::config::types::LocatorSettings;
use crate::device::btle::BtleplugStack;
use crate::device::constants::EVENT_CHANNEL_CAPACITY;
use crate::device::locator::{channel_handler, pump_events, DeviceLocator};
use crate::device::stack::CentralStack;
use crate::device::types::{DeviceEvent, DeviceEventKind};
use crate::error::AppRunError;

pub mod config;
pub mod device;
pub mod error;
pub mod packaging;

pub fn init_logging(level: log::LevelFilter) {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Ok(log_file) = env::var("LOG_FILE") {
        dispatch = dispatch.chain(
            fern::log_file(log_file).expect("Failed to open LOG_FILE")
        );
    }

    dispatch.apply().expect("Failed to initialize logger");
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    // scan until ctrl-c if None
    pub duration: Option<Duration>,
}

fn log_device_event(event: &DeviceEvent) {
    let device = &event.device;
    let verb = match event.kind {
        DeviceEventKind::Found => "found",
        DeviceEventKind::Lost => "lost",
    };

    info!(
        "Device {}: {} {:?} ({}, {}, bluetooth id {})",
        verb,
        device.identifier,
        device.display_name,
        device.category,
        device.protocol_type,
        device.bluetooth_identifier.as_deref().unwrap_or("NONE"),
    );
}

async fn wait_for_shutdown(duration: Option<Duration>) -> Result<(), AppRunError> {
    match duration {
        Some(duration) => {
            tokio::select! {
                _ = sleep(duration) => {
                    info!("Scan duration of {} elapsed", humantime::format_duration(duration));
                    Ok(())
                },
                result = tokio::signal::ctrl_c() => result.map_err(|source| AppRunError::SignalError { source }),
            }
        },
        None => tokio::signal::ctrl_c().await.map_err(|source| AppRunError::SignalError { source }),
    }
}

async fn scan_until_shutdown<S: CentralStack>(locator: &DeviceLocator<S>, duration: Option<Duration>) -> Result<(), AppRunError> {
    locator.start_scanning().await?;
    let shutdown = wait_for_shutdown(duration).await;
    locator.stop_scanning().await?;
    shutdown
}

/// Scans with `locator` until `duration` elapses (or Ctrl-C), logging every found/lost event.
/// The event tasks are stopped and joined whether or not scanning fails.
pub async fn host<S: CentralStack + 'static>(locator: Arc<DeviceLocator<S>>, duration: Option<Duration>) -> Result<(), AppRunError> {
    let events = locator.stack().events().await?;
    let cancel = CancellationToken::new();

    let (event_sender, mut event_receiver) = channel::<DeviceEvent>(EVENT_CHANNEL_CAPACITY);
    locator.set_event_handler(channel_handler(event_sender));

    let log_handle = spawn(async move {
        while let Some(event) = event_receiver.next().await {
            log_device_event(&event);
        }
    });
    let pump_handle = pump_events(cancel.clone(), locator.clone(), events);

    let result = scan_until_shutdown(&locator, duration).await;

    cancel.cancel();
    locator.clear_event_handler();

    if let Err(err) = pump_handle.await {
        warn!("Failed to join event pump task: {}", err);
    }
    // the channel closes once the handler, and with it the last sender, is dropped
    if let Err(err) = log_handle.await {
        warn!("Failed to join event log task: {}", err);
    }

    info!("{} device(s) known at shutdown", locator.known_devices().len());
    result
}

/// Hosts a `DeviceLocator` on the platform bluetooth stack.
pub async fn run(options: RunOptions) -> Result<(), AppRunError> {
    let config_io = ConfigIO::new(options.config_path)?;
    let config = config_io.read().await?;
    let settings = LocatorSettings::from_config(&config)?;

    let stack = BtleplugStack::new().await?;
    host(Arc::new(DeviceLocator::new(stack, settings)), options.duration).await
}
